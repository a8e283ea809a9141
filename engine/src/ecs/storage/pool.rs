use std::any::{Any, type_name};

use crate::ecs::{component::Component, entity::Entity, storage::index::SparseIndex};

/// Dense storage for every live instance of one component type.
///
/// Components are packed into a contiguous vector with no holes. Two maps keep it addressable
/// by entity:
///
/// - a sparse [`SparseIndex`] from entity id to dense slot
/// - a dense vector from slot back to entity, parallel to the components
///
/// The two are exact inverses over the occupied slots.
///
/// # Removal
///
/// Removing swaps the last component into the vacated slot and shrinks by one, so removal is
/// O(1) and the storage stays dense:
///
/// ```text
/// before remove(e2):  [c1, c2, c3]   slots: e1->0 e2->1 e3->2
/// after  remove(e2):  [c1, c3]       slots: e1->0 e3->1
/// ```
///
/// Any reference into the pool is invalidated by a removal from the same pool.
///
/// # Example
///
/// ```ignore
/// let mut pool = Pool::<Position>::new();
/// pool.set(entity, Position { x: 1.0, y: 2.0 });
/// assert_eq!(pool.get(entity).unwrap().x, 1.0);
/// ```
#[derive(Debug)]
pub struct Pool<T> {
    /// The component values, densely packed.
    components: Vec<T>,
    /// Owner of each dense slot.
    entities: Vec<Entity>,
    /// Dense slot of each entity.
    index: SparseIndex,
}

impl<T: Component> Pool<T> {
    /// Create a new empty pool.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new pool able to hold `capacity` components before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            components: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            index: SparseIndex::new(),
        }
    }

    /// Get the number of components stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the pool is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Store `component` for `entity`.
    ///
    /// An entity already in the pool has its value overwritten in place and the previous value
    /// is returned. Otherwise the component is appended to the dense storage.
    pub fn set(&mut self, entity: Entity, component: T) -> Option<T> {
        if let Some(slot) = self.index.get(entity) {
            return Some(std::mem::replace(&mut self.components[slot], component));
        }

        let slot = self.components.len();
        self.components.push(component);
        self.entities.push(entity);
        self.index.insert(entity, slot);

        debug_assert_eq!(self.entities.len(), self.components.len());
        None
    }

    /// Remove and return the component stored for `entity`, if any.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.index.remove(entity)?;

        let last = self.components.len() - 1;
        if slot != last {
            // The last entity moves into the vacated slot.
            let moved = self.entities[last];
            self.index.insert(moved, slot);
        }

        self.entities.swap_remove(slot);
        let component = self.components.swap_remove(slot);

        debug_assert_eq!(self.entities.len(), self.components.len());
        Some(component)
    }

    /// Get a reference to the component stored for `entity`.
    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let slot = self.index.get(entity)?;
        Some(&self.components[slot])
    }

    /// Get a mutable reference to the component stored for `entity`.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = self.index.get(entity)?;
        Some(&mut self.components[slot])
    }

    /// Check if `entity` has a component in this pool.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains(entity)
    }

    /// Get the dense slot holding `entity`'s component.
    #[inline]
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        self.index.get(entity)
    }

    /// The dense component storage. Exactly [`len`](Self::len) live components, no gaps.
    #[inline]
    pub fn components(&self) -> &[T] {
        &self.components
    }

    /// Mutable access to the dense component storage.
    #[inline]
    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.components
    }

    /// The owners of the dense storage, slot for slot.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterate over `(entity, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.entities.iter().copied().zip(self.components.iter())
    }

    /// Iterate mutably over `(entity, component)` pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }

    /// Remove every component.
    pub fn clear(&mut self) {
        self.components.clear();
        self.entities.clear();
        self.index.clear();
    }
}

impl<T: Component> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`Pool`], so pools of different component types can sit in one
/// collection and be purged uniformly when an entity is destroyed.
pub trait AnyPool: Any {
    /// Remove `entity`'s component, if present. Returns whether anything was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Check if `entity` has a component in this pool.
    fn contains_entity(&self, entity: Entity) -> bool;

    /// Number of components stored.
    fn len(&self) -> usize;

    /// Check if the pool is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every component.
    fn clear(&mut self);

    /// The stored component's type name.
    fn component_name(&self) -> &'static str;

    /// Upcast for downcasting back to the typed pool.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting back to the typed pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyPool for Pool<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        Pool::len(self)
    }

    fn clear(&mut self) {
        Pool::clear(self)
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
