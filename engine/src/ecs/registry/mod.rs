//! The ECS coordinator.
//!
//! A [`Registry`] owns everything: entity ids, per-entity signatures, component pools,
//! systems, the pending queues and the tag and group indices.
//!
//! # Frame model
//!
//! Entity creation, destruction and component changes are recorded immediately but only
//! reach system membership at the frame boundary, when [`Registry::update`] runs:
//!
//! ```text
//! frame N                                   boundary              frame N+1
//! ──────────────────────────────────────────┬──────────────────────┬──────────────────
//! create_entity()     -> pending addition   │ update():            │ systems see new
//! add_component()     -> pending addition   │  1. re-match pending │ membership
//! remove_component()  -> pending addition   │     additions        │
//! kill_entity()       -> pending kill       │  2. destroy pending  │
//!                                           │     kills            │
//! ```
//!
//! Within a frame, every system's entity list stays the same no matter what game code does,
//! so systems can iterate their lists while creating and killing entities.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = Registry::new();
//! registry.add_system(Movement::new());
//!
//! let ship = registry.create_entity();
//! registry.add_component(ship, Position { x: 0.0, y: 0.0 });
//! registry.add_component(ship, Velocity { x: 1.0, y: 0.0 });
//! registry.tag_entity(ship, "player");
//!
//! registry.update(); // ship joins Movement
//! ```

mod tags;

use std::{
    any::type_name,
    collections::BTreeSet,
    fmt, mem,
    panic::{self, AssertUnwindSafe},
};

use fixedbitset::FixedBitSet;
use log::{debug, trace, warn};

use crate::ecs::{
    component::{self, Component},
    entity::{Allocator, Entity, EntityMut, EntityRef},
    error::{EcsError, Result},
    signature::Signature,
    storage::{Pool, Pools},
    system::{System, registry::Systems},
};

use tags::{Groups, Tags};

/// Owner of all entities, components and systems of one game world.
pub struct Registry {
    /// Entity id source with first-in first-out reuse.
    allocator: Allocator,

    /// Live entities by id.
    alive: FixedBitSet,

    /// Number of live entities.
    live_count: usize,

    /// Component signature of each entity, indexed by entity id.
    signatures: Vec<Signature>,

    /// One pool per component type, indexed by component id.
    pools: Pools,

    /// Registered systems by type.
    systems: Systems,

    /// Entities to match against systems at the next update.
    entities_to_add: BTreeSet<Entity>,

    /// Entities to destroy at the next update.
    entities_to_kill: BTreeSet<Entity>,

    tags: Tags,
    groups: Groups,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty registry with room for `entities` entity ids before reallocating.
    pub fn with_capacity(entities: usize) -> Self {
        Self {
            allocator: Allocator::new(),
            alive: FixedBitSet::with_capacity(entities),
            live_count: 0,
            signatures: Vec::with_capacity(entities),
            pools: Pools::new(),
            systems: Systems::default(),
            entities_to_add: BTreeSet::new(),
            entities_to_kill: BTreeSet::new(),
            tags: Tags::default(),
            groups: Groups::default(),
        }
    }

    // Entities ---------------------------------------------------------------------------

    /// Create a new entity with no components.
    ///
    /// The entity is live immediately, so components can be attached right away, but no system
    /// sees it until the next [`update`](Self::update).
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.alloc();
        let index = entity.index();

        if index >= self.signatures.len() {
            self.signatures.resize_with(index + 1, Signature::new);
        }
        self.alive.grow(index + 1);
        self.alive.insert(index);
        self.live_count += 1;

        self.entities_to_add.insert(entity);
        debug!("entity created with id = {}", entity.id());
        entity
    }

    /// Schedule `entity` for destruction at the next [`update`](Self::update).
    ///
    /// The entity stays fully usable until then. Killing it again before the update has no
    /// further effect.
    pub fn kill_entity(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            warn!("ignoring kill of {entity}: it is not alive");
            return;
        }

        if self.entities_to_kill.insert(entity) {
            trace!("{entity} scheduled for destruction");
        }
    }

    /// Check if `entity` is live. Entities scheduled for destruction are live until the next
    /// update.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(entity.index())
    }

    /// Number of live entities.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.live_count
    }

    /// Iterate over the live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.ones().map(|index| Entity::new(index as u32))
    }

    /// Entities waiting to be matched against systems, in ascending id order.
    pub fn pending_additions(&self) -> impl ExactSizeIterator<Item = Entity> + '_ {
        self.entities_to_add.iter().copied()
    }

    /// Entities waiting to be destroyed, in ascending id order.
    pub fn pending_kills(&self) -> impl ExactSizeIterator<Item = Entity> + '_ {
        self.entities_to_kill.iter().copied()
    }

    /// Check if `entity` is scheduled for destruction at the next update.
    #[inline]
    pub fn is_pending_kill(&self, entity: Entity) -> bool {
        self.entities_to_kill.contains(&entity)
    }

    /// The component signature of a live entity.
    pub fn signature(&self, entity: Entity) -> Option<&Signature> {
        if !self.is_alive(entity) {
            return None;
        }
        self.signatures.get(entity.index())
    }

    /// Borrow `entity` together with this registry.
    #[inline]
    pub fn entity(&self, entity: Entity) -> EntityRef<'_> {
        EntityRef::new(self, entity)
    }

    /// Mutably borrow `entity` together with this registry.
    #[inline]
    pub fn entity_mut(&mut self, entity: Entity) -> EntityMut<'_> {
        EntityMut::new(self, entity)
    }

    /// Apply the changes queued since the last update.
    ///
    /// Runs in two phases:
    ///
    /// 1. Every pending addition is tested against every system. It joins the systems whose
    ///    signature it now matches and leaves those it no longer matches.
    /// 2. Every pending kill is removed from all systems, stripped of its components, tag and
    ///    group, and its id is released for reuse.
    ///
    /// Call once per frame, after the frame's entity and component changes and before any
    /// system logic runs.
    ///
    /// # Panics
    ///
    /// If called while a system is checked out by [`with_system`](Self::with_system).
    pub fn update(&mut self) {
        if let Some(name) = self.systems.checked_out() {
            panic!("Registry::update called while system {name} is checked out");
        }

        for entity in mem::take(&mut self.entities_to_add) {
            if !self.is_alive(entity) || self.entities_to_kill.contains(&entity) {
                continue;
            }

            let signature = &self.signatures[entity.index()];
            for (name, state) in self.systems.states_mut() {
                let matches = signature.matches(state.signature());
                if matches && !state.contains(entity) {
                    state.add_entity(entity);
                    trace!("{entity} added to {name}");
                } else if !matches && state.remove_entity(entity) {
                    trace!("{entity} removed from {name}");
                }
            }
        }

        for entity in mem::take(&mut self.entities_to_kill) {
            self.destroy(entity);
        }
    }

    /// Tear down a live entity and release its id.
    fn destroy(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            return;
        }

        for (_, state) in self.systems.states_mut() {
            state.remove_entity(entity);
        }
        self.signatures[entity.index()].clear();
        let purged = self.pools.purge(entity);
        self.tags.remove(entity);
        self.groups.remove(entity);

        self.alive.set(entity.index(), false);
        self.live_count -= 1;
        self.allocator.free(entity);
        debug!("entity {} destroyed ({} components purged)", entity.id(), purged);
    }

    /// Destroy every entity immediately and forget all pending work.
    ///
    /// Systems stay registered with empty entity lists. Entity ids start again from 0.
    ///
    /// # Panics
    ///
    /// If called while a system is checked out by [`with_system`](Self::with_system).
    pub fn clear(&mut self) {
        if let Some(name) = self.systems.checked_out() {
            panic!("Registry::clear called while system {name} is checked out");
        }

        self.allocator.reset();
        self.alive.clear();
        self.live_count = 0;
        self.signatures.clear();
        self.pools.clear();
        self.systems.clear_entities();
        self.entities_to_add.clear();
        self.entities_to_kill.clear();
        self.tags.clear();
        self.groups.clear();
        debug!("registry cleared");
    }

    // Components -------------------------------------------------------------------------

    /// Attach `component` to `entity`, returning the value it replaces.
    ///
    /// The entity is re-matched against systems at the next update.
    ///
    /// # Panics
    ///
    /// If `C` is a new component type and [`MAX_COMPONENTS`](crate::ecs::MAX_COMPONENTS)
    /// types are already in use.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> Option<C> {
        if !self.is_alive(entity) {
            warn!("ignoring {} added to {entity}: it is not alive", type_name::<C>());
            return None;
        }

        self.signatures[entity.index()].set(component::id_of::<C>());
        let previous = self.pools.get_or_create::<C>().set(entity, component);

        self.entities_to_add.insert(entity);
        trace!("{} added to {entity}", type_name::<C>());
        previous
    }

    /// Detach component `C` from `entity`, returning it.
    ///
    /// The value leaves its pool immediately. The entity is re-matched against systems at the
    /// next update, so it keeps being processed by systems requiring `C` until then.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Option<C> {
        if !self.is_alive(entity) {
            warn!("ignoring {} removed from {entity}: it is not alive", type_name::<C>());
            return None;
        }

        let id = component::try_id_of::<C>()?;
        self.signatures[entity.index()].unset(id);
        let removed = self.pools.get_mut::<C>()?.remove(entity)?;

        self.entities_to_add.insert(entity);
        trace!("{} removed from {entity}", type_name::<C>());
        Some(removed)
    }

    /// Check if `entity` currently has component `C`.
    #[inline]
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        component::try_id_of::<C>().is_some_and(|id| {
            self.signature(entity)
                .is_some_and(|signature| signature.contains(id))
        })
    }

    /// Borrow `entity`'s component `C`.
    pub fn get_component<C: Component>(&self, entity: Entity) -> Result<&C> {
        self.pools
            .get::<C>()
            .and_then(|pool| pool.get(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: type_name::<C>(),
            })
    }

    /// Mutably borrow `entity`'s component `C`.
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C> {
        self.pools
            .get_mut::<C>()
            .and_then(|pool| pool.get_mut(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: type_name::<C>(),
            })
    }

    /// The dense storage of component `C`, if any entity has ever had one.
    #[inline]
    pub fn pool<C: Component>(&self) -> Option<&Pool<C>> {
        self.pools.get::<C>()
    }

    // Systems ----------------------------------------------------------------------------

    /// Register `system`, returning the instance of the same type it replaces.
    ///
    /// Every live entity is queued, so the system's membership is filled in at the next update
    /// whether or not the entities existed before it.
    pub fn add_system<S: System>(&mut self, system: S) -> Option<S> {
        let name = system.name();
        let replaced = self.systems.insert(system);
        if replaced.is_some() {
            warn!("system {name} was already registered, replacing it");
        } else {
            debug!("system {name} registered");
        }

        let live: Vec<_> = self.entities().collect();
        self.entities_to_add.extend(live);
        replaced
    }

    /// Unregister the system of type `S`, returning it.
    ///
    /// Returns `None` if it is not registered, or is checked out by
    /// [`with_system`](Self::with_system), in which case it is dropped when `with_system`
    /// returns.
    pub fn remove_system<S: System>(&mut self) -> Option<S> {
        let removed = self.systems.remove::<S>();
        if removed.is_some() {
            debug!("system {} removed", type_name::<S>());
        }
        removed
    }

    /// Check if a system of type `S` is registered.
    #[inline]
    pub fn has_system<S: System>(&self) -> bool {
        self.systems.contains::<S>()
    }

    /// Borrow the system of type `S`.
    #[inline]
    pub fn get_system<S: System>(&self) -> Result<&S> {
        self.systems.get::<S>()
    }

    /// Mutably borrow the system of type `S`.
    #[inline]
    pub fn get_system_mut<S: System>(&mut self) -> Result<&mut S> {
        self.systems.get_mut::<S>()
    }

    /// Run `f` with the system of type `S` and mutable access to the registry.
    ///
    /// The system is taken out of the registry for the duration of the call, so `f` can walk
    /// the system's entity list while reading and writing components, creating or killing
    /// entities. Inside `f` the system is reported as checked out by
    /// [`get_system`](Self::get_system), and [`update`](Self::update) must not be called.
    ///
    /// ```rust,ignore
    /// registry.with_system(|movement: &mut Movement, registry| {
    ///     for &entity in movement.entities() {
    ///         // ...
    ///     }
    /// })?;
    /// ```
    ///
    /// A panic in `f` is propagated after the system has been put back.
    pub fn with_system<S, R>(&mut self, f: impl FnOnce(&mut S, &mut Self) -> R) -> Result<R>
    where
        S: System,
    {
        let mut system = self.systems.check_out::<S>()?;
        let result = panic::catch_unwind(AssertUnwindSafe(|| f(&mut *system, self)));
        self.systems.check_in(system);
        match result {
            Ok(result) => Ok(result),
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Number of registered systems.
    #[inline]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    // Tags and groups --------------------------------------------------------------------

    /// Give `entity` a unique tag.
    ///
    /// The entity's previous tag is released, and if another entity held `tag` it loses it.
    pub fn tag_entity(&mut self, entity: Entity, tag: impl Into<String>) {
        if !self.is_alive(entity) {
            warn!("ignoring tag for {entity}: it is not alive");
            return;
        }
        self.tags.set(entity, tag.into());
    }

    /// Check if `entity` holds `tag`.
    #[inline]
    pub fn entity_has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.tags.has(entity, tag)
    }

    /// Find the entity holding `tag`.
    pub fn get_entity_by_tag(&self, tag: &str) -> Result<Entity> {
        self.tags
            .get(tag)
            .ok_or_else(|| EcsError::UnknownTag(tag.to_string()))
    }

    /// The tag `entity` holds, if any.
    #[inline]
    pub fn tag_of(&self, entity: Entity) -> Option<&str> {
        self.tags.tag_of(entity)
    }

    /// Release `entity`'s tag.
    pub fn remove_entity_tag(&mut self, entity: Entity) -> Option<String> {
        self.tags.remove(entity)
    }

    /// Put `entity` in `group`, moving it out of any group it was in.
    pub fn group_entity(&mut self, entity: Entity, group: impl Into<String>) {
        if !self.is_alive(entity) {
            warn!("ignoring group for {entity}: it is not alive");
            return;
        }
        self.groups.set(entity, group.into());
    }

    /// Check if `entity` is in `group`.
    #[inline]
    pub fn entity_belongs_to_group(&self, entity: Entity, group: &str) -> bool {
        self.groups.contains(entity, group)
    }

    /// The members of `group` in ascending id order. Empty if the group has no members.
    pub fn get_entities_by_group(&self, group: &str) -> Vec<Entity> {
        self.groups.members(group).collect()
    }

    /// The group `entity` is in, if any.
    #[inline]
    pub fn group_of(&self, entity: Entity) -> Option<&str> {
        self.groups.group_of(entity)
    }

    /// Take `entity` out of its group.
    pub fn remove_entity_group(&mut self, entity: Entity) -> Option<String> {
        self.groups.remove(entity)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entity_count", &self.live_count)
            .field("pending_additions", &self.entities_to_add.len())
            .field("pending_kills", &self.entities_to_kill.len())
            .field("pools", &self.pools)
            .field("systems", &self.systems)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::system::SystemState;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
    }
    impl Component for Velocity {}

    #[derive(Debug, PartialEq)]
    struct Health(u8);
    impl Component for Health {}

    struct Movement {
        state: SystemState,
    }

    impl Movement {
        fn new() -> Self {
            Self {
                state: SystemState::new().with::<Position>().with::<Velocity>(),
            }
        }

        fn run(&self, registry: &mut Registry, dt: f32) {
            for &entity in self.entities() {
                let velocity = *registry.get_component::<Velocity>(entity).unwrap();
                let position = registry.get_component_mut::<Position>(entity).unwrap();
                position.x += velocity.x * dt;
                position.y += velocity.y * dt;
            }
        }
    }

    impl System for Movement {
        fn state(&self) -> &SystemState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut SystemState {
            &mut self.state
        }
    }

    #[derive(Default)]
    struct Everything {
        state: SystemState,
    }

    impl System for Everything {
        fn state(&self) -> &SystemState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut SystemState {
            &mut self.state
        }
    }

    fn moving(registry: &mut Registry) -> Entity {
        let entity = registry.create_entity();
        registry.add_component(entity, Position { x: 0.0, y: 0.0 });
        registry.add_component(entity, Velocity { x: 1.0, y: 2.0 });
        entity
    }

    fn members<S: System>(registry: &Registry) -> Vec<Entity> {
        registry.get_system::<S>().unwrap().entities().to_vec()
    }

    #[test]
    fn create_entity_is_live_and_pending() {
        // Given
        let mut registry = Registry::new();

        // When
        let entity = registry.create_entity();

        // Then
        assert!(registry.is_alive(entity));
        assert_eq!(registry.entity_count(), 1);
        assert_eq!(registry.pending_additions().collect::<Vec<_>>(), vec![entity]);
        assert!(registry.signature(entity).is_some_and(Signature::is_empty));
    }

    #[test]
    fn add_component_sets_signature_and_stores_value() {
        // Given
        let mut registry = Registry::new();
        let entity = registry.create_entity();

        // When
        let previous = registry.add_component(entity, Health(100));

        // Then
        assert_eq!(previous, None);
        assert!(registry.has_component::<Health>(entity));
        assert!(!registry.has_component::<Velocity>(entity));
        assert_eq!(registry.get_component::<Health>(entity), Ok(&Health(100)));

        // When
        let previous = registry.add_component(entity, Health(50));

        // Then
        assert_eq!(previous, Some(Health(100)));
        assert_eq!(registry.pool::<Health>().map(Pool::len), Some(1));
    }

    #[test]
    fn get_missing_component_is_an_error() {
        // Given
        let mut registry = Registry::new();
        let entity = registry.create_entity();

        // Then
        assert_eq!(
            registry.get_component::<Health>(entity),
            Err(EcsError::MissingComponent {
                entity,
                component: type_name::<Health>(),
            })
        );
        assert!(registry.get_component_mut::<Health>(entity).is_err());
    }

    #[test]
    fn membership_waits_for_update() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());
        let entity = moving(&mut registry);

        // Then
        assert!(members::<Movement>(&registry).is_empty());

        // When
        registry.update();

        // Then
        assert_eq!(members::<Movement>(&registry), vec![entity]);
        assert_eq!(registry.pending_additions().len(), 0);
    }

    #[test]
    fn entity_missing_a_required_component_is_not_matched() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());
        let entity = registry.create_entity();
        registry.add_component(entity, Position { x: 0.0, y: 0.0 });

        // When
        registry.update();

        // Then
        assert!(members::<Movement>(&registry).is_empty());
    }

    #[test]
    fn removing_a_required_component_leaves_system_at_next_update() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());
        let entity = moving(&mut registry);
        registry.update();

        // When
        let removed = registry.remove_component::<Velocity>(entity);

        // Then - removed from storage now, membership unchanged until the boundary
        assert_eq!(removed, Some(Velocity { x: 1.0, y: 2.0 }));
        assert!(!registry.has_component::<Velocity>(entity));
        assert_eq!(members::<Movement>(&registry), vec![entity]);

        // When
        registry.update();

        // Then
        assert!(members::<Movement>(&registry).is_empty());
    }

    #[test]
    fn adding_a_component_later_joins_system() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());
        let entity = registry.create_entity();
        registry.add_component(entity, Position { x: 0.0, y: 0.0 });
        registry.update();

        // When
        registry.add_component(entity, Velocity { x: 0.0, y: 0.0 });
        registry.update();

        // Then
        assert_eq!(members::<Movement>(&registry), vec![entity]);
    }

    #[test]
    fn kill_is_deferred_and_idempotent() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());
        let entity = moving(&mut registry);
        registry.tag_entity(entity, "player");
        registry.group_entity(entity, "ships");
        registry.update();

        // When
        registry.kill_entity(entity);
        registry.kill_entity(entity);

        // Then - still fully usable this frame
        assert_eq!(registry.pending_kills().collect::<Vec<_>>(), vec![entity]);
        assert!(registry.is_pending_kill(entity));
        assert!(registry.is_alive(entity));
        assert!(registry.get_component::<Position>(entity).is_ok());

        // When
        registry.update();

        // Then
        assert!(!registry.is_alive(entity));
        assert_eq!(registry.entity_count(), 0);
        assert!(members::<Movement>(&registry).is_empty());
        assert!(registry.signature(entity).is_none());
        assert!(registry.get_component::<Position>(entity).is_err());
        assert!(registry.get_entity_by_tag("player").is_err());
        assert!(registry.get_entities_by_group("ships").is_empty());
        assert_eq!(registry.create_entity(), entity);
    }

    #[test]
    fn killed_entity_id_is_reused_with_clean_state() {
        // Given
        let mut registry = Registry::new();
        let first = moving(&mut registry);
        registry.kill_entity(first);
        registry.update();

        // When
        let second = registry.create_entity();

        // Then
        assert_eq!(second.id(), first.id());
        assert!(!registry.has_component::<Position>(second));
        assert!(registry.signature(second).is_some_and(Signature::is_empty));
    }

    #[test]
    fn operations_on_dead_entities_are_ignored() {
        // Given
        let mut registry = Registry::new();
        let entity = registry.create_entity();
        registry.kill_entity(entity);
        registry.update();

        // When
        registry.kill_entity(entity);
        let added = registry.add_component(entity, Health(1));
        registry.tag_entity(entity, "ghost");

        // Then
        assert_eq!(added, None);
        assert_eq!(registry.pending_kills().len(), 0);
        assert!(registry.pool::<Health>().is_none_or(Pool::is_empty));
        assert!(registry.get_entity_by_tag("ghost").is_err());
    }

    #[test]
    fn system_registered_late_picks_up_existing_entities() {
        // Given
        let mut registry = Registry::new();
        let entity = moving(&mut registry);
        registry.update();

        // When
        registry.add_system(Everything::default());
        registry.update();

        // Then
        assert_eq!(members::<Everything>(&registry), vec![entity]);
    }

    #[test]
    fn duplicate_system_replaces_previous_instance() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Everything::default());
        let entity = registry.create_entity();
        registry.update();

        // When
        let replaced = registry.add_system(Everything::default());

        // Then - old instance is handed back, new one fills at the next update
        assert!(replaced.is_some_and(|old| old.entities() == [entity]));
        assert_eq!(registry.system_count(), 1);
        assert!(members::<Everything>(&registry).is_empty());

        // When
        registry.update();

        // Then
        assert_eq!(members::<Everything>(&registry), vec![entity]);
    }

    #[test]
    fn remove_system() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());

        // When
        let removed = registry.remove_system::<Movement>();

        // Then
        assert!(removed.is_some());
        assert!(!registry.has_system::<Movement>());
        assert_eq!(
            registry.get_system::<Movement>().err(),
            Some(EcsError::MissingSystem(type_name::<Movement>()))
        );
    }

    #[test]
    fn with_system_runs_logic_over_members() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());
        let entity = moving(&mut registry);
        registry.update();

        // When
        let result = registry.with_system(|movement: &mut Movement, registry| {
            assert!(registry.get_system::<Movement>().is_err());
            movement.run(registry, 0.5);
        });

        // Then
        assert!(result.is_ok());
        assert!(registry.get_system::<Movement>().is_ok());
        assert_eq!(
            registry.get_component::<Position>(entity),
            Ok(&Position { x: 0.5, y: 1.0 })
        );
    }

    #[test]
    fn with_system_for_missing_system_is_an_error() {
        let mut registry = Registry::new();
        let result = registry.with_system(|_: &mut Movement, _| ());
        assert_eq!(
            result,
            Err(EcsError::MissingSystem(type_name::<Movement>()))
        );
    }

    #[test]
    #[should_panic(expected = "is checked out")]
    fn update_inside_with_system_panics() {
        let mut registry = Registry::new();
        registry.add_system(Everything::default());
        let _ = registry.with_system(|_: &mut Everything, registry| registry.update());
    }

    #[test]
    #[should_panic(expected = "Registry::clear called while system")]
    fn clear_inside_with_system_panics() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());
        moving(&mut registry);
        registry.update();

        // When - the checked out system would keep its members through the clear
        let _ = registry.with_system(|_: &mut Movement, registry| registry.clear());
    }

    #[test]
    fn system_is_checked_back_in_after_a_panic() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());
        let entity = moving(&mut registry);
        registry.update();

        // When
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            registry.with_system(|movement: &mut Movement, _| {
                assert!(movement.entities().is_empty(), "system logic failed");
            })
        }));

        // Then
        assert!(outcome.is_err());
        assert!(registry.get_system::<Movement>().is_ok());
        assert_eq!(members::<Movement>(&registry), vec![entity]);

        // When - the registry keeps working
        registry.kill_entity(entity);
        registry.update();

        // Then
        assert!(members::<Movement>(&registry).is_empty());
    }

    #[test]
    fn tags_and_groups() {
        // Given
        let mut registry = Registry::new();
        let player = registry.create_entity();
        let enemy_a = registry.create_entity();
        let enemy_b = registry.create_entity();

        // When
        registry.tag_entity(player, "player");
        registry.group_entity(enemy_a, "enemies");
        registry.group_entity(enemy_b, "enemies");

        // Then
        assert_eq!(registry.get_entity_by_tag("player"), Ok(player));
        assert!(registry.entity_has_tag(player, "player"));
        assert!(!registry.entity_has_tag(enemy_a, "player"));
        assert_eq!(registry.tag_of(player), Some("player"));
        assert_eq!(
            registry.get_entities_by_group("enemies"),
            vec![enemy_a, enemy_b]
        );
        assert!(registry.entity_belongs_to_group(enemy_b, "enemies"));
        assert_eq!(registry.group_of(player), None);
        assert_eq!(
            registry.get_entity_by_tag("boss"),
            Err(EcsError::UnknownTag("boss".to_string()))
        );

        // When
        registry.remove_entity_tag(player);
        registry.remove_entity_group(enemy_a);

        // Then
        assert!(!registry.entity_has_tag(player, "player"));
        assert_eq!(registry.get_entities_by_group("enemies"), vec![enemy_b]);
    }

    #[test]
    fn clear_keeps_systems() {
        // Given
        let mut registry = Registry::new();
        registry.add_system(Movement::new());
        moving(&mut registry);
        registry.update();

        // When
        registry.clear();

        // Then
        assert_eq!(registry.entity_count(), 0);
        assert!(registry.has_system::<Movement>());
        assert!(members::<Movement>(&registry).is_empty());
        assert!(registry.pool::<Position>().is_some_and(Pool::is_empty));
        assert_eq!(registry.create_entity().id().raw(), 0);
    }

    #[test]
    fn debug_output_summarizes() {
        let mut registry = Registry::new();
        moving(&mut registry);
        let text = format!("{registry:?}");
        assert!(text.contains("entity_count: 1"));
        assert!(text.contains("pending_additions: 1"));
    }
}
