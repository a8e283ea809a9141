//! Component storage for the ECS.
//!
//! Each component type gets its own [`Pool`]: a densely packed vector of values plus the
//! bookkeeping that maps entities to slots. The registry keeps one pool per component id in a
//! [`Pools`] table, created lazily the first time a component of that type is attached.
//!
//! ```text
//! Pools (indexed by component id)
//! ┌──────────┬────────────────────────────────────────┐
//! │ 0        │ Pool<Transform>  [t0, t1, t2, t3]      │
//! │ 1        │ Pool<RigidBody>  [r0, r1]              │
//! │ 2        │ (none yet)                             │
//! │ 3        │ Pool<Health>     [h0, h1, h2]          │
//! └──────────┴────────────────────────────────────────┘
//! ```
//!
//! Pools are erased to [`AnyPool`] inside the table so destroying an entity can purge its
//! components from every pool without knowing their types.

mod index;
mod pool;

pub use index::SparseIndex;
pub use pool::{AnyPool, Pool};

use crate::ecs::{
    component::{self, Component, Id},
    entity::Entity,
};

/// Type-erased table of pools, one slot per component id.
#[derive(Default)]
pub struct Pools {
    pools: Vec<Option<Box<dyn AnyPool>>>,
}

impl Pools {
    /// Create an empty table.
    #[inline]
    pub const fn new() -> Self {
        Self { pools: Vec::new() }
    }

    /// Get the pool for `C`, if one has been created.
    pub fn get<C: Component>(&self) -> Option<&Pool<C>> {
        let id = component::try_id_of::<C>()?;
        self.pools
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<Pool<C>>()
    }

    /// Get the pool for `C` mutably, if one has been created.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut Pool<C>> {
        let id = component::try_id_of::<C>()?;
        self.pools
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Pool<C>>()
    }

    /// Get the pool for `C`, creating an empty one if needed.
    pub fn get_or_create<C: Component>(&mut self) -> &mut Pool<C> {
        let id = component::id_of::<C>();
        if id.index() >= self.pools.len() {
            self.pools.resize_with(id.index() + 1, || None);
        }

        self.pools[id.index()]
            .get_or_insert_with(|| Box::new(Pool::<C>::new()) as Box<dyn AnyPool>)
            .as_any_mut()
            .downcast_mut::<Pool<C>>()
            .unwrap_or_else(|| {
                // Slot `id` only ever holds a `Pool<C>` for the type that owns `id`.
                unreachable!("pool slot {} holds a different component type", id)
            })
    }

    /// Get the type-erased pool stored for a component id.
    #[inline]
    pub fn get_erased(&self, id: Id) -> Option<&dyn AnyPool> {
        self.pools.get(id.index())?.as_deref()
    }

    /// Remove `entity`'s component from every pool. Returns how many components were removed.
    pub fn purge(&mut self, entity: Entity) -> usize {
        let mut removed = 0;
        for pool in self.pools.iter_mut().flatten() {
            if pool.remove_entity(entity) {
                removed += 1;
            }
        }
        removed
    }

    /// Number of pools created so far.
    pub fn len(&self) -> usize {
        self.pools.iter().flatten().count()
    }

    /// Check if no pool has been created.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty every pool, keeping the pools themselves.
    pub fn clear(&mut self) {
        for pool in self.pools.iter_mut().flatten() {
            pool.clear();
        }
    }
}

impl std::fmt::Debug for Pools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.pools
                    .iter()
                    .flatten()
                    .map(|pool| (pool.component_name(), pool.len())),
            )
            .finish()
    }
}
