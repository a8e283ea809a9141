//! Entity identity and id recycling.
//!
//! An [`Entity`] is a lightweight handle: a non-negative integer [`Id`] and nothing else. It
//! owns no data. Its components live in the registry's pools, keyed by the id.
//!
//! # Id reuse
//!
//! Ids are unique among *live* entities only. When an entity is destroyed its id goes back to
//! the [`Allocator`]'s free list, and the next created entity reuses the oldest freed id
//! before a fresh one is minted:
//!
//! ```rust,ignore
//! let a = allocator.alloc(); // Entity(0)
//! let b = allocator.alloc(); // Entity(1)
//! allocator.free(a);
//! let c = allocator.alloc(); // Entity(0) again
//! ```
//!
//! Reuse keeps the id space compact, which keeps every entity-indexed table (signatures,
//! sparse pool indices, system membership bitsets) small.
//!
//! # Handles with registry access
//!
//! [`EntityRef`] and [`EntityMut`] pair an entity with a borrowed
//! [`Registry`](crate::ecs::Registry) and expose the per-entity convenience API (components,
//! tags, groups, kill).

mod reference;

use std::fmt;

use crossbeam::queue::SegQueue;

pub use reference::{EntityMut, EntityRef};

/// An entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct an id from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Id {
    /// Get an entity id from a raw value.
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity in the ECS.
///
/// A registry holds at most one live entity for a given id at any time. Entities order by id,
/// which is the order the registry flushes its pending queues in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    /// The unique identifier of the entity.
    id: Id,
}

impl Entity {
    /// Construct an entity handle for an id.
    ///
    /// Handles are normally handed out by [`Registry::create_entity`](crate::ecs::Registry::create_entity);
    /// building one by hand is mostly useful for working with a [`Pool`](crate::ecs::Pool)
    /// directly.
    #[inline]
    pub fn new(id: impl Into<Id>) -> Self {
        Self { id: id.into() }
    }

    /// Get the id of this entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.id.0)
    }
}

/// Hands out entity ids, recycling freed ones first-in first-out.
#[derive(Default, Debug)]
pub struct Allocator {
    /// Ids available for reuse, oldest first.
    dead_pool: SegQueue<Id>,

    /// Next fresh id to allocate.
    next_id: u32,
}

impl Allocator {
    /// Construct a new entity allocator starting from id 0.
    #[inline]
    pub const fn new() -> Self {
        Self {
            dead_pool: SegQueue::new(),
            next_id: 0,
        }
    }

    /// Allocate an entity, reusing the oldest freed id if there is one.
    ///
    /// # Panics
    ///
    /// If all `u32::MAX` ids are live at once.
    pub fn alloc(&mut self) -> Entity {
        if let Some(id) = self.dead_pool.pop() {
            return Entity { id };
        }

        let id = Id(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .expect("entity id space exhausted");
        Entity { id }
    }

    /// Return an entity's id for reuse.
    ///
    /// The caller guarantees the entity is no longer live; freeing a live id would hand it out
    /// twice.
    pub fn free(&self, entity: Entity) {
        self.dead_pool.push(entity.id);
    }

    /// Number of freed ids waiting for reuse.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.dead_pool.len()
    }

    /// Number of distinct ids handed out so far. Every id ever issued is below this value.
    #[inline]
    pub fn high_water(&self) -> usize {
        self.next_id as usize
    }

    /// Forget every issued id, starting again from 0.
    pub fn reset(&mut self) {
        while self.dead_pool.pop().is_some() {}
        self.next_id = 0;
    }
}
