//! Component types and their numeric identifiers.
//!
//! Components are plain data records attached to entities (a position, a velocity, a health
//! value). Every distinct component type is assigned a small dense [`Id`] the first time it is
//! used. That id is the bit position of the type in a [`Signature`](crate::ecs::Signature) and
//! the slot of its pool inside the registry's storage.
//!
//! Ids come from a single process-wide table, so every [`Registry`](crate::ecs::Registry) in
//! the process agrees on them.
//!
//! ## Usage
//!
//! ```ignore
//! use tiny2d_engine::ecs::{Component, component};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let id = component::id_of::<Position>();
//! assert_eq!(id, component::id_of::<Position>());
//! ```

mod registry;

use std::fmt;

pub use registry::{id_of, name_of, registered_count, try_id_of};
/// Derive macro implementing [`Component`] for a struct or enum.
pub use tiny2d_macros::Component;

/// A component type identifier, assigned in first-use order starting at 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec or a
    /// bitset).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trait representing a component in the ECS.
///
/// At present this only sets the required trait bounds for a type to be stored in a
/// [`Pool`](crate::ecs::Pool). Use `#[derive(Component)]` rather than implementing it by hand.
pub trait Component: 'static + Sized {}
