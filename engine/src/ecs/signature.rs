//! Fixed-width component bitsets.
//!
//! A [`Signature`] records a set of component types, one bit per component [`Id`]. Every live
//! entity carries one describing the components it currently has, and every system carries one
//! describing the components an entity must have for the system to process it.

use std::fmt;

use fixedbitset::FixedBitSet;

use crate::ecs::component::{self, Component, Id};

/// The maximum number of distinct component types a program may use.
pub const MAX_COMPONENTS: usize = 32;

/// Bitset of component types, [`MAX_COMPONENTS`] bits wide.
///
/// Bit N set means the component type with id N is part of the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    bits: FixedBitSet,
}

impl Signature {
    /// Create an empty signature.
    #[inline]
    pub fn new() -> Self {
        Self {
            bits: FixedBitSet::with_capacity(MAX_COMPONENTS),
        }
    }

    /// Builder form of [`set`](Self::set) for component type `C`.
    ///
    /// ```ignore
    /// let required = Signature::new().with::<Position>().with::<Velocity>();
    /// ```
    #[inline]
    pub fn with<C: Component>(mut self) -> Self {
        self.set(component::id_of::<C>());
        self
    }

    /// Add a component type to the set.
    ///
    /// # Panics
    ///
    /// If `id` does not fit in [`MAX_COMPONENTS`] bits. Running out of component ids is not
    /// recoverable.
    #[inline]
    pub fn set(&mut self, id: Id) {
        assert!(
            id.index() < MAX_COMPONENTS,
            "component id {} ({}) exceeds the limit of {} component types",
            id,
            component::name_of(id).unwrap_or("unknown"),
            MAX_COMPONENTS
        );
        self.bits.insert(id.index());
    }

    /// Remove a component type from the set.
    #[inline]
    pub fn unset(&mut self, id: Id) {
        if id.index() < MAX_COMPONENTS {
            self.bits.set(id.index(), false);
        }
    }

    /// Check if a component type is in the set.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.bits.contains(id.index())
    }

    /// Remove every component type.
    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Check if no component type is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Number of component types in the set.
    #[inline]
    pub fn count(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Check if this signature carries every component `required` asks for, that is
    /// `(self & required) == required`.
    ///
    /// An empty `required` is matched by every signature.
    #[inline]
    pub fn matches(&self, required: &Signature) -> bool {
        self.bits.is_superset(&required.bits)
    }

    /// Iterate over the component ids in the set, lowest first.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.bits.ones().map(Id::from)
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

/// Highest bit first, the way a bitset is usually written down.
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in (0..MAX_COMPONENTS).rev() {
            f.write_str(if self.bits.contains(bit) { "1" } else { "0" })?;
        }
        Ok(())
    }
}
