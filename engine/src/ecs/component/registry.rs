use std::{
    any::{TypeId, type_name},
    sync::{
        LazyLock, PoisonError, RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;

use crate::ecs::component::{Component, Id};

/// The table every registry in the process draws its component ids from.
static COMPONENT_TYPES: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Get the id of component type `C`, assigning the next free id if `C` has never been seen.
///
/// Calling this twice for the same type always returns the same id. Distinct types always get
/// distinct ids, handed out in first-call order starting at 0.
#[inline]
pub fn id_of<C: Component>() -> Id {
    COMPONENT_TYPES.register::<C>()
}

/// Get the id of component type `C` without assigning one.
///
/// Returns `None` if `C` has not been used as a component yet.
#[inline]
pub fn try_id_of<C: Component>() -> Option<Id> {
    COMPONENT_TYPES.get::<C>()
}

/// Get the type name recorded for a component id, if the id has been assigned.
#[inline]
pub fn name_of(id: Id) -> Option<&'static str> {
    COMPONENT_TYPES.name(id)
}

/// Get the number of component types assigned an id so far.
#[inline]
pub fn registered_count() -> usize {
    COMPONENT_TYPES.len()
}

/// A thread-safe mapping from Rust types to dense component ids.
///
/// The ECS itself is single-threaded, but the id table is global and lazily filled, so it uses
/// lock-free reads via `DashMap` for the hot lookup path and only locks when a new type is
/// first registered.
pub(crate) struct Registry {
    /// Map from TypeId to component Id. Lock-free reads via sharded concurrent hashmap.
    type_map: DashMap<TypeId, Id>,

    /// Type names indexed by component id, for diagnostics.
    names: RwLock<Vec<&'static str>>,

    /// Next available component identifier.
    next_id: AtomicU32,
}

impl Registry {
    /// Create a new, empty id table.
    pub(crate) fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            names: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Get the id for `C`, registering it on first use.
    pub(crate) fn register<C: Component>(&self) -> Id {
        let type_id = TypeId::of::<C>();

        // Fast path: already registered (lock-free read)
        if let Some(id) = self.type_map.get(&type_id) {
            return *id;
        }

        // The entry API keeps two racing first uses from minting two ids.
        *self
            .type_map
            .entry(type_id)
            .or_insert_with(|| {
                let id = Id(self.next_id.fetch_add(1, Ordering::Relaxed));

                let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
                if id.index() >= names.len() {
                    names.resize(id.index() + 1, "");
                }
                names[id.index()] = type_name::<C>();

                id
            })
            .value()
    }

    /// Get the id for `C` if it has been registered.
    #[inline]
    pub(crate) fn get<C: Component>(&self) -> Option<Id> {
        self.type_map
            .get(&TypeId::of::<C>())
            .map(|entry| *entry.value())
    }

    /// Get the type name recorded for `id`.
    pub(crate) fn name(&self, id: Id) -> Option<&'static str> {
        let names = self.names.read().unwrap_or_else(PoisonError::into_inner);
        names.get(id.index()).copied()
    }

    /// Get the number of registered component types.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.next_id.load(Ordering::Relaxed) as usize
    }
}
