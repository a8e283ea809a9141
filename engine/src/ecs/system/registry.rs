//! Storage for registered systems, keyed by system type.

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
};

use crate::ecs::{
    error::{EcsError, Result},
    system::{System, SystemState},
};

/// A registered system. `system` is `None` while the system is checked out.
struct Slot {
    name: &'static str,
    system: Option<Box<dyn System>>,
}

/// The systems registered with a [`Registry`](crate::ecs::Registry), one per type.
///
/// A system can be temporarily checked out of its slot so it can run with mutable access to
/// both itself and the registry. The slot stays registered while the system is out.
#[derive(Default)]
pub(crate) struct Systems {
    slots: HashMap<TypeId, Slot>,
}

impl Systems {
    /// Register `system`, returning the instance it replaces.
    ///
    /// A replaced instance that is currently checked out is not returned. It is dropped when
    /// it is checked back in.
    pub(crate) fn insert<S: System>(&mut self, system: S) -> Option<S> {
        let slot = Slot {
            name: type_name::<S>(),
            system: Some(Box::new(system)),
        };

        let previous = self.slots.insert(TypeId::of::<S>(), slot)?;
        previous.system.map(|system| *downcast::<S>(system))
    }

    /// Unregister the system of type `S`, returning it unless it is checked out.
    pub(crate) fn remove<S: System>(&mut self) -> Option<S> {
        let slot = self.slots.remove(&TypeId::of::<S>())?;
        slot.system.map(|system| *downcast::<S>(system))
    }

    /// Check if a system of type `S` is registered, checked out or not.
    #[inline]
    pub(crate) fn contains<S: System>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<S>())
    }

    /// Borrow the system of type `S`.
    pub(crate) fn get<S: System>(&self) -> Result<&S> {
        let slot = self
            .slots
            .get(&TypeId::of::<S>())
            .ok_or(EcsError::MissingSystem(type_name::<S>()))?;
        let system: &dyn Any = slot
            .system
            .as_deref()
            .ok_or(EcsError::SystemCheckedOut(slot.name))?;

        system
            .downcast_ref::<S>()
            .ok_or(EcsError::MissingSystem(type_name::<S>()))
    }

    /// Borrow the system of type `S` mutably.
    pub(crate) fn get_mut<S: System>(&mut self) -> Result<&mut S> {
        let slot = self
            .slots
            .get_mut(&TypeId::of::<S>())
            .ok_or(EcsError::MissingSystem(type_name::<S>()))?;
        let name = slot.name;
        let system: &mut dyn Any = slot
            .system
            .as_deref_mut()
            .ok_or(EcsError::SystemCheckedOut(name))?;

        system
            .downcast_mut::<S>()
            .ok_or(EcsError::MissingSystem(type_name::<S>()))
    }

    /// Take the system of type `S` out of its slot, leaving the slot registered.
    pub(crate) fn check_out<S: System>(&mut self) -> Result<Box<S>> {
        let slot = self
            .slots
            .get_mut(&TypeId::of::<S>())
            .ok_or(EcsError::MissingSystem(type_name::<S>()))?;
        let system = slot
            .system
            .take()
            .ok_or(EcsError::SystemCheckedOut(slot.name))?;

        Ok(downcast::<S>(system))
    }

    /// Put a checked out system back.
    ///
    /// The system is dropped instead if its slot was removed or refilled while it was out.
    pub(crate) fn check_in<S: System>(&mut self, system: Box<S>) {
        if let Some(slot) = self.slots.get_mut(&TypeId::of::<S>())
            && slot.system.is_none()
        {
            slot.system = Some(system);
        }
    }

    /// Name of a system that is currently checked out, if any.
    pub(crate) fn checked_out(&self) -> Option<&'static str> {
        self.slots
            .values()
            .find(|slot| slot.system.is_none())
            .map(|slot| slot.name)
    }

    /// Iterate over the state of every system that is not checked out, with its name.
    pub(crate) fn states_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut SystemState)> {
        self.slots.values_mut().filter_map(|slot| {
            let name = slot.name;
            slot.system
                .as_mut()
                .map(|system| (name, system.state_mut()))
        })
    }

    /// Empty every system's entity list.
    pub(crate) fn clear_entities(&mut self) {
        for (_, state) in self.states_mut() {
            state.clear_entities();
        }
    }

    /// Number of registered systems.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

impl fmt::Debug for Systems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.values().map(|slot| slot.name))
            .finish()
    }
}

/// Recover the concrete system from a slot keyed by its own `TypeId`.
fn downcast<S: System>(system: Box<dyn System>) -> Box<S> {
    let system: Box<dyn Any> = system;
    match system.downcast::<S>() {
        Ok(system) => system,
        Err(_) => unreachable!("system slot for {} holds another type", type_name::<S>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::entity::Entity;

    #[derive(Debug, Default)]
    struct Movement {
        state: SystemState,
        speed: f32,
    }

    impl System for Movement {
        fn state(&self) -> &SystemState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut SystemState {
            &mut self.state
        }
    }

    #[derive(Debug, Default)]
    struct Render {
        state: SystemState,
    }

    impl System for Render {
        fn state(&self) -> &SystemState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut SystemState {
            &mut self.state
        }
    }

    #[test]
    fn insert_and_get() {
        // Given
        let mut systems = Systems::default();

        // When
        let replaced = systems.insert(Movement {
            speed: 2.0,
            ..Default::default()
        });

        // Then
        assert!(replaced.is_none());
        assert!(systems.contains::<Movement>());
        assert!(!systems.contains::<Render>());
        assert_eq!(systems.get::<Movement>().map(|m| m.speed), Ok(2.0));
        assert_eq!(
            systems.get::<Render>().err(),
            Some(EcsError::MissingSystem(type_name::<Render>()))
        );
    }

    #[test]
    fn insert_twice_replaces_and_returns_previous() {
        // Given
        let mut systems = Systems::default();
        systems.insert(Movement {
            speed: 1.0,
            ..Default::default()
        });

        // When
        let replaced = systems.insert(Movement {
            speed: 5.0,
            ..Default::default()
        });

        // Then
        assert_eq!(replaced.map(|m| m.speed), Some(1.0));
        assert_eq!(systems.len(), 1);
        assert_eq!(systems.get::<Movement>().map(|m| m.speed), Ok(5.0));
    }

    #[test]
    fn remove_returns_system() {
        // Given
        let mut systems = Systems::default();
        systems.insert(Render::default());

        // When
        let removed = systems.remove::<Render>();

        // Then
        assert!(removed.is_some());
        assert!(!systems.contains::<Render>());
        assert!(systems.remove::<Render>().is_none());
    }

    #[test]
    fn checked_out_slot_stays_registered() {
        // Given
        let mut systems = Systems::default();
        systems.insert(Movement::default());

        // When
        let mut movement = systems.check_out::<Movement>().unwrap();
        movement.speed = 3.0;

        // Then
        assert!(systems.contains::<Movement>());
        assert_eq!(systems.checked_out(), Some(type_name::<Movement>()));
        assert_eq!(
            systems.get::<Movement>().err(),
            Some(EcsError::SystemCheckedOut(type_name::<Movement>()))
        );
        assert!(systems.check_out::<Movement>().is_err());

        // When
        systems.check_in(movement);

        // Then
        assert_eq!(systems.checked_out(), None);
        assert_eq!(systems.get::<Movement>().map(|m| m.speed), Ok(3.0));
    }

    #[test]
    fn check_in_after_replacement_keeps_new_instance() {
        // Given
        let mut systems = Systems::default();
        systems.insert(Movement {
            speed: 1.0,
            ..Default::default()
        });
        let old = systems.check_out::<Movement>().unwrap();

        // When
        systems.insert(Movement {
            speed: 9.0,
            ..Default::default()
        });
        systems.check_in(old);

        // Then
        assert_eq!(systems.get::<Movement>().map(|m| m.speed), Ok(9.0));
    }

    #[test]
    fn check_in_after_removal_drops() {
        // Given
        let mut systems = Systems::default();
        systems.insert(Render::default());
        let render = systems.check_out::<Render>().unwrap();

        // When
        systems.remove::<Render>();
        systems.check_in(render);

        // Then
        assert!(!systems.contains::<Render>());
        assert_eq!(systems.len(), 0);
    }

    #[test]
    fn states_skip_checked_out_systems() {
        // Given
        let mut systems = Systems::default();
        systems.insert(Movement::default());
        systems.insert(Render::default());
        let render = systems.check_out::<Render>().unwrap();

        // When
        for (_, state) in systems.states_mut() {
            state.add_entity(Entity::new(0u32));
        }
        systems.check_in(render);

        // Then
        assert_eq!(systems.get::<Movement>().map(|m| m.entities().len()), Ok(1));
        assert_eq!(systems.get::<Render>().map(|r| r.entities().len()), Ok(0));

        // When
        systems.clear_entities();

        // Then
        assert_eq!(systems.get::<Movement>().map(|m| m.entities().len()), Ok(0));
    }
}
