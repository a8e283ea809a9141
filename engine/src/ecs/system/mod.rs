//! Systems and the entity membership the registry maintains for them.
//!
//! # Overview
//!
//! A system is game logic that runs once per frame over every entity carrying a given set of
//! components. The ECS does not run systems itself. It keeps each system's entity list up to
//! date, and game code decides when and how to run them.
//!
//! Every system embeds a [`SystemState`], which holds the required [`Signature`] and the list
//! of entities currently matching it:
//!
//! ```rust,ignore
//! use tiny2d_engine::ecs::{Component, Registry, System, SystemState};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component)]
//! struct Velocity { x: f32, y: f32 }
//!
//! struct Movement {
//!     state: SystemState,
//! }
//!
//! impl Movement {
//!     fn new() -> Self {
//!         Self {
//!             state: SystemState::new().with::<Position>().with::<Velocity>(),
//!         }
//!     }
//!
//!     fn update(&self, registry: &mut Registry, dt: f32) {
//!         for &entity in self.entities() {
//!             let velocity = *registry.get_component::<Velocity>(entity).unwrap();
//!             let position = registry.get_component_mut::<Position>(entity).unwrap();
//!             position.x += velocity.x * dt;
//!             position.y += velocity.y * dt;
//!         }
//!     }
//! }
//!
//! impl System for Movement {
//!     fn state(&self) -> &SystemState { &self.state }
//!     fn state_mut(&mut self) -> &mut SystemState { &mut self.state }
//! }
//!
//! registry.add_system(Movement::new());
//! registry.update();
//! registry.with_system(|movement: &mut Movement, registry| movement.update(registry, 0.016))?;
//! ```
//!
//! # Membership
//!
//! Membership only changes inside [`Registry::update`](crate::ecs::Registry::update), so a
//! system's entity list is stable for the whole frame. Entity lists keep insertion order.

pub(crate) mod registry;

use std::any::{Any, type_name};

use fixedbitset::FixedBitSet;

use crate::ecs::{
    component::{self, Component},
    entity::Entity,
    signature::Signature,
};

/// The registry-maintained part of every system: what it requires and what currently matches.
#[derive(Debug, Default, Clone)]
pub struct SystemState {
    /// Components an entity must carry to be processed.
    signature: Signature,

    /// Matching entities, in the order they joined.
    entities: Vec<Entity>,

    /// Membership bits indexed by entity id, for O(1) `contains`.
    members: FixedBitSet,
}

impl SystemState {
    /// Create a state requiring nothing. Such a system matches every entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`require_component`](Self::require_component).
    pub fn with<C: Component>(mut self) -> Self {
        self.require_component::<C>();
        self
    }

    /// Require component `C`, assigning it a component id if it has none yet.
    ///
    /// Meant to be called while the system is being built. Requirements changed after
    /// registration are only applied to entities the registry re-evaluates afterwards.
    pub fn require_component<C: Component>(&mut self) {
        self.signature.set(component::id_of::<C>());
    }

    /// The components an entity must carry.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The entities currently matching, in join order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Check if `entity` is currently a member.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(entity.index())
    }

    /// Number of member entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if no entity is a member.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Add `entity` to the member list. Adding a member twice has no effect.
    pub(crate) fn add_entity(&mut self, entity: Entity) {
        if self.contains(entity) {
            return;
        }

        self.members.grow(entity.index() + 1);
        self.members.insert(entity.index());
        self.entities.push(entity);
    }

    /// Remove `entity` from the member list, keeping the order of the rest.
    pub(crate) fn remove_entity(&mut self, entity: Entity) -> bool {
        if !self.contains(entity) {
            return false;
        }

        self.members.set(entity.index(), false);
        if let Some(position) = self.entities.iter().position(|e| *e == entity) {
            self.entities.remove(position);
        }
        true
    }

    /// Forget every member, keeping the signature.
    pub(crate) fn clear_entities(&mut self) {
        self.entities.clear();
        self.members.clear();
    }
}

/// Game logic driven by the registry's entity matching.
///
/// Implementors embed a [`SystemState`] and expose it. The per-frame logic is an ordinary
/// method of the implementing type, run through
/// [`Registry::with_system`](crate::ecs::Registry::with_system) or with a plain borrow of
/// the system.
pub trait System: Any {
    /// The embedded registry-maintained state.
    fn state(&self) -> &SystemState;

    /// The embedded registry-maintained state, mutably.
    fn state_mut(&mut self) -> &mut SystemState;

    /// A human readable name for logs and errors.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// The entities this system currently processes.
    fn entities(&self) -> &[Entity] {
        self.state().entities()
    }
}
