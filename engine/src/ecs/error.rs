//! Recoverable ECS errors.
//!
//! Only lookups that a caller can reasonably get wrong at runtime return an [`EcsError`].
//! Broken internal invariants (running out of component ids, updating while a system is
//! checked out) panic instead.

use thiserror::Error;

use crate::ecs::entity::Entity;

/// Errors returned by [`Registry`](crate::ecs::Registry) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity has no component of the requested type.
    #[error("{entity} has no {component} component")]
    MissingComponent {
        /// The entity that was queried.
        entity: Entity,
        /// Type name of the requested component.
        component: &'static str,
    },

    /// No entity carries the tag.
    #[error("no entity is tagged \"{0}\"")]
    UnknownTag(String),

    /// No system of the requested type is registered.
    #[error("system {0} is not registered")]
    MissingSystem(&'static str),

    /// The system is registered but currently checked out by
    /// [`Registry::with_system`](crate::ecs::Registry::with_system).
    #[error("system {0} is already in use")]
    SystemCheckedOut(&'static str),
}

/// Result type for ECS operations.
pub type Result<T, E = EcsError> = std::result::Result<T, E>;
