use crate::ecs::{
    component::Component,
    entity::{Entity, Id},
    error::Result,
    registry::Registry,
};

/// An entity with read-only access to its registry.
/// The lifetime `'r` ties the handle to the borrow of the [`Registry`] it was created from.
#[derive(Clone, Copy)]
pub struct EntityRef<'r> {
    /// The registry the entity lives in.
    registry: &'r Registry,
    /// The entity this reference points to.
    entity: Entity,
}

impl<'r> EntityRef<'r> {
    /// Create a new reference for an entity in `registry`.
    #[inline]
    pub const fn new(registry: &'r Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Get the id of the entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.entity.id()
    }

    /// Check if the entity is live.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.registry.is_alive(self.entity)
    }

    /// Check if the entity holds `tag`.
    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.registry.entity_has_tag(self.entity, tag)
    }

    /// Get the entity's tag.
    #[inline]
    pub fn tag_name(&self) -> Option<&'r str> {
        self.registry.tag_of(self.entity)
    }

    /// Check if the entity is in `group`.
    #[inline]
    pub fn belongs_to_group(&self, group: &str) -> bool {
        self.registry.entity_belongs_to_group(self.entity, group)
    }

    /// Get the entity's group.
    #[inline]
    pub fn group_name(&self) -> Option<&'r str> {
        self.registry.group_of(self.entity)
    }

    /// Check if the entity has component `C`.
    #[inline]
    pub fn has_component<C: Component>(&self) -> bool {
        self.registry.has_component::<C>(self.entity)
    }

    /// Get a reference to the entity's component `C`.
    #[inline]
    pub fn get_component<C: Component>(&self) -> Result<&'r C> {
        self.registry.get_component::<C>(self.entity)
    }
}

/// An entity with mutable access to its registry.
///
/// Mutating methods return the handle again so calls can be chained while building an entity:
///
/// ```rust,ignore
/// let player = registry.create_entity();
/// registry
///     .entity_mut(player)
///     .add_component(Transform::default())
///     .add_component(Health { percentage: 100 })
///     .tag("player");
/// ```
pub struct EntityMut<'r> {
    /// The registry the entity lives in.
    registry: &'r mut Registry,
    /// The entity this reference points to.
    entity: Entity,
}

impl<'r> EntityMut<'r> {
    /// Create a new mutable reference for an entity in `registry`.
    #[inline]
    pub fn new(registry: &'r mut Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Get the id of the entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.entity.id()
    }

    /// Reborrow as a read-only reference.
    #[inline]
    pub fn as_readonly(&self) -> EntityRef<'_> {
        EntityRef::new(self.registry, self.entity)
    }

    /// Check if the entity is live.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.registry.is_alive(self.entity)
    }

    /// Schedule the entity for destruction at the next update.
    pub fn kill(&mut self) -> &mut Self {
        self.registry.kill_entity(self.entity);
        self
    }

    /// Give the entity a unique tag.
    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.registry.tag_entity(self.entity, tag);
        self
    }

    /// Release the entity's tag.
    pub fn remove_tag(&mut self) -> &mut Self {
        self.registry.remove_entity_tag(self.entity);
        self
    }

    /// Check if the entity holds `tag`.
    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.registry.entity_has_tag(self.entity, tag)
    }

    /// Get the entity's tag.
    #[inline]
    pub fn tag_name(&self) -> Option<&str> {
        self.registry.tag_of(self.entity)
    }

    /// Put the entity in `group`.
    pub fn group(&mut self, group: impl Into<String>) -> &mut Self {
        self.registry.group_entity(self.entity, group);
        self
    }

    /// Take the entity out of its group.
    pub fn remove_group(&mut self) -> &mut Self {
        self.registry.remove_entity_group(self.entity);
        self
    }

    /// Check if the entity is in `group`.
    #[inline]
    pub fn belongs_to_group(&self, group: &str) -> bool {
        self.registry.entity_belongs_to_group(self.entity, group)
    }

    /// Get the entity's group.
    #[inline]
    pub fn group_name(&self) -> Option<&str> {
        self.registry.group_of(self.entity)
    }

    /// Attach `component`, replacing any existing `C`.
    pub fn add_component<C: Component>(&mut self, component: C) -> &mut Self {
        self.registry.add_component(self.entity, component);
        self
    }

    /// Detach component `C`, if present.
    pub fn remove_component<C: Component>(&mut self) -> &mut Self {
        self.registry.remove_component::<C>(self.entity);
        self
    }

    /// Check if the entity has component `C`.
    #[inline]
    pub fn has_component<C: Component>(&self) -> bool {
        self.registry.has_component::<C>(self.entity)
    }

    /// Get a reference to the entity's component `C`.
    #[inline]
    pub fn get_component<C: Component>(&self) -> Result<&C> {
        self.registry.get_component::<C>(self.entity)
    }

    /// Get a mutable reference to the entity's component `C`.
    #[inline]
    pub fn get_component_mut<C: Component>(&mut self) -> Result<&mut C> {
        self.registry.get_component_mut::<C>(self.entity)
    }
}
