//! Name indices over entities: unique tags and shared groups.

use std::collections::{BTreeSet, HashMap};

use crate::ecs::entity::Entity;

/// One-to-one mapping between tag names and entities.
///
/// An entity carries at most one tag and a tag names at most one entity. Tagging again moves
/// the tag: the entity's previous tag is released, and so is the tag's previous holder.
#[derive(Debug, Default)]
pub(crate) struct Tags {
    entity_by_tag: HashMap<String, Entity>,
    tag_by_entity: HashMap<Entity, String>,
}

impl Tags {
    pub(crate) fn set(&mut self, entity: Entity, tag: String) {
        self.remove(entity);
        if let Some(previous) = self.entity_by_tag.insert(tag.clone(), entity) {
            self.tag_by_entity.remove(&previous);
        }
        self.tag_by_entity.insert(entity, tag);
    }

    pub(crate) fn get(&self, tag: &str) -> Option<Entity> {
        self.entity_by_tag.get(tag).copied()
    }

    pub(crate) fn has(&self, entity: Entity, tag: &str) -> bool {
        self.get(tag) == Some(entity)
    }

    pub(crate) fn tag_of(&self, entity: Entity) -> Option<&str> {
        self.tag_by_entity.get(&entity).map(String::as_str)
    }

    pub(crate) fn remove(&mut self, entity: Entity) -> Option<String> {
        let tag = self.tag_by_entity.remove(&entity)?;
        self.entity_by_tag.remove(&tag);
        Some(tag)
    }

    pub(crate) fn clear(&mut self) {
        self.entity_by_tag.clear();
        self.tag_by_entity.clear();
    }
}

/// Many-to-one mapping from entities to group names.
///
/// An entity belongs to at most one group. Grouping again moves it.
#[derive(Debug, Default)]
pub(crate) struct Groups {
    entities_by_group: HashMap<String, BTreeSet<Entity>>,
    group_by_entity: HashMap<Entity, String>,
}

impl Groups {
    pub(crate) fn set(&mut self, entity: Entity, group: String) {
        self.remove(entity);
        self.entities_by_group
            .entry(group.clone())
            .or_default()
            .insert(entity);
        self.group_by_entity.insert(entity, group);
    }

    pub(crate) fn contains(&self, entity: Entity, group: &str) -> bool {
        self.entities_by_group
            .get(group)
            .is_some_and(|members| members.contains(&entity))
    }

    /// Members of `group` in ascending id order.
    pub(crate) fn members(&self, group: &str) -> impl Iterator<Item = Entity> + '_ {
        self.entities_by_group
            .get(group)
            .into_iter()
            .flatten()
            .copied()
    }

    pub(crate) fn group_of(&self, entity: Entity) -> Option<&str> {
        self.group_by_entity.get(&entity).map(String::as_str)
    }

    pub(crate) fn remove(&mut self, entity: Entity) -> Option<String> {
        let group = self.group_by_entity.remove(&entity)?;
        if let Some(members) = self.entities_by_group.get_mut(&group) {
            members.remove(&entity);
            if members.is_empty() {
                self.entities_by_group.remove(&group);
            }
        }
        Some(group)
    }

    pub(crate) fn clear(&mut self) {
        self.entities_by_group.clear();
        self.group_by_entity.clear();
    }
}
