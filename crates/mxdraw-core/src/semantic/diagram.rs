//! The resolved diagram arena.

use std::collections::HashMap;

use crate::{
    identifier::Id,
    semantic::{Connector, Entity, EntityIndex, Node, ResolveError},
};

/// All entities of one diagram page in paint order, plus an id lookup.
///
/// A `Diagram` is produced once by [`Diagram::resolve`] and is immutable
/// afterwards; it exclusively owns its entities and every cross-entity link
/// is an [`EntityIndex`] into it.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    pub(super) entities: Vec<Entity>,
    pub(super) lookup: HashMap<Id, EntityIndex>,
    /// First invalid style value of each entity, indexed like `entities`
    pub(super) style_errors: Vec<Option<ResolveError>>,
}

impl Diagram {
    /// Entities in paint order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entities with their indices, in paint order
    pub fn iter(&self) -> impl Iterator<Item = (EntityIndex, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(idx, entity)| (EntityIndex::new(idx), entity))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: EntityIndex) -> Option<&Entity> {
        self.entities.get(index.index())
    }

    /// Finds the index of the entity with the given cell id
    pub fn lookup(&self, id: Id) -> Option<EntityIndex> {
        self.lookup.get(&id).copied()
    }

    /// Finds an entity by its cell id
    pub fn find(&self, id: &str) -> Option<&Entity> {
        self.lookup(Id::new(id)).and_then(|idx| self.get(idx))
    }

    /// Returns the node at `index`, or `None` when the entity is not a node
    pub fn node(&self, index: EntityIndex) -> Option<&Node> {
        self.get(index).and_then(Entity::as_node)
    }

    /// The style value that could not be interpreted for the entity at
    /// `index`, if any. Such an entity resolved with the default in place of
    /// the bad value and should not be drawn.
    pub fn style_error(&self, index: EntityIndex) -> Option<&ResolveError> {
        self.style_errors.get(index.index())?.as_ref()
    }

    /// Returns the connector at `index`, or `None` when the entity is not a connector
    pub fn connector(&self, index: EntityIndex) -> Option<&Connector> {
        self.get(index).and_then(Entity::as_connector)
    }
}
