//! Append-only name to [`EntityId`] registry.
//!
//! Ids are dense and assigned in order of first appearance, so they can be
//! used directly as matrix indices and as offsets into per-entity arenas.

use std::collections::HashMap;

use contagion_types::{Entity, EntityId};

/// Bijective mapping between entity names and dense ids.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    /// Entities ordered by id.
    entities: Vec<Entity>,
    /// Reverse index: name -> id.
    by_name: HashMap<String, EntityId>,
}

impl EntityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Return the id for `name`, registering it first if it is new.
    pub fn resolve(&mut self, name: &str) -> EntityId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = EntityId::new(self.entities.len());
        self.entities.push(Entity {
            id,
            name: name.to_owned(),
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Return the id for `name` without registering it.
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    /// Return the name registered under `id`.
    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.entities.get(id.index()).map(|e| e.name.as_str())
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_assigned_in_order_of_first_appearance() {
        let mut registry = EntityRegistry::new();
        assert_eq!(registry.resolve("alice"), EntityId::new(0));
        assert_eq!(registry.resolve("bob"), EntityId::new(1));
        assert_eq!(registry.resolve("alice"), EntityId::new(0));
        assert_eq!(registry.resolve("carol"), EntityId::new(2));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn lookup_does_not_register() {
        let mut registry = EntityRegistry::new();
        assert!(registry.lookup("nobody").is_none());
        assert!(registry.is_empty());

        let id = registry.resolve("alice");
        assert_eq!(registry.lookup("alice"), Some(id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn name_and_id_are_bijective() {
        let mut registry = EntityRegistry::new();
        for name in ["a", "b", "c", "b", "a"] {
            registry.resolve(name);
        }
        for entity in registry.iter() {
            assert_eq!(registry.lookup(&entity.name), Some(entity.id));
            assert_eq!(registry.name(entity.id), Some(entity.name.as_str()));
        }
        assert!(registry.name(EntityId::new(3)).is_none());
    }
}
