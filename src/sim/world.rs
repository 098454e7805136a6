//! Entity world
//!
//! Entities are an id plus a unique name; components of any `'static` type
//! can be attached to them. Storage is one ordered map per component type, so
//! every query iterates in entity-id order and stays deterministic.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Stable entity identifier, allocated in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Marker for component types
pub trait Component: Any {}

impl<T: Any> Component for T {}

/// Remaining hit points of a destructible block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health(pub i32);

/// Remaining attempts of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lives(pub i32);

/// Damage dealt on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage(pub i32);

/// Travel direction and speed (mirrored from the simulation for inspection)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec3);

/// Type-erased view of one component column
trait Column: Any {
    fn remove_entity(&mut self, id: EntityId);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> Column for BTreeMap<EntityId, T> {
    fn remove_entity(&mut self, id: EntityId) {
        self.remove(&id);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS world containing all entities and components
#[derive(Default)]
pub struct World {
    next_id: u32,
    names: BTreeMap<EntityId, String>,
    by_name: HashMap<String, EntityId>,
    columns: HashMap<TypeId, Box<dyn Column>>,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.names)
            .field("component_types", &self.columns.len())
            .finish()
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a named entity; names are unique within a world
    pub fn spawn(&mut self, name: impl Into<String>) -> Result<EntityId, WorldError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(WorldError::DuplicateName(name));
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.by_name.insert(name.clone(), id);
        self.names.insert(id, name);
        Ok(id)
    }

    /// Remove an entity and every component attached to it
    ///
    /// Returns false if the entity was already gone.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(name) = self.names.remove(&id) else {
            return false;
        };
        self.by_name.remove(&name);
        for column in self.columns.values_mut() {
            column.remove_entity(id);
        }
        true
    }

    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Attach (or replace) a component; ignored for dead entities
    pub fn insert<T: Component>(&mut self, id: EntityId, component: T) {
        if !self.is_alive(id) {
            log::trace!("insert on dead entity {id:?} ignored");
            return;
        }
        self.column_mut::<T>().insert(id, component);
    }

    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        self.columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut::<BTreeMap<EntityId, T>>())
            .and_then(|c| c.remove(&id))
    }

    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.column::<T>().and_then(|c| c.get(&id))
    }

    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut::<BTreeMap<EntityId, T>>())
            .and_then(|c| c.get_mut(&id))
    }

    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.get::<T>(id).is_some()
    }

    /// Every entity carrying `T`, in id order
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.column::<T>()
            .into_iter()
            .flat_map(|c| c.iter().map(|(id, value)| (*id, value)))
    }

    /// Number of entities carrying `T`
    pub fn count<T: Component>(&self) -> usize {
        self.column::<T>().map_or(0, BTreeMap::len)
    }

    fn column<T: Component>(&self) -> Option<&BTreeMap<EntityId, T>> {
        self.columns
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref::<BTreeMap<EntityId, T>>())
    }

    fn column_mut<T: Component>(&mut self) -> &mut BTreeMap<EntityId, T> {
        let column = self
            .columns
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(BTreeMap::<EntityId, T>::new()) as Box<dyn Column>);
        match column.as_any_mut().downcast_mut::<BTreeMap<EntityId, T>>() {
            Some(column) => column,
            // The map is keyed by the TypeId of its own element type
            None => unreachable!("component column type mismatch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_lookup() {
        let mut world = World::new();
        let player = world.spawn("Player").unwrap();
        let ball = world.spawn("Ball").unwrap();

        assert_ne!(player, ball);
        assert_eq!(world.lookup("Player"), Some(player));
        assert_eq!(world.name(ball), Some("Ball"));
        assert_eq!(world.lookup("Floor"), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut world = World::new();
        world.spawn("Dirt").unwrap();
        assert_eq!(world.spawn("Dirt"), Err(WorldError::DuplicateName("Dirt".into())));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_components_get_set() {
        let mut world = World::new();
        let dirt = world.spawn("Dirt").unwrap();
        world.insert(dirt, Health(2));

        assert_eq!(world.get::<Health>(dirt), Some(&Health(2)));
        assert!(world.get::<Lives>(dirt).is_none());

        world.get_mut::<Health>(dirt).unwrap().0 -= 1;
        assert_eq!(world.get::<Health>(dirt), Some(&Health(1)));

        world.insert(dirt, Health(5));
        assert_eq!(world.get::<Health>(dirt), Some(&Health(5)));
        assert_eq!(world.remove::<Health>(dirt), Some(Health(5)));
        assert!(!world.has::<Health>(dirt));
    }

    #[test]
    fn test_despawn_clears_components_and_name() {
        let mut world = World::new();
        let gold = world.spawn("Gold").unwrap();
        world.insert(gold, Health(1));
        world.insert(gold, Damage(3));

        assert!(world.despawn(gold));
        assert!(!world.despawn(gold));
        assert_eq!(world.lookup("Gold"), None);
        assert!(world.get::<Health>(gold).is_none());
        assert_eq!(world.count::<Damage>(), 0);

        // Name is free again, id is not reused
        let again = world.spawn("Gold").unwrap();
        assert_ne!(again, gold);
    }

    #[test]
    fn test_insert_on_dead_entity_is_ignored() {
        let mut world = World::new();
        let id = world.spawn("Ball").unwrap();
        world.despawn(id);
        world.insert(id, Damage(1));
        assert_eq!(world.count::<Damage>(), 0);
    }

    #[test]
    fn test_query_in_id_order() {
        let mut world = World::new();
        let a = world.spawn("Dirt.001").unwrap();
        let _ = world.spawn("Player").unwrap();
        let c = world.spawn("Gold.001").unwrap();
        world.insert(c, Health(2));
        world.insert(a, Health(1));

        let ids: Vec<_> = world.query::<Health>().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
    }
}
