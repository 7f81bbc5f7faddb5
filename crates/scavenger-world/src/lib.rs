//! Map catalog and in-world entity model.
//!
//! Pure data and data manipulation — no async, no I/O. Owned exclusively by
//! the coordinator's single-writer strand (see `scavenger-gameroom`), which
//! is the only thing allowed to mutate it.
mod dog;
mod loot;
mod map;

pub use dog::*;
pub use loot::*;
pub use map::*;

use std::collections::HashMap;

/// Collision radius of a dog (half of the 0.6 diameter used by the
/// original collision detector).
pub const DOG_RADIUS: f64 = 0.3;
/// Collision radius of a loot item: a point, in practice.
pub const LOOT_RADIUS: f64 = 0.0;
/// Collision radius of an office door.
pub const OFFICE_RADIUS: f64 = 0.25;

/// The full catalog of maps the server knows about, loaded once at startup
/// from configuration and never mutated afterward — only the per-map
/// mutable state (dogs, loot, generator) changes tick to tick.
#[derive(Debug, Default)]
pub struct World {
    maps: HashMap<MapId, Map>,
    order: Vec<MapId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a map. Maps are returned from [`Self::maps`] in insertion
    /// order, matching the order they appeared in the config file.
    pub fn add_map(&mut self, map: Map) {
        let id = map.id().clone();
        if !self.maps.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.maps.insert(id, map);
    }

    pub fn map(&self, id: &MapId) -> Option<&Map> {
        self.maps.get(id)
    }

    pub fn map_mut(&mut self, id: &MapId) -> Option<&mut Map> {
        self.maps.get_mut(id)
    }

    /// All maps, in the order they were registered.
    pub fn maps(&self) -> impl Iterator<Item = &Map> {
        self.order.iter().filter_map(|id| self.maps.get(id))
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Map> {
        self.maps.values_mut()
    }

    pub fn contains(&self, id: &MapId) -> bool {
        self.maps.contains_key(id)
    }
}
