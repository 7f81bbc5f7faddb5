use scavenger_geometry::Point;
use serde::Deserialize;
use serde::Serialize;

/// A loot type as configured for a map (its name, file, and score value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootType {
    pub name: String,
    pub value: i64,
}

/// A live loot item placed somewhere on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootInstance {
    pub id: u64,
    pub type_id: u32,
    pub position: Point,
}
