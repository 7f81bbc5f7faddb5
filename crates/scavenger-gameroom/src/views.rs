//! Plain, JSON-agnostic snapshots of coordinator state, handed back to
//! `scavenger-api` for serialization into the exact wire shapes spec §6
//! names. Kept free of `serde` derives on purpose — the wire format is
//! the API crate's concern, not the coordinator's.
use scavenger_geometry::Point;
use scavenger_geometry::Vector;
use scavenger_players::PlayerId;
use scavenger_world::Direction;

#[derive(Debug, Clone)]
pub struct MapSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
pub struct RoadView {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Copy)]
pub struct BuildingView {
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct OfficeView {
    pub id: String,
    pub position: Point,
}

#[derive(Debug, Clone)]
pub struct LootTypeView {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct MapDetail {
    pub id: String,
    pub name: String,
    pub roads: Vec<RoadView>,
    pub buildings: Vec<BuildingView>,
    pub offices: Vec<OfficeView>,
    pub loot_types: Vec<LootTypeView>,
}

#[derive(Debug, Clone)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DogView {
    pub position: Point,
    pub velocity: Vector,
    pub direction: Direction,
    pub bag: Vec<u32>,
    pub score: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct LostObjectView {
    pub type_id: u32,
    pub position: Point,
}

#[derive(Debug, Clone, Default)]
pub struct StateView {
    pub players: Vec<(PlayerId, DogView)>,
    pub lost_objects: Vec<(u64, LostObjectView)>,
}
