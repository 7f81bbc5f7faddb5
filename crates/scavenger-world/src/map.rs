use rand::Rng;
use scavenger_geometry::Point;
use scavenger_geometry::ROAD_HALF_WIDTH;
use scavenger_geometry::Road;
use serde::Deserialize;
use serde::Serialize;

use crate::LootInstance;
use crate::LootType;

/// Map identifier, as it appears on the wire. Opaque to the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(String);

impl MapId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Office identifier, unique within a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfficeId(String);

impl OfficeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Building {
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Office {
    pub id: OfficeId,
    pub position: Point,
}

/// Error returned by [`Map::add_office`] when an office id is reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateOfficeId(pub OfficeId);

impl std::fmt::Display for DuplicateOfficeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate office id: {:?}", self.0)
    }
}
impl std::error::Error for DuplicateOfficeId {}

/// One configured map: its static geography plus the per-map defaults
/// (speed, bag capacity, retirement time) and the mutable runtime state
/// (live loot, placed but unclaimed by any dog yet).
#[derive(Debug)]
pub struct Map {
    id: MapId,
    name: String,
    roads: Vec<Road>,
    buildings: Vec<Building>,
    offices: Vec<Office>,
    loot_types: Vec<LootType>,
    loot: Vec<LootInstance>,
    next_loot_id: u64,
    pub dog_speed: f64,
    pub bag_capacity: u32,
    pub dog_retirement_time: std::time::Duration,
}

pub const DEFAULT_DOG_SPEED: f64 = 1.0;
pub const DEFAULT_BAG_CAPACITY: u32 = 3;
pub const DEFAULT_RETIREMENT_SECS: f64 = 60.0;

impl Map {
    pub fn new(id: MapId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            roads: Vec::new(),
            buildings: Vec::new(),
            offices: Vec::new(),
            loot_types: Vec::new(),
            loot: Vec::new(),
            next_loot_id: 0,
            dog_speed: DEFAULT_DOG_SPEED,
            bag_capacity: DEFAULT_BAG_CAPACITY,
            dog_retirement_time: std::time::Duration::from_secs_f64(DEFAULT_RETIREMENT_SECS),
        }
    }

    pub fn id(&self) -> &MapId {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }
    pub fn offices(&self) -> &[Office] {
        &self.offices
    }
    pub fn loot_types(&self) -> &[LootType] {
        &self.loot_types
    }
    pub fn loot(&self) -> &[LootInstance] {
        &self.loot
    }

    pub fn add_road(&mut self, road: Road) {
        self.roads.push(road);
    }

    pub fn add_building(&mut self, building: Building) {
        self.buildings.push(building);
    }

    pub fn add_loot_type(&mut self, loot_type: LootType) {
        self.loot_types.push(loot_type);
    }

    /// Registers an office. Rejects a reused id, matching the original
    /// map's duplicate-office guard.
    pub fn add_office(&mut self, office: Office) -> Result<(), DuplicateOfficeId> {
        if self.offices.iter().any(|o| o.id == office.id) {
            return Err(DuplicateOfficeId(office.id));
        }
        self.offices.push(office);
        Ok(())
    }

    /// Whether `point` lands exactly on an office's (integer) position.
    /// Pickup range for deposits is handled by the collision resolver
    /// separately (§4.4's `OFFICE_RADIUS`); this is the direct
    /// point-equality test named by §4.2's `IsOfficeAt`.
    pub fn is_office_at(&self, point: Point) -> bool {
        self.offices.iter().any(|o| o.position == point)
    }

    /// A uniformly random point on one of this map's roads, used when
    /// spawning loot or (with `--randomize-spawn-points`) new players.
    pub fn random_road_point(&self, rng: &mut impl Rng) -> Point {
        let road = &self.roads[rng.random_range(0..self.roads.len())];
        let t: f64 = rng.random();
        Point::new(
            road.start.x + (road.end.x - road.start.x) * t,
            road.start.y + (road.end.y - road.start.y) * t,
        )
    }

    /// Fixed spawn point: the start of the first road, matching the
    /// original's deterministic (non-randomized) join behavior.
    pub fn initial_point(&self) -> Point {
        self.roads
            .first()
            .map(|r| r.start)
            .unwrap_or(Point::new(0.0, 0.0))
    }

    pub fn add_loot(&mut self, loot_type_id: u32, position: Point) -> LootInstance {
        let instance = LootInstance {
            id: self.next_loot_id,
            type_id: loot_type_id,
            position,
        };
        self.next_loot_id += 1;
        self.loot.push(instance.clone());
        instance
    }

    /// Removes and returns the loot item at `id`, if any remains on the map.
    pub fn take_loot(&mut self, id: u64) -> Option<LootInstance> {
        let idx = self.loot.iter().position(|l| l.id == id)?;
        Some(self.loot.remove(idx))
    }

    /// Value (score contribution) configured for a loot type.
    pub fn value_of(&self, type_id: u32) -> i64 {
        self.loot_types
            .get(type_id as usize)
            .map(|t| t.value)
            .unwrap_or(0)
    }

    /// Restores `next_loot_id` above any id present in a restored snapshot,
    /// so freshly spawned loot never collides with restored ids.
    pub fn bump_loot_id(&mut self, at_least: u64) {
        self.next_loot_id = self.next_loot_id.max(at_least);
    }

    pub fn clamp_to_roads(&self, from: Point, to: Point) -> Point {
        let candidates: Vec<&Road> = self
            .roads
            .iter()
            .filter(|r| r.contains(from, ROAD_HALF_WIDTH))
            .collect();
        if candidates.is_empty() {
            return from;
        }
        let mut best = from;
        for road in candidates {
            let clamped = road.clamp(to, ROAD_HALF_WIDTH);
            if from.distance_to(clamped) > from.distance_to(best) {
                best = clamped;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with_office(id: &str) -> Map {
        let mut map = Map::new(MapId::new("m"), "Test");
        map.add_road(Road::horizontal(Point::new(0.0, 0.0), 10.0));
        map.add_office(Office {
            id: OfficeId::new(id),
            position: Point::new(0.0, 0.0),
        })
        .unwrap();
        map
    }

    #[test]
    fn duplicate_office_id_is_rejected() {
        let mut map = map_with_office("o1");
        let err = map
            .add_office(Office {
                id: OfficeId::new("o1"),
                position: Point::new(1.0, 1.0),
            })
            .unwrap_err();
        assert_eq!(err.0, OfficeId::new("o1"));
    }

    #[test]
    fn is_office_at_requires_exact_position_match() {
        let map = map_with_office("o1");
        assert!(map.is_office_at(Point::new(0.0, 0.0)));
        assert!(!map.is_office_at(Point::new(0.2, 0.0)));
        assert!(!map.is_office_at(Point::new(1.0, 1.0)));
    }

    #[test]
    fn take_loot_removes_and_returns_instance() {
        let mut map = Map::new(MapId::new("m"), "Test");
        let loot = map.add_loot(0, Point::new(1.0, 1.0));
        let taken = map.take_loot(loot.id).unwrap();
        assert_eq!(taken.id, loot.id);
        assert!(map.take_loot(loot.id).is_none());
    }

    #[test]
    fn clamp_to_roads_stays_within_corridor() {
        let mut map = Map::new(MapId::new("m"), "Test");
        map.add_road(Road::horizontal(Point::new(0.0, 0.0), 2.0));
        let clamped = map.clamp_to_roads(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        assert!(clamped.x <= 2.0 + ROAD_HALF_WIDTH);
        assert!(clamped.y <= ROAD_HALF_WIDTH);
    }
}
