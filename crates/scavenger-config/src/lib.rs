//! JSON configuration loading.
//!
//! Reads the server's config file into a typed DTO, validates it, and
//! builds the [`scavenger_world::World`] plus one [`LootGeneratorConfig`]
//! per map that the coordinator hands to its loot generators.
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use scavenger_geometry::Point;
use scavenger_geometry::Road;
use scavenger_loot::LootGeneratorConfig;
use scavenger_world::Building;
use scavenger_world::Map;
use scavenger_world::MapId;
use scavenger_world::Office;
use scavenger_world::OfficeId;
use scavenger_world::World;
use serde::Deserialize;

/// CONFIG_ERROR: the config file is missing, malformed, or internally
/// inconsistent (duplicate office ids, a road with neither x1 nor y1).
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    DuplicateOffice { map_id: String, office_id: String },
    AmbiguousRoad { map_id: String, index: usize },
    EmptyMaps,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "CONFIG_ERROR: could not read config file: {e}"),
            ConfigError::Json(e) => write!(f, "CONFIG_ERROR: malformed config JSON: {e}"),
            ConfigError::DuplicateOffice { map_id, office_id } => write!(
                f,
                "CONFIG_ERROR: map {map_id} declares office {office_id} more than once"
            ),
            ConfigError::AmbiguousRoad { map_id, index } => write!(
                f,
                "CONFIG_ERROR: map {map_id} road #{index} specifies neither x1 nor y1"
            ),
            ConfigError::EmptyMaps => write!(f, "CONFIG_ERROR: config declares no maps"),
        }
    }
}
impl std::error::Error for ConfigError {}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default = "default_dog_speed")]
    default_dog_speed: f64,
    #[serde(default = "default_bag_capacity")]
    default_bag_capacity: u32,
    #[serde(default = "default_retirement_time")]
    dog_retirement_time: f64,
    loot_generator_config: RawLootGeneratorConfig,
    maps: Vec<RawMap>,
}

fn default_dog_speed() -> f64 {
    scavenger_world::DEFAULT_DOG_SPEED
}
fn default_bag_capacity() -> u32 {
    scavenger_world::DEFAULT_BAG_CAPACITY
}
fn default_retirement_time() -> f64 {
    scavenger_world::DEFAULT_RETIREMENT_SECS
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLootGeneratorConfig {
    period: f64,
    probability: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMap {
    id: String,
    name: String,
    #[serde(default)]
    dog_speed: Option<f64>,
    #[serde(default)]
    bag_capacity: Option<u32>,
    #[serde(default)]
    dog_retirement_time: Option<f64>,
    roads: Vec<RawRoad>,
    #[serde(default)]
    buildings: Vec<RawBuilding>,
    #[serde(default)]
    offices: Vec<RawOffice>,
    #[serde(default)]
    loot_types: Vec<RawLootType>,
}

#[derive(Debug, Deserialize)]
struct RawRoad {
    x0: f64,
    y0: f64,
    #[serde(default)]
    x1: Option<f64>,
    #[serde(default)]
    y1: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawBuilding {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

#[derive(Debug, Deserialize)]
struct RawOffice {
    id: String,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct RawLootType {
    name: String,
    value: i64,
}

/// Everything needed to start a fresh server: the map catalog and each
/// map's loot generator configuration, keyed by map id.
pub struct LoadedConfig {
    pub world: World,
    pub loot_generators: HashMap<MapId, LootGeneratorConfig>,
}

pub fn load(path: impl AsRef<Path>) -> Result<LoadedConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

pub fn parse(text: &str) -> Result<LoadedConfig, ConfigError> {
    let raw: RawConfig = serde_json::from_str(text)?;
    if raw.maps.is_empty() {
        return Err(ConfigError::EmptyMaps);
    }

    let mut world = World::new();
    let mut loot_generators = HashMap::new();
    let generator_config = LootGeneratorConfig {
        period: Duration::from_secs_f64(raw.loot_generator_config.period),
        probability: raw.loot_generator_config.probability,
    };

    for raw_map in raw.maps {
        let map_id = MapId::new(raw_map.id.clone());
        let mut map = Map::new(map_id.clone(), raw_map.name);
        map.dog_speed = raw_map.dog_speed.unwrap_or(raw.default_dog_speed);
        map.bag_capacity = raw_map.bag_capacity.unwrap_or(raw.default_bag_capacity);
        map.dog_retirement_time =
            Duration::from_secs_f64(raw_map.dog_retirement_time.unwrap_or(raw.dog_retirement_time));

        for (index, road) in raw_map.roads.into_iter().enumerate() {
            let start = Point::new(road.x0, road.y0);
            let built = match (road.x1, road.y1) {
                (Some(x1), _) => Road::horizontal(start, x1),
                (None, Some(y1)) => Road::vertical(start, y1),
                (None, None) => {
                    return Err(ConfigError::AmbiguousRoad {
                        map_id: raw_map.id.clone(),
                        index,
                    });
                }
            };
            map.add_road(built);
        }

        for building in raw_map.buildings {
            map.add_building(Building {
                position: Point::new(building.x, building.y),
                width: building.w,
                height: building.h,
            });
        }

        for office in raw_map.offices {
            let office_id = office.id.clone();
            map.add_office(Office {
                id: OfficeId::new(office.id),
                position: Point::new(office.x, office.y),
            })
            .map_err(|_| ConfigError::DuplicateOffice {
                map_id: raw_map.id.clone(),
                office_id,
            })?;
        }

        for loot_type in raw_map.loot_types {
            map.add_loot_type(scavenger_world::LootType {
                name: loot_type.name,
                value: loot_type.value,
            });
        }

        world.add_map(map);
        loot_generators.insert(map_id, generator_config);
    }

    Ok(LoadedConfig { world, loot_generators })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "lootGeneratorConfig": { "period": 5.0, "probability": 0.5 },
        "maps": [
            {
                "id": "map1",
                "name": "Town",
                "roads": [{"x0": 0, "y0": 0, "x1": 10}, {"x0": 0, "y0": 0, "y1": 10}],
                "offices": [{"id": "o0", "x": 0, "y": 0}],
                "lootTypes": [{"name": "key", "value": 10}]
            }
        ]
    }"#;

    #[test]
    fn parses_sample_config() {
        let loaded = parse(SAMPLE).unwrap();
        assert!(loaded.world.contains(&MapId::new("map1")));
        assert_eq!(loaded.loot_generators.len(), 1);
    }

    #[test]
    fn per_map_retirement_time_overrides_the_default() {
        let text = r#"{
            "dogRetirementTime": 60.0,
            "lootGeneratorConfig": { "period": 5.0, "probability": 0.5 },
            "maps": [{
                "id": "map1", "name": "Town",
                "dogRetirementTime": 5.0,
                "roads": [{"x0": 0, "y0": 0, "x1": 10}]
            }]
        }"#;
        let loaded = parse(text).unwrap();
        let map = loaded.world.map(&MapId::new("map1")).unwrap();
        assert_eq!(map.dog_retirement_time, Duration::from_secs_f64(5.0));
    }

    #[test]
    fn missing_per_map_retirement_time_falls_back_to_the_default() {
        let loaded = parse(SAMPLE).unwrap();
        let map = loaded.world.map(&MapId::new("map1")).unwrap();
        assert_eq!(map.dog_retirement_time, Duration::from_secs_f64(scavenger_world::DEFAULT_RETIREMENT_SECS));
    }

    #[test]
    fn rejects_duplicate_office_ids() {
        let text = r#"{
            "lootGeneratorConfig": { "period": 5.0, "probability": 0.5 },
            "maps": [{
                "id": "map1", "name": "Town",
                "roads": [{"x0": 0, "y0": 0, "x1": 10}],
                "offices": [{"id": "o0", "x": 0, "y": 0}, {"id": "o0", "x": 1, "y": 1}]
            }]
        }"#;
        assert!(matches!(parse(text), Err(ConfigError::DuplicateOffice { .. })));
    }

    #[test]
    fn rejects_road_missing_both_axes() {
        let text = r#"{
            "lootGeneratorConfig": { "period": 5.0, "probability": 0.5 },
            "maps": [{
                "id": "map1", "name": "Town",
                "roads": [{"x0": 0, "y0": 0}]
            }]
        }"#;
        assert!(matches!(parse(text), Err(ConfigError::AmbiguousRoad { .. })));
    }

    #[test]
    fn rejects_empty_maps_list() {
        let text = r#"{
            "lootGeneratorConfig": { "period": 5.0, "probability": 0.5 },
            "maps": []
        }"#;
        assert!(matches!(parse(text), Err(ConfigError::EmptyMaps)));
    }
}
