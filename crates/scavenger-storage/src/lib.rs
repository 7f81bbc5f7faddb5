//! Atomic snapshot persistence.
//!
//! The in-memory world is periodically (and on shutdown) flattened into a
//! [`Snapshot`] and written to `state-file.tmp`, then renamed over the
//! real path — the rename is atomic on every platform the server targets,
//! so a crash mid-write never corrupts the previous good snapshot. This is
//! the idiomatic Rust equivalent of the original server's boost
//! text-archive-plus-rename-on-drop `serialization::Manager`; `bincode` is
//! the binary-format stand-in since nothing in the host crate's own stack
//! serializes to a file.
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use scavenger_geometry::Point;
use scavenger_players::Player;
use scavenger_players::PlayerId;
use scavenger_players::PlayerRegistry;
use scavenger_players::Token;
use scavenger_world::Direction;
use scavenger_world::Dog;
use scavenger_world::LootInstance;
use scavenger_world::MapId;
use scavenger_world::World;
use serde::Deserialize;
use serde::Serialize;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    version: u32,
    maps: Vec<MapSnapshot>,
    players: Vec<PlayerSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MapSnapshot {
    map_id: String,
    loot: Vec<LootSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LootSnapshot {
    id: u64,
    type_id: u32,
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct PlayerSnapshot {
    id: PlayerId,
    name: String,
    token: String,
    map_id: String,
    x: f64,
    y: f64,
    direction: DirectionSnapshot,
    bag: Vec<LootSnapshot>,
    bag_capacity: u32,
    score: i64,
    play_time_ms: u64,
    idle_time_ms: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum DirectionSnapshot {
    Up,
    Down,
    Left,
    Right,
    Stop,
}

impl From<Direction> for DirectionSnapshot {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => DirectionSnapshot::Up,
            Direction::Down => DirectionSnapshot::Down,
            Direction::Left => DirectionSnapshot::Left,
            Direction::Right => DirectionSnapshot::Right,
            Direction::Stop => DirectionSnapshot::Stop,
        }
    }
}
impl From<DirectionSnapshot> for Direction {
    fn from(d: DirectionSnapshot) -> Self {
        match d {
            DirectionSnapshot::Up => Direction::Up,
            DirectionSnapshot::Down => Direction::Down,
            DirectionSnapshot::Left => Direction::Left,
            DirectionSnapshot::Right => Direction::Right,
            DirectionSnapshot::Stop => Direction::Stop,
        }
    }
}

/// Flattens live world + dog state into a [`Snapshot`].
pub fn capture(world: &World, registry: &PlayerRegistry, dogs: &HashMap<PlayerId, Dog>) -> Snapshot {
    let maps = world
        .maps()
        .map(|map| MapSnapshot {
            map_id: map.id().as_str().to_string(),
            loot: map
                .loot()
                .iter()
                .map(|l| LootSnapshot { id: l.id, type_id: l.type_id, x: l.position.x, y: l.position.y })
                .collect(),
        })
        .collect();

    let mut players = Vec::new();
    for map in world.maps() {
        for player in registry.on_map(map.id()) {
            let Some(dog) = dogs.get(&player.id) else { continue };
            players.push(PlayerSnapshot {
                id: player.id,
                name: player.name.clone(),
                token: player.token.as_str().to_string(),
                map_id: player.map_id.as_str().to_string(),
                x: dog.position.x,
                y: dog.position.y,
                direction: dog.direction.into(),
                bag: dog
                    .bag
                    .iter()
                    .map(|l| LootSnapshot { id: l.id, type_id: l.type_id, x: l.position.x, y: l.position.y })
                    .collect(),
                bag_capacity: dog.bag_capacity,
                score: dog.score,
                play_time_ms: dog.play_time.as_millis() as u64,
                idle_time_ms: dog.idle_time.as_millis() as u64,
            });
        }
    }

    Snapshot { version: SNAPSHOT_VERSION, maps, players }
}

/// Writes `snapshot` to `path` via a sibling `.tmp` file and an atomic
/// rename over the target. STORAGE_WARN: callers should log (not crash)
/// on error — a failed save is not fatal, the server just keeps running
/// on in-memory state.
pub fn write_atomic(path: impl AsRef<Path>, snapshot: &Snapshot) -> std::io::Result<()> {
    let path = path.as_ref();
    let tmp = path.with_extension("tmp");
    let bytes = bincode::serialize(snapshot)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)
}

pub fn read(path: impl AsRef<Path>) -> std::io::Result<Snapshot> {
    let bytes = std::fs::read(path)?;
    bincode::deserialize(&bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Restores a snapshot into a freshly-loaded `world`/`registry`/`dogs`.
/// Loot on maps the current config no longer declares is dropped; players
/// bound to a now-missing map are discarded rather than restored, the
/// same rule the original state storage applies on load.
pub fn restore(
    world: &mut World,
    registry: &mut PlayerRegistry,
    dogs: &mut HashMap<PlayerId, Dog>,
    snapshot: Snapshot,
) {
    for map_snapshot in snapshot.maps {
        let map_id = MapId::new(map_snapshot.map_id.clone());
        let Some(map) = world.map_mut(&map_id) else {
            log::warn!("snapshot references unknown map {map_id}, discarding its loot");
            continue;
        };
        let mut max_id = 0u64;
        for loot in map_snapshot.loot {
            max_id = max_id.max(loot.id + 1);
            map.add_loot(loot.type_id, Point::new(loot.x, loot.y));
        }
        map.bump_loot_id(max_id);
    }

    for player_snapshot in snapshot.players {
        let map_id = MapId::new(player_snapshot.map_id.clone());
        if !world.contains(&map_id) {
            log::warn!(
                "snapshot player {} bound to unknown map {}, discarding",
                player_snapshot.id,
                map_id
            );
            continue;
        }
        let Ok(token) = Token::parse(&player_snapshot.token) else {
            log::warn!("snapshot player {} has malformed token, discarding", player_snapshot.id);
            continue;
        };
        let player = Player {
            id: player_snapshot.id,
            name: player_snapshot.name,
            token,
            map_id,
        };
        let mut dog = Dog::new(Point::new(player_snapshot.x, player_snapshot.y), player_snapshot.bag_capacity);
        dog.direction = player_snapshot.direction.into();
        dog.bag = player_snapshot
            .bag
            .into_iter()
            .map(|l| LootInstance { id: l.id, type_id: l.type_id, position: Point::new(l.x, l.y) })
            .collect();
        dog.score = player_snapshot.score;
        dog.play_time = Duration::from_millis(player_snapshot.play_time_ms);
        dog.idle_time = Duration::from_millis(player_snapshot.idle_time_ms);

        registry.reinsert(player.clone());
        dogs.insert(player.id, dog);
    }
}

/// Accumulator helper for "every N ms" persistence scheduling, mirroring
/// the original `StateStorage::IsTimeToSave` accumulate-then-flush check.
#[derive(Debug, Default)]
pub struct SaveSchedule {
    accumulated: Duration,
}

impl SaveSchedule {
    /// Advances the accumulator by `elapsed`; returns `true` (and resets)
    /// once `period` has been reached. `period` of zero means "save every
    /// tick".
    pub fn tick(&mut self, elapsed: Duration, period: Duration) -> bool {
        if period.is_zero() {
            return true;
        }
        self.accumulated += elapsed;
        if self.accumulated >= period {
            self.accumulated = Duration::ZERO;
            true
        } else {
            false
        }
    }
}
