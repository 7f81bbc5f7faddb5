//! The mutable state owned exclusively by the coordinator's strand task.
//!
//! Nothing here is `Send`-restricted or guarded by a lock — the whole
//! point of the strand (see [`crate::coordinator`]) is that only one task
//! ever touches an `Engine` at a time, so its methods can borrow freely.
use std::collections::HashMap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use scavenger_loot::LootGenerator;
use scavenger_players::Player;
use scavenger_players::PlayerId;
use scavenger_players::PlayerRegistry;
use scavenger_players::Token;
use scavenger_records::RetiredPlayer;
use scavenger_world::Dog;
use scavenger_world::Direction;
use scavenger_world::MapId;
use scavenger_world::World;

use crate::errors::ActionError;
use crate::errors::JoinError;
use crate::errors::UnknownToken;
use crate::views::BuildingView;
use crate::views::DogView;
use crate::views::LootTypeView;
use crate::views::LostObjectView;
use crate::views::MapDetail;
use crate::views::MapSummary;
use crate::views::OfficeView;
use crate::views::PlayerSummary;
use crate::views::RoadView;
use crate::views::StateView;

pub struct Engine {
    world: World,
    registry: PlayerRegistry,
    dogs: HashMap<PlayerId, Dog>,
    generators: HashMap<MapId, LootGenerator>,
    rng: SmallRng,
    randomize_spawn: bool,
}

impl Engine {
    pub fn new(
        world: World,
        generators: HashMap<MapId, LootGenerator>,
        randomize_spawn: bool,
    ) -> Self {
        Self {
            world,
            registry: PlayerRegistry::new(),
            dogs: HashMap::new(),
            generators,
            rng: SmallRng::from_os_rng(),
            randomize_spawn,
        }
    }

    // -- §4.2 read-only map views -----------------------------------------

    pub fn list_maps(&self) -> Vec<MapSummary> {
        self.world
            .maps()
            .map(|m| MapSummary { id: m.id().as_str().to_string(), name: m.name().to_string() })
            .collect()
    }

    pub fn map_detail(&self, map_id: &str) -> Option<MapDetail> {
        let map = self.world.map(&MapId::new(map_id))?;
        Some(MapDetail {
            id: map.id().as_str().to_string(),
            name: map.name().to_string(),
            roads: map.roads().iter().map(|r| RoadView { start: r.start, end: r.end }).collect(),
            buildings: map
                .buildings()
                .iter()
                .map(|b| BuildingView { position: b.position, width: b.width, height: b.height })
                .collect(),
            offices: map
                .offices()
                .iter()
                .map(|o| OfficeView { id: o.id.as_str().to_string(), position: o.position })
                .collect(),
            loot_types: map
                .loot_types()
                .iter()
                .map(|l| LootTypeView { name: l.name.clone(), value: l.value })
                .collect(),
        })
    }

    // -- §4.6 player registry ----------------------------------------------

    pub fn join(&mut self, name: String, map_id: &str) -> Result<(Token, PlayerId), JoinError> {
        if name.trim().is_empty() {
            return Err(JoinError::InvalidName);
        }
        let map_id = MapId::new(map_id);
        let map = self.world.map(&map_id).ok_or(JoinError::MapNotFound)?;
        let spawn = if self.randomize_spawn {
            map.random_road_point(&mut self.rng)
        } else {
            map.initial_point()
        };
        let bag_capacity = map.bag_capacity;
        let player = self.registry.join(name, map_id, &mut self.rng);
        self.dogs.insert(player.id, Dog::new(spawn, bag_capacity));
        Ok((player.token.clone(), player.id))
    }

    fn player_by_token(&self, token: &Token) -> Result<&Player, UnknownToken> {
        self.registry.by_token(token).map_err(|_| UnknownToken)
    }

    pub fn players_on_map(&self, token: &Token) -> Result<Vec<PlayerSummary>, UnknownToken> {
        let caller = self.player_by_token(token)?;
        Ok(self
            .registry
            .on_map(&caller.map_id)
            .into_iter()
            .map(|p| PlayerSummary { id: p.id, name: p.name.clone() })
            .collect())
    }

    pub fn state(&self, token: &Token) -> Result<StateView, UnknownToken> {
        let caller = self.player_by_token(token)?;
        let Some(map) = self.world.map(&caller.map_id) else { return Ok(StateView::default()) };

        let mut view = StateView::default();
        for player in self.registry.on_map(&caller.map_id) {
            let Some(dog) = self.dogs.get(&player.id) else { continue };
            view.players.push((
                player.id,
                DogView {
                    position: dog.position,
                    velocity: dog.direction.velocity(map.dog_speed),
                    direction: dog.direction,
                    bag: dog.bag.iter().map(|l| l.type_id).collect(),
                    score: dog.score,
                },
            ));
        }
        for loot in map.loot() {
            view.lost_objects.push((loot.id, LostObjectView { type_id: loot.type_id, position: loot.position }));
        }
        Ok(view)
    }

    /// Sets the dog's commanded direction. Re-sending the same direction
    /// twice is idempotent: velocity is derived from `direction` alone, so
    /// applying it again is a no-op on the resulting state.
    pub fn apply_move(&mut self, token: &Token, direction: Direction) -> Result<(), UnknownToken> {
        let caller = self.player_by_token(token)?;
        let id = caller.id;
        if let Some(dog) = self.dogs.get_mut(&id) {
            dog.direction = direction;
        }
        Ok(())
    }

    // -- §4.5 tick ------------------------------------------------------------

    pub fn tick(&mut self, elapsed: Duration) -> Vec<RetiredPlayer> {
        let report = scavenger_simulator::tick(
            &mut self.world,
            &mut self.dogs,
            &self.registry,
            &mut self.generators,
            elapsed,
            &mut self.rng,
        );

        let mut retired = Vec::with_capacity(report.retired.len());
        for id in report.retired {
            let Some(player) = self.registry.remove(id) else { continue };
            let Some(dog) = self.dogs.remove(&id) else { continue };
            retired.push(RetiredPlayer::new(player.name, dog.score, dog.play_time));
        }
        retired
    }

    // -- §4.9 snapshot ---------------------------------------------------------

    pub fn capture(&self) -> scavenger_storage::Snapshot {
        scavenger_storage::capture(&self.world, &self.registry, &self.dogs)
    }

    pub fn restore(&mut self, snapshot: scavenger_storage::Snapshot) {
        scavenger_storage::restore(&mut self.world, &mut self.registry, &mut self.dogs, snapshot);
    }
}

/// Parses the wire `move` field (`"L"|"R"|"U"|"D"|""`) into an optional
/// direction; `Err` means the string wasn't one of those five values.
pub fn parse_move(raw: &str) -> Result<Direction, ActionError> {
    match raw {
        "L" => Ok(Direction::Left),
        "R" => Ok(Direction::Right),
        "U" => Ok(Direction::Up),
        "D" => Ok(Direction::Down),
        "" => Ok(Direction::Stop),
        _ => Err(ActionError::InvalidDirection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scavenger_geometry::Point;
    use scavenger_geometry::Road;
    use scavenger_world::Map;

    fn world_with_one_map() -> World {
        let mut world = World::new();
        let mut map = Map::new(MapId::new("m"), "Town");
        map.add_road(Road::horizontal(Point::new(0.0, 0.0), 10.0));
        world.add_map(map);
        world
    }

    #[test]
    fn join_rejects_blank_name() {
        let mut engine = Engine::new(world_with_one_map(), HashMap::new(), false);
        assert_eq!(engine.join("  ".into(), "m"), Err(JoinError::InvalidName));
    }

    #[test]
    fn join_rejects_unknown_map() {
        let mut engine = Engine::new(world_with_one_map(), HashMap::new(), false);
        assert_eq!(engine.join("alice".into(), "nope"), Err(JoinError::MapNotFound));
    }

    #[test]
    fn join_then_state_reports_the_new_player() {
        let mut engine = Engine::new(world_with_one_map(), HashMap::new(), false);
        let (token, id) = engine.join("alice".into(), "m").unwrap();
        let state = engine.state(&token).unwrap();
        assert_eq!(state.players.len(), 1);
        assert_eq!(state.players[0].0, id);
    }

    #[test]
    fn apply_move_is_idempotent() {
        let mut engine = Engine::new(world_with_one_map(), HashMap::new(), false);
        let (token, _) = engine.join("alice".into(), "m").unwrap();
        engine.apply_move(&token, Direction::Right).unwrap();
        let first = engine.state(&token).unwrap().players[0].1.velocity;
        engine.apply_move(&token, Direction::Right).unwrap();
        let second = engine.state(&token).unwrap().players[0].1.velocity;
        assert_eq!(first, second);
    }

    #[test]
    fn parse_move_accepts_the_five_wire_values() {
        assert_eq!(parse_move("L").unwrap(), Direction::Left);
        assert_eq!(parse_move("").unwrap(), Direction::Stop);
        assert!(parse_move("X").is_err());
    }
}
