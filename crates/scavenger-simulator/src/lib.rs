//! Per-tick orchestration.
//!
//! One [`tick`] call performs, in order: move every dog along its roads,
//! spawn loot per map, resolve gathering events against loot and offices,
//! and advance idle/retirement timers. It mutates [`World`] and the dog
//! table in place and returns a [`TickReport`] naming anything that
//! retired this tick — it never touches the database or the filesystem,
//! keeping the simulation a synchronous, deterministic function of its
//! inputs (same world + same elapsed time + same rng draws ⇒ same result).
use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use scavenger_collision::Gatherer;
use scavenger_collision::Item;
use scavenger_collision::find_gathering_events;
use scavenger_loot::LootGenerator;
use scavenger_players::PlayerId;
use scavenger_players::PlayerRegistry;
use scavenger_world::DOG_RADIUS;
use scavenger_world::Direction;
use scavenger_world::Dog;
use scavenger_world::LOOT_RADIUS;
use scavenger_world::MapId;
use scavenger_world::OFFICE_RADIUS;
use scavenger_world::World;

/// What happened during one tick that the coordinator needs to act on.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Players whose dogs crossed the retirement idle threshold this tick.
    /// Still present in `dogs`/registry when this is returned — removing
    /// them and forwarding their score to the retirement sink is the
    /// coordinator's job, not the simulator's.
    pub retired: Vec<PlayerId>,
}

#[derive(Clone, Copy)]
enum Kind {
    Loot,
    Office,
}

/// Advances every map by `elapsed`.
pub fn tick(
    world: &mut World,
    dogs: &mut HashMap<PlayerId, Dog>,
    registry: &PlayerRegistry,
    generators: &mut HashMap<MapId, LootGenerator>,
    elapsed: Duration,
    rng: &mut impl Rng,
) -> TickReport {
    let mut report = TickReport::default();

    for map in world.all_mut() {
        let map_id = map.id().clone();
        let player_ids: Vec<PlayerId> = registry.on_map(&map_id).iter().map(|p| p.id).collect();

        // 1. Move dogs, track idle/play time.
        let mut moves: HashMap<PlayerId, (scavenger_geometry::Point, scavenger_geometry::Point)> =
            HashMap::new();
        for &id in &player_ids {
            let Some(dog) = dogs.get_mut(&id) else { continue };
            let before = dog.position;
            let after = if dog.is_moving() {
                let velocity = dog.direction.velocity(map.dog_speed);
                let target = before + velocity * elapsed.as_secs_f64();
                let clamped = map.clamp_to_roads(before, target);
                if clamped != target {
                    // Ran into a road boundary: stop dead, same as the dog
                    // being given a zero speed mid-move.
                    dog.direction = Direction::Stop;
                }
                clamped
            } else {
                before
            };
            dog.position = after;
            moves.insert(id, (before, after));
            if dog.advance_time(elapsed, map.dog_retirement_time) {
                report.retired.push(id);
            }
        }

        // 2. Spawn loot.
        if let Some(generator) = generators.get_mut(&map_id) {
            let loot_count = map.loot().len() as u32;
            let looter_count = player_ids.len() as u32;
            let spawned = generator.generate(elapsed, loot_count, looter_count);
            if !map.loot_types().is_empty() {
                for _ in 0..spawned {
                    let type_id = rng.random_range(0..map.loot_types().len()) as u32;
                    let position = map.random_road_point(rng);
                    map.add_loot(type_id, position);
                }
            }
        }

        // 3. Resolve gathering events: loot pickups and office deposits,
        // merged into one chronological stream so simultaneous events at
        // the same instant still resolve in a deterministic order.
        let gatherers: Vec<Gatherer> = player_ids
            .iter()
            .map(|id| {
                let (start, end) = moves[id];
                Gatherer { start, end, width: DOG_RADIUS }
            })
            .collect();

        let loot_ids: Vec<u64> = map.loot().iter().map(|l| l.id).collect();
        let loot_items: Vec<Item> = map
            .loot()
            .iter()
            .map(|l| Item { position: l.position, width: LOOT_RADIUS })
            .collect();
        let loot_events = find_gathering_events(&gatherers, &loot_items);

        let office_items: Vec<Item> = map
            .offices()
            .iter()
            .map(|o| Item { position: o.position, width: OFFICE_RADIUS })
            .collect();
        let office_events = find_gathering_events(&gatherers, &office_items);

        let mut merged: Vec<(f64, Kind, usize, usize)> = Vec::new();
        merged.extend(loot_events.iter().map(|e| (e.time, Kind::Loot, e.gatherer_id, e.item_id)));
        merged.extend(office_events.iter().map(|e| (e.time, Kind::Office, e.gatherer_id, e.item_id)));
        merged.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        for (_, kind, gatherer_idx, item_idx) in merged {
            let player_id = player_ids[gatherer_idx];
            match kind {
                Kind::Loot => {
                    let loot_id = loot_ids[item_idx];
                    let has_room = dogs.get(&player_id).map(|d| d.bag_has_room()).unwrap_or(false);
                    if has_room {
                        if let Some(instance) = map.take_loot(loot_id) {
                            if let Some(dog) = dogs.get_mut(&player_id) {
                                dog.bag.push(instance);
                            }
                        }
                    }
                }
                Kind::Office => {
                    if let Some(dog) = dogs.get_mut(&player_id) {
                        dog.empty_bag(|type_id| map.value_of(type_id));
                    }
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use scavenger_geometry::Point;
    use scavenger_geometry::Road;
    use scavenger_world::Map;
    use scavenger_world::MapId;
    use scavenger_world::Office;
    use scavenger_world::OfficeId;

    fn sample_world() -> World {
        let mut world = World::new();
        let mut map = Map::new(MapId::new("m"), "Test");
        map.add_road(Road::horizontal(Point::new(0.0, 0.0), 10.0));
        map.add_office(Office { id: OfficeId::new("o0"), position: Point::new(9.9, 0.0) })
            .unwrap();
        map.add_loot_type(scavenger_world::LootType { name: "key".into(), value: 10 });
        world.add_map(map);
        world
    }

    #[test]
    fn dog_picks_up_loot_it_walks_through() {
        let mut world = sample_world();
        world.map_mut(&MapId::new("m")).unwrap().add_loot(0, Point::new(1.0, 0.0));

        let mut registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let player = registry.join("alice".into(), MapId::new("m"), &mut rng);

        let mut dogs = HashMap::new();
        let mut dog = Dog::new(Point::new(0.0, 0.0), 3);
        dog.direction = Direction::Right;
        dogs.insert(player.id, dog);

        let mut generators = HashMap::new();
        generators.insert(
            MapId::new("m"),
            LootGenerator::new(scavenger_loot::LootGeneratorConfig {
                period: Duration::from_secs(5),
                probability: 0.0,
            }),
        );

        let report = tick(
            &mut world,
            &mut dogs,
            &registry,
            &mut generators,
            Duration::from_secs(2),
            &mut rng,
        );

        assert!(report.retired.is_empty());
        assert_eq!(dogs[&player.id].bag.len(), 1);
        assert!(world.map(&MapId::new("m")).unwrap().loot().is_empty());
    }

    #[test]
    fn depositing_at_office_converts_bag_to_score() {
        let mut world = sample_world();

        let mut registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let player = registry.join("alice".into(), MapId::new("m"), &mut rng);

        let mut dogs = HashMap::new();
        let mut dog = Dog::new(Point::new(9.0, 0.0), 3);
        dog.bag.push(scavenger_world::LootInstance { id: 0, type_id: 0, position: Point::new(0.0, 0.0) });
        dog.direction = Direction::Right;
        dogs.insert(player.id, dog);

        let mut generators = HashMap::new();
        generators.insert(
            MapId::new("m"),
            LootGenerator::new(scavenger_loot::LootGeneratorConfig {
                period: Duration::from_secs(5),
                probability: 0.0,
            }),
        );

        tick(&mut world, &mut dogs, &registry, &mut generators, Duration::from_secs(1), &mut rng);

        let dog = &dogs[&player.id];
        assert!(dog.bag.is_empty());
        assert_eq!(dog.score, 10);
    }

    #[test]
    fn idle_dog_retires_after_threshold() {
        let mut world = sample_world();
        world.map_mut(&MapId::new("m")).unwrap().dog_retirement_time = Duration::from_secs(60);

        let mut registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let player = registry.join("alice".into(), MapId::new("m"), &mut rng);

        let mut dogs = HashMap::new();
        dogs.insert(player.id, Dog::new(Point::new(0.0, 0.0), 3));

        let mut generators = HashMap::new();
        generators.insert(
            MapId::new("m"),
            LootGenerator::new(scavenger_loot::LootGeneratorConfig {
                period: Duration::from_secs(5),
                probability: 0.0,
            }),
        );

        let report = tick(
            &mut world,
            &mut dogs,
            &registry,
            &mut generators,
            Duration::from_secs(60),
            &mut rng,
        );

        assert_eq!(report.retired, vec![player.id]);
    }

    #[test]
    fn dog_stops_dead_when_clamped_at_road_end() {
        let mut world = sample_world();
        world.map_mut(&MapId::new("m")).unwrap().dog_speed = 2.0;

        let mut registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let player = registry.join("alice".into(), MapId::new("m"), &mut rng);

        let mut dogs = HashMap::new();
        let mut dog = Dog::new(Point::new(0.0, 0.0), 3);
        dog.direction = Direction::Right;
        dogs.insert(player.id, dog);

        let mut generators = HashMap::new();
        generators.insert(
            MapId::new("m"),
            LootGenerator::new(scavenger_loot::LootGeneratorConfig {
                period: Duration::from_secs(5),
                probability: 0.0,
            }),
        );

        tick(&mut world, &mut dogs, &registry, &mut generators, Duration::from_secs(10), &mut rng);

        let dog = &dogs[&player.id];
        assert_eq!(dog.position, Point::new(10.4, 0.0));
        assert_eq!(dog.direction, Direction::Stop);
        assert_eq!(dog.direction.velocity(3.0), scavenger_geometry::Vector::zero());
    }
}
