use scavenger_geometry::Point;
use scavenger_geometry::Vector;
use serde::Deserialize;
use serde::Serialize;

use crate::LootInstance;

/// Direction a dog is currently moving (or stopped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stop,
}

impl Direction {
    /// Unit velocity for this direction, scaled by the map's dog speed.
    pub fn velocity(self, speed: f64) -> Vector {
        match self {
            Direction::Up => Vector::new(0.0, -speed),
            Direction::Down => Vector::new(0.0, speed),
            Direction::Left => Vector::new(-speed, 0.0),
            Direction::Right => Vector::new(speed, 0.0),
            Direction::Stop => Vector::zero(),
        }
    }
}

/// A player's in-world avatar: position, velocity, loot bag, score, and
/// the idle/play-time counters that drive retirement.
#[derive(Debug, Clone)]
pub struct Dog {
    pub position: Point,
    pub direction: Direction,
    pub bag: Vec<LootInstance>,
    pub bag_capacity: u32,
    pub score: i64,
    pub play_time: std::time::Duration,
    pub idle_time: std::time::Duration,
    pub retired: bool,
}

impl Dog {
    pub fn new(position: Point, bag_capacity: u32) -> Self {
        Self {
            position,
            direction: Direction::Stop,
            bag: Vec::new(),
            bag_capacity,
            score: 0,
            play_time: std::time::Duration::ZERO,
            idle_time: std::time::Duration::ZERO,
            retired: false,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.direction != Direction::Stop
    }

    pub fn bag_has_room(&self) -> bool {
        (self.bag.len() as u32) < self.bag_capacity
    }

    /// Empties the bag, returning the score earned by depositing it.
    pub fn empty_bag(&mut self, value_of: impl Fn(u32) -> i64) -> i64 {
        let earned: i64 = self.bag.iter().map(|l| value_of(l.type_id)).sum();
        self.bag.clear();
        self.score += earned;
        earned
    }

    /// Advances idle/play counters for one tick and reports whether the
    /// dog should retire this tick.
    pub fn advance_time(&mut self, elapsed: std::time::Duration, retirement_time: std::time::Duration) -> bool {
        self.play_time += elapsed;
        if self.is_moving() {
            self.idle_time = std::time::Duration::ZERO;
        } else {
            self.idle_time += elapsed;
        }
        self.idle_time >= retirement_time
    }
}
