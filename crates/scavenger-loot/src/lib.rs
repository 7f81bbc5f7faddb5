//! Loot spawn rate generator.
//!
//! Each map owns one [`LootGenerator`]. On every tick it is asked how many
//! new items should appear given how long it's been since the last spawn
//! and how far the map is below its "one item per active player" target;
//! it answers with a share of that shortage, scaled by elapsed time and a
//! configured per-period probability, accumulating residual time across
//! ticks that don't cross a full period.
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LootGeneratorConfig {
    /// Nominal period over which `probability` applies.
    pub period: Duration,
    /// Probability that a single missing item spawns over one `period`.
    pub probability: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct LootGenerator {
    period: Duration,
    probability: f64,
    time_without_loot: Duration,
}

impl LootGenerator {
    pub fn new(config: LootGeneratorConfig) -> Self {
        Self {
            period: config.period,
            probability: config.probability,
            time_without_loot: Duration::ZERO,
        }
    }

    /// How many new items to spawn this tick, given `elapsed` time and the
    /// current `loot_count` vs. `looter_count` on the map.
    ///
    /// `time_without_loot` accumulates across calls until a spawn actually
    /// happens, then resets — a tick that's too short to spawn anything
    /// doesn't lose its share of elapsed time.
    pub fn generate(&mut self, elapsed: Duration, loot_count: u32, looter_count: u32) -> u32 {
        self.time_without_loot += elapsed;
        let shortage = looter_count.saturating_sub(loot_count);
        let ratio = (self.time_without_loot.as_secs_f64() / self.period.as_secs_f64()).min(1.0);
        let share = self.probability * ratio;
        let generated = (share * shortage as f64).round() as u32;
        if generated > 0 {
            self.time_without_loot = Duration::ZERO;
        }
        generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(period_ms: u64, probability: f64) -> LootGenerator {
        LootGenerator::new(LootGeneratorConfig {
            period: Duration::from_millis(period_ms),
            probability,
        })
    }

    #[test]
    fn full_probability_fills_entire_shortage_after_one_period() {
        let mut gen = generator(5000, 1.0);
        assert_eq!(gen.generate(Duration::from_millis(5000), 0, 10), 10);
    }

    #[test]
    fn half_probability_never_exceeds_looter_count() {
        let mut gen = generator(5000, 0.5);
        assert!(gen.generate(Duration::from_millis(5000), 0, 10) <= 10);
    }

    #[test]
    fn no_shortage_generates_nothing() {
        let mut gen = generator(5000, 1.0);
        assert_eq!(gen.generate(Duration::from_millis(5000), 10, 5), 0);
    }

    #[test]
    fn residual_time_accumulates_across_short_ticks() {
        let mut gen = generator(5000, 0.5);
        assert_eq!(gen.generate(Duration::from_millis(1), 0, 10), 0);
        let generated = gen.generate(Duration::from_millis(4000), 0, 10);
        assert!(generated <= 10);
    }

    #[test]
    fn zero_probability_never_spawns() {
        let mut gen = generator(5000, 0.0);
        assert_eq!(gen.generate(Duration::from_millis(5000), 0, 10), 0);
    }

    #[test]
    fn surplus_loot_generates_nothing() {
        let mut gen = generator(5000, 1.0);
        assert_eq!(gen.generate(Duration::from_millis(5000), 1000, 10), 0);
    }
}
