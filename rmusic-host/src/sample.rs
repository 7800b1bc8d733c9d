//! Per-tick world sample.
//!
//! Engine adapters fill a [`WorldSample`] once per client tick from whatever
//! the game exposes. Producers read scalar state from [`GameView`]; the
//! evaluator reads the biome, dimension, block counts, tag facts and zones
//! through [`WorldSample::eval_context`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use rmusic_core::biome_tags::BiomeTagFacts;
use rmusic_core::condition::EvalContext;
use rmusic_core::facts::FactSnapshot;

/// Ticks in one in-game day.
pub const TICKS_PER_DAY: u64 = 24_000;

/// What the subject is riding, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Vehicle {
    /// On foot.
    #[default]
    None,
    /// Minecart.
    Minecart,
    /// Boat.
    Boat,
    /// Horse, donkey, mule.
    Horse,
    /// Pig.
    Pig,
    /// Any other mount.
    Other,
}

/// Which screen the client is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    /// In a world, no blocking screen.
    #[default]
    InGame,
    /// Title screen, no world loaded.
    MainMenu,
    /// End credits.
    Credits,
}

/// Scalar game state read by the built-in producers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    /// Active screen.
    pub screen: Screen,
    /// World time of day in ticks (wraps at [`TICKS_PER_DAY`]).
    pub time_of_day: u64,
    /// Rain (or snow) falling.
    pub raining: bool,
    /// Thunderstorm.
    pub thundering: bool,
    /// Current biome is cold enough for snowfall.
    pub cold_biome: bool,
    /// Subject position.
    pub position: [f64; 3],
    /// Head is under water.
    pub underwater: bool,
    /// Sky is visible straight above the subject.
    pub sees_sky: bool,
    /// Current mount.
    pub vehicle: Vehicle,
    /// Gliding with an elytra.
    pub fall_flying: bool,
    /// Fishing line cast.
    pub fishing: bool,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// A boss bar is visible.
    pub boss_bar_visible: bool,
    /// Hostile mobs within range.
    pub hostile_mobs_nearby: u32,
    /// Villagers within range.
    pub villagers_nearby: u32,
    /// Spawn or bed point, if known.
    pub home: Option<[f64; 3]>,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            screen: Screen::InGame,
            time_of_day: 6_000,
            raining: false,
            thundering: false,
            cold_biome: false,
            position: [0.0, 64.0, 0.0],
            underwater: false,
            sees_sky: true,
            vehicle: Vehicle::None,
            fall_flying: false,
            fishing: false,
            health: 20.0,
            max_health: 20.0,
            boss_bar_visible: false,
            hostile_mobs_nearby: 0,
            villagers_nearby: 0,
            home: None,
        }
    }
}

impl GameView {
    /// Health as a fraction of maximum, `1.0` when maximum is unknown.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Horizontal-and-vertical distance to the home point.
    #[must_use]
    pub fn distance_to_home(&self) -> Option<f64> {
        self.home.map(|home| {
            let dx = self.position[0] - home[0];
            let dy = self.position[1] - home[1];
            let dz = self.position[2] - home[2];
            (dx * dx + dy * dy + dz * dz).sqrt()
        })
    }
}

/// Everything the host hands over for one tick.
#[derive(Debug, Clone, Default)]
pub struct WorldSample {
    /// Monotonic client tick counter.
    pub tick: u64,
    /// Current biome name, e.g. `minecraft:dark_forest`.
    pub biome: String,
    /// Current dimension name, e.g. `minecraft:overworld`.
    pub dimension: String,
    /// Zones containing the subject.
    pub zones: HashSet<String>,
    /// Cached block id → count around the subject.
    pub block_counts: HashMap<String, u32>,
    /// Biome tags active at the subject's position.
    pub biome_tags: BiomeTagFacts,
    /// Scalar state for producers.
    pub game: GameView,
}

impl WorldSample {
    /// An overworld sample for `tick` with default game state.
    #[must_use]
    pub fn overworld(tick: u64) -> Self {
        Self {
            tick,
            biome: "minecraft:plains".to_string(),
            dimension: "minecraft:overworld".to_string(),
            ..Self::default()
        }
    }

    /// Borrow the sample together with `facts` as an evaluation context.
    #[must_use]
    pub fn eval_context<'a>(&'a self, facts: &'a FactSnapshot) -> EvalContext<'a> {
        EvalContext {
            facts,
            biome: &self.biome,
            dimension: &self.dimension,
            block_counts: &self.block_counts,
            biome_tags: &self.biome_tags,
            zones: &self.zones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_fraction_handles_zero_max() {
        let mut game = GameView::default();
        game.health = 5.0;
        assert!((game.health_fraction() - 0.25).abs() < f32::EPSILON);
        game.max_health = 0.0;
        assert!((game.health_fraction() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn home_distance() {
        let mut game = GameView::default();
        assert_eq!(game.distance_to_home(), None);
        game.position = [3.0, 64.0, 4.0];
        game.home = Some([0.0, 64.0, 0.0]);
        assert_eq!(game.distance_to_home(), Some(5.0));
    }
}
