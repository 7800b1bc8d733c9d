//! Nearby bosses, hostile mobs, villages and the home point.

use rmusic_core::config::ProducerConfig;
use rmusic_core::event::{EventId, EventRegistry};
use rmusic_core::facts::FactSnapshot;

use crate::error::ProducerError;
use crate::producer::{FactProducer, builtin_event};
use crate::sample::WorldSample;

/// Things around the subject: BOSS, NEARBY_MOBS, VILLAGE, HOME.
///
/// Runs every `producers.surroundings_interval` ticks.
#[derive(Debug, Clone)]
pub struct SurroundingsProducer {
    boss: EventId,
    nearby_mobs: EventId,
    village: EventId,
    home: EventId,
    mob_threshold: u32,
    home_radius: f64,
    interval: u32,
}

impl SurroundingsProducer {
    /// Resolve the events this producer writes.
    ///
    /// # Errors
    /// Returns [`ProducerError::MissingEvent`] if a core event is missing.
    pub fn new(registry: &EventRegistry, config: &ProducerConfig) -> Result<Self, ProducerError> {
        Ok(Self {
            boss: builtin_event(registry, "BOSS")?,
            nearby_mobs: builtin_event(registry, "NEARBY_MOBS")?,
            village: builtin_event(registry, "VILLAGE")?,
            home: builtin_event(registry, "HOME")?,
            mob_threshold: config.nearby_mob_threshold.max(1),
            home_radius: f64::from(config.home_radius),
            interval: config.surroundings_interval.max(1),
        })
    }
}

impl FactProducer for SurroundingsProducer {
    fn id(&self) -> &str {
        "surroundings"
    }

    fn tick_interval(&self) -> u32 {
        self.interval
    }

    fn produce(&mut self, sample: &WorldSample, facts: &mut FactSnapshot) -> Result<(), ProducerError> {
        let game = &sample.game;
        facts.set(self.boss, game.boss_bar_visible);
        facts.set(self.nearby_mobs, game.hostile_mobs_nearby >= self.mob_threshold);
        facts.set(self.village, game.villagers_nearby >= 1);
        facts.set(
            self.home,
            game.distance_to_home().is_some_and(|d| d <= self.home_radius),
        );
        Ok(())
    }
}
