//! Rain, snow and storm facts for subjects under open sky.

use rmusic_core::event::{EventId, EventRegistry};
use rmusic_core::facts::FactSnapshot;

use crate::error::ProducerError;
use crate::producer::{FactProducer, builtin_event};
use crate::sample::WorldSample;

/// RAIN, SNOW (precipitation in a cold biome) and STORM.
///
/// Only precipitation the subject can feel counts: nothing is set while the
/// sky is hidden.
#[derive(Debug, Clone)]
pub struct WeatherProducer {
    rain: EventId,
    snow: EventId,
    storm: EventId,
}

impl WeatherProducer {
    /// Resolve the events this producer writes.
    ///
    /// # Errors
    /// Returns [`ProducerError::MissingEvent`] if a core event is missing.
    pub fn new(registry: &EventRegistry) -> Result<Self, ProducerError> {
        Ok(Self {
            rain: builtin_event(registry, "RAIN")?,
            snow: builtin_event(registry, "SNOW")?,
            storm: builtin_event(registry, "STORM")?,
        })
    }
}

impl FactProducer for WeatherProducer {
    fn id(&self) -> &str {
        "weather"
    }

    fn produce(&mut self, sample: &WorldSample, facts: &mut FactSnapshot) -> Result<(), ProducerError> {
        let game = &sample.game;
        let falling = game.raining && game.sees_sky;
        facts.set(self.rain, falling && !game.cold_biome);
        facts.set(self.snow, falling && game.cold_biome);
        facts.set(self.storm, falling && game.thundering);
        Ok(())
    }
}
