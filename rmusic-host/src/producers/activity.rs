//! Activity facts: vehicles, elytra flight, fishing and low health.

use rmusic_core::config::ProducerConfig;
use rmusic_core::event::{EventId, EventRegistry};
use rmusic_core::facts::FactSnapshot;

use crate::error::ProducerError;
use crate::producer::{FactProducer, builtin_event};
use crate::sample::{Vehicle, WorldSample};

/// What the subject is doing: riding, gliding, fishing, dying.
#[derive(Debug, Clone)]
pub struct ActivityProducer {
    minecart: EventId,
    boat: EventId,
    horse: EventId,
    pig: EventId,
    elytra: EventId,
    fishing: EventId,
    dying: EventId,
    dying_health_fraction: f32,
}

impl ActivityProducer {
    /// Resolve the events this producer writes.
    ///
    /// # Errors
    /// Returns [`ProducerError::MissingEvent`] if a core event is missing.
    pub fn new(registry: &EventRegistry, config: &ProducerConfig) -> Result<Self, ProducerError> {
        Ok(Self {
            minecart: builtin_event(registry, "MINECART")?,
            boat: builtin_event(registry, "BOAT")?,
            horse: builtin_event(registry, "HORSE")?,
            pig: builtin_event(registry, "PIG")?,
            elytra: builtin_event(registry, "ELYTRA")?,
            fishing: builtin_event(registry, "FISHING")?,
            dying: builtin_event(registry, "DYING")?,
            dying_health_fraction: config.dying_health_fraction,
        })
    }
}

impl FactProducer for ActivityProducer {
    fn id(&self) -> &str {
        "activity"
    }

    fn produce(&mut self, sample: &WorldSample, facts: &mut FactSnapshot) -> Result<(), ProducerError> {
        let game = &sample.game;
        facts.set(self.minecart, game.vehicle == Vehicle::Minecart);
        facts.set(self.boat, game.vehicle == Vehicle::Boat);
        facts.set(self.horse, game.vehicle == Vehicle::Horse);
        facts.set(self.pig, game.vehicle == Vehicle::Pig);
        facts.set(self.elytra, game.fall_flying);
        facts.set(self.fishing, game.fishing);
        facts.set(self.dying, game.health_fraction() < self.dying_health_fraction);
        Ok(())
    }
}
