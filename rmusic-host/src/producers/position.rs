//! Height facts: underground, deep underground and high up.

use rmusic_core::event::{EventId, EventRegistry};
use rmusic_core::facts::FactSnapshot;

use crate::error::ProducerError;
use crate::producer::{FactProducer, builtin_event};
use crate::sample::WorldSample;

const UNDERGROUND_Y: f64 = 55.0;
const DEEP_UNDERGROUND_Y: f64 = 15.0;
const HIGH_UP_Y: f64 = 128.0;

/// Vertical position: UNDERWATER, UNDERGROUND, DEEP_UNDERGROUND, HIGH_UP.
#[derive(Debug, Clone)]
pub struct PositionProducer {
    underwater: EventId,
    underground: EventId,
    deep_underground: EventId,
    high_up: EventId,
}

impl PositionProducer {
    /// Resolve the events this producer writes.
    ///
    /// # Errors
    /// Returns [`ProducerError::MissingEvent`] if a core event is missing.
    pub fn new(registry: &EventRegistry) -> Result<Self, ProducerError> {
        Ok(Self {
            underwater: builtin_event(registry, "UNDERWATER")?,
            underground: builtin_event(registry, "UNDERGROUND")?,
            deep_underground: builtin_event(registry, "DEEP_UNDERGROUND")?,
            high_up: builtin_event(registry, "HIGH_UP")?,
        })
    }
}

impl FactProducer for PositionProducer {
    fn id(&self) -> &str {
        "position"
    }

    fn produce(&mut self, sample: &WorldSample, facts: &mut FactSnapshot) -> Result<(), ProducerError> {
        let game = &sample.game;
        let y = game.position[1];
        if !y.is_finite() {
            return Err(ProducerError::IncompleteSample(format!("non-finite y position {y}")));
        }
        let covered = !game.sees_sky;
        facts.set(self.underwater, game.underwater);
        facts.set(self.underground, covered && y < UNDERGROUND_Y);
        facts.set(self.deep_underground, covered && y < DEEP_UNDERGROUND_Y);
        facts.set(self.high_up, y > HIGH_UP_Y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_bands_need_cover() {
        let registry = EventRegistry::with_builtin_events();
        let mut producer = PositionProducer::new(&registry).expect("producer");
        let mut facts = FactSnapshot::from_registry(&registry);
        let mut sample = WorldSample::overworld(0);

        sample.game.position[1] = 10.0;
        producer.produce(&sample, &mut facts).expect("produce");
        assert!(!facts.get(producer.underground), "open pit is not underground");

        sample.game.sees_sky = false;
        producer.produce(&sample, &mut facts).expect("produce");
        assert!(facts.get(producer.underground) && facts.get(producer.deep_underground));

        sample.game.position[1] = 200.0;
        sample.game.sees_sky = true;
        producer.produce(&sample, &mut facts).expect("produce");
        assert!(facts.get(producer.high_up) && !facts.get(producer.underground));
    }

    #[test]
    fn bad_position_is_an_error_and_keeps_old_values() {
        let registry = EventRegistry::with_builtin_events();
        let mut producer = PositionProducer::new(&registry).expect("producer");
        let mut facts = FactSnapshot::from_registry(&registry);
        facts.set(producer.high_up, true);

        let mut sample = WorldSample::overworld(0);
        sample.game.position[1] = f64::NAN;
        assert!(producer.produce(&sample, &mut facts).is_err());
        assert!(facts.get(producer.high_up));
    }
}
