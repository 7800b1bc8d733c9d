//! Time-of-day facts derived from the world clock.

use rmusic_core::event::{EventId, EventRegistry};
use rmusic_core::facts::FactSnapshot;

use crate::error::ProducerError;
use crate::producer::{FactProducer, builtin_event};
use crate::sample::{TICKS_PER_DAY, WorldSample};

// Day-time windows, in ticks since 06:00.
const SUNSET_START: u64 = 12_000;
const NIGHT_START: u64 = 13_000;
const SUNRISE_START: u64 = 23_000;
const SUNRISE_END: u64 = 1_000;

/// DAY / NIGHT plus the SUNRISE and SUNSET windows.
///
/// NIGHT covers 13000..23000. DAY is everything else, so SUNRISE
/// (23000..1000, wrapping) and SUNSET (12000..13000) overlap DAY.
#[derive(Debug, Clone)]
pub struct TimeOfDayProducer {
    day: EventId,
    night: EventId,
    sunrise: EventId,
    sunset: EventId,
}

impl TimeOfDayProducer {
    /// Resolve the events this producer writes.
    ///
    /// # Errors
    /// Returns [`ProducerError::MissingEvent`] if a core event is missing.
    pub fn new(registry: &EventRegistry) -> Result<Self, ProducerError> {
        Ok(Self {
            day: builtin_event(registry, "DAY")?,
            night: builtin_event(registry, "NIGHT")?,
            sunrise: builtin_event(registry, "SUNRISE")?,
            sunset: builtin_event(registry, "SUNSET")?,
        })
    }
}

impl FactProducer for TimeOfDayProducer {
    fn id(&self) -> &str {
        "time_of_day"
    }

    fn produce(&mut self, sample: &WorldSample, facts: &mut FactSnapshot) -> Result<(), ProducerError> {
        let t = sample.game.time_of_day % TICKS_PER_DAY;
        let night = (NIGHT_START..SUNRISE_START).contains(&t);
        facts.set(self.night, night);
        facts.set(self.day, !night);
        facts.set(self.sunrise, t >= SUNRISE_START || t < SUNRISE_END);
        facts.set(self.sunset, (SUNSET_START..NIGHT_START).contains(&t));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(time: u64) -> (TimeOfDayProducer, FactSnapshot) {
        let registry = EventRegistry::with_builtin_events();
        let mut producer = TimeOfDayProducer::new(&registry).expect("producer");
        let mut facts = FactSnapshot::from_registry(&registry);
        let mut sample = WorldSample::overworld(0);
        sample.game.time_of_day = time;
        producer.produce(&sample, &mut facts).expect("produce");
        (producer, facts)
    }

    #[test]
    fn windows() {
        let (p, f) = at(6_000);
        assert!(f.get(p.day) && !f.get(p.night) && !f.get(p.sunrise) && !f.get(p.sunset));

        let (p, f) = at(12_500);
        assert!(f.get(p.day) && f.get(p.sunset));

        let (p, f) = at(18_000);
        assert!(f.get(p.night) && !f.get(p.day));

        let (p, f) = at(23_500);
        assert!(f.get(p.day) && f.get(p.sunrise));

        // Wraps into the next day.
        let (p, f) = at(24_500);
        assert!(f.get(p.sunrise));
    }
}
