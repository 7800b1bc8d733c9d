//! Fact producers and their scheduler.
//!
//! A fact producer owns a handful of songpack events and rewrites their
//! values from the world sample. Producers run one after another in
//! registration order, each at most once per tick; one producer failing
//! never stops the others or the evaluation pass that follows.

use tracing::{debug, warn};

use rmusic_core::entry::RuntimeEntry;
use rmusic_core::event::{EventId, EventRegistry, builtin_identifier};
use rmusic_core::facts::FactSnapshot;

use crate::error::ProducerError;
use crate::sample::WorldSample;

/// A source of songpack facts.
pub trait FactProducer: Send {
    /// Stable id, used in logs.
    fn id(&self) -> &str;

    /// Run every `n` ticks. Advisory; `1` means every tick.
    fn tick_interval(&self) -> u32 {
        1
    }

    /// Write this producer's facts for the current tick.
    ///
    /// # Errors
    /// Returns a [`ProducerError`] when the facts cannot be computed. The
    /// producer's keys keep their previous values.
    fn produce(&mut self, sample: &WorldSample, facts: &mut FactSnapshot) -> Result<(), ProducerError>;

    /// An entry became valid this tick.
    fn on_valid(&mut self, _entry: &RuntimeEntry) {}

    /// An entry stopped being valid this tick.
    fn on_invalid(&mut self, _entry: &RuntimeEntry) {}
}

/// Look up the handle of a core event for a producer.
///
/// # Errors
/// Returns [`ProducerError::MissingEvent`] if the core events were not
/// registered.
pub fn builtin_event(registry: &EventRegistry, name: &str) -> Result<EventId, ProducerError> {
    let identifier = builtin_identifier(name);
    registry
        .get(&identifier)
        .map(|r| r.id)
        .ok_or(ProducerError::MissingEvent(identifier))
}

/// Ordered set of producers with per-producer fault isolation.
#[derive(Default)]
pub struct ProducerSet {
    producers: Vec<Box<dyn FactProducer>>,
    failures: u64,
}

impl ProducerSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a producer. Registration order is run order.
    pub fn add(&mut self, producer: Box<dyn FactProducer>) {
        debug!(producer = producer.id(), interval = producer.tick_interval(), "Registered fact producer");
        self.producers.push(producer);
    }

    /// Ids in run order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.producers.iter().map(|p| p.id()).collect()
    }

    /// Number of producers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// Whether no producers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Producer failures since creation.
    #[must_use]
    pub fn failure_count(&self) -> u64 {
        self.failures
    }

    /// Run every producer due on `sample.tick`. Returns how many failed.
    pub fn run(&mut self, sample: &WorldSample, facts: &mut FactSnapshot) -> usize {
        let mut failed = 0;
        for producer in &mut self.producers {
            let interval = u64::from(producer.tick_interval().max(1));
            if sample.tick % interval != 0 {
                continue;
            }
            if let Err(e) = producer.produce(sample, facts) {
                warn!(producer = producer.id(), tick = sample.tick, error = %e, "Fact producer failed");
                failed += 1;
            }
        }
        self.failures += failed as u64;
        failed
    }

    /// Tell every producer that `entry` became valid.
    pub fn dispatch_valid(&mut self, entry: &RuntimeEntry) {
        for producer in &mut self.producers {
            producer.on_valid(entry);
        }
    }

    /// Tell every producer that `entry` stopped being valid.
    pub fn dispatch_invalid(&mut self, entry: &RuntimeEntry) {
        for producer in &mut self.producers {
            producer.on_invalid(entry);
        }
    }
}

impl std::fmt::Debug for ProducerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProducerSet")
            .field("producers", &self.ids())
            .field("failures", &self.failures)
            .finish()
    }
}
