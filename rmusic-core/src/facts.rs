//! The per-session fact snapshot: one boolean per registered songpack event.
//!
//! Fact producers write the keys they own once per tick; the evaluator reads
//! the whole snapshot during a single entry-evaluation pass. The snapshot is
//! mutated in place and never swapped out.

use std::collections::HashMap;

use crate::event::{EventId, EventRegistry};

/// Mapping from event to its current boolean value.
#[derive(Debug, Clone, Default)]
pub struct FactSnapshot {
    values: HashMap<EventId, bool>,
}

impl FactSnapshot {
    /// Create a snapshot holding every registered event, all `false`.
    #[must_use]
    pub fn from_registry(registry: &EventRegistry) -> Self {
        let values = registry.values().map(|r| (r.id, false)).collect();
        Self { values }
    }

    /// Add keys for events registered after the snapshot was created.
    pub fn sync_with(&mut self, registry: &EventRegistry) {
        for record in registry.values() {
            self.values.entry(record.id).or_insert(false);
        }
    }

    /// Set the value of one event.
    pub fn set(&mut self, id: EventId, value: bool) {
        self.values.insert(id, value);
    }

    /// Current value of an event. Absent reads as `false`.
    #[must_use]
    pub fn get(&self, id: EventId) -> bool {
        self.values.get(&id).copied().unwrap_or(false)
    }

    /// Whether the snapshot has a key for this event.
    #[must_use]
    pub fn contains(&self, id: EventId) -> bool {
        self.values.contains_key(&id)
    }

    /// Set every key back to `false`, keeping the keys.
    pub fn reset(&mut self) {
        for value in self.values.values_mut() {
            *value = false;
        }
    }

    /// Events currently `true`, sorted by id.
    #[must_use]
    pub fn active(&self) -> Vec<EventId> {
        let mut active: Vec<EventId> = self
            .values
            .iter()
            .filter_map(|(id, v)| v.then_some(*id))
            .collect();
        active.sort_unstable();
        active
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
