//! Loaded entries and the per-tick valid set.
//!
//! The tracker owns the load-ordered entry list, recomputes which entries are
//! valid on every tick and reports the entries whose validity changed since
//! the previous tick. A transition is reported once, on the tick it happens.

use tracing::debug;

use crate::condition::{EvalContext, evaluate_entry};
use crate::entry::{EntryIndex, RuntimeEntry};

/// Entries whose validity changed on the last update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transitions {
    /// Valid now, not valid on the previous tick. Load order.
    pub became_valid: Vec<EntryIndex>,
    /// Valid on the previous tick, not valid now. Load order.
    pub became_invalid: Vec<EntryIndex>,
}

impl Transitions {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.became_valid.is_empty() && self.became_invalid.is_empty()
    }
}

/// Entry registry and valid-set tracker.
#[derive(Debug, Clone, Default)]
pub struct EntryTracker {
    loaded: Vec<RuntimeEntry>,
    valid: Vec<EntryIndex>,
    previous_valid: Vec<EntryIndex>,
    updates: u64,
}

impl EntryTracker {
    /// Track a fixed, load-ordered list of entries.
    #[must_use]
    pub fn new(entries: Vec<RuntimeEntry>) -> Self {
        Self {
            loaded: entries,
            ..Self::default()
        }
    }

    /// Evaluate every loaded entry and diff against the previous tick.
    pub fn update(&mut self, ctx: &EvalContext<'_>) -> Transitions {
        let now: Vec<EntryIndex> = self
            .loaded
            .iter()
            .enumerate()
            .filter(|(_, entry)| evaluate_entry(entry, ctx))
            .map(|(i, _)| EntryIndex(i))
            .collect();

        self.previous_valid = std::mem::replace(&mut self.valid, now);
        self.updates += 1;

        // Both lists are sorted by index, so a merge walk finds the diff.
        let transitions = diff_sorted(&self.previous_valid, &self.valid);
        if !transitions.is_empty() {
            debug!(
                became_valid = transitions.became_valid.len(),
                became_invalid = transitions.became_invalid.len(),
                valid = self.valid.len(),
                "Valid entry set changed"
            );
        }
        transitions
    }

    /// All loaded entries, in load order.
    #[must_use]
    pub fn loaded_entries(&self) -> &[RuntimeEntry] {
        &self.loaded
    }

    /// Entry by index.
    #[must_use]
    pub fn entry(&self, index: EntryIndex) -> Option<&RuntimeEntry> {
        self.loaded.get(index.0)
    }

    /// Indices valid as of the last update, in load order.
    #[must_use]
    pub fn valid_indices(&self) -> &[EntryIndex] {
        &self.valid
    }

    /// Indices valid as of the update before the last one.
    #[must_use]
    pub fn previous_valid_indices(&self) -> &[EntryIndex] {
        &self.previous_valid
    }

    /// Entries valid as of the last update, in load order.
    #[must_use]
    pub fn valid_entries(&self) -> Vec<&RuntimeEntry> {
        self.resolve(&self.valid)
    }

    /// Entries valid as of the update before the last one.
    #[must_use]
    pub fn previous_valid_entries(&self) -> Vec<&RuntimeEntry> {
        self.resolve(&self.previous_valid)
    }

    /// Whether an entry is in the current valid set.
    #[must_use]
    pub fn is_valid(&self, index: EntryIndex) -> bool {
        self.valid.binary_search(&index).is_ok()
    }

    /// First valid entry, by load order, that passes `filter`.
    ///
    /// Load order is the priority: an earlier entry always wins.
    pub fn first_valid<F>(&self, mut filter: F) -> Option<EntryIndex>
    where
        F: FnMut(&RuntimeEntry) -> bool,
    {
        self.valid
            .iter()
            .copied()
            .find(|i| self.entry(*i).is_some_and(&mut filter))
    }

    /// Number of updates run so far.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    fn resolve(&self, indices: &[EntryIndex]) -> Vec<&RuntimeEntry> {
        indices.iter().filter_map(|i| self.entry(*i)).collect()
    }
}

fn diff_sorted(before: &[EntryIndex], after: &[EntryIndex]) -> Transitions {
    let mut transitions = Transitions::default();
    let (mut b, mut a) = (0, 0);
    while b < before.len() || a < after.len() {
        match (before.get(b), after.get(a)) {
            (Some(x), Some(y)) if x == y => {
                b += 1;
                a += 1;
            }
            (Some(x), Some(y)) if x < y => {
                transitions.became_invalid.push(*x);
                b += 1;
            }
            (Some(_), Some(y)) | (None, Some(y)) => {
                transitions.became_valid.push(*y);
                a += 1;
            }
            (Some(x), None) => {
                transitions.became_invalid.push(*x);
                b += 1;
            }
            (None, None) => break,
        }
    }
    transitions
}
