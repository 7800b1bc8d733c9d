//! Background fact updates.
//!
//! Code running off the game thread (network callbacks, region scanners,
//! other plugins) never writes the fact snapshot directly. It pushes updates
//! into a [`FactUpdateQueue`]; the director drains the queue at the start of
//! each tick, so the snapshot has a single writer.
//!
//! The queue is bounded. When full, the oldest pending update is dropped
//! and counted.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use rmusic_core::event::EventId;
use rmusic_core::facts::FactSnapshot;

/// One pending write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactUpdate {
    /// Event to write.
    pub event: EventId,
    /// New value.
    pub value: bool,
}

/// Thread-safe, cloneable handle to the pending-update queue.
#[derive(Debug, Clone)]
pub struct FactUpdateQueue {
    inner: Arc<Mutex<QueueInner>>,
}

#[derive(Debug)]
struct QueueInner {
    pending: VecDeque<FactUpdate>,
    max_pending: usize,
    total_pushed: u64,
    total_dropped: u64,
}

/// Statistics about the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Updates waiting for the next drain.
    pub depth: usize,
    /// Updates pushed since creation.
    pub total_pushed: u64,
    /// Updates dropped because the queue was full.
    pub total_dropped: u64,
}

impl FactUpdateQueue {
    /// Create a queue holding at most `max_pending` updates (minimum 1).
    #[must_use]
    pub fn new(max_pending: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner {
                pending: VecDeque::new(),
                max_pending: max_pending.max(1),
                total_pushed: 0,
                total_dropped: 0,
            })),
        }
    }

    /// Queue a write. Drops the oldest pending update if full.
    pub fn push(&self, event: EventId, value: bool) {
        let mut inner = self.inner.lock();
        if inner.pending.len() >= inner.max_pending {
            inner.pending.pop_front();
            inner.total_dropped += 1;
            if inner.total_dropped.is_power_of_two() {
                warn!(dropped = inner.total_dropped, "Fact update queue full, dropping oldest");
            }
        }
        inner.pending.push_back(FactUpdate { event, value });
        inner.total_pushed += 1;
    }

    /// Apply every pending update to `facts`, oldest first. Returns how many
    /// were applied.
    pub fn drain_into(&self, facts: &mut FactSnapshot) -> usize {
        let pending: Vec<FactUpdate> = self.inner.lock().pending.drain(..).collect();
        for update in &pending {
            facts.set(update.event, update.value);
        }
        pending.len()
    }

    /// Updates waiting for the next drain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().pending.is_empty()
    }

    /// Get queue statistics.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        let inner = self.inner.lock();
        QueueStats {
            depth: inner.pending.len(),
            total_pushed: inner.total_pushed,
            total_dropped: inner.total_dropped,
        }
    }
}

impl Default for FactUpdateQueue {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use rmusic_core::event::EventRegistry;

    use super::*;

    #[test]
    fn later_write_wins_within_a_drain() {
        let mut registry = EventRegistry::new();
        let rain = registry.register("weather", "RAIN").expect("register");
        let mut facts = FactSnapshot::from_registry(&registry);

        let queue = FactUpdateQueue::new(16);
        queue.push(rain, true);
        queue.push(rain, false);
        queue.push(rain, true);
        assert_eq!(queue.drain_into(&mut facts), 3);
        assert!(facts.get(rain));
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_drops_oldest() {
        let queue = FactUpdateQueue::new(2);
        queue.push(EventId(0), true);
        queue.push(EventId(1), true);
        queue.push(EventId(2), true);

        let stats = queue.stats();
        assert_eq!(stats.depth, 2);
        assert_eq!(stats.total_pushed, 3);
        assert_eq!(stats.total_dropped, 1);

        let mut facts = FactSnapshot::default();
        queue.drain_into(&mut facts);
        assert_eq!(facts.active(), vec![EventId(1), EventId(2)]);
    }

    #[test]
    fn clones_share_one_queue_across_threads() {
        let queue = FactUpdateQueue::new(1024);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let q = queue.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        q.push(EventId(i), true);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("writer thread");
        }
        assert_eq!(queue.len(), 200);
    }
}
