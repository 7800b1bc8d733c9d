//! Song selection with recency avoidance.
//!
//! The selector keeps a short FIFO of recently picked songs and prefers
//! candidates that are not in it. When every candidate was played recently
//! it repeats rather than going silent.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::entry::RuntimeEntry;

/// Default number of songs remembered.
pub const DEFAULT_RECENCY_CAPACITY: usize = 8;

/// Bounded FIFO of recently picked song ids.
#[derive(Debug, Clone)]
pub struct RecencyHistory {
    songs: VecDeque<String>,
    capacity: usize,
}

impl RecencyHistory {
    /// Create an empty history. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            songs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a song, evicting the oldest once full.
    pub fn push(&mut self, song: String) {
        while self.songs.len() >= self.capacity {
            self.songs.pop_front();
        }
        self.songs.push_back(song);
    }

    /// Whether a song is in the history.
    #[must_use]
    pub fn contains(&self, song: &str) -> bool {
        self.songs.iter().any(|s| s == song)
    }

    /// Songs from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.songs.iter().map(String::as_str)
    }

    /// Most recent pick.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.songs.back().map(String::as_str)
    }

    /// Number of songs held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether nothing has been picked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Maximum number of songs held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.songs.clear();
    }
}

impl Default for RecencyHistory {
    fn default() -> Self {
        Self::new(DEFAULT_RECENCY_CAPACITY)
    }
}

/// Picks songs for entries.
#[derive(Debug, Clone)]
pub struct SongSelector {
    history: RecencyHistory,
    rng: StdRng,
}

impl SongSelector {
    /// Create a selector seeded from system entropy.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            history: RecencyHistory::new(capacity),
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a selector with a fixed seed, for replays and tests.
    #[must_use]
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self {
            history: RecencyHistory::new(capacity),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The recency history.
    #[must_use]
    pub fn history(&self) -> &RecencyHistory {
        &self.history
    }

    /// Mutable access to the recency history.
    pub fn history_mut(&mut self) -> &mut RecencyHistory {
        &mut self.history
    }

    /// Whether any candidate is absent from the recency history.
    #[must_use]
    pub fn has_song_not_played_recently(&self, songs: &[String]) -> bool {
        songs.iter().any(|s| !self.history.contains(s))
    }

    /// Pick one song and record it in the history.
    ///
    /// Chooses uniformly among candidates not played recently; if there are
    /// none, uniformly among all candidates. `None` for an empty list.
    pub fn pick_random_song(&mut self, candidates: &[String]) -> Option<String> {
        let fresh: Vec<&String> = candidates
            .iter()
            .filter(|s| !self.history.contains(s))
            .collect();

        let picked = if fresh.is_empty() {
            candidates.choose(&mut self.rng)?.clone()
        } else {
            (*fresh.choose(&mut self.rng)?).clone()
        };

        debug!(
            song = %picked,
            candidates = candidates.len(),
            fresh = fresh.len(),
            "Picked song"
        );
        self.history.push(picked.clone());
        Some(picked)
    }

    /// Decide which song list to pick from.
    ///
    /// The primary entry's songs if any of them is fresh. Otherwise, when the
    /// primary allows fallback, the first later valid entry (index 0 of
    /// `valid` is taken to be the primary and skipped) with a fresh song.
    /// Failing that, the primary's songs anyway.
    #[must_use]
    pub fn selected_songs<'a>(
        &self,
        primary: &'a RuntimeEntry,
        valid: &[&'a RuntimeEntry],
    ) -> &'a [String] {
        if self.has_song_not_played_recently(&primary.songs) {
            return &primary.songs;
        }
        if primary.flags.fallback_allowed {
            if let Some(fallback) = valid
                .iter()
                .skip(1)
                .copied()
                .find(|e| self.has_song_not_played_recently(&e.songs))
            {
                debug!(primary = %primary.name, fallback = %fallback.name, "Falling back to another valid entry");
                return &fallback.songs;
            }
        }
        &primary.songs
    }
}

impl Default for SongSelector {
    fn default() -> Self {
        Self::new(DEFAULT_RECENCY_CAPACITY)
    }
}
