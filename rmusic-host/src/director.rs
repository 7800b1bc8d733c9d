//! The music director: one call per client tick.
//!
//! ## Tick pass
//!
//! 1. Drain background fact updates into the snapshot.
//! 2. Run due fact producers.
//! 3. Re-evaluate every entry and dispatch valid/invalid transitions.
//! 4. Main channel: follow the first valid non-overlay entry, honouring its
//!    stop/start switches, and start a new song after a random pause.
//! 5. Overlay channel: follow the first valid overlay entry, switching
//!    songs immediately.
//!
//! The director owns the registry, the snapshot and the tracker; the host
//! only hands it a [`WorldSample`] and reads results back.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use rmusic_core::biome_tags::BiomeTagTable;
use rmusic_core::config::MusicConfig;
use rmusic_core::entry::{EntryIndex, RuntimeEntry};
use rmusic_core::event::EventRegistry;
use rmusic_core::facts::FactSnapshot;
use rmusic_core::selector::SongSelector;
use rmusic_core::songpack::Songpack;
use rmusic_core::tracker::{EntryTracker, Transitions};

use crate::error::{HostError, Result};
use crate::player::{Channel, MusicPlayer};
use crate::producer::ProducerSet;
use crate::producers::default_producers;
use crate::queue::FactUpdateQueue;
use crate::sample::WorldSample;

// Mixed into the configured seed so pause lengths and song picks differ.
const DELAY_SEED_SALT: u64 = 0x5eed_de1a_u64;

/// State of the main channel.
#[derive(Debug, Clone, Default)]
struct MainChannel {
    entry: Option<EntryIndex>,
    song: Option<String>,
    /// Ticks left before the next song; `None` when no pause is scheduled.
    delay: Option<u32>,
}

/// State of the overlay channel.
#[derive(Debug, Clone, Default)]
struct OverlayChannel {
    entry: Option<EntryIndex>,
    song: Option<String>,
}

/// Per-tick driver tying producers, evaluation, selection and playback
/// together.
pub struct MusicDirector<P: MusicPlayer> {
    config: MusicConfig,
    registry: EventRegistry,
    facts: FactSnapshot,
    tracker: EntryTracker,
    selector: SongSelector,
    producers: ProducerSet,
    queue: FactUpdateQueue,
    player: P,
    rng: StdRng,
    main: MainChannel,
    overlay: OverlayChannel,
    halted: bool,
    ticks: u64,
}

impl<P: MusicPlayer> MusicDirector<P> {
    /// Create a director over compiled entries, with no producers.
    #[must_use]
    pub fn new(config: MusicConfig, registry: EventRegistry, entries: Vec<RuntimeEntry>, player: P) -> Self {
        let capacity = config.selection.recency_capacity;
        let (selector, rng) = match config.selection.seed {
            Some(seed) => (
                SongSelector::with_seed(capacity, seed),
                StdRng::seed_from_u64(seed ^ DELAY_SEED_SALT),
            ),
            None => (SongSelector::new(capacity), StdRng::from_entropy()),
        };

        info!(
            entries = entries.len(),
            events = registry.len(),
            recency_capacity = capacity,
            "Music director created"
        );

        Self {
            facts: FactSnapshot::from_registry(&registry),
            tracker: EntryTracker::new(entries),
            queue: FactUpdateQueue::new(config.queue.max_pending),
            producers: ProducerSet::new(),
            main: MainChannel::default(),
            overlay: OverlayChannel::default(),
            halted: false,
            ticks: 0,
            config,
            registry,
            selector,
            player,
            rng,
        }
    }

    /// Compile `songpack` and attach the built-in producers.
    ///
    /// # Errors
    /// Returns [`HostError::Producer`] if the core events are not registered
    /// in `registry`.
    pub fn from_songpack(
        config: MusicConfig,
        registry: EventRegistry,
        tags: &BiomeTagTable,
        songpack: &Songpack,
        player: P,
    ) -> Result<Self> {
        let entries = songpack.compile(&registry, tags, config.songpack.legacy_biome_tags);
        let producers = default_producers(&registry, &config.producers).map_err(|source| HostError::Producer {
            producer: "builtin".to_string(),
            source,
        })?;
        Ok(Self::new(config, registry, entries, player).with_producers(producers))
    }

    /// Replace the producer set.
    #[must_use]
    pub fn with_producers(mut self, producers: ProducerSet) -> Self {
        self.producers = producers;
        self
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance one client tick.
    pub fn tick(&mut self, sample: &WorldSample) {
        if !self.config.general.enabled {
            self.halt();
            return;
        }
        self.halted = false;
        self.ticks += 1;

        self.queue.drain_into(&mut self.facts);
        self.producers.run(sample, &mut self.facts);

        let transitions = {
            let ctx = sample.eval_context(&self.facts);
            self.tracker.update(&ctx)
        };
        self.dispatch_transitions(&transitions);

        self.update_main(&transitions);
        self.update_overlay();
    }

    fn halt(&mut self) {
        if self.halted {
            return;
        }
        info!("Reactive music disabled, stopping playback");
        self.player.stop(Channel::Main);
        self.player.stop(Channel::Overlay);
        self.main = MainChannel::default();
        self.overlay = OverlayChannel::default();
        self.halted = true;
    }

    fn dispatch_transitions(&mut self, transitions: &Transitions) {
        for index in &transitions.became_valid {
            if let Some(entry) = self.tracker.entry(*index) {
                self.log_transition(entry, true);
                self.producers.dispatch_valid(entry);
            }
        }
        for index in &transitions.became_invalid {
            if let Some(entry) = self.tracker.entry(*index) {
                self.log_transition(entry, false);
                self.producers.dispatch_invalid(entry);
            }
        }
    }

    fn log_transition(&self, entry: &RuntimeEntry, valid: bool) {
        if self.config.general.debug_logging {
            info!(entry = %entry.name, valid, "Entry validity changed");
        } else {
            debug!(entry = %entry.name, valid, "Entry validity changed");
        }
    }

    // -----------------------------------------------------------------------
    // Main channel
    // -----------------------------------------------------------------------

    fn update_main(&mut self, transitions: &Transitions) {
        let current = self.tracker.first_valid(|e| !e.flags.should_overlay);
        let start_now = current != self.main.entry && self.switch_main(current, transitions);

        if self.player.is_playing(Channel::Main) {
            return;
        }
        if self.main.song.take().is_some() && !start_now {
            // The last song ended on its own.
            self.main.delay = Some(self.random_delay());
        }
        let Some(index) = self.main.entry else {
            return;
        };

        let delay = match self.main.delay {
            Some(delay) => delay,
            None => {
                let delay = self.random_delay();
                self.main.delay = Some(delay);
                delay
            }
        };
        if delay > 0 {
            self.main.delay = Some(delay - 1);
            return;
        }

        self.main.delay = None;
        self.main.song = self.start_song(Channel::Main, index);
    }

    /// Returns `true` when the new entry should start without a pause.
    fn switch_main(&mut self, current: Option<EntryIndex>, transitions: &Transitions) -> bool {
        let previous = self.main.entry;
        let previous_lost = previous
            .filter(|p| transitions.became_invalid.contains(p))
            .and_then(|p| self.tracker.entry(p))
            .map(|e| e.flags);
        let next = current.and_then(|c| self.tracker.entry(c)).map(|e| e.flags);

        let stop_requested = next.is_some_and(|f| f.stop_music_on_valid && self.roll(f.force_chance))
            || previous_lost.is_some_and(|f| f.stop_music_on_invalid && self.roll(f.force_chance));
        if stop_requested && self.player.is_playing(Channel::Main) {
            debug!("Fading out main channel on entry change");
            self.player.fade_out(Channel::Main, self.config.playback.fade_out_ticks);
            self.main.song = None;
        }

        let start_now = next.is_some_and(|f| f.start_music_on_valid && self.roll(f.force_chance));
        if start_now {
            self.main.delay = Some(0);
        }

        info!(
            from = ?previous.and_then(|p| self.tracker.entry(p)).map(|e| e.name.as_str()),
            to = ?current.and_then(|c| self.tracker.entry(c)).map(|e| e.name.as_str()),
            "Current entry changed"
        );
        self.main.entry = current;
        start_now
    }

    // -----------------------------------------------------------------------
    // Overlay channel
    // -----------------------------------------------------------------------

    fn update_overlay(&mut self) {
        let current = self.tracker.first_valid(|e| e.flags.should_overlay);
        if current != self.overlay.entry {
            if self.overlay.entry.is_some() && self.player.is_playing(Channel::Overlay) {
                self.player.fade_out(Channel::Overlay, self.config.playback.fade_out_ticks);
            }
            self.overlay.entry = current;
            self.overlay.song = current.and_then(|index| self.start_song(Channel::Overlay, index));
            return;
        }

        if let Some(index) = current {
            if !self.player.is_playing(Channel::Overlay) {
                self.overlay.song = self.start_song(Channel::Overlay, index);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    /// Pick and play a song for `index` on `channel`. Fallback candidates
    /// are the other valid entries of the same channel, primary first.
    fn start_song(&mut self, channel: Channel, index: EntryIndex) -> Option<String> {
        let primary = self.tracker.entry(index)?;
        let overlay = channel == Channel::Overlay;
        let mut valid: Vec<&RuntimeEntry> = vec![primary];
        valid.extend(
            self.tracker
                .valid_indices()
                .iter()
                .filter(|i| **i != index)
                .filter_map(|i| self.tracker.entry(*i))
                .filter(|e| e.flags.should_overlay == overlay),
        );

        let songs = self.selector.selected_songs(primary, &valid);
        let Some(song) = self.selector.pick_random_song(songs) else {
            debug!(entry = %primary.name, %channel, "Entry has no songs");
            return None;
        };
        info!(entry = %primary.name, %channel, song = %song, "Playing song");
        self.player.play(channel, &song);
        Some(song)
    }

    fn random_delay(&mut self) -> u32 {
        let min = self.config.playback.min_delay_ticks;
        let max = self.config.playback.max_delay_ticks;
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    fn roll(&mut self, chance: f32) -> bool {
        self.rng.r#gen::<f32>() < chance
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Turn the director on or off. Turning off stops both channels on the
    /// next tick.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.general.enabled = enabled;
    }

    /// Fade out the main song and start the next one without a pause.
    pub fn skip_song(&mut self) {
        if self.player.is_playing(Channel::Main) {
            self.player.fade_out(Channel::Main, self.config.playback.fade_out_ticks);
        }
        self.main.song = None;
        self.main.delay = Some(0);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Entries valid as of the last tick, in load order.
    #[must_use]
    pub fn valid_entries(&self) -> Vec<&RuntimeEntry> {
        self.tracker.valid_entries()
    }

    /// Entries valid on the tick before the last one.
    #[must_use]
    pub fn previous_valid_entries(&self) -> Vec<&RuntimeEntry> {
        self.tracker.previous_valid_entries()
    }

    /// All loaded entries, in load order.
    #[must_use]
    pub fn loaded_entries(&self) -> &[RuntimeEntry] {
        self.tracker.loaded_entries()
    }

    /// Entry driving the main channel.
    #[must_use]
    pub fn current_entry(&self) -> Option<&RuntimeEntry> {
        self.main.entry.and_then(|i| self.tracker.entry(i))
    }

    /// Song last started on the main channel, while it plays.
    #[must_use]
    pub fn current_song(&self) -> Option<&str> {
        self.main.song.as_deref()
    }

    /// Entry driving the overlay channel.
    #[must_use]
    pub fn overlay_entry(&self) -> Option<&RuntimeEntry> {
        self.overlay.entry.and_then(|i| self.tracker.entry(i))
    }

    /// Song last started on the overlay channel.
    #[must_use]
    pub fn overlay_song(&self) -> Option<&str> {
        self.overlay.song.as_deref()
    }

    /// Recency history, oldest first.
    #[must_use]
    pub fn recent_songs(&self) -> Vec<&str> {
        self.selector.history().iter().collect()
    }

    /// Ticks left before the next main song, if a pause is running.
    #[must_use]
    pub fn pending_delay(&self) -> Option<u32> {
        self.main.delay
    }

    /// Current fact values.
    #[must_use]
    pub fn facts(&self) -> &FactSnapshot {
        &self.facts
    }

    /// The event registry.
    #[must_use]
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// A handle for pushing fact updates from other threads.
    #[must_use]
    pub fn queue(&self) -> FactUpdateQueue {
        self.queue.clone()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &MusicConfig {
        &self.config
    }

    /// Registered producers.
    #[must_use]
    pub fn producers(&self) -> &ProducerSet {
        &self.producers
    }

    /// The playback backend.
    #[must_use]
    pub fn player(&self) -> &P {
        &self.player
    }

    /// Mutable access to the playback backend.
    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Ticks processed while enabled.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}
