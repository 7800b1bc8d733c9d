//! Configuration for the reactive music system.
//!
//! Maps directly to `reactive_music.toml`. Every section and field has a
//! default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::selector::DEFAULT_RECENCY_CAPACITY;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MusicConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Song selection.
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Timing of song changes.
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Songpack compilation.
    #[serde(default)]
    pub songpack: SongpackConfig,
    /// Built-in fact producer tuning.
    #[serde(default)]
    pub producers: ProducerConfig,
    /// Background fact update queue.
    #[serde(default)]
    pub queue: QueueConfig,
}

impl MusicConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `SongpackError::Config` if the TOML is invalid or the values
    /// are inconsistent.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| crate::SongpackError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns `SongpackError::Config` describing the first violation.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.playback.min_delay_ticks > self.playback.max_delay_ticks {
            return Err(crate::SongpackError::Config(format!(
                "playback.min_delay_ticks ({}) exceeds playback.max_delay_ticks ({})",
                self.playback.min_delay_ticks, self.playback.max_delay_ticks
            )));
        }
        if self.selection.recency_capacity == 0 {
            return Err(crate::SongpackError::Config(
                "selection.recency_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether reactive music runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log every valid-set transition at info level.
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            debug_logging: false,
        }
    }
}

/// Song selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// How many recent songs to avoid repeating.
    #[serde(default = "default_recency_capacity")]
    pub recency_capacity: usize,
    /// Fixed RNG seed; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            recency_capacity: DEFAULT_RECENCY_CAPACITY,
            seed: None,
        }
    }
}

/// Song change timing, in game ticks (20 per second).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Shortest silence between two songs.
    #[serde(default = "default_min_delay")]
    pub min_delay_ticks: u32,
    /// Longest silence between two songs.
    #[serde(default = "default_max_delay")]
    pub max_delay_ticks: u32,
    /// Fade-out length when a song is cut off.
    #[serde(default = "default_fade_out")]
    pub fade_out_ticks: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            min_delay_ticks: 200,
            max_delay_ticks: 1200,
            fade_out_ticks: 60,
        }
    }
}

/// Songpack compilation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SongpackConfig {
    /// Treat `biome=` sections as biome tags first (old songpacks).
    #[serde(default)]
    pub legacy_biome_tags: bool,
}

/// Built-in fact producer tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerConfig {
    /// Hostile mobs nearby needed for `NEARBY_MOBS`.
    #[serde(default = "default_mob_threshold")]
    pub nearby_mob_threshold: u32,
    /// Distance from the home point that still counts as `HOME`.
    #[serde(default = "default_home_radius")]
    pub home_radius: f32,
    /// Ticks between surroundings scans.
    #[serde(default = "default_surroundings_interval")]
    pub surroundings_interval: u32,
    /// Health fraction under which `DYING` is set.
    #[serde(default = "default_dying_threshold")]
    pub dying_health_fraction: f32,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            nearby_mob_threshold: 4,
            home_radius: 45.0,
            surroundings_interval: 20,
            dying_health_fraction: 0.35,
        }
    }
}

/// Background fact update queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Pending updates kept before the oldest are dropped.
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { max_pending: 1024 }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_recency_capacity() -> usize { DEFAULT_RECENCY_CAPACITY }
fn default_min_delay() -> u32 { 200 }
fn default_max_delay() -> u32 { 1200 }
fn default_fade_out() -> u32 { 60 }
fn default_mob_threshold() -> u32 { 4 }
fn default_home_radius() -> f32 { 45.0 }
fn default_surroundings_interval() -> u32 { 20 }
fn default_dying_threshold() -> f32 { 0.35 }
fn default_max_pending() -> usize { 1024 }
