//! Playback seam.
//!
//! The director decides what should play; a [`MusicPlayer`] does the actual
//! audio. Hosts implement the trait over their sound engine.

use std::fmt;

use tracing::debug;

/// Independent playback channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Regular background music.
    Main,
    /// Layered on top of the main channel.
    Overlay,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::Overlay => f.write_str("overlay"),
        }
    }
}

/// Audio backend driven by the director.
pub trait MusicPlayer {
    /// Start `song` on `channel`, replacing whatever plays there.
    fn play(&mut self, channel: Channel, song: &str);

    /// Fade `channel` out over `ticks`.
    fn fade_out(&mut self, channel: Channel, ticks: u32);

    /// Stop `channel` immediately.
    fn stop(&mut self, channel: Channel);

    /// Whether `channel` is still playing (fades count as playing).
    fn is_playing(&self, channel: Channel) -> bool;
}

/// Player that only logs. Songs end as soon as they start.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl MusicPlayer for SilentPlayer {
    fn play(&mut self, channel: Channel, song: &str) {
        debug!(%channel, song, "play (silent)");
    }

    fn fade_out(&mut self, channel: Channel, ticks: u32) {
        debug!(%channel, ticks, "fade out (silent)");
    }

    fn stop(&mut self, channel: Channel) {
        debug!(%channel, "stop (silent)");
    }

    fn is_playing(&self, _channel: Channel) -> bool {
        false
    }
}
