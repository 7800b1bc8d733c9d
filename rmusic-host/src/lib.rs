//! # rmusic-host — Host Integration for Reactive Music
//!
//! This crate sits between a game client and the game-agnostic
//! `rmusic-core` engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               Game client                │
//! │   WorldSample ──┐         ┌── MusicPlayer│
//! │  ┌──────────────▼─────────┴───────────┐  │
//! │  │            rmusic-host             │  │
//! │  │  FactUpdateQueue   ProducerSet     │  │
//! │  │          └──► MusicDirector        │  │
//! │  │  ┌──────────────▼───────────────┐  │  │
//! │  │  │          rmusic-core         │  │  │
//! │  │  └──────────────────────────────┘  │  │
//! │  └────────────────────────────────────┘  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `sample` — per-tick world sample handed in by the host
//! - `producer` / `producers` — fact producer trait, scheduler, built-ins
//! - `queue` — thread-safe background fact updates
//! - `player` — playback seam
//! - `director` — the tick loop
//! - `diagnostics` — text reports
//! - `logging` — subscriber setup

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod diagnostics;
pub mod director;
pub mod error;
pub mod logging;
pub mod player;
pub mod producer;
pub mod producers;
pub mod queue;
pub mod sample;

pub use director::MusicDirector;
pub use error::{HostError, ProducerError};
pub use player::{Channel, MusicPlayer, SilentPlayer};
pub use producer::{FactProducer, ProducerSet};
pub use queue::FactUpdateQueue;
pub use sample::{GameView, WorldSample};
