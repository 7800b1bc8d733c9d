//! # Reactive Music Core
//!
//! Game-agnostic songpack engine for reactive music.
//!
//! A songpack is a list of entries. Each entry carries rule strings
//! (conditions over named boolean facts, blocks, biomes, biome tags and
//! dimensions) and a list of songs. Every tick the host refreshes the fact
//! snapshot, the [`EntryTracker`] recomputes which entries are valid, and the
//! [`SongSelector`] picks a song for the highest-priority valid entry while
//! avoiding recent repeats.
//!
//! ```text
//! EventRegistry ──► FactSnapshot ──► EvalContext
//!       │                                │
//!       ▼                                ▼
//!   RuleParser ──► RuntimeEntry ──► EntryTracker ──► SongSelector
//! ```
//!
//! Nothing here performs audio or touches a game world. See `rmusic-host`
//! for the tick loop.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod biome_tags;
pub mod condition;
pub mod config;
pub mod entry;
pub mod error;
pub mod event;
pub mod facts;
pub mod parser;
pub mod selector;
pub mod songpack;
pub mod tracker;

pub use biome_tags::{BiomeTag, BiomeTagFacts, BiomeTagTable};
pub use condition::{Condition, EvalContext, evaluate_entry};
pub use config::MusicConfig;
pub use entry::{EntryFlags, EntryIndex, EntryOptions, OptionValue, RuntimeEntry};
pub use error::SongpackError;
pub use event::{EventId, EventRecord, EventRegistry};
pub use facts::FactSnapshot;
pub use parser::{RuleParseError, RuleParser};
pub use selector::{RecencyHistory, SongSelector};
pub use songpack::Songpack;
pub use tracker::{EntryTracker, Transitions};
