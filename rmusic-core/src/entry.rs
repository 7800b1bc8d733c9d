//! Runtime songpack entries.
//!
//! A [`RuntimeEntry`] is one compiled songpack rule: the conditions that must
//! all hold, the songs it may play, its playback flags and the free-form
//! options bag. Entries are built once at songpack-load time and never
//! mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::parser::RuleParseError;

/// Option key holding the zone names an entry is restricted to.
pub const ZONES_OPTION: &str = "zones";

/// Position of an entry in the load-ordered entry list. Entries are
/// identified by this index, not by their contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryIndex(pub usize);

impl fmt::Display for EntryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry[{}]", self.0)
    }
}

/// Playback behavior switches for an entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryFlags {
    /// Whether selection may fall through to another valid entry when all
    /// of this entry's songs were played recently.
    pub fallback_allowed: bool,
    /// Play on the overlay channel instead of the main one.
    pub should_overlay: bool,
    /// Fade out whatever is playing when this entry becomes current.
    pub stop_music_on_valid: bool,
    /// Fade out whatever is playing when this entry stops being valid.
    pub stop_music_on_invalid: bool,
    /// Start a song immediately when this entry becomes current.
    pub start_music_on_valid: bool,
    /// Probability that the stop/start switches above actually fire.
    pub force_chance: f32,
}

impl Default for EntryFlags {
    fn default() -> Self {
        Self {
            fallback_allowed: true,
            should_overlay: false,
            stop_music_on_valid: false,
            stop_music_on_invalid: false,
            start_music_on_valid: false,
            force_chance: 1.0,
        }
    }
}

/// A single value in the options bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// `true` / `false`.
    Flag(bool),
    /// Any number.
    Number(f64),
    /// A single string.
    Text(String),
    /// A list of strings.
    List(Vec<String>),
}

impl OptionValue {
    /// View as a list. A single string reads as a one-element list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Text(text) => Some(std::slice::from_ref(text)),
            Self::Flag(_) | Self::Number(_) => None,
        }
    }

    /// View as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// View as a flag.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// View as a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// External options attached to an entry, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryOptions(pub BTreeMap<String, OptionValue>);

impl EntryOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option.
    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.0.insert(key.into(), value);
    }

    /// Raw option lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// Zone names the entry is restricted to, if the `zones` option is set
    /// to a string or a list of strings.
    #[must_use]
    pub fn zones(&self) -> Option<&[String]> {
        self.get(ZONES_OPTION).and_then(OptionValue::as_list)
    }
}

/// One compiled songpack rule.
#[derive(Debug, Clone, Default)]
pub struct RuntimeEntry {
    /// Display name, for diagnostics.
    pub name: String,
    /// Conditions, all of which must hold.
    pub conditions: Vec<Condition>,
    /// Candidate song identifiers.
    pub songs: Vec<String>,
    /// Playback switches.
    pub flags: EntryFlags,
    /// External options.
    pub options: EntryOptions,
    /// Problems found while parsing this entry's rules.
    pub errors: Vec<RuleParseError>,
}

impl RuntimeEntry {
    /// Create an entry with default flags and no conditions.
    #[must_use]
    pub fn new(name: impl Into<String>, songs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            songs,
            ..Self::default()
        }
    }

    /// Builder-style condition append.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Builder-style flags.
    #[must_use]
    pub fn with_flags(mut self, flags: EntryFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Builder-style option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Parse errors rendered as one string, empty if there were none.
    #[must_use]
    pub fn diagnostics(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any rule section failed to parse.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
