//! Songpack manifests.
//!
//! A songpack is an author-supplied list of entries, each mapping rule
//! strings to candidate songs. Manifests are TOML (or JSON) and compile into
//! [`RuntimeEntry`] values against the event registry and biome tag table.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::biome_tags::BiomeTagTable;
use crate::entry::{EntryFlags, EntryOptions, RuntimeEntry};
use crate::error::{Result, SongpackError};
use crate::event::EventRegistry;
use crate::parser::RuleParser;

/// A songpack manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Songpack {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Author credit.
    #[serde(default)]
    pub author: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Written for the old `biome=` tag syntax.
    #[serde(default)]
    pub legacy_biome_tags: bool,
    /// Entries, highest priority first.
    #[serde(default)]
    pub entries: Vec<EntryDef>,
}

/// One songpack entry as written by the author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDef {
    /// Display name; defaults to the joined rule strings.
    #[serde(default)]
    pub name: Option<String>,
    /// Rule strings, all of which must hold.
    #[serde(default)]
    pub events: Vec<String>,
    /// Candidate song ids.
    #[serde(default)]
    pub songs: Vec<String>,
    /// See [`EntryFlags::fallback_allowed`].
    #[serde(default = "default_true")]
    pub allow_fallback: bool,
    /// See [`EntryFlags::should_overlay`].
    #[serde(default)]
    pub use_overlay: bool,
    /// See [`EntryFlags::stop_music_on_valid`].
    #[serde(default)]
    pub stop_music_on_valid: bool,
    /// See [`EntryFlags::stop_music_on_invalid`].
    #[serde(default)]
    pub stop_music_on_invalid: bool,
    /// See [`EntryFlags::start_music_on_valid`].
    #[serde(default)]
    pub start_music_on_valid: bool,
    /// See [`EntryFlags::force_chance`].
    #[serde(default = "default_force_chance")]
    pub force_chance: f32,
    /// External options such as `zones`.
    #[serde(default)]
    pub options: EntryOptions,
}

impl EntryDef {
    fn flags(&self) -> EntryFlags {
        EntryFlags {
            fallback_allowed: self.allow_fallback,
            should_overlay: self.use_overlay,
            stop_music_on_valid: self.stop_music_on_valid,
            stop_music_on_invalid: self.stop_music_on_invalid,
            start_music_on_valid: self.start_music_on_valid,
            force_chance: self.force_chance.clamp(0.0, 1.0),
        }
    }
}

impl Songpack {
    /// Decode a TOML manifest.
    ///
    /// # Errors
    /// Returns [`SongpackError::Serialization`] on malformed TOML.
    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SongpackError::Serialization(e.to_string()))
    }

    /// Decode a JSON manifest.
    ///
    /// # Errors
    /// Returns [`SongpackError::Serialization`] on malformed JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| SongpackError::Serialization(e.to_string()))
    }

    /// Load a manifest, choosing the format by file extension (`.json` is
    /// JSON, anything else TOML).
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Compile every entry into a [`RuntimeEntry`], preserving order.
    ///
    /// Parse problems never fail compilation; they are logged and kept on
    /// the entry. `legacy_biome_tags` is OR-ed with the manifest's own flag.
    #[must_use]
    pub fn compile(
        &self,
        registry: &EventRegistry,
        tags: &BiomeTagTable,
        legacy_biome_tags: bool,
    ) -> Vec<RuntimeEntry> {
        let parser =
            RuleParser::new(registry, tags).legacy_biome_tags(legacy_biome_tags || self.legacy_biome_tags);

        let entries: Vec<RuntimeEntry> = self
            .entries
            .iter()
            .map(|def| compile_entry(def, &parser))
            .collect();

        let with_errors = entries.iter().filter(|e| e.has_errors()).count();
        info!(
            songpack = %self.name,
            entries = entries.len(),
            with_errors,
            "Compiled songpack"
        );
        entries
    }
}

fn compile_entry(def: &EntryDef, parser: &RuleParser<'_>) -> RuntimeEntry {
    let name = def.name.clone().unwrap_or_else(|| def.events.join(", "));
    let mut entry = RuntimeEntry::new(name, def.songs.clone()).with_flags(def.flags());
    entry.options = def.options.clone();

    for rule in &def.events {
        let parsed = parser.parse(rule);
        entry.errors.extend(parsed.errors);
        entry.conditions.extend(parsed.condition);
    }

    if entry.has_errors() {
        warn!(
            entry = %entry.name,
            errors = %entry.diagnostics(),
            "Songpack entry has rule errors"
        );
    }
    entry
}

fn default_true() -> bool { true }
fn default_force_chance() -> f32 { 1.0 }

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
        name = "Test Pack"
        author = "tester"

        [[entries]]
        name = "arena"
        events = ["generic"]
        songs = ["music/arena"]
        use_overlay = true
        [entries.options]
        zones = ["arena"]

        [[entries]]
        events = ["night", "biome=forest || biometag=taiga", "block=minecraft:stone,oops || rain"]
        songs = ["music/night_1", "music/night_2"]
        allow_fallback = false
        force_chance = 3.0
    "#;

    #[test]
    fn toml_manifest_compiles_in_order() {
        let pack = Songpack::from_toml(MANIFEST).expect("decode");
        let registry = EventRegistry::with_builtin_events();
        let tags = BiomeTagTable::conventional();
        let entries = pack.compile(&registry, &tags, false);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "arena");
        assert!(entries[0].flags.should_overlay);
        assert_eq!(entries[0].options.zones().map(<[String]>::len), Some(1));

        let night = &entries[1];
        assert_eq!(night.conditions.len(), 3);
        assert!(!night.flags.fallback_allowed);
        assert!((night.flags.force_chance - 1.0).abs() < f32::EPSILON);
        assert_eq!(night.errors.len(), 1);
        assert!(night.name.contains("night"));
    }

    #[test]
    fn json_manifest_and_file_loading() {
        let json = r#"{"name": "J", "entries": [{"events": ["rain"], "songs": ["a"]}]}"#;
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pack.json");
        std::fs::write(&path, json).expect("write");

        let pack = Songpack::from_file(&path).expect("load");
        assert_eq!(pack.name, "J");
        assert!(pack.entries[0].allow_fallback);
    }

    #[test]
    fn entry_with_only_bad_rules_has_no_conditions() {
        let pack = Songpack::from_toml(
            "[[entries]]\nevents = [\"bogus\"]\nsongs = [\"x\"]\n",
        )
        .expect("decode");
        let registry = EventRegistry::with_builtin_events();
        let entries = pack.compile(&registry, &BiomeTagTable::conventional(), false);
        assert!(entries[0].conditions.is_empty());
        assert!(entries[0].has_errors());
    }

    #[test]
    fn malformed_manifest_is_a_serialization_error() {
        let err = Songpack::from_toml("entries = 5").expect_err("bad");
        assert!(matches!(err, SongpackError::Serialization(_)));
    }
}
