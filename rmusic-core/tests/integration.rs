//! Integration Tests: songpack load → evaluate → select
//!
//! These tests drive the engine the way a host does: compile a manifest,
//! flip facts tick by tick, and pick songs for whatever is valid.

use std::collections::{HashMap, HashSet};

use rmusic_core::biome_tags::{BiomeTag, BiomeTagFacts, BiomeTagTable};
use rmusic_core::condition::EvalContext;
use rmusic_core::config::MusicConfig;
use rmusic_core::entry::EntryIndex;
use rmusic_core::event::{EventRegistry, builtin_identifier};
use rmusic_core::facts::FactSnapshot;
use rmusic_core::selector::SongSelector;
use rmusic_core::songpack::Songpack;
use rmusic_core::tracker::EntryTracker;

const PACK: &str = r#"
name = "Integration Pack"

[[entries]]
name = "boss"
events = ["boss"]
songs = ["boss_1", "boss_2"]
allow_fallback = false

[[entries]]
name = "night forest"
events = ["night", "biometag=forest || biome=taiga"]
songs = ["forest_night"]

[[entries]]
name = "night"
events = ["night"]
songs = ["night_1", "night_2"]

[[entries]]
name = "nether"
events = ["dim=nether"]
songs = ["nether_1"]

[[entries]]
name = "caves"
events = ["block=minecraft:stone,20"]
songs = ["cave_1"]

[[entries]]
name = "arena"
events = ["generic"]
songs = ["arena_1"]
[entries.options]
zones = "arena"

[[entries]]
name = "broken"
events = ["not_an_event || block=stone"]
songs = ["never"]
"#;

struct World {
    facts: FactSnapshot,
    biome: String,
    dimension: String,
    blocks: HashMap<String, u32>,
    tags: BiomeTagFacts,
    zones: HashSet<String>,
}

impl World {
    fn new(registry: &EventRegistry) -> Self {
        Self {
            facts: FactSnapshot::from_registry(registry),
            biome: "minecraft:plains".into(),
            dimension: "minecraft:overworld".into(),
            blocks: HashMap::new(),
            tags: BiomeTagFacts::new(),
            zones: HashSet::new(),
        }
    }

    fn ctx(&self) -> EvalContext<'_> {
        EvalContext {
            facts: &self.facts,
            biome: &self.biome,
            dimension: &self.dimension,
            block_counts: &self.blocks,
            biome_tags: &self.tags,
            zones: &self.zones,
        }
    }

    fn set(&mut self, registry: &EventRegistry, name: &str, value: bool) {
        let id = registry.require(&builtin_identifier(name)).expect("builtin");
        self.facts.set(id, value);
    }
}

fn load() -> (EventRegistry, EntryTracker) {
    let registry = EventRegistry::with_builtin_events();
    let pack = Songpack::from_toml(PACK).expect("decode");
    let entries = pack.compile(&registry, &BiomeTagTable::conventional(), false);
    (registry, EntryTracker::new(entries))
}

fn valid_names(tracker: &EntryTracker) -> Vec<&str> {
    tracker.valid_entries().iter().map(|e| e.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Evaluation across ticks
// ---------------------------------------------------------------------------

#[test]
fn valid_set_follows_world_state() {
    let (registry, mut tracker) = load();
    let mut world = World::new(&registry);

    tracker.update(&world.ctx());
    assert!(valid_names(&tracker).is_empty());

    world.set(&registry, "NIGHT", true);
    tracker.update(&world.ctx());
    assert_eq!(valid_names(&tracker), vec!["night"]);

    world.tags.set(BiomeTag::new("c:is_forest"), true);
    tracker.update(&world.ctx());
    assert_eq!(valid_names(&tracker), vec!["night forest", "night"]);

    world.tags.clear();
    world.biome = "minecraft:old_growth_spruce_taiga".into();
    let t = tracker.update(&world.ctx());
    assert!(t.is_empty(), "biome substring keeps night forest valid");

    world.dimension = "minecraft:the_nether".into();
    world.blocks.insert("minecraft:stone".into(), 25);
    tracker.update(&world.ctx());
    assert_eq!(
        valid_names(&tracker),
        vec!["night forest", "night", "nether", "caves"]
    );
}

#[test]
fn broken_entry_keeps_diagnostics_and_never_plays() {
    let (registry, mut tracker) = load();
    let broken = tracker
        .loaded_entries()
        .iter()
        .find(|e| e.name == "broken")
        .expect("broken entry");
    assert_eq!(broken.errors.len(), 2);
    assert!(broken.conditions.is_empty());

    let mut world = World::new(&registry);
    for name in ["NIGHT", "BOSS", "GENERIC"] {
        world.set(&registry, name, true);
    }
    tracker.update(&world.ctx());
    assert!(!valid_names(&tracker).contains(&"broken"));
}

#[test]
fn zone_restricted_entry_needs_its_zone() {
    let (registry, mut tracker) = load();
    let mut world = World::new(&registry);
    world.set(&registry, "GENERIC", true);

    tracker.update(&world.ctx());
    assert!(!valid_names(&tracker).contains(&"arena"));

    world.zones.insert("arena".into());
    let t = tracker.update(&world.ctx());
    assert_eq!(t.became_valid, vec![EntryIndex(5)]);
}

#[test]
fn transitions_report_each_change_once() {
    let (registry, mut tracker) = load();
    let mut world = World::new(&registry);

    world.set(&registry, "BOSS", true);
    let t = tracker.update(&world.ctx());
    assert_eq!(t.became_valid, vec![EntryIndex(0)]);
    assert!(tracker.update(&world.ctx()).is_empty());

    world.set(&registry, "BOSS", false);
    let t = tracker.update(&world.ctx());
    assert_eq!(t.became_invalid, vec![EntryIndex(0)]);
    assert!(tracker.update(&world.ctx()).is_empty());
}

// ---------------------------------------------------------------------------
// Selection on top of evaluation
// ---------------------------------------------------------------------------

#[test]
fn selection_falls_back_then_repeats() {
    let (registry, mut tracker) = load();
    let mut world = World::new(&registry);
    world.set(&registry, "NIGHT", true);
    world.tags.set(BiomeTag::new("c:is_forest"), true);
    tracker.update(&world.ctx());

    let mut selector = SongSelector::with_seed(8, 99);
    let valid = tracker.valid_entries();
    let primary = valid[0];
    assert_eq!(primary.name, "night forest");

    let first = selector
        .pick_random_song(selector.selected_songs(primary, &valid))
        .expect("song");
    assert_eq!(first, "forest_night");

    // forest_night is now recent; fall through to the plain night entry.
    let songs = selector.selected_songs(primary, &valid).to_vec();
    assert_eq!(songs, vec!["night_1".to_string(), "night_2".to_string()]);
    let second = selector.pick_random_song(&songs).expect("song");
    let third = selector.pick_random_song(&songs).expect("song");
    assert_ne!(second, third, "fresh songs are preferred");

    // Everything recent: back to the primary's list.
    assert_eq!(selector.selected_songs(primary, &valid), &["forest_night".to_string()][..]);
}

#[test]
fn no_fallback_entry_repeats_its_own_songs() {
    let (registry, mut tracker) = load();
    let mut world = World::new(&registry);
    world.set(&registry, "BOSS", true);
    world.set(&registry, "NIGHT", true);
    tracker.update(&world.ctx());

    let valid = tracker.valid_entries();
    let boss = valid[0];
    let mut selector = SongSelector::with_seed(8, 1);
    for _ in 0..4 {
        let songs = selector.selected_songs(boss, &valid).to_vec();
        let song = selector.pick_random_song(&songs).expect("song");
        assert!(song.starts_with("boss_"));
    }
}

#[test]
fn config_drives_selector_capacity_and_legacy_tags() {
    let config = MusicConfig::from_toml(
        "[selection]\nrecency_capacity = 2\nseed = 5\n[songpack]\nlegacy_biome_tags = true\n",
    )
    .expect("config");
    let registry = EventRegistry::with_builtin_events();
    let pack = Songpack::from_toml("[[entries]]\nevents = [\"biome=forest\"]\nsongs = [\"a\"]\n")
        .expect("pack");
    let entries = pack.compile(
        &registry,
        &BiomeTagTable::conventional(),
        config.songpack.legacy_biome_tags,
    );
    assert_eq!(entries[0].conditions[0].biome_tags, vec![BiomeTag::new("c:is_forest")]);

    let mut selector = SongSelector::with_seed(
        config.selection.recency_capacity,
        config.selection.seed.unwrap_or_default(),
    );
    for song in ["a", "b", "c"] {
        selector.history_mut().push(song.into());
    }
    assert_eq!(selector.history().iter().collect::<Vec<_>>(), vec!["b", "c"]);
}
