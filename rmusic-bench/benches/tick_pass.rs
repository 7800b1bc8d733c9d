//! Reactive Music Benchmark Suite
//!
//! Per-tick costs that run on the client thread:
//!   evaluate_200_entries ........ one full valid-set recomputation
//!   parse_songpack_200_entries .. songpack compile at load time
//!   pick_song_with_fallback ..... selection over a stale primary
//!   director_tick_full .......... drain + producers + evaluate + playback

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use rmusic_core::biome_tags::{BiomeTag, BiomeTagTable};
use rmusic_core::config::MusicConfig;
use rmusic_core::entry::RuntimeEntry;
use rmusic_core::event::EventRegistry;
use rmusic_core::facts::FactSnapshot;
use rmusic_core::selector::SongSelector;
use rmusic_core::songpack::{EntryDef, Songpack};
use rmusic_core::tracker::EntryTracker;
use rmusic_host::sample::WorldSample;
use rmusic_host::{MusicDirector, SilentPlayer};

const RULES: &[&str] = &[
    "night || sunset",
    "biometag=forest || biome=taiga",
    "block=minecraft:stone,12 || underground",
    "dim=nether",
    "rain || storm || snow",
    "boss",
];

fn make_songpack(entries: usize) -> Songpack {
    let entries = (0..entries)
        .map(|i| EntryDef {
            name: Some(format!("entry_{i}")),
            events: vec![
                RULES[i % RULES.len()].to_string(),
                RULES[(i / RULES.len()) % RULES.len()].to_string(),
            ],
            songs: (0..4).map(|s| format!("music/song_{i}_{s}")).collect(),
            allow_fallback: true,
            use_overlay: i % 17 == 0,
            stop_music_on_valid: false,
            stop_music_on_invalid: false,
            start_music_on_valid: false,
            force_chance: 1.0,
            options: Default::default(),
        })
        .collect();
    Songpack {
        name: "bench".to_string(),
        entries,
        ..Songpack::default()
    }
}

fn make_sample(tick: u64) -> WorldSample {
    let mut sample = WorldSample::overworld(tick);
    sample.biome = "minecraft:old_growth_spruce_taiga".to_string();
    sample.game.time_of_day = 18_000;
    sample.game.raining = true;
    sample.game.sees_sky = false;
    sample.game.position[1] = 30.0;
    sample.block_counts.insert("minecraft:stone".to_string(), 40);
    sample.block_counts.insert("minecraft:deepslate".to_string(), 10);
    sample.biome_tags.set(BiomeTag::new("c:is_taiga"), true);
    sample
}

fn compile(registry: &EventRegistry, entries: usize) -> Vec<RuntimeEntry> {
    make_songpack(entries).compile(registry, &BiomeTagTable::conventional(), false)
}

/// Benchmark: one valid-set recomputation over 200 entries.
fn bench_evaluate(c: &mut Criterion) {
    let registry = EventRegistry::with_builtin_events();
    let mut tracker = EntryTracker::new(compile(&registry, 200));
    let mut facts = FactSnapshot::from_registry(&registry);
    if let Some(night) = registry.resolve("night") {
        facts.set(night, true);
    }
    let sample = make_sample(1);

    c.bench_function("evaluate_200_entries", |b| {
        b.iter(|| {
            let ctx = sample.eval_context(&facts);
            black_box(tracker.update(black_box(&ctx)));
        });
    });
}

/// Benchmark: compiling a 200-entry songpack.
fn bench_parse(c: &mut Criterion) {
    let registry = EventRegistry::with_builtin_events();
    let tags = BiomeTagTable::conventional();
    let pack = make_songpack(200);

    c.bench_function("parse_songpack_200_entries", |b| {
        b.iter(|| black_box(pack.compile(&registry, &tags, false)));
    });
}

/// Benchmark: selection when the primary's songs are all recent.
fn bench_selection(c: &mut Criterion) {
    let primary = RuntimeEntry::new("primary", vec!["a".into(), "b".into()]);
    let others: Vec<RuntimeEntry> = (0..20)
        .map(|i| RuntimeEntry::new(format!("e{i}"), vec![format!("song_{i}")]))
        .collect();
    let mut valid: Vec<&RuntimeEntry> = vec![&primary];
    valid.extend(others.iter());

    let mut selector = SongSelector::with_seed(8, 42);
    selector.history_mut().push("a".into());
    selector.history_mut().push("b".into());

    c.bench_function("pick_song_with_fallback", |b| {
        b.iter(|| {
            let mut s = selector.clone();
            let songs = s.selected_songs(&primary, &valid);
            black_box(s.pick_random_song(songs));
        });
    });
}

/// Benchmark: full director tick with built-in producers.
fn bench_director_tick(c: &mut Criterion) {
    let registry = EventRegistry::with_builtin_events();
    let mut config = MusicConfig::default();
    config.selection.seed = Some(7);
    let Ok(mut director) = MusicDirector::from_songpack(
        config,
        registry,
        &BiomeTagTable::conventional(),
        &make_songpack(200),
        SilentPlayer,
    ) else {
        return;
    };

    let mut tick = 0u64;
    c.bench_function("director_tick_full", |b| {
        b.iter(|| {
            tick += 1;
            director.tick(black_box(&make_sample(tick)));
        });
    });
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_parse,
    bench_selection,
    bench_director_tick,
);
criterion_main!(benches);
