//! Biome tag table and per-tick biome tag facts.
//!
//! Songpacks refer to biome tags by loose names (`biometag=is_forest`,
//! `biometag=forest`, `biometag=tree_coniferous`). The table maps normalized
//! names to tag identifiers; it is declared statically and extended by the
//! host when it knows about more tags.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefixes dropped from tag names before comparison.
const STRIPPED_PREFIXES: &[&str] = &["is_", "in_", "climate_"];

/// Old tag spellings still found in songpacks.
const LEGACY_RENAMES: &[(&str, &str)] = &[("tree_coniferous", "coniferous_tree")];

/// Conventional biome tags known out of the box.
const CONVENTIONAL_TAGS: &[&str] = &[
    "c:is_hot",
    "c:is_temperate",
    "c:is_cold",
    "c:is_wet",
    "c:is_dry",
    "c:is_sparse_vegetation",
    "c:is_dense_vegetation",
    "c:is_coniferous_tree",
    "c:is_savanna_tree",
    "c:is_jungle_tree",
    "c:is_deciduous_tree",
    "c:is_mountain",
    "c:is_mountain_peak",
    "c:is_mountain_slope",
    "c:is_plains",
    "c:is_snowy_plains",
    "c:is_forest",
    "c:is_birch_forest",
    "c:is_flower_forest",
    "c:is_taiga",
    "c:is_old_growth",
    "c:is_hill",
    "c:is_windswept",
    "c:is_jungle",
    "c:is_savanna",
    "c:is_swamp",
    "c:is_desert",
    "c:is_badlands",
    "c:is_beach",
    "c:is_stony_shores",
    "c:is_mushroom",
    "c:is_river",
    "c:is_ocean",
    "c:is_deep_ocean",
    "c:is_shallow_ocean",
    "c:is_underground",
    "c:is_cave",
    "c:is_lush",
    "c:is_magical",
    "c:is_rare",
    "c:is_plateau",
    "c:is_spooky",
    "c:is_void",
    "c:is_aquatic",
    "c:is_aquatic_icy",
    "c:is_icy",
    "c:is_snowy",
    "c:is_floral",
    "c:is_dead",
    "c:is_overworld",
    "c:is_nether",
    "c:is_end",
    "c:is_nether_forest",
    "c:is_outer_end_island",
];

/// Identifier of a biome tag, e.g. `c:is_forest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BiomeTag(pub String);

impl BiomeTag {
    /// Create a tag from its identifier.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// The path part of the identifier (after the namespace, if any).
    #[must_use]
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, path)| path)
    }
}

impl fmt::Display for BiomeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a tag name for comparison.
///
/// Lower-cases, strips one `is_` / `in_` / `climate_` prefix and applies the
/// legacy renames.
#[must_use]
pub fn normalize_tag_name(name: &str) -> String {
    let mut name = name.trim().to_lowercase();
    if let Some(stripped) = STRIPPED_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
    {
        name = stripped.to_string();
    }
    for (old, new) in LEGACY_RENAMES {
        if name == *old {
            name = (*new).to_string();
        }
    }
    name
}

/// Normalized tag name → tag identifier.
#[derive(Debug, Clone, Default)]
pub struct BiomeTagTable {
    tags: HashMap<String, BiomeTag>,
}

impl BiomeTagTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the conventional `c:is_*` tags.
    #[must_use]
    pub fn conventional() -> Self {
        let mut table = Self::new();
        for identifier in CONVENTIONAL_TAGS {
            table.insert(BiomeTag::new(*identifier));
        }
        table
    }

    /// Add a tag, keyed by the normalized form of its path.
    pub fn insert(&mut self, tag: BiomeTag) {
        let key = normalize_tag_name(tag.path());
        self.tags.insert(key, tag);
    }

    /// Add a tag under an explicit name.
    pub fn insert_named(&mut self, name: &str, tag: BiomeTag) {
        self.tags.insert(normalize_tag_name(name), tag);
    }

    /// Look up a songpack tag name. Exact match after normalization.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&BiomeTag> {
        self.tags.get(&normalize_tag_name(name))
    }

    /// Number of known tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Which biome tags apply at the subject's position this tick.
#[derive(Debug, Clone, Default)]
pub struct BiomeTagFacts {
    values: HashMap<BiomeTag, bool>,
}

impl BiomeTagFacts {
    /// No tags active.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one tag.
    pub fn set(&mut self, tag: BiomeTag, active: bool) {
        self.values.insert(tag, active);
    }

    /// Whether a tag is active. Absent reads as `false`.
    #[must_use]
    pub fn is_active(&self, tag: &BiomeTag) -> bool {
        self.values.get(tag).copied().unwrap_or(false)
    }

    /// Mark every tag inactive.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl FromIterator<BiomeTag> for BiomeTagFacts {
    fn from_iter<I: IntoIterator<Item = BiomeTag>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|t| (t, true)).collect(),
        }
    }
}
