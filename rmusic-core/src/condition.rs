//! Condition evaluation.
//!
//! A [`Condition`] is one OR-group of predicates. Inside a condition the five
//! predicate categories are OR-ed: the condition holds as soon as any listed
//! predicate of any category holds. An entry's conditions are AND-ed, and the
//! `zones` option is applied afterwards as one more AND filter.
//!
//! ```text
//! entry valid = C1 && C2 && ... && zone_filter
//! Ci          = any(events) || any(blocks) || any(biomes) || any(tags) || any(dims)
//! ```

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::biome_tags::{BiomeTag, BiomeTagFacts};
use crate::entry::RuntimeEntry;
use crate::event::EventId;
use crate::facts::FactSnapshot;

/// "At least `count` blocks whose id contains `block`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRequirement {
    /// Substring matched against block ids.
    pub block: String,
    /// Minimum cached count.
    pub count: u32,
}

impl BlockRequirement {
    /// Create a requirement.
    #[must_use]
    pub fn new(block: impl Into<String>, count: u32) -> Self {
        Self {
            block: block.into(),
            count,
        }
    }

    /// Whether any cached block id containing the substring meets the count.
    ///
    /// Containment, not equality: `minecraft:stone` also matches
    /// `minecraft:stone_bricks`.
    #[must_use]
    pub fn is_met(&self, block_counts: &HashMap<String, u32>) -> bool {
        block_counts
            .iter()
            .any(|(id, n)| id.contains(self.block.as_str()) && *n >= self.count)
    }
}

/// One OR-group of predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    /// Songpack events, true if any reads true.
    pub songpack_events: Vec<EventId>,
    /// Block-count thresholds.
    pub blocks: Vec<BlockRequirement>,
    /// Substrings of the current biome name.
    pub biome_types: Vec<String>,
    /// Biome tags.
    pub biome_tags: Vec<BiomeTag>,
    /// Substrings of the current dimension name.
    pub dim_types: Vec<String>,
}

impl Condition {
    /// Whether every predicate list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songpack_events.is_empty()
            && self.blocks.is_empty()
            && self.biome_types.is_empty()
            && self.biome_tags.is_empty()
            && self.dim_types.is_empty()
    }

    /// Evaluate against the current tick state. Empty lists never hold.
    #[must_use]
    pub fn is_satisfied(&self, ctx: &EvalContext<'_>) -> bool {
        self.any_event(ctx.facts)
            || self.blocks.iter().any(|b| b.is_met(ctx.block_counts))
            || self
                .biome_types
                .iter()
                .any(|b| ctx.biome.contains(b.as_str()))
            || self.biome_tags.iter().any(|t| ctx.biome_tags.is_active(t))
            || self
                .dim_types
                .iter()
                .any(|d| ctx.dimension.contains(d.as_str()))
    }

    fn any_event(&self, facts: &FactSnapshot) -> bool {
        self.songpack_events.iter().any(|id| {
            if !facts.contains(*id) {
                debug!(event = %id, "Skipping event missing from fact snapshot");
                return false;
            }
            facts.get(*id)
        })
    }
}

/// Everything the evaluator reads for one tick.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// Songpack event values.
    pub facts: &'a FactSnapshot,
    /// Current biome name, e.g. `minecraft:dark_forest`.
    pub biome: &'a str,
    /// Current dimension name, e.g. `minecraft:the_nether`.
    pub dimension: &'a str,
    /// Cached block id → count around the subject.
    pub block_counts: &'a HashMap<String, u32>,
    /// Active biome tags.
    pub biome_tags: &'a BiomeTagFacts,
    /// Names of the zones currently containing the subject.
    pub zones: &'a HashSet<String>,
}

/// Whether an entry is currently valid.
///
/// All conditions must hold (short-circuiting on the first miss), then the
/// `zones` option, if present and non-empty, must share a name with the
/// subject's current zones. An entry without conditions is never valid.
#[must_use]
pub fn evaluate_entry(entry: &RuntimeEntry, ctx: &EvalContext<'_>) -> bool {
    if entry.conditions.is_empty() {
        return false;
    }
    if !entry.conditions.iter().all(|c| c.is_satisfied(ctx)) {
        return false;
    }
    zone_filter_passes(entry, ctx.zones)
}

fn zone_filter_passes(entry: &RuntimeEntry, zones: &HashSet<String>) -> bool {
    match entry.options.zones() {
        Some(required) if !required.is_empty() => {
            required.iter().any(|name| zones.contains(name))
        }
        _ => true,
    }
}
