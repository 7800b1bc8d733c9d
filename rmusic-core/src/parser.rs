//! Songpack rule parser.
//!
//! A rule string is one condition: sections separated by `||`, each section
//! one predicate.
//!
//! | Section                 | Predicate                                  |
//! |-------------------------|--------------------------------------------|
//! | `block=<id>,<count>`    | at least `count` blocks whose id contains `id` |
//! | `biome=<substring>`     | biome name contains `substring`            |
//! | `biometag=<name>`       | biome tag `name` is active                 |
//! | `dim=<substring>`       | dimension name contains `substring`        |
//! | anything else           | a registered songpack event name           |
//!
//! Parsing is best-effort: a bad section is reported and left out, the rest
//! of the rule still counts.

use thiserror::Error;

use crate::biome_tags::BiomeTagTable;
use crate::condition::{BlockRequirement, Condition};
use crate::event::EventRegistry;

/// OR-separator between sections.
pub const OR_SEPARATOR: &str = "||";

const BLOCK_PREFIX: &str = "block=";
const BIOME_PREFIX: &str = "biome=";
const BIOME_TAG_PREFIX: &str = "biometag=";
const DIM_PREFIX: &str = "dim=";

/// A section that could not be turned into a predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    /// `block=` section without a valid `<id>,<count>` payload.
    #[error("Malformed block condition '{section}': expected block=<id>,<count>")]
    MalformedBlock {
        /// The offending section.
        section: String,
    },

    /// `biometag=` name not present in the tag table.
    #[error("Unknown biome tag '{name}' in section '{section}'")]
    UnknownBiomeTag {
        /// Tag name as written.
        name: String,
        /// The offending section.
        section: String,
    },

    /// Section is not a known songpack event.
    #[error("Unknown songpack event '{section}'")]
    UnknownEvent {
        /// The offending section.
        section: String,
    },
}

/// Result of parsing one rule string.
#[derive(Debug, Clone, Default)]
pub struct ParsedRule {
    /// The condition, or `None` if no section produced a predicate.
    pub condition: Option<Condition>,
    /// Problems with individual sections.
    pub errors: Vec<RuleParseError>,
}

/// Parses rule strings against a registry and tag table.
#[derive(Debug, Clone, Copy)]
pub struct RuleParser<'a> {
    registry: &'a EventRegistry,
    tags: &'a BiomeTagTable,
    legacy_biome_tags: bool,
}

impl<'a> RuleParser<'a> {
    /// Create a parser.
    #[must_use]
    pub fn new(registry: &'a EventRegistry, tags: &'a BiomeTagTable) -> Self {
        Self {
            registry,
            tags,
            legacy_biome_tags: false,
        }
    }

    /// Treat `biome=<name>` as `biometag=<name>` first, falling back to a
    /// biome-name substring when no tag matches. Old songpacks wrote tags
    /// that way.
    #[must_use]
    pub fn legacy_biome_tags(mut self, enabled: bool) -> Self {
        self.legacy_biome_tags = enabled;
        self
    }

    /// Parse one rule string. Never fails; see [`ParsedRule::errors`].
    #[must_use]
    pub fn parse(&self, rule: &str) -> ParsedRule {
        let mut condition = Condition::default();
        let mut errors = Vec::new();

        for raw in rule.split(OR_SEPARATOR) {
            let section = normalize_section(raw);
            if section.is_empty() {
                continue;
            }
            if let Err(e) = self.parse_section(&section, &mut condition) {
                errors.push(e);
            }
        }

        ParsedRule {
            condition: (!condition.is_empty()).then_some(condition),
            errors,
        }
    }

    fn parse_section(&self, section: &str, condition: &mut Condition) -> Result<(), RuleParseError> {
        if let Some(payload) = section.strip_prefix(BLOCK_PREFIX) {
            let requirement = parse_block(payload).ok_or_else(|| RuleParseError::MalformedBlock {
                section: section.to_string(),
            })?;
            condition.blocks.push(requirement);
        } else if let Some(name) = section.strip_prefix(BIOME_TAG_PREFIX) {
            let tag = self
                .tags
                .lookup(name)
                .ok_or_else(|| RuleParseError::UnknownBiomeTag {
                    name: name.to_string(),
                    section: section.to_string(),
                })?;
            condition.biome_tags.push(tag.clone());
        } else if let Some(biome) = section.strip_prefix(BIOME_PREFIX) {
            if biome.is_empty() {
                return Ok(());
            }
            if self.legacy_biome_tags {
                if let Some(tag) = self.tags.lookup(biome) {
                    condition.biome_tags.push(tag.clone());
                    return Ok(());
                }
            }
            condition.biome_types.push(biome.to_string());
        } else if let Some(dim) = section.strip_prefix(DIM_PREFIX) {
            if !dim.is_empty() {
                condition.dim_types.push(dim.to_string());
            }
        } else {
            let id = self
                .registry
                .resolve(section)
                .ok_or_else(|| RuleParseError::UnknownEvent {
                    section: section.to_string(),
                })?;
            condition.songpack_events.push(id);
        }
        Ok(())
    }
}

/// Strip all whitespace and lower-case.
fn normalize_section(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// `<id>,<count>` with a non-empty id and an all-digit count.
fn parse_block(payload: &str) -> Option<BlockRequirement> {
    let (block, count) = payload.rsplit_once(',')?;
    if block.is_empty() || count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let count = count.parse::<u32>().ok()?;
    Some(BlockRequirement::new(block, count))
}
