//! Songpack event registry.
//!
//! A songpack event is a named boolean fact ("NIGHT", "RAIN", ...) owned by
//! the fact producer that declared it. Records are registered once at startup
//! and live for the whole session; the registry is append-only.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SongpackError};

/// Owner id used for the events every host is expected to provide.
pub const CORE_OWNER: &str = "reactivemusic";

/// Names of the core songpack events, registered by [`register_builtin_events`].
pub const BUILTIN_EVENTS: &[&str] = &[
    "MAIN_MENU",
    "CREDITS",
    "GENERIC",
    "DAY",
    "NIGHT",
    "SUNRISE",
    "SUNSET",
    "RAIN",
    "SNOW",
    "STORM",
    "UNDERWATER",
    "UNDERGROUND",
    "DEEP_UNDERGROUND",
    "HIGH_UP",
    "MINECART",
    "BOAT",
    "HORSE",
    "PIG",
    "ELYTRA",
    "FISHING",
    "DYING",
    "BOSS",
    "NEARBY_MOBS",
    "VILLAGE",
    "HOME",
];

/// Dense handle to a registered event, valid for the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered songpack event. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Registry handle.
    pub id: EventId,
    /// Id of the plugin / fact producer that owns this event.
    pub owner: String,
    /// Upper-cased event name.
    pub name: String,
}

impl EventRecord {
    /// The `owner:NAME` identifier used for lookups.
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.owner, self.name)
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner, self.name)
    }
}

/// Process-wide table of songpack events.
///
/// Constructed once at startup and handed by reference to producers, the
/// parser and the fact snapshot.
#[derive(Debug, Default)]
pub struct EventRegistry {
    records: Vec<EventRecord>,
    by_identifier: HashMap<String, EventId>,
}

impl EventRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with [`BUILTIN_EVENTS`].
    #[must_use]
    pub fn with_builtin_events() -> Self {
        let mut registry = Self::new();
        register_builtin_events(&mut registry);
        registry
    }

    /// Register a new event under `owner`. The name is upper-cased.
    ///
    /// # Errors
    /// Returns [`SongpackError::DuplicateEvent`] if `owner:NAME` already exists.
    pub fn register(&mut self, owner: &str, name: &str) -> Result<EventId> {
        let name = name.trim().to_uppercase();
        let identifier = format!("{owner}:{name}");
        if self.by_identifier.contains_key(&identifier) {
            return Err(SongpackError::DuplicateEvent { identifier });
        }

        let id = EventId(self.records.len() as u32);
        self.records.push(EventRecord {
            id,
            owner: owner.to_string(),
            name,
        });
        self.by_identifier.insert(identifier, id);
        Ok(id)
    }

    /// Exact, case-sensitive lookup by `owner:NAME`.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&EventRecord> {
        self.by_identifier
            .get(identifier)
            .and_then(|id| self.record(*id))
    }

    /// Look up `owner:NAME` and return the handle.
    ///
    /// # Errors
    /// Returns [`SongpackError::UnknownEvent`] if nothing is registered under it.
    pub fn require(&self, identifier: &str) -> Result<EventId> {
        self.get(identifier)
            .map(|r| r.id)
            .ok_or_else(|| SongpackError::UnknownEvent(identifier.to_string()))
    }

    /// Record for a handle.
    #[must_use]
    pub fn record(&self, id: EventId) -> Option<&EventRecord> {
        self.records.get(id.0 as usize)
    }

    /// Case-insensitive resolution used by the rule parser.
    ///
    /// Accepts either `owner:name` or a bare name; a bare name resolves to
    /// the first record registered under that name.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<EventId> {
        let token = token.trim();
        if let Some((owner, name)) = token.split_once(':') {
            return self
                .records
                .iter()
                .find(|r| r.owner.eq_ignore_ascii_case(owner) && r.name.eq_ignore_ascii_case(name))
                .map(|r| r.id);
        }
        self.records
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(token))
            .map(|r| r.id)
    }

    /// All records in registration order.
    pub fn values(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Number of registered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no events are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Register the core event names under [`CORE_OWNER`].
///
/// Names already present are left alone, so calling this twice is harmless.
pub fn register_builtin_events(registry: &mut EventRegistry) {
    for name in BUILTIN_EVENTS {
        // Only DuplicateEvent can come back here.
        let _ = registry.register(CORE_OWNER, name);
    }
}

/// `reactivemusic:NAME` identifier for a builtin event.
#[must_use]
pub fn builtin_identifier(name: &str) -> String {
    format!("{CORE_OWNER}:{}", name.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_uppercases_and_is_enumerable() {
        let mut registry = EventRegistry::new();
        let id = registry.register("zones", "arena_fight").expect("register");
        let record = registry.record(id).expect("record");
        assert_eq!(record.name, "ARENA_FIGHT");
        assert_eq!(record.identifier(), "zones:ARENA_FIGHT");
        assert_eq!(registry.values().count(), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = EventRegistry::new();
        registry.register("weather", "RAIN").expect("first");
        let err = registry.register("weather", "rain").expect_err("duplicate");
        assert!(matches!(err, SongpackError::DuplicateEvent { .. }));
        // Same name under another owner is a different event.
        assert!(registry.register("other", "RAIN").is_ok());
    }

    #[test]
    fn get_is_exact_and_case_sensitive() {
        let mut registry = EventRegistry::new();
        registry.register("weather", "RAIN").expect("register");
        assert!(registry.get("weather:RAIN").is_some());
        assert!(registry.get("weather:rain").is_none());
        assert!(registry.get("RAIN").is_none());
    }

    #[test]
    fn resolve_accepts_bare_and_qualified_names() {
        let registry = EventRegistry::with_builtin_events();
        let night = registry.resolve("night").expect("bare");
        assert_eq!(registry.resolve("ReactiveMusic:Night"), Some(night));
        assert_eq!(registry.resolve("nope"), None);
    }

    #[test]
    fn builtin_registration_is_repeatable() {
        let mut registry = EventRegistry::with_builtin_events();
        register_builtin_events(&mut registry);
        assert_eq!(registry.len(), BUILTIN_EVENTS.len());
        assert!(registry.get(&builtin_identifier("night")).is_some());
    }
}
