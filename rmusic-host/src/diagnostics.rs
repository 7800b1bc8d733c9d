//! Plain-text reports for command handlers and debug overlays.

use std::fmt::Write as _;

use rmusic_core::entry::RuntimeEntry;
use rmusic_core::event::EventRegistry;
use rmusic_core::facts::FactSnapshot;

use crate::director::MusicDirector;
use crate::player::MusicPlayer;

/// One entry: validity, songs and any rule errors.
#[must_use]
pub fn entry_report(entry: &RuntimeEntry, valid: bool) -> String {
    let mut out = String::new();
    let marker = if valid { "+" } else { "-" };
    let _ = writeln!(out, "[{marker}] {}", entry.name);
    let _ = writeln!(out, "    songs: {}", entry.songs.join(", "));
    if entry.flags.should_overlay {
        let _ = writeln!(out, "    overlay");
    }
    if let Some(zones) = entry.options.zones() {
        let _ = writeln!(out, "    zones: {}", zones.join(", "));
    }
    for error in &entry.errors {
        let _ = writeln!(out, "    error: {error}");
    }
    out
}

/// Names of the facts currently `true`, as `owner:NAME`.
#[must_use]
pub fn active_facts(registry: &EventRegistry, facts: &FactSnapshot) -> Vec<String> {
    facts
        .active()
        .into_iter()
        .filter_map(|id| registry.record(id))
        .map(ToString::to_string)
        .collect()
}

/// Director status: current entry and song, valid entries, recent songs and
/// active facts.
#[must_use]
pub fn status_report<P: MusicPlayer>(director: &MusicDirector<P>) -> String {
    let mut out = String::new();
    let none = "none";

    let _ = writeln!(
        out,
        "current entry: {}",
        director.current_entry().map_or(none, |e| e.name.as_str())
    );
    let _ = writeln!(out, "current song: {}", director.current_song().unwrap_or(none));
    if let Some(overlay) = director.overlay_entry() {
        let _ = writeln!(
            out,
            "overlay: {} ({})",
            overlay.name,
            director.overlay_song().unwrap_or(none)
        );
    }

    let valid = director.valid_entries();
    let _ = writeln!(out, "valid entries ({}/{}):", valid.len(), director.loaded_entries().len());
    for entry in &valid {
        let _ = writeln!(out, "  {}", entry.name);
    }

    let _ = writeln!(out, "recent songs: {}", director.recent_songs().join(", "));
    let _ = writeln!(
        out,
        "active facts: {}",
        active_facts(director.registry(), director.facts()).join(", ")
    );
    out
}

#[cfg(test)]
mod tests {
    use rmusic_core::entry::{OptionValue, ZONES_OPTION};
    use rmusic_core::parser::RuleParseError;

    use super::*;

    #[test]
    fn entry_report_lists_errors_and_zones() {
        let mut entry = RuntimeEntry::new("arena", vec!["a".into(), "b".into()])
            .with_option(ZONES_OPTION, OptionValue::Text("pit".into()));
        entry.errors.push(RuleParseError::UnknownEvent { section: "bogus".into() });

        let report = entry_report(&entry, false);
        assert!(report.starts_with("[-] arena"));
        assert!(report.contains("songs: a, b"));
        assert!(report.contains("zones: pit"));
        assert!(report.contains("bogus"));
    }

    #[test]
    fn active_facts_are_named() {
        let mut registry = EventRegistry::new();
        let rain = registry.register("weather", "rain").expect("register");
        let mut facts = FactSnapshot::from_registry(&registry);
        facts.set(rain, true);
        assert_eq!(active_facts(&registry, &facts), vec!["weather:RAIN".to_string()]);
    }
}
