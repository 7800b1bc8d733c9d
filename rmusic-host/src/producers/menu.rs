//! Screen facts: main menu, credits and the always-on GENERIC event.

use rmusic_core::event::{EventId, EventRegistry};
use rmusic_core::facts::FactSnapshot;

use crate::error::ProducerError;
use crate::producer::{FactProducer, builtin_event};
use crate::sample::{Screen, WorldSample};

/// Screen state: title menu, credits, or in a world (`GENERIC`).
#[derive(Debug, Clone)]
pub struct MenuProducer {
    main_menu: EventId,
    credits: EventId,
    generic: EventId,
}

impl MenuProducer {
    /// Resolve the events this producer writes.
    ///
    /// # Errors
    /// Returns [`ProducerError::MissingEvent`] if a core event is missing.
    pub fn new(registry: &EventRegistry) -> Result<Self, ProducerError> {
        Ok(Self {
            main_menu: builtin_event(registry, "MAIN_MENU")?,
            credits: builtin_event(registry, "CREDITS")?,
            generic: builtin_event(registry, "GENERIC")?,
        })
    }
}

impl FactProducer for MenuProducer {
    fn id(&self) -> &str {
        "menu"
    }

    fn produce(&mut self, sample: &WorldSample, facts: &mut FactSnapshot) -> Result<(), ProducerError> {
        let screen = sample.game.screen;
        facts.set(self.main_menu, screen == Screen::MainMenu);
        facts.set(self.credits, screen == Screen::Credits);
        facts.set(self.generic, screen == Screen::InGame);
        Ok(())
    }
}
