//! Built-in fact producers for the core songpack events.
//!
//! | Producer                 | Events                                          |
//! |--------------------------|-------------------------------------------------|
//! | [`MenuProducer`]         | MAIN_MENU, CREDITS, GENERIC                     |
//! | [`TimeOfDayProducer`]    | DAY, NIGHT, SUNRISE, SUNSET                     |
//! | [`WeatherProducer`]      | RAIN, SNOW, STORM                               |
//! | [`PositionProducer`]     | UNDERWATER, UNDERGROUND, DEEP_UNDERGROUND, HIGH_UP |
//! | [`ActivityProducer`]     | MINECART, BOAT, HORSE, PIG, ELYTRA, FISHING, DYING |
//! | [`SurroundingsProducer`] | BOSS, NEARBY_MOBS, VILLAGE, HOME                |

mod activity;
mod menu;
mod position;
mod surroundings;
mod time;
mod weather;

pub use activity::ActivityProducer;
pub use menu::MenuProducer;
pub use position::PositionProducer;
pub use surroundings::SurroundingsProducer;
pub use time::TimeOfDayProducer;
pub use weather::WeatherProducer;

use rmusic_core::config::ProducerConfig;
use rmusic_core::event::EventRegistry;

use crate::error::ProducerError;
use crate::producer::ProducerSet;

/// A [`ProducerSet`] holding every built-in producer, in table order.
///
/// # Errors
/// Returns [`ProducerError::MissingEvent`] if the core events are not
/// registered in `registry`.
pub fn default_producers(
    registry: &EventRegistry,
    config: &ProducerConfig,
) -> Result<ProducerSet, ProducerError> {
    let mut set = ProducerSet::new();
    set.add(Box::new(MenuProducer::new(registry)?));
    set.add(Box::new(TimeOfDayProducer::new(registry)?));
    set.add(Box::new(WeatherProducer::new(registry)?));
    set.add(Box::new(PositionProducer::new(registry)?));
    set.add(Box::new(ActivityProducer::new(registry, config)?));
    set.add(Box::new(SurroundingsProducer::new(registry, config)?));
    Ok(set)
}
