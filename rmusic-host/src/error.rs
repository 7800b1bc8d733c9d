//! Host error types.

use rmusic_core::SongpackError;
use thiserror::Error;

/// A fact producer could not compute its facts this tick.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// An event the producer writes is not registered.
    #[error("Producer event not registered: {0}")]
    MissingEvent(String),

    /// The world sample lacks data the producer needs.
    #[error("World sample incomplete: {0}")]
    IncompleteSample(String),

    /// Anything else the producer wants to report.
    #[error("{0}")]
    Other(String),
}

/// Errors that can occur while setting up or running the host layer.
#[derive(Debug, Error)]
pub enum HostError {
    /// A producer failed; carries the producer id.
    #[error("Fact producer '{producer}' failed: {source}")]
    Producer {
        /// Id of the failing producer.
        producer: String,
        /// Underlying failure.
        #[source]
        source: ProducerError,
    },

    /// Songpack, registry or configuration error from the core engine.
    #[error(transparent)]
    Songpack(#[from] SongpackError),

    /// Logging could not be initialised.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, HostError>;
