//! Error types for the songpack engine.

use thiserror::Error;

/// Top-level error type for songpack operations.
///
/// Rule syntax problems are not errors at this level: they are collected as
/// [`RuleParseError`](crate::parser::RuleParseError) diagnostics on each entry.
#[derive(Error, Debug)]
pub enum SongpackError {
    /// An event with the same `owner:NAME` identifier was already registered.
    #[error("Songpack event already registered: {identifier}")]
    DuplicateEvent {
        /// The conflicting identifier.
        identifier: String,
    },

    /// An event identifier was looked up but never registered.
    #[error("Unknown songpack event: {0}")]
    UnknownEvent(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Songpack manifest could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, SongpackError>;
