// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the playback timeline.

use std::fmt;
use thiserror::Error;

/// Which notification set an observer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    /// Cursor-changed listeners
    Cursor,
    /// Direction-changed listeners
    Direction,
}

impl fmt::Display for ObserverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObserverKind::Cursor => f.write_str("cursor"),
            ObserverKind::Direction => f.write_str("direction"),
        }
    }
}

/// Playback errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// The same observer was registered twice for one event type
    #[error("Observer is already registered for {0} notifications")]
    DuplicateRegistration(ObserverKind),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Configuration and timeline construction errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid RON for the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Writing the configuration failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Tempo must be finite and positive
    #[error("Invalid tempo {0}: must be finite and greater than zero")]
    InvalidTempo(f64),

    /// Frame rate must be finite and positive
    #[error("Invalid frame rate {0}: must be finite and greater than zero")]
    InvalidFrameRate(f64),

    /// Move durations must be finite and non-negative
    #[error("Invalid duration {duration} for move {index}")]
    InvalidMoveDuration {
        /// Index of the offending move
        index: usize,
        /// The rejected duration
        duration: f64,
    },
}
