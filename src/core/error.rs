//! Error types for the streaming controller

use thiserror::Error;

/// Main error type for the controller
#[derive(Debug, Error)]
pub enum Error {
    /// A catalog or object was used before its one-time setup completed.
    #[error("'{0}' has no loaded level yet")]
    Uninitialized(String),

    /// Level index outside the object's level table. Signals a scheduling
    /// bug at the call site; never clamped.
    #[error("level {level} out of range for '{object}' ({count} levels)")]
    LevelOutOfRange {
        object: String,
        level: usize,
        count: usize,
    },

    /// The level was already requested or loaded. Two scheduling passes
    /// picked the same candidate.
    #[error("level {level} of '{object}' already requested")]
    AlreadyRequested { object: String, level: usize },

    /// Network/disk fetch failed. The level stays marked requested.
    #[error("fetch failed for '{object}' level {level}: {source}")]
    Fetch {
        object: String,
        level: usize,
        #[source]
        source: std::io::Error,
    },

    /// Decoding the fetched bytes failed. The level stays marked requested.
    #[error("decode failed for '{object}' level {level}: {reason}")]
    Decode {
        object: String,
        level: usize,
        reason: String,
    },

    /// Scene manifest could not be read or parsed.
    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
