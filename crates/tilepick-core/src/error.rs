//! Error types for tilepick.

use thiserror::Error;

/// Errors raised while configuring the picking subsystem.
///
/// Nothing inside a pick pass returns an error: misses, stale indices and
/// failed readbacks all resolve to an empty result instead.
#[derive(Error, Debug)]
pub enum PickError {
    /// The offscreen target would have no pixels.
    #[error("invalid pick target size {width}x{height}")]
    InvalidTargetSize { width: u32, height: u32 },

    /// A configuration value is out of range.
    #[error("invalid pick options: {0}")]
    InvalidConfig(String),

    /// A feature mesh holds more features than a pick color can address.
    #[error("too many features in one item: limit is {limit}")]
    TooManyFeatures { limit: usize },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tilepick operations.
pub type Result<T> = std::result::Result<T, PickError>;
