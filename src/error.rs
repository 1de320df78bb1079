//! Error types for the group cache

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by groups, the registry and the demo configuration
///
/// The eviction engine and the shared cache never fail; absence is reported
/// through `Option`.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller passed an argument the operation cannot accept (e.g. empty key)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Loader failure, passed through unchanged
    #[error(transparent)]
    Load(anyhow::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source table could not be decoded
    #[error("Failed to parse source table: {0}")]
    Parse(String),
}

impl Error {
    /// Returns true if this error came from a group's loader
    pub fn is_load(&self) -> bool {
        matches!(self, Error::Load(_))
    }
}

// =============================================================================
// Tests
// =============================================================================
