//! FilterFlow error types

use thiserror::Error;

/// FilterFlow error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for FilterFlow operations
pub type Result<T> = std::result::Result<T, Error>;
