//! Herder error types.

use thiserror::Error;

/// Errors produced by the herder layer.
#[derive(Error, Debug)]
pub enum HerderError {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, HerderError>`.
pub type Result<T> = std::result::Result<T, HerderError>;
