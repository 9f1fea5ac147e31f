//! Common error types for the Proctor platform.

use thiserror::Error;

/// Top-level error type for the Proctor platform.
///
/// The detectors themselves are total functions and never fail; the only
/// caller-visible error condition is malformed input from the external
/// boundary (missing session identifiers, non-finite metrics), rejected
/// before it reaches any detector.
#[derive(Error, Debug)]
pub enum ProctorError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ProctorError>;
