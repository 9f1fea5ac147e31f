//! Error types for the proctor-detect crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Core(#[from] proctor_core::ProctorError),
}

pub type Result<T> = std::result::Result<T, DetectError>;
