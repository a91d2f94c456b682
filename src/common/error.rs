//! Error handling for the opal execution core

use thiserror::Error;

/// Main error type for opal operations
#[derive(Error, Debug)]
pub enum OpalError {
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid type: {0}")]
    InvalidType(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for opal operations
pub type OpalResult<T> = std::result::Result<T, OpalError>;
