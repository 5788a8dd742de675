//! Error types for tempokit operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid granularity: {0} (must be at least 1 minute)")]
    InvalidGranularity(u32),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
