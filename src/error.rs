//! Error types for mdconceal

use thiserror::Error;

/// Result type alias for mdconceal operations
pub type Result<T> = std::result::Result<T, ConcealError>;

/// Errors raised while scanning a document or loading settings
#[derive(Error, Debug)]
pub enum ConcealError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] fancy_regex::Error),

    #[error("Invalid line pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Offset {offset} is outside the document (length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("Line {line} is outside the document ({count} lines)")]
    LineOutOfRange { line: usize, count: usize },

    #[error("{0}")]
    Message(String),
}
