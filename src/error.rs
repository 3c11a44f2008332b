//! Error types for filter construction, persistence and lookups.

use thiserror::Error;

/// Errors surfaced by the library API.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// Bad sizing parameters (capacity, false positive probability,
    /// minimum prefix length).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A serialized filter could not be decoded.
    #[error("corrupt filter data: {0}")]
    CorruptFilterData(String),

    /// Caller broke a lookup precondition (empty prefix, reserved terminator).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SuggestError>;
