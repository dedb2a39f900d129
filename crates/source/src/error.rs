//! Source Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A source error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Implementations translate their transport failures into one of these,
/// keeping the transport error as a child frame where there is one.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote has no such list, page or item.
    #[display("not found")]
    NotFound,
    /// Credentials were rejected or are missing.
    #[display("unauthorised")]
    Unauthorised,
    /// Anything else: network failures, malformed responses, server errors.
    #[display("remote failure: {_0}")]
    Unknown(#[error(not(source))] String),
}

impl ErrorKind {
    pub fn unknown(cause: impl Into<String>) -> Self {
        Self::Unknown(cause.into())
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}
