//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the store and the remote
//! collaborators are never flattened: they stay in the tree as children of
//! the pipeline error.

use derive_more::{Display, Error};
use reel_cache::error::Error as CacheError;
use reel_source::error::{Error as SourceError, ErrorKind as SourceErrorKind};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// What a caller of the pipeline can tell its user.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested list or page doesn't exist remotely.
    #[display("not found")]
    NotFound,
    /// Credentials were rejected; retrying won't help until they change.
    #[display("unauthorised")]
    Unauthorised,
    /// Anything else. The cause is the child of this error.
    #[display("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Convert a remote error, keeping it as a child of the error tree.
    #[track_caller]
    pub fn source(err: SourceError) -> Error {
        let kind = match &*err {
            SourceErrorKind::NotFound => Self::NotFound,
            SourceErrorKind::Unauthorised => Self::Unauthorised,
            SourceErrorKind::Unknown(_) => Self::Unknown,
        };
        err.raise(kind)
    }

    /// Convert a local store error. The store is not the caller's concern, so
    /// every store failure is unknown to them.
    #[track_caller]
    pub fn cache(err: CacheError) -> Error {
        err.raise(Self::Unknown)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_cache::error::ErrorKind as CacheErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case(SourceErrorKind::NotFound, ErrorKind::NotFound)]
    #[case(SourceErrorKind::Unauthorised, ErrorKind::Unauthorised)]
    #[case(SourceErrorKind::unknown("connection reset"), ErrorKind::Unknown)]
    fn test_source_mapping(#[case] input: SourceErrorKind, #[case] expected: ErrorKind) {
        let err = ErrorKind::source(exn::Exn::from(input));
        assert_eq!(*err, expected);
    }

    #[test]
    fn test_unknown_keeps_its_cause() {
        let err = ErrorKind::source(exn::Exn::from(SourceErrorKind::unknown("connection reset")));
        assert!(format!("{err:?}").contains("connection reset"));
    }

    #[test]
    fn test_cache_errors_are_unknown() {
        let err = ErrorKind::cache(exn::Exn::from(CacheErrorKind::InvalidData("items")));
        assert_eq!(*err, ErrorKind::Unknown);
        assert!(format!("{err:?}").contains("invalid cache data: items"));
    }

    #[test]
    fn test_only_unknown_is_retryable() {
        assert!(ErrorKind::Unknown.is_retryable());
        assert!(!ErrorKind::Unauthorised.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
    }
}
