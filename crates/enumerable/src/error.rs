//! Error types for the enumerable crate.

use thiserror::Error;

/// Errors that can occur when building or consuming a query.
///
/// Errors fall into three groups:
///
/// - **Configuration**: detected when an operator or source is constructed
///   ([`MissingArgument`](Error::MissingArgument),
///   [`NegativeCount`](Error::NegativeCount),
///   [`RangeOverflow`](Error::RangeOverflow),
///   [`InvalidChunkSize`](Error::InvalidChunkSize)).
/// - **Data**: detected while pulling, at the offending element
///   ([`InvalidCast`](Error::InvalidCast), [`DuplicateKey`](Error::DuplicateKey)).
/// - **Cardinality**: detected by terminal operators
///   ([`NoElements`](Error::NoElements), [`NoMatch`](Error::NoMatch),
///   [`MultipleElements`](Error::MultipleElements),
///   [`MultipleMatch`](Error::MultipleMatch),
///   [`IndexOutOfRange`](Error::IndexOutOfRange)).
///
/// Values are comparable so callers can branch on the exact kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required input sequence was not supplied.
    #[error("required argument '{0}' not provided")]
    MissingArgument(&'static str),

    /// A generator was asked for a negative number of elements.
    #[error("'{name}' must not be negative, got {count}")]
    NegativeCount { name: &'static str, count: i64 },

    /// The last element of a range does not fit the element type.
    #[error("range of {count} elements starting at {start} overflows")]
    RangeOverflow { start: i64, count: i64 },

    /// Chunks must hold at least one element.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    /// The sequence was empty where at least one element is required.
    #[error("sequence contains no elements")]
    NoElements,

    /// No element satisfied the predicate.
    #[error("no element satisfies the condition")]
    NoMatch,

    /// The sequence held more than one element where exactly one is required.
    #[error("sequence contains more than one element")]
    MultipleElements,

    /// More than one element satisfied the predicate.
    #[error("more than one element satisfies the condition")]
    MultipleMatch,

    /// An element index past the end of the sequence.
    #[error("index {index} is out of range")]
    IndexOutOfRange { index: usize },

    /// An element could not be converted to the requested type.
    #[error("cannot cast {from} to {to}")]
    InvalidCast {
        from: &'static str,
        to: &'static str,
    },

    /// Two elements produced the same key for a unique-key map.
    #[error("duplicate key produced by element {index}")]
    DuplicateKey { index: usize },
}

impl Error {
    pub(crate) fn cast<From: ?Sized, To: ?Sized>() -> Self {
        Error::InvalidCast {
            from: std::any::type_name::<From>(),
            to: std::any::type_name::<To>(),
        }
    }

    /// Returns `true` for errors raised while building a pipeline.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingArgument(_)
                | Error::NegativeCount { .. }
                | Error::RangeOverflow { .. }
                | Error::InvalidChunkSize
        )
    }

    /// Returns `true` for cardinality errors raised by terminal operators.
    pub fn is_cardinality(&self) -> bool {
        matches!(
            self,
            Error::NoElements
                | Error::NoMatch
                | Error::MultipleElements
                | Error::MultipleMatch
                | Error::IndexOutOfRange { .. }
        )
    }
}

/// Result type for enumerable operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Panicking access to a query result.
///
/// `must()` returns the value, or panics with the [`Error`] itself as the
/// panic payload, so a `catch_unwind` caller can downcast it back.
///
/// ```
/// use enumerable::{Must, Query};
///
/// let total = Query::from_vec(vec![1, 2, 3]).sum().must();
/// assert_eq!(total, 6);
/// ```
pub trait Must<T> {
    /// Unwraps the value or panics with the underlying error.
    fn must(self) -> T;
}

impl<T> Must<T> for Result<T> {
    #[track_caller]
    fn must(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => std::panic::panic_any(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        assert!(Error::NegativeCount { name: "count", count: -1 }.is_configuration());
        assert!(Error::InvalidChunkSize.is_configuration());
        assert!(Error::NoMatch.is_cardinality());
        assert!(!Error::DuplicateKey { index: 3 }.is_cardinality());
        assert!(!Error::DuplicateKey { index: 3 }.is_configuration());
    }

    #[test]
    fn cardinality_kinds_are_distinct() {
        assert_ne!(Error::NoMatch, Error::MultipleMatch);
        assert_ne!(Error::NoElements, Error::NoMatch);
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::NegativeCount { name: "count", count: -2 }.to_string(),
            "'count' must not be negative, got -2"
        );
        assert_eq!(
            Error::cast::<i64, u8>().to_string(),
            "cannot cast i64 to u8"
        );
    }

    #[test]
    fn must_returns_value() {
        let ok: Result<i32> = Ok(4);
        assert_eq!(ok.must(), 4);
    }

    #[test]
    fn must_panics_with_error_payload() {
        let err: Result<i32> = Err(Error::NoElements);
        let payload = std::panic::catch_unwind(|| err.must()).unwrap_err();
        assert_eq!(payload.downcast_ref::<Error>(), Some(&Error::NoElements));
    }
}
