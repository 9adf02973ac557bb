// src/error.rs
use core::fmt;

/// Library-wide error for tree-tdigest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TdError {
    /// An argument was outside its domain (e.g. a quantile outside `[0, 1]`).
    /// `context` names the offending argument.
    InvalidArgument { context: &'static str },

    /// A query that needs at least one centroid ran against an empty digest.
    EmptyDigest { context: &'static str },

    /// Merge/cluster was asked to compress zero total weight
    /// (no new points and no existing centroids).
    EmptyInput,

    /// A cursor was advanced (or read) after it ran off the end.
    IteratorExhausted,

    /// A cursor was read before its first `advance()`.
    IteratorNotStarted,

    /// NaN/±inf where a finite value is required.
    NonFiniteInput { context: &'static str },

    /// Configuration value rejected at build time.
    InvalidConfig { context: &'static str },
}

impl fmt::Display for TdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TdError::InvalidArgument { context } => {
                write!(f, "tdigest: invalid argument ({})", context)
            }
            TdError::EmptyDigest { context } => write!(
                f,
                "tdigest: {} requires a non-empty digest. \
hint: insert at least one point first",
                context
            ),
            TdError::EmptyInput => write!(
                f,
                "tdigest: nothing to compress (no new points and no existing digest)"
            ),
            TdError::IteratorExhausted => {
                write!(f, "tdigest: cursor advanced past the last centroid")
            }
            TdError::IteratorNotStarted => {
                write!(f, "tdigest: cursor read before the first advance()")
            }
            TdError::NonFiniteInput { context } => write!(
                f,
                "tdigest: non-finite values are not allowed ({}). \
hint: clean your data or drop NaN/±inf before building the digest",
                context
            ),
            TdError::InvalidConfig { context } => write!(
                f,
                "tdigest: invalid configuration ({}). hint: value must be finite and > 0",
                context
            ),
        }
    }
}

impl std::error::Error for TdError {}

pub type TdResult<T> = Result<T, TdError>;
