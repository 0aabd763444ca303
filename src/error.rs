//! Error types for cardforge.

use std::fmt;

/// Result type alias for cardforge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for cardforge operations.
///
/// Only structural precondition violations surface as errors. An edit that
/// would not change anything is a distinct "no change" signal, not an error,
/// and merge rejection is the normal negative outcome of the merge protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A reminder toggle was requested at a position not inside any keyword
    /// tag.
    NotInKeywordTag { pos: usize },
    /// A delimiter at the given tagged position has no matching counterpart
    /// or is truncated.
    UnbalancedTag { pos: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInKeywordTag { pos } => {
                write!(f, "position {pos} is not inside a keyword tag")
            }
            Self::UnbalancedTag { pos } => {
                write!(f, "unbalanced or truncated tag at position {pos}")
            }
        }
    }
}

impl std::error::Error for Error {}
