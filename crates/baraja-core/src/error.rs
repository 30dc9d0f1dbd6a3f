#![forbid(unsafe_code)]

//! Construction failures.

use std::fmt;

/// A stack could not be built.
///
/// This is the only fatal condition in Baraja. No partial stack exists
/// after it is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitializationError {
    /// Fewer than two items were found in the container.
    TooFewItems { found: usize },
}

impl fmt::Display for InitializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewItems { found } => {
                write!(f, "failed to initialize: need at least 2 items, found {found}")
            }
        }
    }
}

impl std::error::Error for InitializationError {}
