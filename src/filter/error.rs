//! Error types for filter pattern classification.

use thiserror::Error;

/// A filter pattern that cannot be used for matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern is the empty string.
    #[error("invalid filter pattern: pattern is empty")]
    Empty,

    /// A wildcard marker appears somewhere other than the first or last character,
    /// or more than once on the same edge.
    #[error("invalid filter pattern '{pattern}': misplaced '*' at position {position}")]
    MisplacedMarker {
        /// The rejected pattern.
        pattern: String,
        /// Byte offset of the offending marker in the original pattern.
        position: usize,
    },
}
