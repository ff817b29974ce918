//! Filename filtering against user-supplied wildcard patterns.
//!
//! A pattern may carry one [`WILDCARD`] marker at its start and/or end:
//!
//! | Pattern  | Kind     | Matches                    |
//! |----------|----------|----------------------------|
//! | `abc`    | Exact    | exactly `abc`              |
//! | `abc*`   | Prefix   | names starting with `abc`  |
//! | `*abc`   | Suffix   | names ending with `abc`    |
//! | `*abc*`  | Contains | names containing `abc`     |
//!
//! A marker anywhere else is rejected with [`PatternError`].

mod error;
mod matched;
mod pattern;

pub use error::PatternError;
pub use matched::MatchedSet;
pub use pattern::{FilterPattern, WILDCARD, classify, classify_all};
