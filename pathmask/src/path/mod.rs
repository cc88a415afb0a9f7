//! Path notation: parsing, pattern matching, and rule ranking.
//!
//! - **`parse`**: turns `a.b[2].c` into an ordered list of [`Token`]s
//! - **`pattern`**: compiled [`Pattern`]s and the wildcard matcher
//! - **`rank`**: picks the most specific of several matching patterns
//! - **`key_path`**: the concrete path the walker maintains while descending
//!
//! Dot and bracket notation normalize to the same tokens, so `a.0.b` and
//! `a[0].b` address the same position.

mod key_path;
mod parse;
mod pattern;
mod rank;

pub use key_path::PathSegment;
pub(crate) use key_path::KeyPath;
pub use parse::{parse_path, Token};
pub use pattern::{MatchOptions, Pattern, PatternMatch, Specificity};
pub(crate) use rank::select_best;
