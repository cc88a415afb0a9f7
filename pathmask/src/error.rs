//! Errors raised around the sanitizer.
//!
//! Sanitizing itself never fails. These errors come from the edges: parsing
//! mode names and configuration, and exporting trees to JSON.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SanitizeError {
    /// A mode name is not one of `mask`, `redact`, `generate`/`random`, `preserve`.
    #[error("unknown sanitize mode `{0}`")]
    UnknownMode(String),

    /// The tree refers back to one of its own ancestors and has no JSON form.
    #[error("cyclic value at `{path}` cannot be represented as JSON")]
    CyclicValue { path: String },

    /// A configuration document could not be parsed.
    #[cfg(feature = "json")]
    #[error("invalid sanitize configuration: {0}")]
    Config(#[from] serde_json::Error),
}
