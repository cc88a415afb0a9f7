//! Adapters for emitting sanitized values through `slog`.
//!
//! This module connects [`sanitize`](crate::sanitize) with `slog` by providing
//! a `slog::Value` that serializes the sanitized tree as structured JSON via
//! `slog`'s nested-value support.
//!
//! It is responsible for:
//! - Ensuring the logged representation is derived from the sanitized tree,
//!   never from the original value.
//! - Avoiding fallible logging APIs: failures are represented as placeholder
//!   strings rather than propagated as errors.
//!
//! It does not configure `slog` or decide which rules apply.

use serde::Serialize;
use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{json::sanitize_json, options::SanitizeOptions};

/// Logged in place of a value that could not be turned into sanitized JSON.
pub const SANITIZE_FAILED: &str = "Failed to serialize sanitized value";

/// A `slog::Value` that emits an owned sanitized payload as structured JSON.
pub struct SanitizedJson {
    value: JsonValue,
}

impl SanitizedJson {
    fn new(value: JsonValue) -> Self {
        Self { value }
    }

    /// The JSON that will be logged.
    pub fn as_json(&self) -> &JsonValue {
        &self.value
    }
}

impl SlogValue for SanitizedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Converts values into a `slog::Value` that logs their sanitized form.
///
/// The value is serialized to JSON, sanitized with `options`, and only the
/// result is kept.
///
/// ## Example
/// ```ignore
/// use pathmask::slog::IntoSanitizedJson;
///
/// info!(logger, "login"; "request" => request.into_sanitized_json(&options));
/// ```
pub trait IntoSanitizedJson: Serialize + Sized {
    /// If serialization or sanitizing fails, the returned value holds the
    /// string [`SANITIZE_FAILED`].
    fn into_sanitized_json(self, options: &SanitizeOptions) -> SanitizedJson {
        let sanitized = serde_json::to_value(&self)
            .map_err(Into::into)
            .and_then(|json| sanitize_json(&json, options))
            .unwrap_or_else(|_| JsonValue::String(SANITIZE_FAILED.to_owned()));
        SanitizedJson::new(sanitized)
    }
}

impl<T> IntoSanitizedJson for T where T: Serialize {}
