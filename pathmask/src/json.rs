//! `serde_json` interop and JSON configuration.
//!
//! - `Node` converts from `serde_json::Value` and back via [`Node::to_json`].
//! - [`sanitize_json`] sanitizes a JSON document directly.
//! - [`RuleConfig`] is the serializable part of [`SanitizeOptions`]; generators
//!   are code and can only be added through the builder.

use serde::{ser::Error as _, Deserialize, Serialize, Serializer};
use serde_json::{Map, Number as JsonNumber, Value as JsonValue};

use crate::{
    error::SanitizeError,
    node::{Array, Node, Number, Object, Repr},
    options::SanitizeOptions,
    path::{KeyPath, PathSegment},
    rules::Mode,
    walk::sanitize,
};

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Node::Null,
            JsonValue::Bool(value) => Node::Bool(value),
            JsonValue::Number(number) => Node::Number(number_from_json(&number)),
            JsonValue::String(value) => Node::String(value),
            JsonValue::Array(items) => Node::Array(items.into_iter().map(Node::from).collect::<Array>()),
            JsonValue::Object(entries) => {
                let object = Object::new();
                for (key, value) in entries {
                    object.push_unique(key, Node::from(value));
                }
                Node::Object(object)
            }
        }
    }
}

fn number_from_json(number: &JsonNumber) -> Number {
    if let Some(value) = number.as_u64() {
        Number::from(value)
    } else if let Some(value) = number.as_i64() {
        Number::from(value)
    } else {
        Number::float(number.as_f64().unwrap_or(f64::NAN))
    }
}

impl Node {
    /// Converts the tree to a `serde_json::Value`.
    ///
    /// `undefined` object members are omitted and `undefined` array elements
    /// become `null`, as do non-finite numbers. Numbers read from JSON are
    /// written back in their original integer or float form; other integral
    /// numbers that fit an `i64` exactly are emitted as integers. Shared
    /// subtrees are duplicated.
    ///
    /// Fails with [`SanitizeError::CyclicValue`] when the tree contains itself.
    pub fn to_json(&self) -> Result<JsonValue, SanitizeError> {
        to_json(self, &mut KeyPath::new(), &mut Vec::new())
    }
}

fn to_json(
    node: &Node,
    path: &mut KeyPath,
    ancestors: &mut Vec<usize>,
) -> Result<JsonValue, SanitizeError> {
    if let Some(identity) = node.identity() {
        if ancestors.contains(&identity) {
            return Err(SanitizeError::CyclicValue {
                path: path.render(),
            });
        }
        ancestors.push(identity);
    }

    let json = match node {
        Node::Undefined | Node::Null => JsonValue::Null,
        Node::Bool(value) => JsonValue::Bool(*value),
        Node::Number(number) => number_to_json(*number),
        Node::String(value) => JsonValue::String(value.clone()),
        Node::Array(array) => {
            let mut items = Vec::with_capacity(array.len());
            for (index, item) in array.to_vec().iter().enumerate() {
                path.push(PathSegment::Index(index));
                let item = to_json(item, path, ancestors);
                path.pop();
                items.push(item?);
            }
            JsonValue::Array(items)
        }
        Node::Object(object) => {
            let mut entries = Map::new();
            for (key, value) in object.entries() {
                if matches!(value, Node::Undefined) {
                    continue;
                }
                path.push(PathSegment::Key(key.clone()));
                let value = to_json(&value, path, ancestors);
                path.pop();
                entries.insert(key, value?);
            }
            JsonValue::Object(entries)
        }
    };

    if node.identity().is_some() {
        ancestors.pop();
    }
    Ok(json)
}

// 2^53: every integer up to here is exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[allow(clippy::cast_possible_truncation)]
fn number_to_json(number: Number) -> JsonValue {
    let value = number.as_f64();
    match number.repr() {
        Repr::Signed(value) => JsonValue::from(value),
        Repr::Unsigned(value) => JsonValue::from(value),
        Repr::Unspecified if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER => {
            JsonValue::from(value as i64)
        }
        Repr::Unspecified | Repr::Float => {
            JsonNumber::from_f64(value).map_or(JsonValue::Null, JsonValue::Number)
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// Sanitizes a JSON document.
///
/// Fails only if a generator returned a cyclic value.
pub fn sanitize_json(
    value: &JsonValue,
    options: &SanitizeOptions,
) -> Result<JsonValue, SanitizeError> {
    sanitize(&Node::from(value.clone()), options).to_json()
}

/// The data-only part of [`SanitizeOptions`], as read from JSON.
///
/// Field names follow the camelCase option names:
///
/// ```json
/// {
///   "rules": { "user.password": "redact", "user.*": "mask" },
///   "defaultMode": "preserve",
///   "redactString": "[REDACTED]",
///   "keyMatchAnyLevel": true
/// }
/// ```
///
/// Rules keep their document order, which decides ties between equally
/// specific patterns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub rules: Map<String, JsonValue>,
    #[serde(default)]
    pub default_mode: Option<Mode>,
    #[serde(default)]
    pub redact_string: Option<String>,
    #[serde(default)]
    pub random_string: Option<String>,
    #[serde(default)]
    pub random_field_generators_case_insensitive: Option<bool>,
    #[serde(default)]
    pub key_match_any_level: Option<bool>,
    #[serde(default)]
    pub mask_char: Option<char>,
    #[serde(default)]
    pub mask_max_length: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RuleConfig {
    /// Applies this configuration on top of `options`.
    ///
    /// Rule values must be mode names; anything else is rejected with
    /// [`SanitizeError::UnknownMode`].
    pub fn apply(&self, mut options: SanitizeOptions) -> Result<SanitizeOptions, SanitizeError> {
        for (pattern, mode) in &self.rules {
            let mode: Mode = match mode {
                JsonValue::String(name) => name.parse()?,
                other => return Err(SanitizeError::UnknownMode(other.to_string())),
            };
            options = options.with_rule(pattern, mode);
        }
        if let Some(mode) = self.default_mode {
            options = options.with_default_mode(mode);
        }
        if let Some(placeholder) = &self.redact_string {
            options = options.with_redact_string(placeholder.clone());
        }
        if let Some(placeholder) = &self.random_string {
            options = options.with_random_string(placeholder.clone());
        }
        if let Some(enabled) = self.random_field_generators_case_insensitive {
            options = options.with_field_generators_case_insensitive(enabled);
        }
        if let Some(enabled) = self.key_match_any_level {
            options = options.with_key_match_any_level(enabled);
        }
        if let Some(mask_char) = self.mask_char {
            options = options.with_mask_char(mask_char);
        }
        if let Some(max_length) = self.mask_max_length {
            options = options.with_mask_max_length(max_length);
        }
        if let Some(seed) = self.seed {
            options = options.with_seed(seed);
        }
        Ok(options)
    }
}

impl SanitizeOptions {
    /// Builds options from a JSON [`RuleConfig`] document.
    pub fn from_json_str(document: &str) -> Result<Self, SanitizeError> {
        let config: RuleConfig = serde_json::from_str(document)?;
        config.apply(SanitizeOptions::new())
    }
}
