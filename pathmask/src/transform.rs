//! Terminal value transformations for the mask and redact modes.
//!
//! These are pure functions of a single value. They do not look at paths or
//! rules; the walker decides when they run.

use crate::node::Node;

/// Default replacement for redacted values.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

/// Default replacement when a value has to be generated but no generator
/// applies to its kind.
pub const RANDOM_PLACEHOLDER: &str = "[RANDOM]";

/// Default character for masked values.
pub const MASK_CHAR: char = '*';

/// Default cap on the length of a masked value.
pub const DEFAULT_MASK_MAX_LENGTH: usize = 8;

/// How primitives are masked.
///
/// A masked value is a run of `mask_char` as long as the original's string
/// form, capped at `max_length`, so masked output never reveals the length of
/// long values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskConfig {
    mask_char: char,
    max_length: usize,
}

impl MaskConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mask_char: MASK_CHAR,
            max_length: DEFAULT_MASK_MAX_LENGTH,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Caps the masked output at `max_length` characters.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn mask_char(&self) -> char {
        self.mask_char
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Masks a string, counting Unicode scalar values.
    pub fn apply_to(&self, value: &str) -> String {
        let length = value.chars().count().min(self.max_length);
        std::iter::repeat(self.mask_char).take(length).collect()
    }

    /// Masks a primitive through its display form (`42` masks to `**`).
    pub(crate) fn mask(&self, value: &Node) -> Node {
        Node::String(self.apply_to(&value.to_display_string()))
    }
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn redact(placeholder: &str) -> Node {
    Node::String(placeholder.to_owned())
}

#[cfg(test)]
mod tests {
    use super::{redact, MaskConfig, REDACTED_PLACEHOLDER};
    use crate::Node;

    #[test]
    fn mask_length_follows_value_up_to_cap() {
        let config = MaskConfig::new();
        assert_eq!(config.apply_to("ab"), "**");
        assert_eq!(config.apply_to("a very long secret"), "********");
        assert_eq!(config.apply_to(""), "");
    }

    #[test]
    fn mask_counts_scalar_values() {
        assert_eq!(MaskConfig::new().apply_to("秘密"), "**");
    }

    #[test]
    fn mask_respects_custom_char_and_cap() {
        let config = MaskConfig::new().with_mask_char('#').with_max_length(3);
        assert_eq!(config.apply_to("abcdef"), "###");
    }

    #[test]
    fn primitives_mask_through_display_form() {
        let config = MaskConfig::new();
        assert_eq!(config.mask(&Node::from(12345)), Node::from("*****"));
        assert_eq!(config.mask(&Node::from(false)), Node::from("*****"));
        assert_eq!(config.mask(&Node::Null), Node::from("****"));
        assert_eq!(config.mask(&Node::Undefined), Node::from("********"));
    }

    #[test]
    fn redact_uses_placeholder_verbatim() {
        assert_eq!(redact(REDACTED_PLACEHOLDER), Node::from("[REDACTED]"));
    }
}
