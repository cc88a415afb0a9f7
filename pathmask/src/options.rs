//! The configuration bundle for one sanitize call.

use crate::{
    generate::{FieldGenerators, TypeGenerators},
    node::{Node, ValueKind},
    rules::{Mode, RuleSet},
    transform::{MaskConfig, RANDOM_PLACEHOLDER, REDACTED_PLACEHOLDER},
};

/// Rules, fallbacks and generators for [`sanitize`](crate::sanitize).
///
/// Built with consuming `with_*` methods:
///
/// ```rust
/// use pathmask::{Mode, Node, SanitizeOptions, ValueKind};
///
/// let options = SanitizeOptions::new()
///     .with_rule("user.password", Mode::Redact)
///     .with_rule("user.*", Mode::Mask)
///     .with_rule("session.**", Mode::Generate)
///     .with_type_generator(ValueKind::Number, |_, _| Node::from(0))
///     .with_mask_max_length(4);
/// ```
///
/// Options are read-only during a call and can be reused across calls.
#[derive(Clone, Debug)]
pub struct SanitizeOptions {
    rules: RuleSet,
    default_mode: Mode,
    redact_string: String,
    random_string: String,
    type_generators: TypeGenerators,
    field_generators: FieldGenerators,
    field_generators_case_insensitive: bool,
    key_match_any_level: bool,
    mask: MaskConfig,
    seed: Option<u64>,
}

impl SanitizeOptions {
    /// Options with no rules: everything is preserved.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new(),
            default_mode: Mode::Preserve,
            redact_string: REDACTED_PLACEHOLDER.to_owned(),
            random_string: RANDOM_PLACEHOLDER.to_owned(),
            type_generators: TypeGenerators::new(),
            field_generators: FieldGenerators::new(),
            field_generators_case_insensitive: false,
            key_match_any_level: true,
            mask: MaskConfig::new(),
            seed: None,
        }
    }

    /// Adds a rule mapping `pattern` to `mode`.
    #[must_use]
    pub fn with_rule(mut self, pattern: &str, mode: Mode) -> Self {
        self.rules.insert(pattern, mode);
        self
    }

    /// Replaces the whole rule set.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Mode for paths no rule matches.
    #[must_use]
    pub fn with_default_mode(mut self, mode: Mode) -> Self {
        self.default_mode = mode;
        self
    }

    #[must_use]
    pub fn with_redact_string(mut self, placeholder: impl Into<String>) -> Self {
        self.redact_string = placeholder.into();
        self
    }

    /// Placeholder for generated values that have no better substitute.
    #[must_use]
    pub fn with_random_string(mut self, placeholder: impl Into<String>) -> Self {
        self.random_string = placeholder.into();
        self
    }

    #[must_use]
    pub fn with_type_generator<F>(mut self, kind: ValueKind, generator: F) -> Self
    where
        F: Fn(&Node, &str) -> Node + 'static,
    {
        self.type_generators.insert(kind, generator);
        self
    }

    #[must_use]
    pub fn with_field_generator<F>(mut self, pattern: &str, generator: F) -> Self
    where
        F: Fn(&Node, &str) -> Node + 'static,
    {
        self.field_generators.insert(pattern, generator);
        self
    }

    /// Lets field generator patterns match paths regardless of case.
    #[must_use]
    pub fn with_field_generators_case_insensitive(mut self, enabled: bool) -> Self {
        self.field_generators_case_insensitive = enabled;
        self
    }

    /// Whether a bare key pattern matches at any depth (`true`) or only at
    /// the root.
    #[must_use]
    pub fn with_key_match_any_level(mut self, enabled: bool) -> Self {
        self.key_match_any_level = enabled;
        self
    }

    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask = self.mask.with_mask_char(mask_char);
        self
    }

    #[must_use]
    pub fn with_mask_max_length(mut self, max_length: usize) -> Self {
        self.mask = self.mask.with_max_length(max_length);
        self
    }

    /// Seeds the built-in random substitutes so output is reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn default_mode(&self) -> Mode {
        self.default_mode
    }

    pub fn redact_string(&self) -> &str {
        &self.redact_string
    }

    pub fn random_string(&self) -> &str {
        &self.random_string
    }

    pub fn type_generators(&self) -> &TypeGenerators {
        &self.type_generators
    }

    pub fn field_generators(&self) -> &FieldGenerators {
        &self.field_generators
    }

    pub fn field_generators_case_insensitive(&self) -> bool {
        self.field_generators_case_insensitive
    }

    pub fn key_match_any_level(&self) -> bool {
        self.key_match_any_level
    }

    pub fn mask(&self) -> MaskConfig {
        self.mask
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::SanitizeOptions;
    use crate::{Mode, Node, ValueKind};

    #[test]
    fn defaults() {
        let options = SanitizeOptions::default();
        assert!(options.rules().is_empty());
        assert_eq!(options.default_mode(), Mode::Preserve);
        assert_eq!(options.redact_string(), "[REDACTED]");
        assert_eq!(options.random_string(), "[RANDOM]");
        assert!(options.key_match_any_level());
        assert!(!options.field_generators_case_insensitive());
        assert_eq!(options.mask().mask_char(), '*');
        assert_eq!(options.mask().max_length(), 8);
        assert_eq!(options.seed(), None);
    }

    #[test]
    fn builder_accumulates() {
        let options = SanitizeOptions::new()
            .with_rule("a", Mode::Mask)
            .with_rule("b.*", Mode::Redact)
            .with_default_mode(Mode::Redact)
            .with_redact_string("<gone>")
            .with_type_generator(ValueKind::Number, |_, _| Node::from(0))
            .with_field_generator("b.c", |_, _| Node::Null)
            .with_mask_char('#')
            .with_seed(3);

        assert_eq!(options.rules().len(), 2);
        assert_eq!(options.rules().get("b.*"), Some(Mode::Redact));
        assert_eq!(options.redact_string(), "<gone>");
        assert!(options.type_generators().contains(ValueKind::Number));
        assert_eq!(options.field_generators().len(), 1);
        assert_eq!(options.mask().mask_char(), '#');
        assert_eq!(options.seed(), Some(3));
    }
}
