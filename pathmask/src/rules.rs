//! Rule sets: which [`Mode`] applies at which path.

use std::{fmt, str::FromStr};

use crate::{
    error::SanitizeError,
    path::{select_best, MatchOptions, Pattern},
};

/// What happens to a value whose path matched a rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Mode {
    /// Replace a primitive with a run of mask characters. Containers are
    /// descended into instead.
    Mask,
    /// Replace the whole value, container or not, with the redact string.
    Redact,
    /// Replace the value with a generated substitute.
    #[cfg_attr(feature = "json", serde(alias = "random"))]
    Generate,
    /// Keep the value. Containers are still descended into.
    #[default]
    Preserve,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Mask => "mask",
            Mode::Redact => "redact",
            Mode::Generate => "generate",
            Mode::Preserve => "preserve",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SanitizeError;

    /// Parses `mask`, `redact`, `generate` (or its alias `random`) and
    /// `preserve`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "mask" => Ok(Mode::Mask),
            "redact" => Ok(Mode::Redact),
            "generate" | "random" => Ok(Mode::Generate),
            "preserve" => Ok(Mode::Preserve),
            other => Err(SanitizeError::UnknownMode(other.to_owned())),
        }
    }
}

/// The mode picked for one path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Resolution {
    pub(crate) mode: Mode,
    /// The winning rule matched this node as the base of a trailing `**`;
    /// containers are descended into rather than replaced.
    pub(crate) descend: bool,
}

/// Ordered mapping from patterns to modes.
///
/// Registration order only matters to break ties between equally specific
/// patterns: the earlier rule wins.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<(Pattern, Mode)>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. Re-adding the same pattern text replaces its mode and
    /// keeps its original position.
    pub fn insert(&mut self, pattern: &str, mode: Mode) {
        if let Some((_, existing)) = self.rules.iter_mut().find(|(p, _)| p.as_str() == pattern) {
            *existing = mode;
            return;
        }
        self.rules.push((Pattern::parse(pattern), mode));
    }

    /// Mode registered for exactly this pattern text.
    pub fn get(&self, pattern: &str) -> Option<Mode> {
        self.rules
            .iter()
            .find(|(p, _)| p.as_str() == pattern)
            .map(|(_, mode)| *mode)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pattern, Mode)> + '_ {
        self.rules.iter().map(|(pattern, mode)| (pattern, *mode))
    }

    /// Picks the mode for `path`, or `None` if no rule matches.
    pub(crate) fn resolve(&self, path: &[String], any_level: bool) -> Option<Resolution> {
        let options = MatchOptions {
            any_level,
            case_insensitive: false,
        };
        select_best(&self.rules, path, options).map(|(mode, found)| Resolution {
            mode: *mode,
            descend: found.base,
        })
    }
}

impl<'a> FromIterator<(&'a str, Mode)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, Mode)>>(iter: I) -> Self {
        let mut rules = RuleSet::new();
        for (pattern, mode) in iter {
            rules.insert(pattern, mode);
        }
        rules
    }
}
