//! Value generation for the `generate` mode.
//!
//! Lookup order for a value at a given path:
//!
//! 1. a field generator whose pattern names the path exactly,
//! 2. the most specific field generator pattern matching the path,
//! 3. steps 1-2 again ignoring case, when case-insensitive lookup is enabled,
//! 4. a type generator for the value's [`ValueKind`],
//! 5. the built-in pseudo-random substitute.
//!
//! Generators receive the original value and the rendered path. The engine
//! never memoizes; a generator that should map equal inputs to equal outputs
//! keeps its own table, e.g. in a `RefCell` captured by the closure.

use std::{collections::BTreeMap, fmt, rc::Rc};

use rand::{distributions::Alphanumeric, rngs::StdRng, Rng, SeedableRng};

use crate::{
    node::{Node, ValueKind},
    path::{select_best, KeyPath, MatchOptions, Pattern},
};

/// A value generator: `(original value, rendered path) -> replacement`.
pub type Generator = Rc<dyn Fn(&Node, &str) -> Node>;

/// Generators keyed by the runtime kind of the value being replaced.
#[derive(Clone, Default)]
pub struct TypeGenerators {
    by_kind: BTreeMap<ValueKind, Generator>,
}

impl TypeGenerators {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the generator for `kind`, replacing any previous one.
    pub fn insert<F>(&mut self, kind: ValueKind, generator: F)
    where
        F: Fn(&Node, &str) -> Node + 'static,
    {
        self.by_kind.insert(kind, Rc::new(generator));
    }

    pub fn get(&self, kind: ValueKind) -> Option<&Generator> {
        self.by_kind.get(&kind)
    }

    pub fn contains(&self, kind: ValueKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

}

impl fmt::Debug for TypeGenerators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_kind.keys()).finish()
    }
}

/// Generators keyed by path pattern.
#[derive(Clone, Default)]
pub struct FieldGenerators {
    entries: Vec<(Pattern, Generator)>,
}

impl FieldGenerators {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a generator for `pattern`. Re-registering the same pattern
    /// text replaces the generator in place.
    pub fn insert<F>(&mut self, pattern: &str, generator: F)
    where
        F: Fn(&Node, &str) -> Node + 'static,
    {
        let generator: Generator = Rc::new(generator);
        if let Some((_, existing)) = self.entries.iter_mut().find(|(p, _)| p.as_str() == pattern) {
            *existing = generator;
            return;
        }
        self.entries.push((Pattern::parse(pattern), generator));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Steps 1-3 of the lookup order.
    pub(crate) fn resolve(
        &self,
        path: &KeyPath,
        any_level: bool,
        case_insensitive: bool,
    ) -> Option<&Generator> {
        if self.entries.is_empty() {
            return None;
        }
        let exact_case = MatchOptions {
            any_level,
            case_insensitive: false,
        };
        if let Some((generator, _)) = select_best(&self.entries, path.texts(), exact_case) {
            return Some(generator);
        }
        if !case_insensitive {
            return None;
        }
        let any_case = MatchOptions {
            any_level,
            case_insensitive: true,
        };
        select_best(&self.entries, &path.folded(), any_case).map(|(generator, _)| generator)
    }
}

impl fmt::Debug for FieldGenerators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(pattern, _)| pattern.as_str()))
            .finish()
    }
}

/// Built-in pseudo-random substitutes, the last step of the lookup order.
pub(crate) struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub(crate) fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self { rng }
    }

    /// Same-kind substitute for numbers, strings and booleans. Everything
    /// else becomes `placeholder`.
    ///
    /// Arrays are replaced element-wise by the walker, which tracks identity
    /// so that cyclic arrays terminate.
    pub(crate) fn generate(&mut self, value: &Node, placeholder: &str) -> Node {
        match value {
            Node::Number(_) => Node::from(self.rng.gen_range(0..1_000_000_u32)),
            Node::String(original) => {
                let length = original.chars().count();
                let text: String = (&mut self.rng)
                    .sample_iter(&Alphanumeric)
                    .take(length)
                    .map(char::from)
                    .collect();
                Node::String(text)
            }
            Node::Bool(_) => Node::Bool(self.rng.gen()),
            Node::Undefined | Node::Null | Node::Array(_) | Node::Object(_) => {
                Node::String(placeholder.to_owned())
            }
        }
    }
}
