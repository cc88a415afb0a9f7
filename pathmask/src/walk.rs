//! The tree walker and the `sanitize` entrypoint.
//!
//! The walker makes one depth-first pass over the input and builds a fresh
//! output tree. For every child of every container it computes the concrete
//! path, asks the rule set for a [`Mode`], and dispatches:
//!
//! | Mode | Primitive | Container |
//! |------|-----------|-----------|
//! | `Mask` | mask characters | descend |
//! | `Redact` | redact string | redact string, no descent |
//! | `Generate` | field, type, then built-in generator | see [`Walker::generate`] |
//! | `Preserve` | copied | descend |
//!
//! A rule whose trailing `**` matches a container at its own base position
//! (`user.**` at `user`) descends instead of replacing, so each entry below is
//! handled individually.
//!
//! Containers are tracked by identity. A container reached a second time,
//! through a cycle or a shared reference, yields the output node built the
//! first time, so the output has the same identity graph as the input.
//!
//! Recursion depth follows input depth; there is no artificial cap. Very
//! deep inputs are bounded by the thread's stack size.

use std::collections::HashMap;

use crate::{
    generate::RandomSource,
    node::{Array, Node, Object},
    options::SanitizeOptions,
    path::{KeyPath, PathSegment},
    rules::Mode,
    transform,
};

/// Returns a sanitized copy of `value`.
///
/// Primitive roots are returned unchanged: rules address children of
/// containers, and the root has no path of its own. The input is never
/// modified.
///
/// ```rust
/// use pathmask::{sanitize, Mode, Node, Object, SanitizeOptions};
///
/// let user = Object::new();
/// user.insert("name", "Ada");
/// user.insert("password", "hunter2");
/// let input = Node::from(Object::from_iter([("user", user)]));
///
/// let options = SanitizeOptions::new().with_rule("password", Mode::Redact);
/// let output = sanitize(&input, &options);
///
/// let user = output.get("user").unwrap();
/// assert_eq!(user.get("name"), Some(Node::from("Ada")));
/// assert_eq!(user.get("password"), Some(Node::from("[REDACTED]")));
/// ```
pub fn sanitize(value: &Node, options: &SanitizeOptions) -> Node {
    if value.is_composite() {
        Walker::new(options).walk(value)
    } else {
        value.clone()
    }
}

/// Per-call walk state. Dropped when the call returns.
struct Walker<'a> {
    options: &'a SanitizeOptions,
    path: KeyPath,
    /// Source container identity -> output container.
    visited: HashMap<usize, Node>,
    random: RandomSource,
}

impl<'a> Walker<'a> {
    fn new(options: &'a SanitizeOptions) -> Self {
        Self {
            options,
            path: KeyPath::new(),
            visited: HashMap::new(),
            random: RandomSource::new(options.seed()),
        }
    }

    /// Builds the output container for `node`, visiting each child.
    fn walk(&mut self, node: &Node) -> Node {
        let Some(identity) = node.identity() else {
            return node.clone();
        };
        if let Some(done) = self.visited.get(&identity) {
            return done.clone();
        }

        match node {
            Node::Array(source) => {
                // snapshot so generators may touch the input without
                // tripping a live borrow
                let items = source.to_vec();
                let output = Array::with_capacity(items.len());
                self.visited.insert(identity, Node::Array(output.clone()));
                for (index, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(index));
                    let value = self.visit(item);
                    self.path.pop();
                    output.push(value);
                }
                Node::Array(output)
            }
            Node::Object(source) => {
                let entries = source.entries();
                let output = Object::new();
                self.visited.insert(identity, Node::Object(output.clone()));
                for (key, value) in &entries {
                    self.path.push(PathSegment::Key(key.clone()));
                    let value = self.visit(value);
                    self.path.pop();
                    output.push_unique(key.clone(), value);
                }
                Node::Object(output)
            }
            _ => node.clone(),
        }
    }

    /// Resolves the mode for the current path and applies it to `value`.
    fn visit(&mut self, value: &Node) -> Node {
        let options = self.options;
        let resolution = options
            .rules()
            .resolve(self.path.texts(), options.key_match_any_level());
        let (mode, descend) = resolution.map_or((options.default_mode(), false), |found| {
            (found.mode, found.descend)
        });

        if descend && value.is_composite() {
            return self.walk(value);
        }

        match mode {
            Mode::Mask | Mode::Preserve if value.is_composite() => self.walk(value),
            Mode::Mask => options.mask().mask(value),
            Mode::Preserve => value.clone(),
            Mode::Redact => transform::redact(options.redact_string()),
            Mode::Generate => self.generate(value),
        }
    }

    /// Applies the `Generate` mode.
    ///
    /// A matching field generator always wins and its result is used as is,
    /// container or not. Without one, a container is descended into whenever
    /// any field generators are registered, so that broad type generators do
    /// not shadow field generators further down. Otherwise the type generator
    /// for the value's kind runs, then the built-in substitute.
    fn generate(&mut self, value: &Node) -> Node {
        let options = self.options;
        let fields = options.field_generators();

        if let Some(generator) = fields.resolve(
            &self.path,
            options.key_match_any_level(),
            options.field_generators_case_insensitive(),
        ) {
            return generator(value, &self.path.render());
        }

        if value.is_composite() && !fields.is_empty() {
            return self.walk(value);
        }

        if let Some(generator) = options.type_generators().get(value.kind()) {
            return generator(value, &self.path.render());
        }

        self.generate_builtin(value)
    }

    /// Built-in substitute. Arrays are rebuilt element by element under the
    /// same identity memo as [`Walker::walk`], so a cyclic array yields a
    /// cyclic output instead of recursing forever.
    fn generate_builtin(&mut self, value: &Node) -> Node {
        let Node::Array(source) = value else {
            return self.random.generate(value, self.options.random_string());
        };
        let identity = source.identity();
        if let Some(done) = self.visited.get(&identity) {
            return done.clone();
        }

        let items = source.to_vec();
        let output = Array::with_capacity(items.len());
        self.visited.insert(identity, Node::Array(output.clone()));
        for item in &items {
            output.push(self.generate_builtin(item));
        }
        Node::Array(output)
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize;
    use crate::{Array, Mode, Node, Object, SanitizeOptions, ValueKind};

    fn object<const N: usize>(entries: [(&str, Node); N]) -> Node {
        Node::Object(entries.into_iter().collect())
    }

    #[test]
    fn primitive_root_is_returned_unchanged() {
        let options = SanitizeOptions::new().with_default_mode(Mode::Redact);
        assert_eq!(sanitize(&Node::from("x"), &options), Node::from("x"));
        assert_eq!(sanitize(&Node::Null, &options), Node::Null);
    }

    #[test]
    fn output_never_aliases_input_containers() {
        let inner = object([("b", Node::from(1))]);
        let input = object([("a", inner.clone())]);

        let output = sanitize(&input, &SanitizeOptions::new());

        assert_eq!(output, input);
        assert!(!output.ptr_eq(&input));
        assert!(!output.get("a").unwrap().ptr_eq(&inner));
    }

    #[test]
    fn redact_collapses_containers() {
        let input = object([("user", object([("name", Node::from("A"))]))]);
        let options = SanitizeOptions::new().with_rule("user", Mode::Redact);

        let output = sanitize(&input, &options);
        assert_eq!(output.get("user"), Some(Node::from("[REDACTED]")));
    }

    #[test]
    fn base_of_trailing_any_depth_descends() {
        let input = object([
            ("user", object([("name", Node::from("A"))])),
            ("token", Node::from("t")),
        ]);
        let options = SanitizeOptions::new()
            .with_rule("user.**", Mode::Redact)
            .with_rule("token.**", Mode::Redact);

        let output = sanitize(&input, &options);
        assert_eq!(
            output.get("user"),
            Some(object([("name", Node::from("[REDACTED]"))]))
        );
        // a primitive base is replaced directly
        assert_eq!(output.get("token"), Some(Node::from("[REDACTED]")));
    }

    #[test]
    fn mask_descends_into_containers() {
        let input = object([("list", Node::from(vec!["abc", "de"]))]);
        let options = SanitizeOptions::new().with_default_mode(Mode::Mask);

        let output = sanitize(&input, &options);
        assert_eq!(output.get("list"), Some(Node::from(vec!["***", "**"])));
    }

    #[test]
    fn shared_children_stay_shared() {
        let shared = object([("v", Node::from(1))]);
        let input = Node::from(vec![shared.clone(), shared]);

        let output = sanitize(&input, &SanitizeOptions::new());
        let first = output.at(0).unwrap();
        let second = output.at(1).unwrap();
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn self_reference_is_reproduced() {
        let root = Object::new();
        root.insert("name", "loop");
        root.insert("self", root.clone());
        let input = Node::from(root);

        let options = SanitizeOptions::new().with_rule("name", Mode::Mask);
        let output = sanitize(&input, &options);

        assert!(output.get("self").unwrap().ptr_eq(&output));
        assert_eq!(output.get("name"), Some(Node::from("****")));
    }

    #[test]
    fn field_generator_receives_rendered_path() {
        let input = object([("users", Node::from(vec![object([("id", Node::from(7))])]))]);
        let options = SanitizeOptions::new()
            .with_rule("users[*].id", Mode::Generate)
            .with_field_generator("users.*.id", |_, path| Node::from(path));

        let output = sanitize(&input, &options);
        let id = output.get("users").and_then(|users| users.at(0)).and_then(|u| u.get("id"));
        assert_eq!(id, Some(Node::from("users[0].id")));
    }

    #[test]
    fn composite_type_generator_applies_without_field_generators() {
        let input = object([("meta", object([("a", Node::from(1))]))]);
        let options = SanitizeOptions::new()
            .with_rule("meta", Mode::Generate)
            .with_type_generator(ValueKind::Object, |_, _| Node::from("object replaced"));

        let output = sanitize(&input, &options);
        assert_eq!(output.get("meta"), Some(Node::from("object replaced")));
    }

    #[test]
    fn field_generators_make_generate_descend_into_containers() {
        let input = object([("meta", object([("a", Node::from(1))]))]);
        let options = SanitizeOptions::new()
            .with_rule("meta", Mode::Generate)
            .with_rule("meta.a", Mode::Generate)
            .with_type_generator(ValueKind::Object, |_, _| Node::from("object replaced"))
            .with_field_generator("meta.a", |_, _| Node::from("field"));

        let output = sanitize(&input, &options);
        assert_eq!(output.get("meta"), Some(object([("a", Node::from("field"))])));
    }

    #[test]
    fn builtin_generation_for_objects_uses_placeholder() {
        let input = object([("meta", object([("a", Node::from(1))]))]);
        let options = SanitizeOptions::new()
            .with_rule("meta", Mode::Generate)
            .with_random_string("<random>");

        let output = sanitize(&input, &options);
        assert_eq!(output.get("meta"), Some(Node::from("<random>")));
    }

    #[test]
    fn builtin_generation_replaces_arrays_element_wise() {
        let input = object([(
            "list",
            Node::from(vec![Node::from(1), Node::from("ab"), Node::object()]),
        )]);
        let options = SanitizeOptions::new()
            .with_rule("list", Mode::Generate)
            .with_random_string("[X]")
            .with_seed(7);

        let output = sanitize(&input, &options).get("list").unwrap();
        let items = output.as_array().unwrap().to_vec();
        assert_eq!(items.len(), 3);
        assert!(items[0].as_f64().is_some());
        assert_eq!(items[1].as_str().map(str::len), Some(2));
        assert_eq!(items[2], Node::from("[X]"));
        assert!(!output.ptr_eq(&input.get("list").unwrap()));
    }

    #[test]
    fn arrays_at_root_use_index_paths() {
        let input = Node::Array(Array::from_iter(["a", "b"]));
        let options = SanitizeOptions::new().with_rule("[1]", Mode::Redact);

        let output = sanitize(&input, &options);
        assert_eq!(output, Node::from(vec!["a", "[REDACTED]"]));
    }
}
