//! Concrete paths built while walking a tree.

use std::fmt::{self, Write as _};

/// One step from a container into a child.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// An object key.
    Key(String),
    /// An array position.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The path from the root to the node being visited.
///
/// Keeps each segment's matching text alongside the segment so the matcher
/// never re-renders indices.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyPath {
    segments: Vec<PathSegment>,
    texts: Vec<String>,
}

impl KeyPath {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.texts.push(segment.to_string());
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
        self.texts.pop();
    }

    /// Segment texts as the matcher compares them.
    pub(crate) fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Lowercased segment texts for case-insensitive lookups.
    pub(crate) fn folded(&self) -> Vec<String> {
        self.texts.iter().map(|text| text.to_lowercase()).collect()
    }

    /// Renders keys joined by `.` and indices as `[i]`, e.g. `users[1].name`.
    ///
    /// The rendering parses back to the same tokens.
    pub(crate) fn render(&self) -> String {
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => {
                    if !rendered.is_empty() {
                        rendered.push('.');
                    }
                    rendered.push_str(key);
                }
                PathSegment::Index(index) => {
                    let _ = write!(rendered, "[{index}]");
                }
            }
        }
        rendered
    }
}
