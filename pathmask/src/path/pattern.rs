//! Compiled path patterns and the wildcard matcher.

use super::parse::{parse_path, Token};

/// Comparable weight of a pattern; higher is more specific.
///
/// Ordering is lexicographic: structured patterns beat bare key names, then
/// more literal segments win, then more `*`, then more `**`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    structured: bool,
    literals: usize,
    single: usize,
    deep: usize,
}

/// How a pattern is compared against paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchOptions {
    /// A bare key name (`"password"`) matches that key at any depth rather
    /// than only at the root.
    pub any_level: bool,
    /// Literal segments compare case-insensitively.
    pub case_insensitive: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            any_level: true,
            case_insensitive: false,
        }
    }
}

/// The result of a successful match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    pub specificity: Specificity,
    /// The pattern has no wildcards and names exactly this path.
    pub exact: bool,
    /// The pattern ends in `**` and matched with that `**` consuming nothing,
    /// i.e. the path is the pattern's base (`user.**` at `user`).
    pub base: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    /// A single key name written without dots or brackets.
    Bare,
    /// `*.<name>`: also matches `<name>` at the root.
    ParentWildcard,
    Structured,
}

/// A parsed rule key such as `user.*.email` or `items[**]`.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
    folded: Vec<Token>,
    shape: Shape,
    specificity: Specificity,
}

impl Pattern {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let tokens = parse_path(&source);
        let folded = tokens.iter().map(Token::folded).collect();

        let shape = match tokens.as_slice() {
            [Token::Literal(_)] if !source.contains(['.', '[', ']']) => Shape::Bare,
            [Token::AnyOne, Token::Literal(_)] => Shape::ParentWildcard,
            _ => Shape::Structured,
        };
        let count = |wanted: fn(&Token) -> bool| tokens.iter().filter(|t| wanted(t)).count();
        let specificity = Specificity {
            structured: shape != Shape::Bare,
            literals: count(|t| matches!(t, Token::Literal(_))),
            single: count(|t| matches!(t, Token::AnyOne)),
            deep: count(|t| matches!(t, Token::AnyDepth)),
        };

        Self {
            source,
            tokens,
            folded,
            shape,
            specificity,
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// `true` for a single key name written without dots or brackets.
    pub fn is_bare(&self) -> bool {
        self.shape == Shape::Bare
    }

    pub fn has_wildcards(&self) -> bool {
        self.tokens.iter().any(Token::is_wildcard)
    }

    /// Matches a path written in dot/bracket notation.
    pub fn matches(&self, path: &str) -> bool {
        self.matches_with(path, MatchOptions::default())
    }

    pub fn matches_with(&self, path: &str, options: MatchOptions) -> bool {
        let texts: Vec<String> = parse_path(path)
            .into_iter()
            .map(|token| match token {
                Token::Literal(text) => text,
                Token::AnyOne => "*".to_owned(),
                Token::AnyDepth => "**".to_owned(),
            })
            .map(|text| {
                if options.case_insensitive {
                    text.to_lowercase()
                } else {
                    text
                }
            })
            .collect();
        self.match_path(&texts, options).is_some()
    }

    /// Matches concrete segment texts.
    ///
    /// With `case_insensitive` set, `path` must already be lowercased.
    pub(crate) fn match_path(&self, path: &[String], options: MatchOptions) -> Option<PatternMatch> {
        let tokens = if options.case_insensitive {
            &self.folded
        } else {
            &self.tokens
        };

        if !self.has_wildcards() {
            if literals_equal(tokens, path) {
                return Some(self.found(true, false));
            }
            let tail_match = self.shape == Shape::Bare
                && options.any_level
                && path.last().map(String::as_str) == tokens[0].as_literal();
            return tail_match.then(|| self.found(false, false));
        }

        let root_shorthand = self.shape == Shape::ParentWildcard
            && path.len() == 1
            && tokens[1].as_literal() == Some(path[0].as_str());
        if !root_shorthand && !match_tokens(tokens, path) {
            return None;
        }

        let base = match tokens.split_last() {
            Some((Token::AnyDepth, prefix)) => match_tokens(prefix, path),
            _ => false,
        };
        Some(self.found(false, base))
    }

    fn found(&self, exact: bool, base: bool) -> PatternMatch {
        PatternMatch {
            specificity: self.specificity,
            exact,
            base,
        }
    }
}

fn literals_equal(tokens: &[Token], path: &[String]) -> bool {
    tokens.len() == path.len()
        && tokens
            .iter()
            .zip(path)
            .all(|(token, segment)| token.as_literal() == Some(segment.as_str()))
}

// Lockstep walk; `**` backtracks over every split of the remaining path.
fn match_tokens(tokens: &[Token], path: &[String]) -> bool {
    match tokens.split_first() {
        None => path.is_empty(),
        Some((Token::AnyDepth, [])) => true,
        Some((Token::AnyDepth, rest)) => (0..=path.len()).any(|skip| match_tokens(rest, &path[skip..])),
        Some((Token::AnyOne, rest)) => !path.is_empty() && match_tokens(rest, &path[1..]),
        Some((Token::Literal(text), rest)) => {
            path.first() == Some(text) && match_tokens(rest, &path[1..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchOptions, Pattern};

    fn top_level_only() -> MatchOptions {
        MatchOptions {
            any_level: false,
            ..MatchOptions::default()
        }
    }

    #[test]
    fn literal_patterns_need_equal_length() {
        let pattern = Pattern::parse("a.b");
        assert!(pattern.matches("a.b"));
        assert!(!pattern.matches("a"));
        assert!(!pattern.matches("a.b.c"));
    }

    #[test]
    fn single_wildcard_consumes_one_segment() {
        let pattern = Pattern::parse("user.*");
        assert!(pattern.matches("user.name"));
        assert!(!pattern.matches("user"));
        assert!(!pattern.matches("user.meta.x"));
    }

    #[test]
    fn trailing_any_depth_includes_its_base() {
        let pattern = Pattern::parse("user.**");
        assert!(pattern.matches("user"));
        assert!(pattern.matches("user.password"));
        assert!(pattern.matches("user.meta.city"));
        assert!(!pattern.matches("account"));
    }

    #[test]
    fn inner_any_depth_backtracks() {
        let pattern = Pattern::parse("a.**.c");
        assert!(pattern.matches("a.c"));
        assert!(pattern.matches("a.b.c"));
        assert!(pattern.matches("a.b.x.c"));
        assert!(!pattern.matches("a.b.c.d"));

        let pattern = Pattern::parse("**.id.**.token");
        assert!(pattern.matches("x.id.y.z.token"));
        assert!(!pattern.matches("x.token"));
    }

    #[test]
    fn bare_key_matches_at_any_depth_unless_disabled() {
        let pattern = Pattern::parse("password");
        assert!(pattern.is_bare());
        assert!(pattern.matches("password"));
        assert!(pattern.matches("user.credentials.password"));
        assert!(!pattern.matches("password.hint"));

        assert!(pattern.matches_with("password", top_level_only()));
        assert!(!pattern.matches_with("user.password", top_level_only()));
    }

    #[test]
    fn bracketed_single_key_is_not_bare() {
        let pattern = Pattern::parse("[password]");
        assert!(!pattern.is_bare());
        assert!(!pattern.matches("user.password"));
    }

    #[test]
    fn parent_wildcard_matches_root_key() {
        let pattern = Pattern::parse("*.score");
        assert!(pattern.matches("score"));
        assert!(pattern.matches("player.score"));
        assert!(!pattern.matches("a.b.score"));
    }

    #[test]
    fn bracket_and_dot_indices_match_alike() {
        assert!(Pattern::parse("users[1]").matches("users.1"));
        assert!(Pattern::parse("users.1").matches("users[1]"));
        assert!(Pattern::parse("users[*].email").matches("users[3].email"));
    }

    #[test]
    fn case_insensitive_matching() {
        let options = MatchOptions {
            case_insensitive: true,
            ..MatchOptions::default()
        };
        assert!(Pattern::parse("user.Name").matches_with("USER.name", options));
        assert!(!Pattern::parse("user.Name").matches("user.name"));
    }

    #[test]
    fn specificity_ordering() {
        let specificity_of = |p: &str| Pattern::parse(p).specificity();
        assert!(specificity_of("a.b") > specificity_of("a.*"));
        assert!(specificity_of("a.*") > specificity_of("a.**"));
        assert!(specificity_of("a.*.c") > specificity_of("a.*"));
        assert!(specificity_of("**.name") > specificity_of("name"));
        assert!(specificity_of("*.*") > specificity_of("**"));
    }

    #[test]
    fn base_flag_only_for_zero_width_trailing_any_depth() {
        let pattern = Pattern::parse("user.**");
        let at = |path: &[&str]| {
            let texts: Vec<String> = path.iter().map(|s| (*s).to_owned()).collect();
            pattern.match_path(&texts, MatchOptions::default())
        };
        assert!(at(&["user"]).unwrap().base);
        assert!(!at(&["user", "name"]).unwrap().base);
        assert!(at(&["other"]).is_none());
    }
}
