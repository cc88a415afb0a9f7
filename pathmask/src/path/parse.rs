//! Path expression tokenizer.
//!
//! Parsing is total: there is no malformed input, only degenerate output.

/// One segment of a parsed path or pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// A property name or array index, compared as text.
    Literal(String),
    /// `*`: exactly one segment with any value.
    AnyOne,
    /// `**`: zero or more segments.
    AnyDepth,
}

impl Token {
    fn from_text(text: &str) -> Self {
        match text {
            "*" => Token::AnyOne,
            "**" => Token::AnyDepth,
            _ => Token::Literal(text.to_owned()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Token::Literal(_))
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Token::Literal(text) => Some(text),
            _ => None,
        }
    }

    /// Lowercased copy used for case-insensitive comparison.
    pub(crate) fn folded(&self) -> Self {
        match self {
            Token::Literal(text) => Token::Literal(text.to_lowercase()),
            other => other.clone(),
        }
    }
}

/// Splits a path expression into tokens.
///
/// `.` separates segments. `[...]` starts a new segment whose content, up to
/// the closing bracket, is taken verbatim, so `a[0]`, `a.0`, `a[*]` and `a.*`
/// all work. Empty segments are dropped and an empty string yields no tokens.
/// An unclosed bracket takes the rest of the input as its content.
pub fn parse_path(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => flush(&mut current, &mut tokens),
            '[' => {
                flush(&mut current, &mut tokens);
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                    current.push(inner);
                }
                flush(&mut current, &mut tokens);
            }
            _ => current.push(ch),
        }
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<Token>) {
    if !current.is_empty() {
        tokens.push(Token::from_text(current));
        current.clear();
    }
}
