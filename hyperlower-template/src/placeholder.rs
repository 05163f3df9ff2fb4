//! Sentinel tokens standing in for template expressions.
//!
//! Expression `i` is written into the parser input as `\0<i>\0`. After
//! parsing, any raw string (attribute name, attribute value, text child) is
//! split back into literal text and expression indices.

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x00(\d+)\x00").expect("placeholder pattern is valid"));

/// One piece of a split raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    Literal(&'a str),
    Placeholder(usize),
}

impl Fragment<'_> {
    pub fn is_empty_literal(&self) -> bool {
        matches!(self, Fragment::Literal(s) if s.is_empty())
    }
}

/// Token for the expression at index `i`.
pub fn encode(i: usize) -> String {
    format!("\0{i}\0")
}

pub fn contains_placeholder(raw: &str) -> bool {
    PLACEHOLDER_RE.is_match(raw)
}

/// Split `raw` on placeholder tokens.
///
/// The result alternates literal/placeholder and always starts and ends
/// with a literal, so `"\00\0"` splits into `["", #0, ""]`.
pub fn split(raw: &str) -> Vec<Fragment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(raw) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(index) = digits.as_str().parse::<usize>() else {
            // Out-of-range index: leave the token in the literal text.
            continue;
        };
        out.push(Fragment::Literal(&raw[last..whole.start()]));
        out.push(Fragment::Placeholder(index));
        last = whole.end();
    }
    out.push(Fragment::Literal(&raw[last..]));
    out
}

/// Fragments with empty literals removed.
pub fn non_empty<'a>(fragments: &[Fragment<'a>]) -> Vec<Fragment<'a>> {
    fragments
        .iter()
        .copied()
        .filter(|f| !f.is_empty_literal())
        .collect()
}

/// Join static parts with placeholder tokens: `q0 + #0 + q1 + ... + qn`.
pub fn join_quasis<S: AsRef<str>>(quasis: &[S]) -> String {
    let mut out = String::new();
    for (i, quasi) in quasis.iter().enumerate() {
        if i > 0 {
            out.push_str(&encode(i - 1));
        }
        out.push_str(quasi.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_alternates_starting_with_literal() {
        let raw = format!("a{}b{}c", encode(0), encode(1));
        assert_eq!(
            split(&raw),
            vec![
                Fragment::Literal("a"),
                Fragment::Placeholder(0),
                Fragment::Literal("b"),
                Fragment::Placeholder(1),
                Fragment::Literal("c"),
            ]
        );
    }

    #[test]
    fn split_lone_placeholder_keeps_empty_edges() {
        let raw = encode(3);
        assert_eq!(
            split(&raw),
            vec![
                Fragment::Literal(""),
                Fragment::Placeholder(3),
                Fragment::Literal(""),
            ]
        );
        assert_eq!(non_empty(&split(&raw)), vec![Fragment::Placeholder(3)]);
    }

    #[test]
    fn split_plain_text_is_single_literal() {
        assert_eq!(split("hello"), vec![Fragment::Literal("hello")]);
        assert!(!contains_placeholder("hello"));
    }

    #[test]
    fn join_inserts_tokens_between_quasis() {
        let joined = join_quasis(&["<div>", "</div>"]);
        assert_eq!(joined, "<div>\u{0}0\u{0}</div>");
        assert_eq!(join_quasis(&[""]), "");
    }

    #[test]
    fn split_reconstructs_input() {
        let raw = format!("x{}{}y", encode(0), encode(12));
        let rebuilt: String = split(&raw)
            .iter()
            .map(|f| match f {
                Fragment::Literal(s) => s.to_string(),
                Fragment::Placeholder(i) => encode(*i),
            })
            .collect();
        assert_eq!(rebuilt, raw);
    }
}
