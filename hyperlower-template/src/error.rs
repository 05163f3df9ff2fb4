use thiserror::Error;

/// Errors raised while building or parsing a template.
///
/// Offsets are byte positions in the parser input, i.e. the static parts
/// joined with placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template has {quasis} static parts for {expressions} expressions")]
    QuasiCount { quasis: usize, expressions: usize },

    #[error("missing tag name at offset {offset}")]
    MissingTagName { offset: usize },

    #[error("tag names cannot contain placeholders (offset {offset})")]
    DynamicTagName { offset: usize },

    #[error("comments cannot contain placeholders (offset {offset})")]
    PlaceholderInComment { offset: usize },

    #[error("unterminated {what} starting at offset {offset}")]
    Unterminated { what: &'static str, offset: usize },

    #[error("closing tag </{tag}> at offset {offset} has no matching opening tag")]
    UnexpectedClosingTag { tag: String, offset: usize },

    #[error("closing tag </{found}> at offset {offset} does not match <{expected}>")]
    MismatchedClosingTag {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("element <{tag}> opened at offset {offset} is never closed")]
    UnclosedElement { tag: String, offset: usize },

    #[error("text outside the root element at offset {offset}")]
    StrayText { offset: usize },

    #[error("template must have exactly one root element, found {count}")]
    RootCount { count: usize },
}
