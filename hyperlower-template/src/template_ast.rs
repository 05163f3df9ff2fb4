use indexmap::IndexMap;

use crate::error::TemplateError;
use crate::placeholder::join_quasis;

/// A tagged template: static parts around opaque expression slots.
///
/// `E` is whatever the host uses to refer to an expression; lowering only
/// ever sees its index.
#[derive(Debug, Clone, PartialEq)]
pub struct Template<E> {
    quasis: Vec<String>,
    expressions: Vec<E>,
}

impl<E> Template<E> {
    pub fn new(quasis: Vec<String>, expressions: Vec<E>) -> Result<Self, TemplateError> {
        if quasis.len() != expressions.len() + 1 {
            return Err(TemplateError::QuasiCount {
                quasis: quasis.len(),
                expressions: expressions.len(),
            });
        }
        Ok(Self {
            quasis,
            expressions,
        })
    }

    pub fn quasis(&self) -> &[String] {
        &self.quasis
    }

    pub fn expressions(&self) -> &[E] {
        &self.expressions
    }

    /// No expressions and nothing but whitespace: there is nothing to build.
    pub fn is_blank(&self) -> bool {
        self.expressions.is_empty() && self.quasis.iter().all(|q| q.trim().is_empty())
    }

    /// Parser input with every expression replaced by its placeholder token.
    pub fn source(&self) -> String {
        join_quasis(&self.quasis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Element(String),
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(ParsedNode),
    Text(String),
}

/// One parsed element or comment. Raw strings may still contain
/// placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNode {
    pub tag: Tag,
    pub props: IndexMap<String, String>,
    pub children: Vec<Child>,
}

impl ParsedNode {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: Tag::Element(tag.into()),
            props: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Comments keep their text as the single child.
    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            tag: Tag::Comment,
            props: IndexMap::new(),
            children: vec![Child::Text(text.into())],
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        match &self.tag {
            Tag::Element(name) => Some(name),
            Tag::Comment => None,
        }
    }

    pub fn comment_text(&self) -> Option<&str> {
        if self.tag != Tag::Comment {
            return None;
        }
        self.children.iter().find_map(|c| match c {
            Child::Text(t) => Some(t.as_str()),
            Child::Node(_) => None,
        })
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Child) -> Self {
        self.children.push(child);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quasi_count_must_match() {
        let err = Template::new(vec!["a".into()], vec!["x"]).unwrap_err();
        assert_eq!(
            err,
            TemplateError::QuasiCount {
                quasis: 1,
                expressions: 1
            }
        );
    }

    #[test]
    fn blank_template() {
        let t: Template<&str> = Template::new(vec![String::new()], vec![]).unwrap();
        assert!(t.is_blank());
        let t = Template::new(vec!["".into(), "".into()], vec!["x"]).unwrap();
        assert!(!t.is_blank());
    }

    #[test]
    fn comment_text_is_first_child() {
        let c = ParsedNode::comment(" note ");
        assert_eq!(c.comment_text(), Some(" note "));
        assert_eq!(c.tag_name(), None);
        assert_eq!(ParsedNode::element("p").comment_text(), None);
    }
}
