use hyperlower_ops::{Binding, Operation, ValueExpr};
use hyperlower_template::split;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::attrs::fragment_value;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A child before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildInput<'a> {
    /// Raw text, possibly holding placeholder tokens.
    Text(&'a str),
    /// Already lowered, e.g. the binding of a child element.
    Resolved(ValueExpr),
}

/// Flatten text children into literal and expression entries, then drop
/// what cannot affect the rendered tree.
///
/// With `collapse_whitespace`, literal entries that are only whitespace and
/// span a line break are dropped, and whitespace runs in the remaining
/// literals become a single space. Expression values are never touched.
pub fn normalize(children: Vec<ChildInput<'_>>, collapse_whitespace: bool) -> Vec<ValueExpr> {
    let mut out = Vec::new();
    for child in children {
        match child {
            ChildInput::Resolved(value) => out.push(value),
            ChildInput::Text(raw) => out.extend(split(raw).iter().map(fragment_value)),
        }
    }
    out.into_iter()
        .filter_map(|value| match value {
            ValueExpr::Str(text) => literal(text, collapse_whitespace).map(ValueExpr::Str),
            other => Some(other),
        })
        .collect()
}

fn literal(text: String, collapse_whitespace: bool) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    if !collapse_whitespace {
        return Some(text);
    }
    if text.trim().is_empty() && text.contains('\n') {
        return None;
    }
    Some(WHITESPACE_RUN.replace_all(&text, " ").into_owned())
}

/// Operation that attaches normalized children to `binding`, if any.
pub fn child_operation(binding: &Binding, mut values: Vec<ValueExpr>) -> Option<Operation> {
    if values.is_empty() {
        return None;
    }
    if matches!(values.as_slice(), [ValueExpr::Str(_)]) {
        if let Some(ValueExpr::Str(text)) = values.pop() {
            return Some(Operation::AppendTextNode {
                binding: binding.clone(),
                text,
            });
        }
    }
    Some(Operation::AppendChildren {
        binding: binding.clone(),
        children: values,
    })
}
