//! Attribute classification.
//!
//! Each prop of an element lowers to at most one operation. The first rule
//! that matches wins:
//!
//! 1. the name contains a placeholder: `SetDynamicAttribute`, classified at
//!    runtime by the `setAttribute` helper
//! 2. `onload` / `onunload` (when enabled): collected into [`LifecycleSlots`]
//! 3. `on*`: `SetProperty`, so handlers stay live callables
//! 4. known boolean attribute with a non-literal value: `SetBooleanAttribute`
//! 5. anything else: `SetAttribute` with every fragment joined as text

use hyperlower_ops::{Binding, Operation, ValueExpr};
use hyperlower_template::{Fragment, non_empty, split};
use tracing::debug;

pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "autofocus",
    "checked",
    "defaultchecked",
    "disabled",
    "formnovalidate",
    "indeterminate",
    "readonly",
    "required",
    "selected",
    "willvalidate",
];

/// A prop as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute<'a> {
    /// Name known at compile time, already canonicalized.
    Static {
        name: String,
        raw: &'a str,
        value: Vec<Fragment<'a>>,
    },
    /// Name contains a placeholder.
    Dynamic {
        name: Vec<Fragment<'a>>,
        value: Vec<Fragment<'a>>,
    },
}

impl<'a> Attribute<'a> {
    pub fn from_prop(name: &'a str, raw: &'a str) -> Self {
        let name_fragments = split(name);
        if name_fragments.len() > 1 {
            Attribute::Dynamic {
                name: name_fragments,
                value: split(raw),
            }
        } else {
            Attribute::Static {
                name: canonical_name(name),
                raw,
                value: split(raw),
            }
        }
    }
}

/// Lowercase, then map the property spellings to attribute names.
pub fn canonical_name(prop: &str) -> String {
    let lower = prop.to_lowercase();
    match lower.as_str() {
        "classname" => "class".to_string(),
        "htmlfor" => "for".to_string(),
        _ => lower,
    }
}

pub fn fragment_value(fragment: &Fragment<'_>) -> ValueExpr {
    match fragment {
        Fragment::Literal(s) => ValueExpr::str(*s),
        Fragment::Placeholder(i) => ValueExpr::Expr(*i),
    }
}

/// The single non-empty fragment as-is, else all non-empty fragments joined
/// as text (an empty string when there are none).
pub fn sole_or_joined(fragments: &[Fragment<'_>]) -> ValueExpr {
    let parts = non_empty(fragments);
    if let [only] = parts.as_slice() {
        return fragment_value(only);
    }
    ValueExpr::concat_all(parts.iter().map(|f| fragment_value(f).to_text()))
        .unwrap_or_else(|| ValueExpr::str(""))
}

/// Every fragment coerced to text and joined left to right.
pub fn composed(fragments: &[Fragment<'_>]) -> ValueExpr {
    ValueExpr::concat_all(fragments.iter().map(|f| fragment_value(f).to_text()))
        .unwrap_or_else(|| ValueExpr::str(""))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Slot {
    #[default]
    Absent,
    Present(Option<ValueExpr>),
}

impl Slot {
    fn from_raw(name: &str, raw: &str) -> Self {
        if raw.is_empty() {
            return Slot::Absent;
        }
        let parts = non_empty(&split(raw));
        match parts.as_slice() {
            [only] => Slot::Present(Some(fragment_value(only))),
            _ => {
                debug!(
                    name,
                    fragments = parts.len(),
                    "lifecycle handler is not a single value; passing null"
                );
                Slot::Present(None)
            }
        }
    }

    fn into_value(self) -> Option<ValueExpr> {
        match self {
            Slot::Absent => None,
            Slot::Present(v) => v,
        }
    }
}

/// Pending `onload` / `onunload` values of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleSlots {
    onload: Slot,
    onunload: Slot,
}

impl LifecycleSlots {
    pub fn is_empty(&self) -> bool {
        self.onload == Slot::Absent && self.onunload == Slot::Absent
    }

    /// The single lifecycle operation, if either handler was given.
    pub fn finish(
        self,
        binding: &Binding,
        next_generation: impl FnOnce() -> u32,
    ) -> Option<Operation> {
        if self.is_empty() {
            return None;
        }
        Some(Operation::SetLifecycleHandler {
            binding: binding.clone(),
            onload: self.onload.into_value(),
            onunload: self.onunload.into_value(),
            generation: next_generation(),
        })
    }
}

/// Classify one prop. Returns `None` when nothing is emitted for it right
/// away, i.e. a lifecycle handler went into `lifecycle`.
pub fn classify(
    binding: &Binding,
    prop: &str,
    raw: &str,
    lifecycle: Option<&mut LifecycleSlots>,
) -> Option<Operation> {
    let (name, raw, value) = match Attribute::from_prop(prop, raw) {
        Attribute::Dynamic { name, value } => {
            return Some(Operation::SetDynamicAttribute {
                binding: binding.clone(),
                name: sole_or_joined(&name),
                value: sole_or_joined(&value),
            });
        }
        Attribute::Static { name, raw, value } => (name, raw, value),
    };

    if let Some(slots) = lifecycle {
        match name.as_str() {
            "onload" => {
                slots.onload = Slot::from_raw(&name, raw);
                return None;
            }
            "onunload" => {
                slots.onunload = Slot::from_raw(&name, raw);
                return None;
            }
            _ => {}
        }
    }

    if name.starts_with("on") {
        return Some(Operation::SetProperty {
            binding: binding.clone(),
            value: sole_or_joined(&value),
            name,
        });
    }

    if BOOLEAN_ATTRIBUTES.contains(&name.as_str()) && raw != name {
        if let [only] = non_empty(&value).as_slice() {
            return Some(Operation::SetBooleanAttribute {
                binding: binding.clone(),
                value: fragment_value(only),
                name,
            });
        }
    }

    Some(Operation::SetAttribute {
        binding: binding.clone(),
        value: composed(&value),
        name,
    })
}
