use hyperlower_ops::{Binding, Lowered, Operation, ValueExpr};
use hyperlower_template::{Child, ParsedNode, Tag, Template, parse_template};
use tracing::{debug, trace};

use crate::attrs::{LifecycleSlots, classify};
use crate::children::{ChildInput, child_operation, normalize};
use crate::error::LowerError;
use crate::naming::{is_svg_tag, name_for};
use crate::unit::{CompilationUnit, RuntimeHelper, SymbolFacility};

/// Lowering switches that differ between template variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowerOptions {
    /// Route `onload`/`onunload` through the lifecycle helper.
    pub lifecycle: bool,
    /// Drop indentation-only text and collapse whitespace runs.
    pub collapse_whitespace: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            lifecycle: true,
            collapse_whitespace: true,
        }
    }
}

/// Lower one template to its construction operations.
///
/// A blank template yields no operations and no root binding.
pub fn lower_template<E, S: SymbolFacility>(
    template: &Template<E>,
    unit: &mut CompilationUnit<S>,
) -> Result<Lowered, LowerError> {
    if template.is_blank() {
        debug!("blank template, nothing to construct");
        return Ok(Lowered::empty());
    }
    let Some(root) = parse_template(&template.source())? else {
        return Ok(Lowered::empty());
    };
    let (operations, binding) = lower_node(&root, unit);
    debug!(
        root = %binding,
        operations = operations.len(),
        "lowered template"
    );
    Ok(Lowered {
        operations,
        root: Some(binding),
    })
}

/// Lower `node` and its subtree.
///
/// Create and attribute operations come in pre-order; a node's append
/// operation follows everything its children emitted, so every binding it
/// references already exists.
pub fn lower_node<S: SymbolFacility>(
    node: &ParsedNode,
    unit: &mut CompilationUnit<S>,
) -> (Vec<Operation>, Binding) {
    let tag = match &node.tag {
        Tag::Comment => {
            let binding = unit.fresh_binding("comment");
            let op = Operation::CreateComment {
                binding: binding.clone(),
                text: node.comment_text().unwrap_or_default().to_string(),
            };
            trace!(%op);
            return (vec![op], binding);
        }
        Tag::Element(tag) => tag.as_str(),
    };

    let binding = unit.fresh_binding(&name_for(&node.props, tag));
    let mut ops = vec![create_element(unit, &binding, tag)];

    let mut lifecycle = unit.options().lifecycle.then(LifecycleSlots::default);
    for (prop, raw) in &node.props {
        if let Some(op) = classify(&binding, prop, raw, lifecycle.as_mut()) {
            ops.push(op);
        }
    }
    if let Some(op) = lifecycle.and_then(|slots| slots.finish(&binding, || unit.next_generation()))
    {
        ops.push(op);
    }

    let mut inputs = Vec::with_capacity(node.children.len());
    for child in &node.children {
        match child {
            Child::Text(text) => inputs.push(ChildInput::Text(text)),
            Child::Node(child) => {
                let (child_ops, child_binding) = lower_node(child, unit);
                ops.extend(child_ops);
                inputs.push(ChildInput::Resolved(ValueExpr::Binding(child_binding)));
            }
        }
    }
    let values = normalize(inputs, unit.options().collapse_whitespace);
    ops.extend(child_operation(&binding, values));

    for op in ops.iter().filter(|op| op.binding() == &binding) {
        if let Some(helper) = required_helper(op) {
            unit.helper(helper);
        }
        trace!(%op);
    }
    (ops, binding)
}

fn create_element<S: SymbolFacility>(
    unit: &mut CompilationUnit<S>,
    binding: &Binding,
    tag: &str,
) -> Operation {
    if is_svg_tag(tag) {
        Operation::CreateNamespacedElement {
            binding: binding.clone(),
            namespace: unit.svg_namespace(),
            tag: tag.to_string(),
        }
    } else {
        Operation::CreateElement {
            binding: binding.clone(),
            tag: tag.to_string(),
        }
    }
}

/// Runtime helper an operation calls, if any.
pub fn required_helper(op: &Operation) -> Option<RuntimeHelper> {
    match op {
        Operation::SetDynamicAttribute { .. } => Some(RuntimeHelper::SetAttribute),
        Operation::SetLifecycleHandler { .. } => Some(RuntimeHelper::OnLoad),
        Operation::AppendChildren { .. } => Some(RuntimeHelper::AppendChild),
        _ => None,
    }
}
