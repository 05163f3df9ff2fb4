//! JavaScript sources of the runtime helpers called by compiled templates.

use hyperlower_core::RuntimeHelper;

/// `appendChild(el, children)`: appends every value in order. Arrays are
/// flattened, `null`/`undefined`/booleans skipped, other non-nodes become
/// text (merged into a preceding text node).
pub const APPEND_CHILD_SOURCE: &str = r#"function appendChild(el, childs) {
  for (var i = 0; i < childs.length; i++) {
    var node = childs[i];
    if (Array.isArray(node)) {
      appendChild(el, node);
      continue;
    }
    if (node === null || node === undefined || typeof node === 'boolean') {
      continue;
    }
    if (!node.nodeType) {
      node = String(node);
      var last = el.lastChild;
      if (last && last.nodeName === '#text') {
        last.nodeValue += node;
        continue;
      }
      node = document.createTextNode(node);
    }
    el.appendChild(node);
  }
}"#;

/// `setAttribute(el, nameOrMap, value)`: runtime classification of
/// attributes whose name is only known once the template runs.
pub const SET_ATTRIBUTE_SOURCE: &str = r#"function setAttribute(el, attr, value) {
  if (attr && typeof attr === 'object') {
    for (var key in attr) {
      if (Object.prototype.hasOwnProperty.call(attr, key)) setAttribute(el, key, attr[key]);
    }
    return;
  }
  if (!attr) return;
  if (attr === 'className') attr = 'class';
  if (attr === 'htmlFor') attr = 'for';
  if (attr.slice(0, 2) === 'on') {
    el[attr] = value;
  } else if (value === false || value === null || value === undefined) {
    el.removeAttribute(attr);
  } else if (value === true) {
    el.setAttribute(attr, attr);
  } else {
    el.setAttribute(attr, value);
  }
}"#;

/// Source of `helper`, when it ships with this crate. The lifecycle helper
/// always comes from its own module.
pub fn helper_source(helper: RuntimeHelper) -> Option<&'static str> {
    match helper {
        RuntimeHelper::AppendChild => Some(APPEND_CHILD_SOURCE),
        RuntimeHelper::SetAttribute => Some(SET_ATTRIBUTE_SOURCE),
        RuntimeHelper::OnLoad => None,
    }
}

/// `helper` as a CommonJS module.
pub fn module_source(helper: RuntimeHelper) -> Option<String> {
    helper_source(helper).map(|src| format!("'use strict'\n\nmodule.exports = {src};\n"))
}
