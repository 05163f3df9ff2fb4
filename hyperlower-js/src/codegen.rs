//! Rendering of lowered templates and shared declarations as JavaScript.

use hyperlower_core::{
    Binding, CompilationUnit, Lowered, Operation, SharedInit, SymbolFacility, ValueExpr,
    required_helper,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::options::Options;
use crate::runtime::helper_source;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").expect("identifier pattern is valid"));

static MEMBER_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*$").expect("member pattern is valid")
});

/// Double-quoted JavaScript string literal.
pub fn string_lit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Renders operations of one template whose substitutions were `expressions`.
pub struct JsEmitter<'a> {
    expressions: &'a [String],
}

impl<'a> JsEmitter<'a> {
    pub fn new(expressions: &'a [String]) -> Self {
        Self { expressions }
    }

    /// An expression that evaluates to the template's root node, or `null`
    /// for a template with nothing to construct.
    pub fn render<S: SymbolFacility>(
        &self,
        lowered: &Lowered,
        unit: &mut CompilationUnit<S>,
    ) -> String {
        let Some(root) = &lowered.root else {
            return "null".to_string();
        };
        let mut out = String::from("(() => {\n");
        for op in &lowered.operations {
            let helper = required_helper(op).map(|h| unit.helper(h));
            out.push_str("  ");
            out.push_str(&self.statement(op, helper.as_ref()));
            out.push('\n');
        }
        out.push_str(&format!("  return {root};\n}})()"));
        out
    }

    /// One operation as a statement. `helper` is the binding of the runtime
    /// helper the operation calls, if it calls one.
    pub fn statement(&self, op: &Operation, helper: Option<&Binding>) -> String {
        let helper = helper.map_or("undefined", Binding::as_str);
        match op {
            Operation::CreateElement { binding, tag } => {
                format!("var {binding} = document.createElement({});", string_lit(tag))
            }
            Operation::CreateNamespacedElement {
                binding,
                namespace,
                tag,
            } => format!(
                "var {binding} = document.createElementNS({namespace}, {});",
                string_lit(tag)
            ),
            Operation::CreateComment { binding, text } => {
                format!("var {binding} = document.createComment({});", string_lit(text))
            }
            Operation::SetProperty {
                binding,
                name,
                value,
            } => {
                let value = self.value(value);
                if IDENTIFIER.is_match(name) {
                    format!("{binding}.{name} = {value};")
                } else {
                    format!("{binding}[{}] = {value};", string_lit(name))
                }
            }
            Operation::SetAttribute {
                binding,
                name,
                value,
            } => format!(
                "{binding}.setAttribute({}, {});",
                string_lit(name),
                self.value(value)
            ),
            Operation::SetBooleanAttribute {
                binding,
                name,
                value,
            } => {
                let name = string_lit(name);
                format!(
                    "if ({}) {binding}.setAttribute({name}, {name});",
                    self.value(value)
                )
            }
            Operation::SetDynamicAttribute {
                binding,
                name,
                value,
            } => format!(
                "{helper}({binding}, {}, {});",
                self.value(name),
                self.value(value)
            ),
            Operation::SetLifecycleHandler {
                binding,
                onload,
                onunload,
                generation,
            } => format!(
                "{helper}({binding}, {}, {}, {generation});",
                self.optional(onload.as_ref()),
                self.optional(onunload.as_ref())
            ),
            Operation::AppendTextNode { binding, text } => {
                format!("{binding}.textContent = {};", string_lit(text))
            }
            Operation::AppendChildren { binding, children } => {
                let items: Vec<String> = children.iter().map(|c| self.value(c)).collect();
                format!("{helper}({binding}, [{}]);", items.join(", "))
            }
        }
    }

    fn optional(&self, value: Option<&ValueExpr>) -> String {
        value.map_or_else(|| "null".to_string(), |v| self.value(v))
    }

    pub fn value(&self, value: &ValueExpr) -> String {
        match value {
            ValueExpr::Str(s) => string_lit(s),
            ValueExpr::Expr(i) => self.expression(*i),
            ValueExpr::Binding(b) => b.to_string(),
            ValueExpr::ToText(inner) => format!("String({})", self.value(inner)),
            ValueExpr::Concat(l, r) => match r.as_ref() {
                ValueExpr::Concat(..) => format!("{} + ({})", self.value(l), self.value(r)),
                _ => format!("{} + {}", self.value(l), self.value(r)),
            },
        }
    }

    fn expression(&self, index: usize) -> String {
        let Some(text) = self.expressions.get(index) else {
            return "undefined".to_string();
        };
        let text = text.trim();
        if MEMBER_CHAIN.is_match(text) {
            text.to_string()
        } else if text.contains('\n') || text.contains("//") {
            format!("(\n{text}\n)")
        } else {
            format!("({text})")
        }
    }
}

/// Declarations for the shared values of a unit, in declaration order.
pub fn render_declarations<'a>(
    shared: impl IntoIterator<Item = (&'a Binding, &'a SharedInit)>,
    options: &Options,
) -> String {
    let mut out = String::new();
    for (binding, init) in shared {
        let line = match init {
            SharedInit::Literal(value) => format!("var {binding} = {};", string_lit(value)),
            SharedInit::Helper(helper) => match options.helper_module(*helper) {
                Some(module) if options.use_import_style => {
                    format!("import {binding} from {};", string_lit(module))
                }
                Some(module) => format!("var {binding} = require({});", string_lit(module)),
                None => format!(
                    "var {binding} = {};",
                    helper_source(*helper).unwrap_or("undefined")
                ),
            },
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperlower_core::RuntimeHelper;

    fn b(name: &str) -> Binding {
        Binding::new(name)
    }

    #[test]
    fn string_literals_escape() {
        assert_eq!(string_lit("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(string_lit("\0"), r#""\u0000""#);
    }

    #[test]
    fn expressions_are_parenthesized_unless_simple() {
        let exprs = vec![
            "name".to_string(),
            " this.state.count ".to_string(),
            "() => {}".to_string(),
            "a // trailing".to_string(),
        ];
        let e = JsEmitter::new(&exprs);
        assert_eq!(e.value(&ValueExpr::Expr(0)), "name");
        assert_eq!(e.value(&ValueExpr::Expr(1)), "this.state.count");
        assert_eq!(e.value(&ValueExpr::Expr(2)), "(() => {})");
        assert_eq!(e.value(&ValueExpr::Expr(3)), "(\na // trailing\n)");
    }

    #[test]
    fn composed_values_render_left_to_right() {
        let exprs = vec!["x".to_string(), "y + 1".to_string()];
        let e = JsEmitter::new(&exprs);
        let v = ValueExpr::concat_all([
            ValueExpr::str("a"),
            ValueExpr::Expr(0).to_text(),
            ValueExpr::str("b"),
            ValueExpr::Expr(1).to_text(),
        ])
        .unwrap();
        assert_eq!(e.value(&v), r#""a" + String(x) + "b" + String((y + 1))"#);
    }

    #[test]
    fn statements() {
        let exprs = vec!["handler".to_string(), "isOff".to_string()];
        let e = JsEmitter::new(&exprs);
        let el = b("_el");
        assert_eq!(
            e.statement(
                &Operation::SetProperty {
                    binding: el.clone(),
                    name: "onclick".into(),
                    value: ValueExpr::Expr(0),
                },
                None
            ),
            "_el.onclick = handler;"
        );
        assert_eq!(
            e.statement(
                &Operation::SetProperty {
                    binding: el.clone(),
                    name: "on-thing".into(),
                    value: ValueExpr::str(""),
                },
                None
            ),
            r#"_el["on-thing"] = "";"#
        );
        assert_eq!(
            e.statement(
                &Operation::SetBooleanAttribute {
                    binding: el.clone(),
                    name: "disabled".into(),
                    value: ValueExpr::Expr(1),
                },
                None
            ),
            r#"if (isOff) _el.setAttribute("disabled", "disabled");"#
        );
        assert_eq!(
            e.statement(
                &Operation::SetLifecycleHandler {
                    binding: el.clone(),
                    onload: None,
                    onunload: Some(ValueExpr::Expr(0)),
                    generation: 3,
                },
                Some(&b("_onload"))
            ),
            "_onload(_el, null, handler, 3);"
        );
        assert_eq!(
            e.statement(
                &Operation::AppendChildren {
                    binding: el,
                    children: vec![ValueExpr::Binding(b("_span")), ValueExpr::str(" ")],
                },
                Some(&b("_appendChild"))
            ),
            r#"_appendChild(_el, [_span, " "]);"#
        );
    }

    #[test]
    fn empty_lowering_is_null() {
        let mut unit = CompilationUnit::default();
        assert_eq!(JsEmitter::new(&[]).render(&Lowered::empty(), &mut unit), "null");
    }

    #[test]
    fn declarations_follow_style() {
        let ns = b("_svgNamespace");
        let append = b("_appendChild");
        let set = b("_setAttribute");
        let inits = [
            SharedInit::Literal("http://www.w3.org/2000/svg".into()),
            SharedInit::Helper(RuntimeHelper::AppendChild),
            SharedInit::Helper(RuntimeHelper::SetAttribute),
        ];
        let shared = vec![(&ns, &inits[0]), (&append, &inits[1]), (&set, &inits[2])];
        let out = render_declarations(shared.iter().copied(), &Options::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], r#"var _svgNamespace = "http://www.w3.org/2000/svg";"#);
        assert_eq!(lines[1], r#"var _appendChild = require("yo-yoify/lib/appendChild");"#);
        assert!(lines[2].starts_with("var _setAttribute = function setAttribute(el, attr, value) {"));

        let options = Options {
            use_import_style: true,
            set_attribute_module: Some("my/set".into()),
            ..Options::default()
        };
        let out = render_declarations(shared.iter().copied(), &options);
        assert!(out.contains(r#"import _appendChild from "yo-yoify/lib/appendChild";"#));
        assert!(out.contains(r#"import _setAttribute from "my/set";"#));
        assert!(out.starts_with("var _svgNamespace"));
    }
}
