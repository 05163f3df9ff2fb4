use std::fmt;

/// Synthetic identifier bound to one constructed node or shared value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding(String);

impl Binding {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value slot of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueExpr {
    Str(String),
    /// Template expression by index.
    Expr(usize),
    Binding(Binding),
    /// Runtime coercion to text.
    ToText(Box<ValueExpr>),
    /// Binary string join.
    Concat(Box<ValueExpr>, Box<ValueExpr>),
}

impl ValueExpr {
    pub fn str(s: impl Into<String>) -> Self {
        ValueExpr::Str(s.into())
    }

    /// Coerce to text; literals and already-coerced values stay as they are.
    pub fn to_text(self) -> Self {
        match self {
            ValueExpr::Str(_) | ValueExpr::ToText(_) => self,
            other => ValueExpr::ToText(Box::new(other)),
        }
    }

    pub fn concat(self, rhs: ValueExpr) -> Self {
        ValueExpr::Concat(Box::new(self), Box::new(rhs))
    }

    /// Left fold with [`ValueExpr::concat`]; `None` for an empty input.
    pub fn concat_all(parts: impl IntoIterator<Item = ValueExpr>) -> Option<Self> {
        parts.into_iter().reduce(ValueExpr::concat)
    }

    /// Expression indices referenced, in evaluation order.
    pub fn expressions(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_expressions(&mut out);
        out
    }

    fn collect_expressions(&self, out: &mut Vec<usize>) {
        match self {
            ValueExpr::Expr(i) => out.push(*i),
            ValueExpr::ToText(inner) => inner.collect_expressions(out),
            ValueExpr::Concat(l, r) => {
                l.collect_expressions(out);
                r.collect_expressions(out);
            }
            ValueExpr::Str(_) | ValueExpr::Binding(_) => {}
        }
    }
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueExpr::Str(s) => write!(f, "{s:?}"),
            ValueExpr::Expr(i) => write!(f, "${{{i}}}"),
            ValueExpr::Binding(b) => write!(f, "{b}"),
            ValueExpr::ToText(inner) => write!(f, "toText({inner})"),
            ValueExpr::Concat(l, r) => write!(f, "{l} + {r}"),
        }
    }
}

/// One primitive construction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateElement {
        binding: Binding,
        tag: String,
    },
    CreateNamespacedElement {
        binding: Binding,
        namespace: Binding,
        tag: String,
    },
    CreateComment {
        binding: Binding,
        text: String,
    },
    SetProperty {
        binding: Binding,
        name: String,
        value: ValueExpr,
    },
    SetAttribute {
        binding: Binding,
        name: String,
        value: ValueExpr,
    },
    /// Set `name="name"` when `value` is truthy at construction time.
    SetBooleanAttribute {
        binding: Binding,
        name: String,
        value: ValueExpr,
    },
    /// Name unknown until runtime; classified by the `setAttribute` helper.
    SetDynamicAttribute {
        binding: Binding,
        name: ValueExpr,
        value: ValueExpr,
    },
    SetLifecycleHandler {
        binding: Binding,
        onload: Option<ValueExpr>,
        onunload: Option<ValueExpr>,
        generation: u32,
    },
    AppendTextNode {
        binding: Binding,
        text: String,
    },
    AppendChildren {
        binding: Binding,
        children: Vec<ValueExpr>,
    },
}

impl Operation {
    /// The node this operation creates or acts on.
    pub fn binding(&self) -> &Binding {
        match self {
            Operation::CreateElement { binding, .. }
            | Operation::CreateNamespacedElement { binding, .. }
            | Operation::CreateComment { binding, .. }
            | Operation::SetProperty { binding, .. }
            | Operation::SetAttribute { binding, .. }
            | Operation::SetBooleanAttribute { binding, .. }
            | Operation::SetDynamicAttribute { binding, .. }
            | Operation::SetLifecycleHandler { binding, .. }
            | Operation::AppendTextNode { binding, .. }
            | Operation::AppendChildren { binding, .. } => binding,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Operation::CreateElement { .. }
                | Operation::CreateNamespacedElement { .. }
                | Operation::CreateComment { .. }
        )
    }

    /// Node bindings read by this operation besides its own.
    pub fn referenced_bindings(&self) -> Vec<&Binding> {
        match self {
            Operation::AppendChildren { children, .. } => children
                .iter()
                .filter_map(|c| match c {
                    ValueExpr::Binding(b) => Some(b),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn opt(v: &Option<ValueExpr>) -> String {
    v.as_ref().map_or_else(|| "null".to_string(), ToString::to_string)
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateElement { binding, tag } => {
                write!(f, "CreateElement({binding}, {tag:?})")
            }
            Operation::CreateNamespacedElement {
                binding,
                namespace,
                tag,
            } => write!(f, "CreateNamespacedElement({binding}, {namespace}, {tag:?})"),
            Operation::CreateComment { binding, text } => {
                write!(f, "CreateComment({binding}, {text:?})")
            }
            Operation::SetProperty {
                binding,
                name,
                value,
            } => write!(f, "SetProperty({binding}, {name:?}, {value})"),
            Operation::SetAttribute {
                binding,
                name,
                value,
            } => write!(f, "SetAttribute({binding}, {name:?}, {value})"),
            Operation::SetBooleanAttribute {
                binding,
                name,
                value,
            } => write!(f, "SetBooleanAttribute({binding}, {name:?}, {value})"),
            Operation::SetDynamicAttribute {
                binding,
                name,
                value,
            } => write!(f, "SetDynamicAttribute({binding}, {name}, {value})"),
            Operation::SetLifecycleHandler {
                binding,
                onload,
                onunload,
                generation,
            } => write!(
                f,
                "SetLifecycleHandler({binding}, {}, {}, {generation})",
                opt(onload),
                opt(onunload)
            ),
            Operation::AppendTextNode { binding, text } => {
                write!(f, "AppendTextNode({binding}, {text:?})")
            }
            Operation::AppendChildren { binding, children } => {
                let items: Vec<String> = children.iter().map(ToString::to_string).collect();
                write!(f, "AppendChildren({binding}, [{}])", items.join(", "))
            }
        }
    }
}

/// Output of one lowering pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lowered {
    pub operations: Vec<Operation>,
    /// `None` for a template with nothing to construct.
    pub root: Option<Binding>,
}

impl Lowered {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Bindings created by this sequence, in creation order.
    pub fn created_bindings(&self) -> Vec<&Binding> {
        self.operations
            .iter()
            .filter(|op| op.is_create())
            .map(Operation::binding)
            .collect()
    }
}
