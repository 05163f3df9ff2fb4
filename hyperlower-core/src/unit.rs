//! Per-compilation-unit state and the symbol-binding seam.
//!
//! Everything that must stay consistent across the templates of one source
//! file lives here and is passed explicitly to the lowering engine: the
//! lifecycle generation counter and the memoized shared values (SVG
//! namespace constant, runtime helper bindings).

use std::collections::HashSet;

use hyperlower_ops::Binding;
use indexmap::IndexMap;
use tracing::debug;

use crate::lower::LowerOptions;

pub const SVG_NAMESPACE_URI: &str = "http://www.w3.org/2000/svg";

const SVG_NAMESPACE_KEY: &str = "svgNamespace";

/// Helper functions the emitted operations call at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeHelper {
    /// `appendChild(parent, values)`
    AppendChild,
    /// `setAttribute(el, nameOrMap, value)`
    SetAttribute,
    /// `onload(el, onload, onunload, generation)`
    OnLoad,
}

impl RuntimeHelper {
    pub const ALL: [RuntimeHelper; 3] = [
        RuntimeHelper::AppendChild,
        RuntimeHelper::SetAttribute,
        RuntimeHelper::OnLoad,
    ];

    /// Memoization key, also used as the binding name hint.
    pub fn key(self) -> &'static str {
        match self {
            RuntimeHelper::AppendChild => "appendChild",
            RuntimeHelper::SetAttribute => "setAttribute",
            RuntimeHelper::OnLoad => "onload",
        }
    }
}

/// What a shared binding is initialized with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedInit {
    Literal(String),
    /// Resolved to a module path or inline source by whoever emits code.
    Helper(RuntimeHelper),
}

/// Host capability for naming things.
pub trait SymbolFacility {
    /// A binding no other call in this unit has returned.
    fn fresh_binding(&mut self, hint: &str) -> Binding;

    /// The binding for `key`, created with `init` on first use only.
    fn declare_shared_value(&mut self, key: &str, init: SharedInit) -> Binding;
}

/// In-memory symbol facility producing `_name`, `_name2`, ... identifiers.
#[derive(Debug, Default, Clone)]
pub struct ScopeTracker {
    used: HashSet<String>,
    shared: IndexMap<String, (Binding, SharedInit)>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark names already taken by the host program.
    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used.extend(names.into_iter().map(Into::into));
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Shared values in declaration order.
    pub fn shared_values(&self) -> impl Iterator<Item = (&Binding, &SharedInit)> {
        self.shared.values().map(|(b, init)| (b, init))
    }
}

impl SymbolFacility for ScopeTracker {
    fn fresh_binding(&mut self, hint: &str) -> Binding {
        let base = uid_base(hint);
        let mut i = 1;
        loop {
            let candidate = if i > 1 {
                format!("_{base}{i}")
            } else {
                format!("_{base}")
            };
            if self.used.insert(candidate.clone()) {
                return Binding::new(candidate);
            }
            i += 1;
        }
    }

    fn declare_shared_value(&mut self, key: &str, init: SharedInit) -> Binding {
        if let Some((binding, _)) = self.shared.get(key) {
            return binding.clone();
        }
        let binding = self.fresh_binding(key);
        debug!(key, binding = %binding, "declared shared value");
        self.shared
            .insert(key.to_string(), (binding.clone(), init));
        binding
    }
}

/// Identifier-safe stem of a hint: separators camel-case the next letter,
/// leading digits/underscores and trailing digits are dropped.
fn uid_base(hint: &str) -> String {
    let mut out = String::with_capacity(hint.len());
    let mut upper_next = false;
    for c in hint.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            if out.is_empty() && (c.is_ascii_digit() || c == '_') {
                continue;
            }
            if upper_next {
                out.push(c.to_ascii_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        } else if !out.is_empty() {
            upper_next = true;
        }
    }
    let trimmed = out.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.is_empty() {
        "ref".to_string()
    } else {
        trimmed.to_string()
    }
}

/// State of one compilation unit (one source file).
#[derive(Debug)]
pub struct CompilationUnit<S = ScopeTracker> {
    symbols: S,
    options: LowerOptions,
    next_generation: u32,
}

impl<S: SymbolFacility> CompilationUnit<S> {
    pub fn new(symbols: S, options: LowerOptions) -> Self {
        Self {
            symbols,
            options,
            next_generation: 1,
        }
    }

    pub fn options(&self) -> &LowerOptions {
        &self.options
    }

    pub fn symbols(&self) -> &S {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut S {
        &mut self.symbols
    }

    pub fn into_symbols(self) -> S {
        self.symbols
    }

    pub fn fresh_binding(&mut self, hint: &str) -> Binding {
        self.symbols.fresh_binding(hint)
    }

    /// The memoized SVG namespace constant.
    pub fn svg_namespace(&mut self) -> Binding {
        self.symbols.declare_shared_value(
            SVG_NAMESPACE_KEY,
            SharedInit::Literal(SVG_NAMESPACE_URI.to_string()),
        )
    }

    pub fn helper(&mut self, helper: RuntimeHelper) -> Binding {
        self.symbols
            .declare_shared_value(helper.key(), SharedInit::Helper(helper))
    }

    /// Next lifecycle generation id; starts at 1, never reused.
    pub fn next_generation(&mut self) -> u32 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }
}

impl Default for CompilationUnit<ScopeTracker> {
    fn default() -> Self {
        Self::new(ScopeTracker::new(), LowerOptions::default())
    }
}
