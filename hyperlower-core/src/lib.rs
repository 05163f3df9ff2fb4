//! Compile-time lowering of hypertext tagged templates into ordered DOM
//! construction operations.

pub mod attrs;
pub mod children;
pub mod error;
pub mod lower;
pub mod naming;
pub mod unit;

pub use error::LowerError;
pub use lower::{LowerOptions, lower_node, lower_template, required_helper};
pub use unit::{
    CompilationUnit, RuntimeHelper, SVG_NAMESPACE_URI, ScopeTracker, SharedInit, SymbolFacility,
};

pub use hyperlower_ops::{Binding, Lowered, Operation, ValueExpr};
pub use hyperlower_template::{ParsedNode, Template};
