pub mod error;
pub mod placeholder;
pub mod template_ast;
pub mod template_parse;

pub use error::TemplateError;
pub use placeholder::{Fragment, contains_placeholder, encode, join_quasis, non_empty, split};
pub use template_ast::{Child, ParsedNode, Tag, Template};
pub use template_parse::parse_template;
