//! JavaScript front end: finds hypertext tagged templates in a source file,
//! lowers them and writes plain DOM construction code in their place.

pub mod codegen;
pub mod error;
pub mod options;
pub mod runtime;
pub mod source;
pub mod transform;

pub use codegen::{JsEmitter, render_declarations, string_lit};
pub use error::{ConfigError, ScanError, TransformError};
pub use options::{Options, Overrides};
pub use runtime::{APPEND_CHILD_SOURCE, SET_ATTRIBUTE_SOURCE, helper_source, module_source};
pub use source::{Item, ModuleBinding, TemplateLiteral, TemplateTag, cook, line_col, scan};
pub use transform::{Transformed, transform_source};
