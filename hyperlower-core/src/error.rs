use hyperlower_template::TemplateError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("invalid template: {0}")]
    Template(#[from] TemplateError),
}
