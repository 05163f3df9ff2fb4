use std::path::PathBuf;

use hyperlower_core::LowerError;
use thiserror::Error;

/// The scanner could not make sense of the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("invalid escape sequence `{sequence}` in template literal")]
    InvalidEscape { offset: usize, sequence: String },
}

impl ScanError {
    /// Byte offset into the scanned text.
    pub fn offset(&self) -> usize {
        match self {
            ScanError::Syntax { offset, .. } | ScanError::InvalidEscape { offset, .. } => *offset,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{line}:{col}: {source}")]
    Scan {
        line: usize,
        col: usize,
        #[source]
        source: ScanError,
    },
    #[error("{line}:{col}: template could not be compiled: {source}")]
    Template {
        line: usize,
        col: usize,
        #[source]
        source: LowerError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
