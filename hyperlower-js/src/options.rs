//! Transformer configuration.
//!
//! Loaded from TOML with camelCase keys; every key is optional.

use std::path::Path;

use hyperlower_core::{LowerOptions, RuntimeHelper};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Modules whose default export is a template tag.
    pub template_modules: Vec<String>,
    /// Modules whose import/require is deleted once templates are compiled.
    pub remove_imports: Vec<String>,
    pub append_child_module: String,
    /// `None` inlines the helper into each file.
    pub set_attribute_module: Option<String>,
    pub on_load_module: String,
    /// Emit `import x from 'm'` instead of `var x = require('m')`.
    pub use_import_style: bool,
    pub lifecycle: bool,
    pub collapse_whitespace: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            template_modules: ["bel", "yo-yo", "choo", "choo/html"]
                .map(String::from)
                .to_vec(),
            remove_imports: vec!["bel".to_string()],
            append_child_module: "yo-yoify/lib/appendChild".to_string(),
            set_attribute_module: None,
            on_load_module: "on-load".to_string(),
            use_import_style: false,
            lifecycle: true,
            collapse_whitespace: true,
        }
    }
}

/// Command-line overrides; `Some` wins over the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub append_child_module: Option<String>,
    pub set_attribute_module: Option<String>,
    pub on_load_module: Option<String>,
    pub use_import_style: bool,
    pub no_lifecycle: bool,
    pub keep_whitespace: bool,
}

impl Options {
    /// Load options from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn merge_overrides(&mut self, overrides: &Overrides) {
        if let Some(module) = &overrides.append_child_module {
            self.append_child_module = module.clone();
        }
        if let Some(module) = &overrides.set_attribute_module {
            self.set_attribute_module = Some(module.clone());
        }
        if let Some(module) = &overrides.on_load_module {
            self.on_load_module = module.clone();
        }
        if overrides.use_import_style {
            self.use_import_style = true;
        }
        if overrides.no_lifecycle {
            self.lifecycle = false;
        }
        if overrides.keep_whitespace {
            self.collapse_whitespace = false;
        }
    }

    pub fn lower_options(&self) -> LowerOptions {
        LowerOptions {
            lifecycle: self.lifecycle,
            collapse_whitespace: self.collapse_whitespace,
        }
    }

    pub fn is_template_module(&self, module: &str) -> bool {
        self.template_modules.iter().any(|m| m == module)
    }

    pub fn removes_import(&self, module: &str) -> bool {
        self.remove_imports.iter().any(|m| m == module)
    }

    /// Module a helper is loaded from; `None` means inline its source.
    pub fn helper_module(&self, helper: RuntimeHelper) -> Option<&str> {
        match helper {
            RuntimeHelper::AppendChild => Some(self.append_child_module.as_str()),
            RuntimeHelper::SetAttribute => self.set_attribute_module.as_deref(),
            RuntimeHelper::OnLoad => Some(self.on_load_module.as_str()),
        }
    }
}
