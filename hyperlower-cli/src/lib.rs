use anyhow::{Context, Result};
use clap::ValueEnum;
use hyperlower_core::{CompilationUnit, RuntimeHelper, ScopeTracker, Template, lower_template};
use hyperlower_js::{
    Item, JsEmitter, Options, Overrides, cook, module_source, render_declarations, scan,
    transform_source,
};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime helpers that ship as standalone modules.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Helper {
    AppendChild,
    SetAttribute,
}

impl From<Helper> for RuntimeHelper {
    fn from(helper: Helper) -> Self {
        match helper {
            Helper::AppendChild => RuntimeHelper::AppendChild,
            Helper::SetAttribute => RuntimeHelper::SetAttribute,
        }
    }
}

/// Options from `config` (if given) with command-line overrides applied.
pub fn load_options(config: Option<&Path>, overrides: &Overrides) -> Result<Options> {
    let mut options = match config {
        Some(path) => Options::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Options::default(),
    };
    options.merge_overrides(overrides);
    Ok(options)
}

/// Compile the templates of a JavaScript file into `out_dir`, keeping the
/// file name.
pub fn build_cmd(input: &Path, out_dir: Option<&Path>, options: &Options) -> Result<PathBuf> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;

    let transformed = transform_source(&src, options)
        .with_context(|| format!("failed to transform {}", input.display()))?;

    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("index.js");

    let out_dir = out_dir
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("target/hyperlower-gen"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let out_path = out_dir.join(name);
    fs::write(&out_path, transformed.code)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    info!(templates = transformed.templates, "compiled {}", input.display());
    println!("Generated: {}", out_path.display());
    Ok(out_path)
}

/// Lower the body of one template literal, e.g. `<p>${name}</p>`.
///
/// Returns the operation list, one per line, or with `emit_js` the code the
/// transformer would write for it.
pub fn lower_cmd(body: &str, options: &Options, emit_js: bool) -> Result<String> {
    let literal = format!("`{body}`");
    let items = scan(&literal).context("failed to read template")?;
    let template = match items.as_slice() {
        [Item::Template(t)] if t.span == (0..literal.len()) => t,
        _ => anyhow::bail!("input is not the body of a single template literal"),
    };

    let mut quasis = Vec::with_capacity(template.quasis.len());
    for quasi in &template.quasis {
        quasis.push(cook(&quasi.raw).context("failed to read template")?);
    }
    let expressions = template
        .substitutions
        .iter()
        .map(|s| s.text.trim().to_string())
        .collect();
    let template = Template::new(quasis, expressions)?;

    let mut unit = CompilationUnit::new(ScopeTracker::new(), options.lower_options());
    let lowered = lower_template(&template, &mut unit)?;

    let mut out = String::new();
    if emit_js {
        let code = JsEmitter::new(template.expressions()).render(&lowered, &mut unit);
        out.push_str(&render_declarations(unit.symbols().shared_values(), options));
        writeln!(out, "{code}")?;
    } else {
        for op in &lowered.operations {
            writeln!(out, "{op}")?;
        }
        match &lowered.root {
            Some(root) => writeln!(out, "root: {root}")?,
            None => writeln!(out, "root: null")?,
        }
    }
    Ok(out)
}

/// Source of a runtime helper as a CommonJS module.
pub fn runtime_cmd(helper: Helper) -> Result<String> {
    let helper = RuntimeHelper::from(helper);
    module_source(helper).with_context(|| format!("no bundled source for {}", helper.key()))
}
