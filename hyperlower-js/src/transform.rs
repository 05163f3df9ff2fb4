//! Compile every recognized template of one source file in place.

use std::collections::HashSet;
use std::ops::Range;

use hyperlower_core::{CompilationUnit, LowerError, ScopeTracker, Template, lower_template};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::codegen::{JsEmitter, render_declarations};
use crate::error::{ScanError, TransformError};
use crate::options::Options;
use crate::source::{Item, TemplateLiteral, TemplateTag, cook, line_col, scan};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_$][\w$]*").expect("identifier pattern is valid"));

static PROLOGUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:#![^\n]*\n)?(?:\s*(?:'use strict'|"use strict");?[ \t]*\n?)?"#)
        .expect("prologue pattern is valid")
});

/// Result of transforming one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub code: String,
    /// Number of templates compiled, nested ones included.
    pub templates: usize,
}

#[derive(Debug)]
struct Edit {
    range: Range<usize>,
    text: String,
}

fn apply_edits(text: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| (e.range.start, e.range.end));
    let mut out = String::with_capacity(text.len());
    let mut at = 0;
    for edit in edits {
        out.push_str(&text[at..edit.range.start]);
        out.push_str(&edit.text);
        at = edit.range.end;
    }
    out.push_str(&text[at..]);
    out
}

/// Extend `span` over trailing blanks and one line break.
fn with_line_break(source: &str, span: Range<usize>) -> Range<usize> {
    let rest = &source[span.end..];
    let blanks = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let after = &rest[blanks..];
    let newline = if after.starts_with("\r\n") {
        2
    } else if after.starts_with('\n') {
        1
    } else {
        0
    };
    span.start..span.end + blanks + newline
}

// Words after which a template starting the next line is still an operand.
const OPERAND_KEYWORDS: &[&str] = &[
    "await", "case", "delete", "do", "else", "in", "instanceof", "new", "of", "return", "throw",
    "typeof", "void", "yield",
];

const CONTROL_HEADS: &[&str] = &["for", "if", "while", "with"];

fn is_word_char(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

fn trailing_word(s: &str) -> &str {
    let start = s
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_word_char(c))
        .last()
        .map_or(s.len(), |(i, _)| i);
    &s[start..]
}

/// Whether `before` (ending in `)`) closes the head of an `if`/`for`/
/// `while`/`with` statement.
fn closes_control_head(before: &str) -> bool {
    let mut depth = 0usize;
    for (i, b) in before.bytes().enumerate().rev() {
        match b {
            b')' => depth += 1,
            b'(' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return CONTROL_HEADS.contains(&trailing_word(before[..i].trim_end()));
                }
            }
            _ => {}
        }
    }
    false
}

/// Whether code spliced in at `at` needs a leading `;` so that, without
/// one, the previous line would not take it as a call or index.
fn needs_separator(text: &str, at: usize) -> bool {
    let mut end = at;
    let mut line_break = false;
    loop {
        let trimmed = text[..end].trim_end();
        line_break |= text[trimmed.len()..end].contains('\n');
        end = trimmed.len();
        match trimmed.strip_suffix("*/").and_then(|rest| rest.rfind("/*")) {
            Some(open) => end = open,
            None => break,
        }
    }
    if !line_break {
        return false;
    }
    let before = &text[..end];
    match before.chars().next_back() {
        Some(')') => !closes_control_head(before),
        Some(']' | '}' | '"' | '\'' | '`') => true,
        Some(c) if is_word_char(c) => !OPERAND_KEYWORDS.contains(&trailing_word(before)),
        _ => false,
    }
}

/// Byte offset after a shebang line and a leading `"use strict"`.
pub fn prologue_end(source: &str) -> usize {
    PROLOGUE.find(source).map_or(0, |m| m.end())
}

struct Transformer<'s> {
    source: &'s str,
    options: &'s Options,
    tags: HashSet<String>,
    unit: CompilationUnit<ScopeTracker>,
    templates: usize,
}

/// Compile every template in `source` whose tag is bound to one of the
/// configured template modules, and declare the helpers they use.
pub fn transform_source(source: &str, options: &Options) -> Result<Transformed, TransformError> {
    let items = scan(source).map_err(|e| scan_error(source, 0, e))?;

    let mut scope = ScopeTracker::new();
    scope.reserve(IDENTIFIER.find_iter(source).map(|m| m.as_str()));

    let mut transformer = Transformer {
        source,
        options,
        tags: HashSet::new(),
        unit: CompilationUnit::new(scope, options.lower_options()),
        templates: 0,
    };

    let mut edits = Vec::new();
    let mut removed = Vec::new();
    for item in &items {
        if let Item::Binding(binding) = item {
            if options.is_template_module(&binding.module) {
                transformer.tags.insert(binding.local.clone());
            }
            if options.removes_import(&binding.module) {
                removed.push(binding.local.as_str());
                edits.push(Edit {
                    range: with_line_break(source, binding.span.clone()),
                    text: String::new(),
                });
            }
        }
    }
    for item in &items {
        if let Item::Template(template) = item {
            edits.extend(transformer.template(source, 0, template)?);
        }
    }

    let declarations = render_declarations(transformer.unit.symbols().shared_values(), options);
    if !declarations.is_empty() {
        let at = prologue_end(source);
        edits.push(Edit {
            range: at..at,
            text: declarations,
        });
    }

    debug!(
        templates = transformer.templates,
        removed = ?removed,
        "transformed source"
    );
    Ok(Transformed {
        code: apply_edits(source, edits),
        templates: transformer.templates,
    })
}

impl Transformer<'_> {
    fn recognizes(&self, tag: Option<&TemplateTag>) -> bool {
        match tag {
            Some(TemplateTag::Require(module)) => self.options.is_template_module(module),
            Some(tag) => tag.identifier().is_some_and(|name| self.tags.contains(name)),
            None => false,
        }
    }

    /// Rewrite a substitution's text; templates inside it are compiled
    /// first.
    fn fragment(&mut self, text: &str, base: usize) -> Result<String, TransformError> {
        let items = scan(text).map_err(|e| scan_error(self.source, base, e))?;
        let mut edits = Vec::new();
        for item in &items {
            if let Item::Template(template) = item {
                edits.extend(self.template(text, base, template)?);
            }
        }
        Ok(apply_edits(text, edits))
    }

    /// Edits for one template literal of `text`, which starts at `base` in
    /// the file.
    fn template(
        &mut self,
        text: &str,
        base: usize,
        template: &TemplateLiteral,
    ) -> Result<Vec<Edit>, TransformError> {
        let mut expressions = Vec::with_capacity(template.substitutions.len());
        for sub in &template.substitutions {
            expressions.push(self.fragment(&sub.text, base + sub.span.start)?);
        }

        if !self.recognizes(template.tag.as_ref()) {
            return Ok(template
                .substitutions
                .iter()
                .zip(expressions)
                .filter(|(sub, rewritten)| &sub.text != rewritten)
                .map(|(sub, rewritten)| Edit {
                    range: sub.span.clone(),
                    text: rewritten,
                })
                .collect());
        }

        let mut quasis = Vec::with_capacity(template.quasis.len());
        for quasi in &template.quasis {
            let cooked = cook(&quasi.raw).map_err(|e| match e {
                ScanError::InvalidEscape { offset, sequence } => scan_error(
                    self.source,
                    base,
                    ScanError::InvalidEscape {
                        offset: quasi.span.start + offset,
                        sequence,
                    },
                ),
                other => scan_error(self.source, base, other),
            })?;
            quasis.push(cooked);
        }

        let start = base + template.span.start;
        let lowered = Template::new(quasis, expressions)
            .map_err(LowerError::from)
            .and_then(|t| {
                let lowered = lower_template(&t, &mut self.unit)?;
                Ok((t, lowered))
            })
            .map_err(|source| {
                let (line, col) = line_col(self.source, start);
                TransformError::Template { line, col, source }
            })?;
        let (parsed, lowered) = lowered;

        let mut code = JsEmitter::new(parsed.expressions()).render(&lowered, &mut self.unit);
        if needs_separator(text, template.span.start) {
            code.insert(0, ';');
        }
        self.templates += 1;
        trace!(
            offset = start,
            operations = lowered.operations.len(),
            "compiled template"
        );
        Ok(vec![Edit {
            range: template.span.clone(),
            text: code,
        }])
    }
}

fn scan_error(source: &str, base: usize, error: ScanError) -> TransformError {
    let (line, col) = line_col(source, base + error.offset());
    TransformError::Scan {
        line,
        col,
        source: error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_apply_in_order() {
        let out = apply_edits(
            "abcdef",
            vec![
                Edit {
                    range: 4..5,
                    text: "E".into(),
                },
                Edit {
                    range: 0..0,
                    text: ">".into(),
                },
                Edit {
                    range: 0..2,
                    text: String::new(),
                },
            ],
        );
        assert_eq!(out, ">cdEf");
    }

    #[test]
    fn removal_takes_the_line_break() {
        let src = "import a from 'a';  \nnext";
        assert_eq!(with_line_break(src, 0..18), 0..21);
        assert_eq!(with_line_break("x;y", 0..2), 0..2);
    }

    #[test]
    fn separator_only_where_the_previous_line_would_continue() {
        let at = |src: &str| needs_separator(src, src.len());
        assert!(at("let el = make\n"));
        assert!(at("foo()\n  "));
        assert!(at("list[0] /* c */\n"));
        assert!(at("x = 'a'\n"));
        assert!(!at("return "));
        assert!(!at("make "));
        assert!(!at("return\n"));
        assert!(!at("} else\n"));
        assert!(!at("if (ok(a))\n"));
        assert!(!at("x =\n"));
        assert!(!at(""));
    }

    #[test]
    fn prologue_skips_shebang_and_directive() {
        assert_eq!(prologue_end("var x"), 0);
        let src = "#!/usr/bin/env node\n'use strict'\nvar x";
        assert_eq!(&src[prologue_end(src)..], "var x");
        let src = "\"use strict\";\nvar x";
        assert_eq!(&src[prologue_end(src)..], "var x");
    }
}
