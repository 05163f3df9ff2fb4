//! Lexical scan of a JavaScript source for template literals and the
//! declarations that bind template functions.

use std::ops::Range;

use pest::Parser;
use pest::iterators::Pair;

use crate::error::ScanError;

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
struct JsScanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `import name from 'module'`
    Import,
    /// `var name = require('module')`
    Require,
}

/// A default import, or a require of some module in the first declarator of
/// a `var`/`let`/`const`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleBinding {
    pub local: String,
    pub module: String,
    pub kind: BindingKind,
    /// What to delete to drop the binding: the whole declaration with its
    /// trailing `;`, or only `name = require(..), ` when more declarators
    /// follow.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateTag {
    /// `name` or `a.b.c`, whitespace removed.
    Path(String),
    /// `require('module')` used directly as the tag.
    Require(String),
}

impl TemplateTag {
    /// The identifier, when the tag is a bare one.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            TemplateTag::Path(path) if !path.contains('.') => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quasi {
    pub raw: String,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Source text between `${` and `}`.
    pub text: String,
    pub span: Range<usize>,
}

/// A template literal, tagged or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLiteral {
    pub tag: Option<TemplateTag>,
    /// From the start of the tag (if any) to the closing backtick.
    pub span: Range<usize>,
    pub quasis: Vec<Quasi>,
    pub substitutions: Vec<Substitution>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Binding(ModuleBinding),
    Template(TemplateLiteral),
}

/// Scan `source` and return, in source order, every module binding and every
/// template literal not nested inside another one.
///
/// Templates inside a substitution are not reported; scan the substitution
/// text to find them.
pub fn scan(source: &str) -> Result<Vec<Item>, ScanError> {
    let mut pairs = JsScanner::parse(Rule::file, source).map_err(|e| {
        let offset = match e.location {
            pest::error::InputLocation::Pos(p) => p,
            pest::error::InputLocation::Span((start, _)) => start,
        };
        ScanError::Syntax {
            offset,
            message: e.variant.message().into_owned(),
        }
    })?;
    let Some(file) = pairs.next() else {
        return Ok(Vec::new());
    };

    let mut items = Vec::new();
    for node in file.into_inner() {
        match node.as_rule() {
            Rule::import_decl => items.push(Item::Binding(module_binding(node, BindingKind::Import))),
            Rule::require_decl => {
                items.push(Item::Binding(module_binding(node, BindingKind::Require)))
            }
            Rule::tagged_template | Rule::template => items.push(Item::Template(template(node))),
            _ => {}
        }
    }
    Ok(items)
}

fn span(pair: &Pair<Rule>) -> Range<usize> {
    let s = pair.as_span();
    s.start()..s.end()
}

fn module_name(pair: Pair<Rule>) -> Option<String> {
    pair.into_inner()
        .find(|p| matches!(p.as_rule(), Rule::module_dq | Rule::module_sq))
        .map(|p| p.as_str().to_string())
}

fn module_binding(decl: Pair<Rule>, kind: BindingKind) -> ModuleBinding {
    let mut span = span(&decl);
    let mut local = String::new();
    let mut module = String::new();
    let mut local_start = span.start;
    for part in decl.into_inner() {
        match part.as_rule() {
            Rule::ident => {
                local_start = part.as_span().start();
                local = part.as_str().to_string();
            }
            Rule::more_declarators => span.start = local_start,
            Rule::module_dq | Rule::module_sq => module = part.as_str().to_string(),
            Rule::require_call => module = module_name(part).unwrap_or_default(),
            _ => {}
        }
    }
    ModuleBinding {
        local,
        module,
        kind,
        span,
    }
}

fn template(node: Pair<Rule>) -> TemplateLiteral {
    let full = span(&node);
    let mut tag = None;
    let mut literal = None;
    if node.as_rule() == Rule::template {
        literal = Some(node);
    } else {
        for part in node.into_inner() {
            match part.as_rule() {
                Rule::require_call => tag = module_name(part).map(TemplateTag::Require),
                Rule::member_path => {
                    let path: Vec<&str> = part.into_inner().map(|p| p.as_str()).collect();
                    tag = Some(TemplateTag::Path(path.join(".")));
                }
                Rule::template => literal = Some(part),
                _ => {}
            }
        }
    }

    let mut quasis = Vec::new();
    let mut substitutions = Vec::new();
    for part in literal.into_iter().flat_map(Pair::into_inner) {
        match part.as_rule() {
            Rule::quasi => quasis.push(Quasi {
                raw: part.as_str().to_string(),
                span: span(&part),
            }),
            Rule::substitution => {
                if let Some(expr) = part.into_inner().next() {
                    substitutions.push(Substitution {
                        text: expr.as_str().to_string(),
                        span: span(&expr),
                    });
                }
            }
            _ => {}
        }
    }
    TemplateLiteral {
        tag,
        span: full,
        quasis,
        substitutions,
    }
}

/// Cook a raw template chunk the way the language does for tagged
/// templates. `CRLF` and lone `CR` become `LF`.
///
/// Error offsets are relative to `raw`.
pub fn cook(raw: &str) -> Result<String, ScanError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();
    while let Some((at, c)) = chars.next() {
        match c {
            '\r' => {
                chars.next_if(|&(_, n)| n == '\n');
                out.push('\n');
            }
            '\\' => {
                let Some((_, esc)) = chars.next() else {
                    return Err(invalid(raw, at, raw.len()));
                };
                match esc {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'v' => out.push('\u{b}'),
                    '0' if !chars.peek().is_some_and(|&(_, n)| n.is_ascii_digit()) => {
                        out.push('\0')
                    }
                    '\r' => {
                        chars.next_if(|&(_, n)| n == '\n');
                    }
                    '\n' | '\u{2028}' | '\u{2029}' => {}
                    'x' => {
                        let code = hex_digits(&mut chars, 2).ok_or_else(|| invalid_here(raw, at))?;
                        out.push(char::from_u32(code).ok_or_else(|| invalid_here(raw, at))?);
                    }
                    'u' => out.push(unicode_escape(raw, at, &mut chars)?),
                    '1'..='9' | '0' => return Err(invalid_here(raw, at)),
                    other => out.push(other),
                }
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

type CharIndices<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn hex_digits(chars: &mut CharIndices<'_>, count: usize) -> Option<u32> {
    let mut code = 0;
    for _ in 0..count {
        let (_, c) = chars.next()?;
        code = code * 16 + c.to_digit(16)?;
    }
    Some(code)
}

fn unicode_escape(raw: &str, at: usize, chars: &mut CharIndices<'_>) -> Result<char, ScanError> {
    let code = if chars.next_if(|&(_, c)| c == '{').is_some() {
        let mut code: u32 = 0;
        let mut digits = 0;
        loop {
            match chars.next() {
                Some((_, '}')) if digits > 0 => break,
                Some((_, c)) if c.is_ascii_hexdigit() && code <= 0x10FFFF => {
                    code = code * 16 + c.to_digit(16).unwrap_or_default();
                    digits += 1;
                }
                _ => return Err(invalid_here(raw, at)),
            }
        }
        code
    } else {
        let lead = hex_digits(chars, 4).ok_or_else(|| invalid_here(raw, at))?;
        // Surrogate pair written as two escapes.
        let rest = chars.peek().map_or(raw.len(), |&(i, _)| i);
        if (0xD800..0xDC00).contains(&lead) && raw[rest..].starts_with("\\u") {
            chars.next();
            chars.next();
            let trail = hex_digits(chars, 4)
                .filter(|t| (0xDC00..0xE000).contains(t))
                .ok_or_else(|| invalid_here(raw, at))?;
            0x10000 + ((lead - 0xD800) << 10) + (trail - 0xDC00)
        } else {
            lead
        }
    };
    char::from_u32(code).ok_or_else(|| invalid_here(raw, at))
}

fn invalid(raw: &str, start: usize, end: usize) -> ScanError {
    ScanError::InvalidEscape {
        offset: start,
        sequence: raw[start..end].to_string(),
    }
}

fn invalid_here(raw: &str, start: usize) -> ScanError {
    let end = raw[start + 1..]
        .char_indices()
        .nth(1)
        .map_or(raw.len(), |(i, _)| start + 1 + i);
    invalid(raw, start, end)
}

/// 1-based line and column (in characters) of `offset` in `source`.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}
