use crate::error::TemplateError;
use crate::placeholder::contains_placeholder;
use crate::template_ast::{Child, ParsedNode};

/// Elements that never have children and need no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Hand-rolled hypertext parser for template sources with placeholder tokens:
/// - nested elements, self-closing tags (`<input/>`) and void elements
/// - quoted, unquoted and bare attributes; `class`/`for` become
///   `className`/`htmlFor`, and a bare attribute's value is its own name
/// - `<!-- comments -->` with literal text only
///
/// Returns `Ok(None)` when the input holds nothing but whitespace.
pub fn parse_template(input: &str) -> Result<Option<ParsedNode>, TemplateError> {
    let bytes = input.as_bytes();
    let mut i = 0usize;
    let mut stack: Vec<(ParsedNode, usize)> = Vec::new();
    let mut roots: Vec<(Child, usize)> = Vec::new();

    fn push_child(
        stack: &mut [(ParsedNode, usize)],
        roots: &mut Vec<(Child, usize)>,
        child: Child,
        offset: usize,
    ) {
        if let Some((parent, _)) = stack.last_mut() {
            parent.children.push(child);
        } else {
            roots.push((child, offset));
        }
    }

    while i < bytes.len() {
        if bytes[i] != b'<' {
            // text until the next tag
            let start = i;
            while i < bytes.len() && bytes[i] != b'<' {
                i += 1;
            }
            let text = input[start..i].to_string();
            push_child(&mut stack, &mut roots, Child::Text(text), start);
            continue;
        }

        let start = i;
        if input[i..].starts_with("<!--") {
            let body = i + 4;
            let Some(len) = input[body..].find("-->") else {
                return Err(TemplateError::Unterminated {
                    what: "comment",
                    offset: start,
                });
            };
            let text = &input[body..body + len];
            if contains_placeholder(text) {
                return Err(TemplateError::PlaceholderInComment { offset: start });
            }
            push_child(
                &mut stack,
                &mut roots,
                Child::Node(ParsedNode::comment(text)),
                start,
            );
            i = body + len + 3;
            continue;
        }

        if bytes.get(i + 1) == Some(&b'/') {
            // closing tag
            i += 2;
            let tag = read_tag_name(input, &mut i);
            skip_ws(bytes, &mut i);
            if bytes.get(i) != Some(&b'>') {
                return Err(TemplateError::Unterminated {
                    what: "closing tag",
                    offset: start,
                });
            }
            i += 1;
            let Some((node, _)) = stack.pop() else {
                return Err(TemplateError::UnexpectedClosingTag { tag, offset: start });
            };
            let expected = node.tag_name().unwrap_or_default();
            if expected != tag {
                return Err(TemplateError::MismatchedClosingTag {
                    expected: expected.to_string(),
                    found: tag,
                    offset: start,
                });
            }
            push_child(&mut stack, &mut roots, Child::Node(node), start);
            continue;
        }

        // opening or self-closing tag
        i += 1;
        let tag = read_tag_name(input, &mut i);
        if tag.is_empty() {
            return Err(TemplateError::MissingTagName { offset: start });
        }
        if contains_placeholder(&tag) {
            return Err(TemplateError::DynamicTagName { offset: start });
        }
        let is_void = VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str());
        let mut node = ParsedNode::element(tag);
        let mut self_closing = false;

        loop {
            skip_ws(bytes, &mut i);
            match bytes.get(i) {
                None => {
                    return Err(TemplateError::Unterminated {
                        what: "tag",
                        offset: start,
                    });
                }
                Some(b'>') => {
                    i += 1;
                    break;
                }
                Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                    self_closing = true;
                    i += 2;
                    break;
                }
                Some(_) => match read_attribute(input, &mut i)? {
                    Some((name, value)) => {
                        node.props.insert(name, value);
                    }
                    // stray character such as a lone `/`
                    None => i += 1,
                },
            }
        }

        if self_closing || is_void {
            push_child(&mut stack, &mut roots, Child::Node(node), start);
        } else {
            stack.push((node, start));
        }
    }

    if let Some((node, offset)) = stack.pop() {
        return Err(TemplateError::UnclosedElement {
            tag: node.tag_name().unwrap_or_default().to_string(),
            offset,
        });
    }

    let mut root = None;
    let mut count = 0;
    for (child, offset) in roots {
        match child {
            Child::Text(t) if t.trim().is_empty() => {}
            Child::Text(_) => return Err(TemplateError::StrayText { offset }),
            Child::Node(node) => {
                count += 1;
                if root.is_none() {
                    root = Some(node);
                }
            }
        }
    }
    if count > 1 {
        return Err(TemplateError::RootCount { count });
    }
    Ok(root)
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn read_tag_name(input: &str, i: &mut usize) -> String {
    let bytes = input.as_bytes();
    let start = *i;
    while *i < bytes.len() {
        let c = bytes[*i];
        if c.is_ascii_whitespace() || c == b'>' || c == b'/' {
            break;
        }
        *i += 1;
    }
    input[start..*i].to_string()
}

fn at_tag_end(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i) {
        Some(b'>') => true,
        Some(b'/') => bytes.get(i + 1) == Some(&b'>'),
        _ => false,
    }
}

fn read_attribute(input: &str, i: &mut usize) -> Result<Option<(String, String)>, TemplateError> {
    let bytes = input.as_bytes();
    let name_start = *i;
    while *i < bytes.len() {
        let c = bytes[*i];
        if c.is_ascii_whitespace() || c == b'=' || at_tag_end(bytes, *i) {
            break;
        }
        *i += 1;
    }
    if *i == name_start {
        return Ok(None);
    }
    let raw_name = &input[name_start..*i];

    skip_ws(bytes, i);
    let value = if bytes.get(*i) == Some(&b'=') {
        *i += 1;
        skip_ws(bytes, i);
        read_value(input, i)?
    } else {
        raw_name.to_string()
    };

    let name = match raw_name {
        "class" => "className".to_string(),
        "for" => "htmlFor".to_string(),
        other => other.to_string(),
    };
    Ok(Some((name, value)))
}

fn read_value(input: &str, i: &mut usize) -> Result<String, TemplateError> {
    let bytes = input.as_bytes();
    let start = *i;
    match bytes.get(*i) {
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            *i += 1;
            let body = *i;
            while *i < bytes.len() && bytes[*i] != quote {
                *i += 1;
            }
            if *i >= bytes.len() {
                return Err(TemplateError::Unterminated {
                    what: "attribute value",
                    offset: start,
                });
            }
            let value = input[body..*i].to_string();
            *i += 1; // closing quote
            Ok(value)
        }
        _ => {
            while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && !at_tag_end(bytes, *i) {
                *i += 1;
            }
            Ok(input[start..*i].to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquoted_value_stops_before_self_close() {
        let root = parse_template("<input value=abc/>").unwrap().unwrap();
        assert_eq!(root.props.get("value").map(String::as_str), Some("abc"));
        assert!(root.children.is_empty());
    }

    #[test]
    fn later_duplicate_attribute_wins_in_place() {
        let root = parse_template(r#"<p a="1" b="2" a="3"></p>"#)
            .unwrap()
            .unwrap();
        let props: Vec<_> = root
            .props
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(props, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn whitespace_only_input_has_no_root() {
        assert_eq!(parse_template("  \n ").unwrap(), None);
        assert_eq!(parse_template("").unwrap(), None);
    }
}
