use hyperlower_template::{Child, ParsedNode, Tag, TemplateError, encode, parse_template};
use rstest::rstest;

fn root(src: &str) -> ParsedNode {
    parse_template(src)
        .expect("parse ok")
        .expect("template has a root")
}

#[test]
fn parse_element_with_text() {
    let ast = root("<div>hi</div>");
    assert_eq!(ast.tag, Tag::Element("div".into()));
    assert_eq!(ast.children, vec![Child::Text("hi".into())]);
}

#[test]
fn parse_nested_elements_keep_order() {
    let ast = root("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
    let tags: Vec<_> = ast
        .children
        .iter()
        .filter_map(|c| match c {
            Child::Node(n) => n.tag_name(),
            Child::Text(_) => None,
        })
        .collect();
    assert_eq!(tags, vec!["li", "li"]);
    assert_eq!(ast.children.len(), 5);
}

#[test]
fn parse_attrs_quoted_unquoted_and_bare() {
    let src = format!(
        r#"<input class="x y" type=text disabled value={}/>"#,
        encode(0)
    );
    let ast = root(&src);
    assert_eq!(ast.props.get("className").map(String::as_str), Some("x y"));
    assert_eq!(ast.props.get("type").map(String::as_str), Some("text"));
    assert_eq!(ast.props.get("disabled").map(String::as_str), Some("disabled"));
    assert_eq!(ast.props.get("value"), Some(&encode(0)));
    let keys: Vec<_> = ast.props.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["className", "type", "disabled", "value"]);
}

#[test]
fn parse_label_for_becomes_html_for() {
    let ast = root(r#"<label for="name">Name</label>"#);
    assert_eq!(ast.props.get("htmlFor").map(String::as_str), Some("name"));
}

#[test]
fn parse_attribute_position_placeholder() {
    let src = format!("<button {}>boop</button>", encode(0));
    let ast = root(&src);
    assert_eq!(ast.props.get(&encode(0)), Some(&encode(0)));
}

#[test]
fn parse_void_elements_close_implicitly() {
    let ast = root("<p>a<br>b<img src=x.png></p>");
    assert_eq!(ast.children.len(), 4);
    match &ast.children[1] {
        Child::Node(n) => assert_eq!(n.tag_name(), Some("br")),
        other => panic!("expected <br>, got {other:?}"),
    }
}

#[test]
fn parse_comment_node() {
    let ast = root("<div><!-- note --></div>");
    match &ast.children[0] {
        Child::Node(n) => {
            assert_eq!(n.tag, Tag::Comment);
            assert_eq!(n.comment_text(), Some(" note "));
        }
        other => panic!("expected comment, got {other:?}"),
    }
}

#[test]
fn parse_text_with_placeholders_stays_raw() {
    let src = format!("<p>Hello {}!</p>", encode(0));
    let ast = root(&src);
    assert_eq!(ast.children, vec![Child::Text(format!("Hello {}!", encode(0)))]);
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let ast = root("\n    <span></span>\n  ");
    assert_eq!(ast.tag_name(), Some("span"));
}

#[rstest]
#[case("<div><span></div>", "does not match")]
#[case("<div>", "never closed")]
#[case("</div>", "no matching opening tag")]
#[case("<div></div><p></p>", "exactly one root")]
#[case("hello <b>x</b>", "outside the root")]
#[case("<div class=\"x></div>", "unterminated attribute value")]
#[case("<div><!-- x </div>", "unterminated comment")]
#[case("< div></div>", "missing tag name")]
fn malformed_templates_fail(#[case] src: &str, #[case] message: &str) {
    let err = parse_template(src).unwrap_err();
    assert!(
        err.to_string().contains(message),
        "error `{err}` should mention `{message}`"
    );
}

#[test]
fn placeholders_in_tags_and_comments_are_rejected() {
    let tag = format!("<{}></{}>", encode(0), encode(0));
    assert!(matches!(
        parse_template(&tag),
        Err(TemplateError::DynamicTagName { .. })
    ));
    let comment = format!("<div><!-- {} --></div>", encode(0));
    assert!(matches!(
        parse_template(&comment),
        Err(TemplateError::PlaceholderInComment { .. })
    ));
}
