use hyperlower_js::{Options, TransformError, transform_source};

fn transform(src: &str) -> String {
    transform_source(src, &Options::default())
        .expect("transform succeeds")
        .code
}

#[test]
fn elements_and_children() {
    let src = "const html = require('choo/html')

const child = html`<h1>Page header</h1>`
const header = html`<header>${child}</header>`
";
    let expected = "var _appendChild = require(\"yo-yoify/lib/appendChild\");
const html = require('choo/html')

const child = (() => {
  var _h = document.createElement(\"h1\");
  _h.textContent = \"Page header\";
  return _h;
})()
const header = (() => {
  var _header = document.createElement(\"header\");
  _appendChild(_header, [child]);
  return _header;
})()
";
    assert_eq!(transform(src), expected);
}

#[test]
fn lifecycle_handlers_and_bel_import_removal() {
    let src = "import bel from 'bel'

const onload = bel`
  <div onload=${onloadHandler} />
`
";
    let expected = "var _onload = require(\"on-load\");

const onload = (() => {
  var _div = document.createElement(\"div\");
  _onload(_div, onloadHandler, null, 1);
  return _div;
})()
";
    assert_eq!(transform(src), expected);
}

#[test]
fn generations_are_unique_per_file() {
    let src = "var html = require('yo-yo')
var a = html`<div onload=${load}></div>`
var b = html`<div onunload=${() => { alert('Bye') }}></div>`
";
    let out = transform(src);
    assert!(out.contains("_onload(_div, load, null, 1);"));
    assert!(out.contains("_onload(_div2, null, (() => { alert('Bye') }), 2);"));
    assert_eq!(out.matches("require(\"on-load\")").count(), 1);
    // yo-yo is a template module but not removed by default.
    assert!(out.contains("var html = require('yo-yo')"));
}

#[test]
fn dynamic_attribute_uses_inlined_helper() {
    let src = "var bel = require('bel')
var handler = isTouchDevice ? 'ontouchstart' : 'onmousedown'
var el = bel`<div id=\"halp\" ${handler}=${() => {}}></div>`
";
    let out = transform(src);
    assert!(out.starts_with("var _setAttribute = function setAttribute(el, attr, value) {"));
    assert!(out.contains("  _halp.setAttribute(\"id\", \"halp\");\n"));
    assert!(out.contains("  _setAttribute(_halp, handler, (() => {}));\n"));
    assert!(!out.contains("require('bel')"));
}

#[test]
fn spread_props_placeholder() {
    let src = "var html = require('choo/html')\nvar b = html`<button ${props}>boop</button>`\n";
    let out = transform(src);
    assert!(out.contains("_setAttribute(_button, props, props);"));
    assert!(out.contains("_button.textContent = \"boop\";"));
}

#[test]
fn nested_templates_compile_inside_out() {
    let src = "const html = require('choo/html')
const list = html`<ul>${items.map((item) => html`<li>${item}</li>`)}</ul>`
";
    let result = transform_source(src, &Options::default()).unwrap();
    assert_eq!(result.templates, 2);
    let out = result.code;
    assert!(!out.contains("html`"));
    assert!(out.contains("var _li = document.createElement(\"li\");"));
    assert!(out.contains("_appendChild(_li, [item]);"));
    // The rewritten substitution spans lines, so it is wrapped on its own.
    assert!(out.contains("_appendChild(_ul, [(\nitems.map((item) => (() => {"));
}

#[test]
fn unrecognized_tags_are_left_alone() {
    let src = "const html = require('choo/html')
const q = gql`query ${html`<p>x</p>`}`
const s = String.raw`a ${b}`
const t = other`<div></div>`
";
    let out = transform(src);
    assert!(out.contains("const q = gql`query ${(() => {"));
    assert!(out.contains("_p.textContent = \"x\";"));
    assert!(out.contains("const s = String.raw`a ${b}`"));
    assert!(out.contains("const t = other`<div></div>`"));
}

#[test]
fn inline_require_tag() {
    let out = transform("module.exports = require('bel')`<p>hi</p>`\n");
    assert_eq!(
        out,
        "module.exports = (() => {\n  var _p = document.createElement(\"p\");\n  _p.textContent = \"hi\";\n  return _p;\n})()\n"
    );
}

#[test]
fn import_style_after_use_strict() {
    let options = Options {
        use_import_style: true,
        ..Options::default()
    };
    let src = "'use strict'\nimport html from 'choo/html'\nexport default (x) => html`<main>${x}</main>`\n";
    let out = transform_source(src, &options).unwrap().code;
    assert!(out.starts_with(
        "'use strict'\nimport _appendChild from \"yo-yoify/lib/appendChild\";\nimport html from 'choo/html'\n"
    ));
}

#[test]
fn svg_namespace_declared_once() {
    let src = "var html = require('bel')
var a = html`<svg><circle r=\"2\"></circle></svg>`
var b = html`<div><svg></svg></div>`
";
    let out = transform(src);
    assert_eq!(
        out.matches("var _svgNamespace = \"http://www.w3.org/2000/svg\";").count(),
        1
    );
    assert!(out.contains("document.createElementNS(_svgNamespace, \"circle\")"));
    assert!(out.contains("var _div = document.createElement(\"div\");"));
}

#[test]
fn boolean_attribute_toggle() {
    let src = "var html = require('bel')\nvar i = html`<input disabled=${off}>`\n";
    let out = transform(src);
    assert!(out.contains("if (off) _input.setAttribute(\"disabled\", \"disabled\");"));
}

#[test]
fn composed_attribute_in_order() {
    let src = "var html = require('bel')\nvar a = html`<a class=\"btn ${kind} ${size}\"></a>`\n";
    let out = transform(src);
    assert!(out.contains(
        "_a.setAttribute(\"class\", \"btn \" + String(kind) + \" \" + String(size) + \"\");"
    ));
}

#[test]
fn existing_identifiers_are_not_reused() {
    let src = "var html = require('bel')\nvar _div = 1\nvar el = html`<div></div>`\n";
    let out = transform(src);
    assert!(out.contains("var _div2 = document.createElement(\"div\");"));
}

#[test]
fn blank_template_becomes_null() {
    let out = transform("var html = require('bel')\nvar el = html`  `\n");
    assert_eq!(out, "var el = null\n");
}

#[test]
fn whitespace_collapse_can_be_disabled() {
    let src = "var html = require('bel')\nvar p = html`<p>\n  hi\n</p>`\n";
    assert!(transform(src).contains("_p.textContent = \" hi \";"));

    let options = Options {
        collapse_whitespace: false,
        ..Options::default()
    };
    let out = transform_source(src, &options).unwrap().code;
    assert!(out.contains("_p.textContent = \"\\n  hi\\n\";"));
}

#[test]
fn template_error_reports_position() {
    let src = "var html = require('yo-yo')\nconst a = 1\nconst b = html`<div><p></div>`\n";
    let err = transform_source(src, &Options::default()).unwrap_err();
    match err {
        TransformError::Template { line, col, .. } => assert_eq!((line, col), (3, 11)),
        other => panic!("expected template error, got {other:?}"),
    }
}

#[test]
fn scan_error_reports_line() {
    let src = "var html = require('bel')\nvar s = 'unterminated\n";
    let err = transform_source(src, &Options::default()).unwrap_err();
    assert!(matches!(err, TransformError::Scan { line: 2, .. }));
}

#[test]
fn source_without_templates_is_unchanged() {
    let src = "const x = `plain ${y}`\n// nothing here\n";
    assert_eq!(transform(src), src);
}

#[test]
fn template_starting_a_line_is_not_called_by_the_previous_one() {
    let src = "const html = require('choo/html')\nlet el = make\nhtml`<p>x</p>`.id\n";
    let out = transform(src);
    assert!(out.contains("let el = make\n;(() => {\n  var _p = document.createElement(\"p\");"));
    assert!(out.contains("})().id\n"));

    let src = "const html = require('choo/html')\nfunction f () {\n  if (ok)\n    html`<p>x</p>`\n  return\n}\n";
    assert!(transform(src).contains("  if (ok)\n    (() => {"));
}

#[test]
fn require_in_first_of_several_declarators() {
    let src = "var html = require('bel'), x = 1\nvar el = html`<p>x</p>`\n";
    assert_eq!(
        transform(src),
        "var x = 1\nvar el = (() => {\n  var _p = document.createElement(\"p\");\n  _p.textContent = \"x\";\n  return _p;\n})()\n"
    );
}
