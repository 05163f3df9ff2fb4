use convert_case::{Case, Casing};
use hyperlower_template::contains_placeholder;
use indexmap::IndexMap;

/// Binding hint when an element has no id, class or tag to go by.
pub const FALLBACK_NAME: &str = "bel";

/// SVG element names. Names shared with HTML (`a`, `script`, `style`,
/// `title`) are left out so HTML documents keep the HTML namespace.
const SVG_TAGS: &[&str] = &[
    "altGlyph",
    "altGlyphDef",
    "altGlyphItem",
    "animate",
    "animateColor",
    "animateMotion",
    "animateTransform",
    "circle",
    "clipPath",
    "color-profile",
    "cursor",
    "defs",
    "desc",
    "ellipse",
    "feBlend",
    "feColorMatrix",
    "feComponentTransfer",
    "feComposite",
    "feConvolveMatrix",
    "feDiffuseLighting",
    "feDisplacementMap",
    "feDistantLight",
    "feDropShadow",
    "feFlood",
    "feFuncA",
    "feFuncB",
    "feFuncG",
    "feFuncR",
    "feGaussianBlur",
    "feImage",
    "feMerge",
    "feMergeNode",
    "feMorphology",
    "feOffset",
    "fePointLight",
    "feSpecularLighting",
    "feSpotLight",
    "feTile",
    "feTurbulence",
    "filter",
    "font-face",
    "font-face-format",
    "font-face-name",
    "font-face-src",
    "font-face-uri",
    "foreignObject",
    "g",
    "glyph",
    "glyphRef",
    "hkern",
    "image",
    "line",
    "linearGradient",
    "marker",
    "mask",
    "metadata",
    "missing-glyph",
    "mpath",
    "path",
    "pattern",
    "polygon",
    "polyline",
    "radialGradient",
    "rect",
    "set",
    "stop",
    "svg",
    "switch",
    "symbol",
    "text",
    "textPath",
    "tref",
    "tspan",
    "use",
    "view",
    "vkern",
];

/// Readable binding hint for an element: its literal id, else the first
/// word of its literal class, else its tag.
pub fn name_for(props: &IndexMap<String, String>, tag: &str) -> String {
    if let Some(id) = props.get("id").filter(|v| !contains_placeholder(v)) {
        return camel(id);
    }
    if let Some(first) = props
        .get("className")
        .filter(|v| !contains_placeholder(v))
        .and_then(|v| v.split_whitespace().next())
    {
        return camel(first);
    }
    if tag.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        tag.to_string()
    }
}

fn camel(raw: &str) -> String {
    let cased = raw.to_case(Case::Camel);
    if cased.is_empty() {
        raw.to_string()
    } else {
        cased
    }
}

pub fn is_svg_tag(tag: &str) -> bool {
    SVG_TAGS.contains(&tag)
}
