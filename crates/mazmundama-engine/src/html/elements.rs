//! Element classification.
//!
//! Names not listed here are treated as inline formatting wrappers, which is
//! what unknown tags in converted documents almost always are.

/// Block-level elements: they start a new line of layout and break inline runs.
const BLOCK: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "caption",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "html",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Elements without content or end tag.
const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is never translatable text.
const OPAQUE: &[&str] = &["head", "script", "style", "template"];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT: &[&str] = &["script", "style"];

/// Elements whose end tag may be omitted without it being an anomaly.
const OPTIONAL_END: &[&str] = &[
    "body", "dd", "dt", "head", "html", "li", "p", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Blocks whose text forms sentence units. Other blocks only hold structure.
const UNIT_BLOCKS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "li"];

pub fn is_block(name: &str) -> bool {
    BLOCK.contains(&name)
}

pub fn is_void(name: &str) -> bool {
    VOID.contains(&name)
}

pub fn is_opaque(name: &str) -> bool {
    OPAQUE.contains(&name)
}

pub fn is_raw_text(name: &str) -> bool {
    RAW_TEXT.contains(&name)
}

pub fn has_optional_end(name: &str) -> bool {
    OPTIONAL_END.contains(&name)
}

/// Whether text runs inside `name` become units (and an empty `name` gets a
/// placeholder).
pub fn holds_units(name: &str) -> bool {
    UNIT_BLOCKS.contains(&name)
}

/// Heading level for `h1`..`h6`.
pub fn heading_level(name: &str) -> Option<u8> {
    match name.as_bytes() {
        [b'h', level @ b'1'..=b'6'] => Some(level - b'0'),
        _ => None,
    }
}

/// Whether opening `name` implicitly closes an open `<p>`.
pub fn closes_paragraph(name: &str) -> bool {
    is_block(name)
        && !matches!(
            name,
            "body"
                | "caption"
                | "dd"
                | "dt"
                | "html"
                | "li"
                | "summary"
                | "tbody"
                | "td"
                | "tfoot"
                | "th"
                | "thead"
                | "tr"
        )
}

/// Sibling elements implicitly closed when `name` opens, and the elements
/// that bound the search.
///
/// Opening an `<li>` closes an open `<li>`, but not past the enclosing list.
pub fn closes_siblings(name: &str) -> Option<(&'static [&'static str], &'static [&'static str])> {
    const LIST_ITEM: (&[&str], &[&str]) = (&["li"], &["ul", "ol"]);
    const DEFINITION: (&[&str], &[&str]) = (&["dt", "dd"], &["dl"]);
    const ROW: (&[&str], &[&str]) = (&["tr"], &["table", "thead", "tbody", "tfoot"]);
    const CELL: (&[&str], &[&str]) = (&["td", "th"], &["tr", "table"]);

    match name {
        "li" => Some(LIST_ITEM),
        "dt" | "dd" => Some(DEFINITION),
        "tr" => Some(ROW),
        "td" | "th" => Some(CELL),
        _ => None,
    }
}
