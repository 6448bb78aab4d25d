use std::fmt;

use super::elements;

/// An attribute on an element. The value is stored decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for valueless attributes such as `checked`.
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// An element with its lowercased name, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data in source form: character references are kept as written.
    Text(String),
    /// Comment body, without the `<!--` and `-->` delimiters.
    Comment(String),
    /// Declaration body, without the angle brackets (`!DOCTYPE html`).
    Declaration(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the value of attribute `name`, if present with a value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_deref())
    }

    /// Whether the `class` attribute lists `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn is_block(&self) -> bool {
        elements::is_block(&self.name)
    }

    pub fn is_opaque(&self) -> bool {
        elements::is_opaque(&self.name)
    }

    /// Whether any descendant is a block-level element.
    pub fn contains_block(&self) -> bool {
        self.children.iter().any(|child| match child {
            Node::Element(el) => el.is_block() || el.contains_block(),
            _ => false,
        })
    }

    /// Whether this element or anything under it forces block layout.
    pub fn is_block_like(&self) -> bool {
        self.is_block() || self.contains_block()
    }
}

impl Node {
    pub fn text(raw: impl Into<String>) -> Self {
        Node::Text(raw.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_element(&self, name: &str) -> bool {
        self.as_element().is_some_and(|el| el.name == name)
    }

    /// Whether this node takes part in block layout (as opposed to inline flow).
    pub fn is_block_like(&self) -> bool {
        self.as_element().is_some_and(Element::is_block_like)
    }

    /// The text a reader sees: character references decoded, markup and
    /// opaque elements (scripts, styles) dropped. A `<br>` reads as a newline.
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        self.write_visible_text(&mut out);
        out
    }

    fn write_visible_text(&self, out: &mut String) {
        match self {
            Node::Text(raw) => out.push_str(&html_escape::decode_html_entities(raw)),
            Node::Element(el) if el.name == "br" => out.push('\n'),
            Node::Element(el) if !el.is_opaque() => {
                for child in &el.children {
                    child.write_visible_text(out);
                }
            }
            _ => {}
        }
    }

    /// Length of the visible text in characters.
    pub fn char_len(&self) -> usize {
        self.visible_text().chars().count()
    }

    /// Whether the visible text is empty after trimming whitespace.
    pub fn is_blank(&self) -> bool {
        self.visible_text().trim().is_empty()
    }

    /// Serializes the node back to markup.
    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(raw) => out.push_str(raw),
            Node::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            Node::Declaration(body) => {
                out.push('<');
                out.push_str(body);
                out.push('>');
            }
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.name);
                for attr in &el.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if let Some(value) = &attr.value {
                        out.push_str("=\"");
                        out.push_str(&html_escape::encode_double_quoted_attribute(value));
                        out.push('"');
                    }
                }
                if elements::is_void(&el.name) {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Serializes a sequence of sibling nodes.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

/// Visible text of a sequence of sibling nodes.
pub fn visible_text(nodes: &[Node]) -> String {
    nodes.iter().map(Node::visible_text).collect()
}

/// The document's top-level content.
///
/// For a full document this is what sits under `<html>` and `<body>`
/// (including anything a sloppy converter left after `</body>`), minus the
/// `<head>`. A fragment's top level is its root nodes. Declarations are
/// dropped.
pub fn top_level(nodes: &[Node]) -> Vec<&Node> {
    let mut out = Vec::new();
    collect_top_level(nodes, &mut out);
    out
}

fn collect_top_level<'a>(nodes: &'a [Node], out: &mut Vec<&'a Node>) {
    for node in nodes {
        match node {
            Node::Element(el) if el.name == "html" || el.name == "body" => {
                collect_top_level(&el.children, out)
            }
            Node::Element(el) if el.name == "head" => {}
            Node::Declaration(_) => {}
            _ => out.push(node),
        }
    }
}
