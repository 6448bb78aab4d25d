//! Span wrapping: rewrites a parsed tree so that every unit of translatable
//! text sits in `<span class="sentence" data-sentence-id="sent-N">`.
//!
//! Units live in paragraphs, headings and list items. Every other element is
//! structure: it is searched for those blocks at any depth, but text sitting
//! directly in it gets no identifier.
//!
//! The input tree is never modified; a new tree is built alongside the list
//! of units it contains.

use serde::Serialize;

use crate::{
    html::{
        Attribute, Element, Node, elements,
        node::{to_html, visible_text},
    },
    segment::{Segment, Segmenter, SentenceCounter, SentenceId},
};

pub const SENTENCE_CLASS: &str = "sentence";
pub const SENTENCE_ID_ATTR: &str = "data-sentence-id";

/// Content given to empty paragraphs, headings and list items so they keep
/// their height when rendered.
pub const EMPTY_BLOCK_PLACEHOLDER: &str = "\u{a0}";

/// The kind of block a unit came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitKind {
    Paragraph,
    Heading { level: u8 },
    ListItem,
}

impl UnitKind {
    /// The kind of unit `element` holds, or `None` for structural elements.
    fn of(element: &str) -> Option<Self> {
        if !elements::holds_units(element) {
            return None;
        }
        Some(match elements::heading_level(element) {
            Some(level) => UnitKind::Heading { level },
            None if element == "li" => UnitKind::ListItem,
            None => UnitKind::Paragraph,
        })
    }
}

/// A unit produced by the wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedUnit {
    pub id: SentenceId,
    pub kind: UnitKind,
    /// Visible text, trimmed.
    pub text: String,
    /// Markup placed inside the wrapper span.
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedDocument {
    pub nodes: Vec<Node>,
    /// Units in document order; ids run `sent-1..=sent-n`.
    pub units: Vec<WrappedUnit>,
}

/// Wraps every unit of `nodes`, numbering from `sent-1`.
pub fn wrap_document(nodes: &[Node], segmenter: Segmenter) -> WrappedDocument {
    let mut wrapper = Wrapper {
        segmenter,
        counter: SentenceCounter::new(),
        units: vec![],
    };
    let nodes = nodes.iter().map(|node| wrapper.wrap_node(node)).collect();
    log::debug!(
        "wrapped {} units ({:?} granularity)",
        wrapper.counter.issued(),
        segmenter.granularity()
    );
    WrappedDocument {
        nodes,
        units: wrapper.units,
    }
}

struct Wrapper {
    segmenter: Segmenter,
    counter: SentenceCounter,
    units: Vec<WrappedUnit>,
}

impl Wrapper {
    fn wrap_node(&mut self, node: &Node) -> Node {
        let Node::Element(el) = node else {
            return node.clone();
        };
        if el.is_opaque() {
            return node.clone();
        }

        match UnitKind::of(&el.name) {
            Some(kind) => Node::Element(self.wrap_block(el, kind)),
            None => Node::Element(Element {
                name: el.name.clone(),
                attrs: el.attrs.clone(),
                children: el.children.iter().map(|child| self.wrap_node(child)).collect(),
            }),
        }
    }

    fn wrap_block(&mut self, el: &Element, kind: UnitKind) -> Element {
        if !el.contains_block() && el.children.iter().all(Node::is_blank) {
            // Blank text makes way for the placeholder; images and breaks stay
            let mut children: Vec<Node> = el
                .children
                .iter()
                .filter(|child| !matches!(child, Node::Text(_)))
                .cloned()
                .collect();
            children.push(Node::text(EMPTY_BLOCK_PLACEHOLDER));
            return Element {
                name: el.name.clone(),
                attrs: el.attrs.clone(),
                children,
            };
        }

        let mut children = Vec::with_capacity(el.children.len());
        let mut run: Vec<Node> = vec![];

        for child in &el.children {
            let breaks_run = child.is_block_like()
                || child.as_element().is_some_and(Element::is_opaque);
            if breaks_run {
                self.flush_run(&mut run, &mut children, &kind);
                children.push(self.wrap_node(child));
            } else {
                run.push(child.clone());
            }
        }
        self.flush_run(&mut run, &mut children, &kind);

        Element {
            name: el.name.clone(),
            attrs: el.attrs.clone(),
            children,
        }
    }

    /// Replaces a run of inline siblings with its wrapped units.
    fn flush_run(&mut self, run: &mut Vec<Node>, out: &mut Vec<Node>, kind: &UnitKind) {
        if run.is_empty() {
            return;
        }

        let segments = self.segmenter.segment(run);
        if segments.is_empty() {
            out.append(run);
            return;
        }
        run.clear();

        for segment in segments {
            let id = self.counter.next_id();
            let text = segment.visible_text().trim().to_string();
            let content = match segment {
                Segment::Markup(nodes) => nodes,
                Segment::Text(text) => vec![Node::text(html_escape::encode_text(&text))],
            };
            self.units.push(WrappedUnit {
                id,
                kind: kind.clone(),
                text,
                html: to_html(&content),
            });
            out.push(sentence_span(id, content));
        }
    }
}

fn sentence_span(id: SentenceId, children: Vec<Node>) -> Node {
    Node::Element(Element {
        name: "span".to_string(),
        attrs: vec![
            Attribute::new("class", SENTENCE_CLASS),
            Attribute::new(SENTENCE_ID_ATTR, id.to_string()),
        ],
        children,
    })
}

/// The id carried by a wrapper span, if `el` is one.
pub fn sentence_span_id(el: &Element) -> Option<SentenceId> {
    if el.name != "span" || !el.has_class(SENTENCE_CLASS) {
        return None;
    }
    el.attr(SENTENCE_ID_ATTR)?.parse().ok()
}

/// A wrapper span found in already-wrapped markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceSpan {
    pub id: SentenceId,
    pub text: String,
}

/// Finds the wrapper spans in `nodes`, in document order.
pub fn sentence_spans(nodes: &[Node]) -> Vec<SentenceSpan> {
    let mut spans = vec![];
    collect_spans(nodes, &mut spans);
    spans
}

fn collect_spans(nodes: &[Node], spans: &mut Vec<SentenceSpan>) {
    for el in nodes.iter().filter_map(Node::as_element) {
        match sentence_span_id(el) {
            Some(id) => spans.push(SentenceSpan {
                id,
                text: visible_text(&el.children).trim().to_string(),
            }),
            None => collect_spans(&el.children, spans),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{html::parse_html, segment::Granularity};
    use pretty_assertions::assert_eq;

    fn wrap(markup: &str, granularity: Granularity) -> WrappedDocument {
        wrap_document(&parse_html(markup).nodes, Segmenter::new(granularity))
    }

    fn ids(doc: &WrappedDocument) -> Vec<String> {
        doc.units.iter().map(|u| u.id.to_string()).collect()
    }

    #[test]
    fn block_granularity_wraps_inner_markup() {
        let doc = wrap(
            "<h1>Title</h1><p>One. <strong>Two</strong>.</p>",
            Granularity::Block,
        );
        assert_eq!(
            to_html(&doc.nodes),
            "<h1><span class=\"sentence\" data-sentence-id=\"sent-1\">Title</span></h1>\
             <p><span class=\"sentence\" data-sentence-id=\"sent-2\">One. <strong>Two</strong>.</span></p>"
        );
        assert_eq!(doc.units[0].kind, UnitKind::Heading { level: 1 });
        assert_eq!(doc.units[1].text, "One. Two.");
        assert_eq!(doc.units[1].html, "One. <strong>Two</strong>.");
    }

    #[test]
    fn sentence_granularity_splits_and_flattens() {
        let doc = wrap("<p>A &amp; B. <em>C</em>!</p>", Granularity::Sentence);
        assert_eq!(
            to_html(&doc.nodes),
            "<p><span class=\"sentence\" data-sentence-id=\"sent-1\">A &amp; B. </span>\
             <span class=\"sentence\" data-sentence-id=\"sent-2\">C!</span></p>"
        );
        assert_eq!(doc.units[0].text, "A & B.");
    }

    #[test]
    fn empty_blocks_get_placeholder_and_no_id() {
        let doc = wrap(
            "<p></p><p>Text</p><h2> </h2><li><br/></li>",
            Granularity::Block,
        );
        assert_eq!(ids(&doc), vec!["sent-1"]);
        assert_eq!(
            to_html(&doc.nodes),
            "<p>\u{a0}</p><p><span class=\"sentence\" data-sentence-id=\"sent-1\">Text</span></p>\
             <h2>\u{a0}</h2><li><br/>\u{a0}</li>"
        );
    }

    #[test]
    fn nested_list_item_text_and_children_each_get_units() {
        let doc = wrap(
            "<ul><li>Parent\n<ul><li>Child</li></ul></li><li>Sibling</li></ul>",
            Granularity::Block,
        );
        let texts: Vec<&str> = doc.units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Parent", "Child", "Sibling"]);
        assert_eq!(ids(&doc), vec!["sent-1", "sent-2", "sent-3"]);
        assert!(doc.units.iter().all(|u| u.kind == UnitKind::ListItem));
    }

    #[test]
    fn structural_whitespace_is_left_alone() {
        let doc = wrap("<ul>\n  <li>a</li>\n</ul>", Granularity::Block);
        assert_eq!(
            to_html(&doc.nodes),
            "<ul>\n  <li><span class=\"sentence\" data-sentence-id=\"sent-1\">a</span></li>\n</ul>"
        );
    }

    #[test]
    fn empty_block_keeps_its_image() {
        let parsed = parse_html("<p><img src=\"a.png\"/> </p>");
        let doc = wrap_document(
            &crate::prepare::prepare(&parsed.nodes, false),
            Segmenter::default(),
        );
        assert!(doc.units.is_empty());
        assert_eq!(
            to_html(&doc.nodes),
            "<p><img src=\"a.png\"/>\u{a0}</p>"
        );

        let again = wrap_document(&doc.nodes, Segmenter::default());
        assert_eq!(again.nodes, doc.nodes);
    }

    #[test]
    fn only_paragraphs_headings_and_list_items_hold_units() {
        let doc = wrap(
            "<blockquote>Quoted.</blockquote><table><tr><td>Cell</td></tr></table>\
             <div>Loose div</div><p>Para</p>",
            Granularity::Block,
        );
        let found: Vec<(String, &str)> = doc
            .units
            .iter()
            .map(|u| (u.id.to_string(), u.text.as_str()))
            .collect();
        assert_eq!(found, vec![("sent-1".to_string(), "Para")]);
        assert!(to_html(&doc.nodes).starts_with("<blockquote>Quoted.</blockquote>"));
    }

    #[test]
    fn unit_blocks_are_found_inside_structure() {
        let doc = wrap(
            "<blockquote><p>Quoted.</p></blockquote><div><section><h3>Deep</h3></section></div>",
            Granularity::Block,
        );
        let texts: Vec<&str> = doc.units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Quoted.", "Deep"]);
        assert_eq!(doc.units[0].kind, UnitKind::Paragraph);
        assert_eq!(doc.units[1].kind, UnitKind::Heading { level: 3 });
    }

    #[test]
    fn numbering_is_global_across_blocks() {
        let doc = wrap(
            "<p>One. Two.</p><p>Three.</p><table><tr><td><p>Four. Five</p></td></tr></table>",
            Granularity::Sentence,
        );
        assert_eq!(ids(&doc), vec!["sent-1", "sent-2", "sent-3", "sent-4", "sent-5"]);
    }

    #[test]
    fn input_tree_is_not_modified() {
        let parsed = parse_html("<p>Keep me.</p>");
        let before = parsed.nodes.clone();
        let _ = wrap_document(&parsed.nodes, Segmenter::default());
        assert_eq!(parsed.nodes, before);
    }

    #[test]
    fn spans_are_found_again_in_output() {
        let doc = wrap("<p>One. Two.</p><ul><li>Three</li></ul>", Granularity::Sentence);
        let spans = sentence_spans(&doc.nodes);
        let found: Vec<(String, String)> = spans
            .into_iter()
            .map(|s| (s.id.to_string(), s.text))
            .collect();
        assert_eq!(
            found,
            vec![
                ("sent-1".to_string(), "One.".to_string()),
                ("sent-2".to_string(), "Two.".to_string()),
                ("sent-3".to_string(), "Three".to_string()),
            ]
        );
    }

    #[test]
    fn ordinary_spans_are_not_sentence_spans() {
        let parsed = parse_html("<p><span class=\"note\" data-sentence-id=\"sent-1\">x</span></p>");
        assert!(sentence_spans(&parsed.nodes).is_empty());
    }
}
