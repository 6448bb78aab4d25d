//! Clean-up applied to a parsed tree before it is wrapped.

use crate::{
    html::{Element, Node},
    wrap::sentence_span_id,
};

/// Returns a cleaned copy of `nodes`.
///
/// - `<img>` elements are removed when `strip_images` is set; pages carry
///   text only.
/// - Existing sentence spans are unwrapped so that markup exported from an
///   earlier run is numbered afresh rather than nested.
pub fn prepare(nodes: &[Node], strip_images: bool) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        prepare_into(node, strip_images, &mut out);
    }
    out
}

fn prepare_into(node: &Node, strip_images: bool, out: &mut Vec<Node>) {
    match node {
        _ if strip_images && node.is_element("img") => {}
        Node::Element(el) if sentence_span_id(el).is_some() => {
            for child in &el.children {
                prepare_into(child, strip_images, out);
            }
        }
        Node::Element(el) => push_merged(
            out,
            Node::Element(Element {
                name: el.name.clone(),
                attrs: el.attrs.clone(),
                children: prepare(&el.children, strip_images),
            }),
        ),
        other => push_merged(out, other.clone()),
    }
}

/// Appends `node`, joining it onto a preceding text node.
fn push_merged(out: &mut Vec<Node>, node: Node) {
    if let Node::Text(text) = &node
        && let Some(Node::Text(last)) = out.last_mut()
    {
        last.push_str(text);
        return;
    }
    out.push(node);
}
