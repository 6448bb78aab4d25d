//! Greedy packing of top-level blocks into pages.

use serde::Serialize;

use crate::{
    html::{Node, to_html, top_level},
    segment::SentenceId,
    wrap::sentence_spans,
};

/// Visible characters per page unless configured otherwise.
pub const DEFAULT_CHARS_PER_PAGE: usize = 1800;

/// One page of a paginated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    /// The page's blocks serialized back to back.
    pub html: String,
    /// Visible characters on the page.
    pub char_count: usize,
    /// Number of top-level blocks on the page.
    pub block_count: usize,
    /// Units on the page, in order.
    pub sentence_ids: Vec<SentenceId>,
}

/// Packs `items` into groups whose summed length stays within `budget`.
///
/// An item joins the current group unless the group is non-empty and the
/// item would push it over the budget. An item longer than the budget
/// therefore always gets a group of its own, and no group is ever empty.
pub fn pack_by_length<T>(
    items: impl IntoIterator<Item = T>,
    budget: usize,
    len: impl Fn(&T) -> usize,
) -> Vec<Vec<T>> {
    let mut groups = vec![];
    let mut current: Vec<T> = vec![];
    let mut current_len = 0;

    for item in items {
        let item_len = len(&item);
        if !current.is_empty() && current_len + item_len > budget {
            groups.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current_len += item_len;
        current.push(item);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Splits a wrapped document into pages of at most `chars_per_page` visible
/// characters, never splitting a block.
///
/// The blocks are the element nodes of the document's top level; comments
/// and whitespace between them are dropped. A document without any block
/// yields a single page holding the whole input.
pub fn paginate(nodes: &[Node], chars_per_page: usize) -> Vec<Page> {
    let blocks: Vec<&Node> = top_level(nodes)
        .into_iter()
        .filter(|node| matches!(node, Node::Element(_)))
        .collect();

    if blocks.is_empty() {
        log::debug!("no top-level blocks; emitting the document as one page");
        return vec![Page {
            number: 1,
            html: to_html(nodes),
            char_count: 0,
            block_count: 0,
            sentence_ids: sentence_spans(nodes).into_iter().map(|s| s.id).collect(),
        }];
    }

    let sized: Vec<(&Node, usize)> = blocks.into_iter().map(|b| (b, b.char_len())).collect();
    let pages: Vec<Page> = pack_by_length(sized, chars_per_page, |(_, len)| *len)
        .into_iter()
        .zip(1..)
        .map(|(group, number)| {
            let block_nodes: Vec<Node> = group.iter().map(|(node, _)| (*node).clone()).collect();
            Page {
                number,
                html: to_html(&block_nodes),
                char_count: group.iter().map(|(_, len)| len).sum(),
                block_count: group.len(),
                sentence_ids: sentence_spans(&block_nodes)
                    .into_iter()
                    .map(|s| s.id)
                    .collect(),
            }
        })
        .collect();

    log::debug!(
        "paginated into {} pages at {} chars per page",
        pages.len(),
        chars_per_page
    );
    pages
}
