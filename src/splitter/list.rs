/*!
The list splitter (spec.md §4.5): packs list items into chunks, preserving
the ordered-list numbering contract — a chunk that starts mid-list continues
numbering from where the previous chunk left off, rather than restarting at
1.
*/

use once_cell::sync::Lazy;
use regex::Regex;

use comrak::nodes::{AstNode, ListType, NodeValue};

use crate::error::SplitterError;
use crate::position::{node_range, LineIndex};
use crate::splitter::container::{item_from_markdown, pack, ContainerAdapter, Item};
use crate::splitter::text;
use crate::rules::ChunkdownOptions;

static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)(\d+[.)]|[-*+])(\s+)").unwrap());

struct ListAdapter<'s> {
    bodies: Vec<String>,
    ordered: bool,
    start: usize,
    options: &'s ChunkdownOptions,
}

impl ContainerAdapter for ListAdapter<'_> {
    fn rewrap(&self, item_indices: std::ops::Range<usize>) -> String {
        let mut out = String::new();
        for (offset, idx) in item_indices.clone().enumerate() {
            let body = &self.bodies[idx];
            if self.ordered {
                out.push_str(&format!("{}. {}\n", self.start + item_indices.start + offset, body));
            } else {
                out.push_str(&format!("- {body}\n"));
            }
        }
        out
    }

    fn split_oversized(&self, item_index: usize) -> Vec<String> {
        // An item whose content alone exceeds the budget is handed to the
        // text splitter so its prose still gets broken at sentence/clause
        // boundaries; the marker is reattached to the first sub-chunk only.
        let body = &self.bodies[item_index];
        let sub_chunks = text::split_plain(body, self.options);
        let marker = if self.ordered {
            format!("{}. ", self.start + item_index)
        } else {
            "- ".to_string()
        };
        sub_chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                if i == 0 {
                    format!("{marker}{chunk}\n")
                } else {
                    format!("{chunk}\n")
                }
            })
            .collect()
    }
}

/// Split a `List` node into chunks, each containing whole list items.
pub(crate) fn split<'a>(
    node: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Result<Vec<String>, SplitterError> {
    let NodeValue::List(list) = &node.data.borrow().value else {
        return Err(SplitterError::UnexpectedRootShape {
            expected: "list",
            found: "non-list",
        });
    };
    let ordered = list.list_type == ListType::Ordered;
    let start = list.start;

    let mut bodies = Vec::new();
    for item in node.children() {
        let Some(range) = node_range(item, markdown, index) else {
            continue;
        };
        let raw = &markdown[range];
        bodies.push(strip_marker(raw).to_string());
    }

    let items: Vec<Item> = bodies
        .iter()
        .map(|body| item_from_markdown(body.clone()))
        .collect();

    let adapter = ListAdapter {
        bodies,
        ordered,
        start,
        options,
    };
    Ok(pack(&items, options.chunk_size, &adapter))
}

fn strip_marker(raw: &str) -> &str {
    let first_line_end = raw.find('\n').unwrap_or(raw.len());
    let first_line = &raw[..first_line_end];
    if let Some(caps) = MARKER.captures(first_line) {
        let marker_len = caps.get(0).unwrap().end();
        &raw[marker_len..]
    } else {
        raw
    }
}
