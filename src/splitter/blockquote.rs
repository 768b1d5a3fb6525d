/*!
The blockquote splitter (spec.md §4.7): peels a blockquote's `>` prefix off
each line of its content, packs the content as if it were top-level blocks,
then re-applies the `>` prefix to each resulting chunk.
*/

use comrak::nodes::{AstNode, NodeValue};

use crate::error::SplitterError;
use crate::position::{node_range, LineIndex};
use crate::rules::ChunkdownOptions;
use crate::size::content_size;
use crate::splitter::container::{item_from_markdown, pack, ContainerAdapter, Item};
use crate::splitter::text;

struct BlockquoteAdapter<'s> {
    bodies: Vec<String>,
    options: &'s ChunkdownOptions,
}

impl ContainerAdapter for BlockquoteAdapter<'_> {
    fn rewrap(&self, item_indices: std::ops::Range<usize>) -> String {
        let mut body = String::new();
        for idx in item_indices {
            body.push_str(&self.bodies[idx]);
            body.push_str("\n\n");
        }
        requote(body.trim_end())
    }

    fn split_oversized(&self, item_index: usize) -> Vec<String> {
        text::split_plain(&self.bodies[item_index], self.options)
            .into_iter()
            .map(|chunk| requote(&chunk))
            .collect()
    }
}

/// Split a `BlockQuote` node into chunks, each still wrapped in `>`.
pub(crate) fn split<'a>(
    node: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Result<Vec<String>, SplitterError> {
    if !matches!(node.data.borrow().value, NodeValue::BlockQuote) {
        return Err(SplitterError::UnexpectedRootShape {
            expected: "blockquote",
            found: "non-blockquote",
        });
    }

    let mut bodies = Vec::new();
    for child in node.children() {
        let Some(range) = node_range(child, markdown, index) else {
            continue;
        };
        bodies.push(dequote(&markdown[range]));
    }

    let items: Vec<Item> = bodies.iter().map(|b| item_from_markdown(b.clone())).collect();
    let adapter = BlockquoteAdapter { bodies, options };
    Ok(pack(&items, options.chunk_size, &adapter))
}

/// Remove a leading `> ` or `>` marker from every line of `raw`. Content
/// nodes inside a blockquote keep their own un-prefixed sourcepos in some
/// parsers, but comrak's sourcepos for blockquote children spans the
/// original lines including the marker, so this strips it defensively.
fn dequote(raw: &str) -> String {
    raw.lines()
        .map(|line| {
            line.strip_prefix("> ")
                .or_else(|| line.strip_prefix('>'))
                .unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Re-apply a `> ` marker to every line of `body`, the inverse of [`dequote`].
fn requote(body: &str) -> String {
    body.lines()
        .map(|line| {
            if line.is_empty() {
                "> ".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequote_then_requote_round_trips_plain_text() {
        let original = "> hello\n> world";
        let plain = dequote(original);
        assert_eq!(plain, "hello\nworld");
        assert_eq!(requote(&plain), original);
    }

    #[test]
    fn content_size_ignores_quote_markers() {
        assert_eq!(content_size(&dequote("> abc")), 3);
    }
}
