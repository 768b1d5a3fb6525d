/*!
Shared sweep-and-pack logic for the structural splitters (list, table,
blockquote — spec.md §4.5-4.7, and the REDESIGN FLAG in spec.md §9 asking
for "a helper that takes a container adapter interface").

Each structural splitter already knows how to pull its node apart into a
sequence of *items* (list items, table rows, blockquote block children) and
how to re-wrap a subset of those items back into valid markdown (re-adding
the list marker/numbering, the `>` prefix, or the header row). What's common
is the packing decision: greedily fill a chunk with consecutive items up to
the size budget, start a new chunk when the next item wouldn't fit, and hand
any single item that's already oversized to a fallback splitter of its own.
*/

use crate::size::content_size;

/// One packable unit: its pre-rendered markdown body (already including
/// whatever per-item decoration doesn't change across repacking, e.g. a
/// table cell's text) and its content size.
pub(crate) struct Item {
    pub(crate) markdown: String,
    pub(crate) content_size: usize,
}

/// What a structural splitter provides to [`pack`] to turn a decided-upon
/// group of items back into one chunk of markdown.
pub(crate) trait ContainerAdapter {
    /// Re-wrap `items` (a contiguous, non-empty slice of the original
    /// sequence, identified by index) into one markdown chunk — e.g.
    /// renumbering ordered-list markers from 1, or repeating a table's
    /// header row.
    fn rewrap(&self, item_indices: std::ops::Range<usize>) -> String;

    /// Split a single oversized item (one that alone exceeds `max_size`)
    /// into multiple markdown chunks. Structural splitters that can't
    /// subdivide their items further (e.g. a one-row table) should fall back
    /// to returning the item unchanged as its own chunk.
    fn split_oversized(&self, item_index: usize) -> Vec<String>;
}

/// Greedily pack `items` into chunks no larger than `max_size` (content
/// size), deferring to `adapter.rewrap` for the final markdown of each group
/// and `adapter.split_oversized` for any item that can't fit in a chunk by
/// itself.
pub(crate) fn pack(items: &[Item], max_size: usize, adapter: &dyn ContainerAdapter) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut group_start = 0;
    let mut group_size = 0;

    for (idx, item) in items.iter().enumerate() {
        if item.content_size > max_size {
            if idx > group_start {
                chunks.push(adapter.rewrap(group_start..idx));
            }
            chunks.extend(adapter.split_oversized(idx));
            group_start = idx + 1;
            group_size = 0;
            continue;
        }

        if group_size > 0 && group_size + item.content_size > max_size {
            chunks.push(adapter.rewrap(group_start..idx));
            group_start = idx;
            group_size = 0;
        }
        group_size += item.content_size;
    }

    if group_start < items.len() {
        chunks.push(adapter.rewrap(group_start..items.len()));
    }

    chunks
}

/// Convenience for adapters: content size of a pre-rendered markdown body,
/// computed the same way the rest of the crate sizes visible text.
#[must_use]
pub(crate) fn item_from_markdown(markdown: String) -> Item {
    let content_size = content_size(&markdown);
    Item {
        markdown,
        content_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;
    impl ContainerAdapter for Echo {
        fn rewrap(&self, item_indices: std::ops::Range<usize>) -> String {
            format!("group:{}..{}", item_indices.start, item_indices.end)
        }
        fn split_oversized(&self, item_index: usize) -> Vec<String> {
            vec![format!("oversized:{item_index}")]
        }
    }

    #[test]
    fn packs_consecutive_items_under_budget() {
        let items = vec![
            item_from_markdown("a".repeat(5)),
            item_from_markdown("b".repeat(5)),
            item_from_markdown("c".repeat(5)),
        ];
        let chunks = pack(&items, 10, &Echo);
        assert_eq!(chunks, vec!["group:0..2", "group:2..3"]);
    }

    #[test]
    fn oversized_item_gets_its_own_fallback() {
        let items = vec![item_from_markdown("x".repeat(5)), item_from_markdown("y".repeat(20))];
        let chunks = pack(&items, 10, &Echo);
        assert_eq!(chunks, vec!["group:0..1", "oversized:1"]);
    }
}
