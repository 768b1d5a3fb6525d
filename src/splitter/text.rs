/*!
The text splitter (spec.md §4.8): the leaf-level algorithm that breaks a
single block of prose (a paragraph, a table cell, an oversized list item)
into chunks, when simply emitting it whole would blow the size budget.

The node is serialized back to markdown, re-parsed as its own small document
(so the splitter sees accurate node boundaries and sourcepos local to just
this slice), then bisected recursively: each oversized range is cut at the
best nearby plain-text boundary that doesn't land inside a hard-protected
penalized range, and the cut point is mapped from plain-text back to
markdown before recursing.
*/

use std::ops::Range;

use comrak::nodes::AstNode;
use comrak::{parse_document, Arena, Options};

use crate::boundary::{self, Boundary};
use crate::mapping::PositionMapping;
use crate::penalty::{self, PenalizedRange, HARD_PROTECTED};
use crate::position::LineIndex;
use crate::rules::ChunkdownOptions;
use crate::size::content_size;
use crate::trim;

/// Split the markdown `node` occupies (as found via its `Sourcepos` against
/// `markdown`/`index`) into one or more chunks, each within
/// `options.max_allowed()`.
pub(crate) fn split_node<'a>(
    node: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Vec<String> {
    let Some(range) = crate::position::node_range(node, markdown, index) else {
        return Vec::new();
    };
    split_plain(&markdown[range], options)
}

/// Split a standalone markdown snippet (not necessarily backed by a live
/// node in the caller's AST) the same way, by parsing it as its own
/// document. Used both by [`split_node`] and by the structural splitters'
/// oversized-item fallback.
pub(crate) fn split_plain(markdown: &str, options: &ChunkdownOptions) -> Vec<String> {
    if content_size(markdown) <= options.max_allowed() {
        let trimmed = markdown.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }

    let arena = Arena::new();
    let local_options = Options::default();
    let root = parse_document(&arena, markdown, &local_options);
    let index = LineIndex::new(markdown);
    let mapping = PositionMapping::build(root, markdown, &index);
    let penalties = penalty::build(root, markdown, &index, options);
    let boundaries = boundary::find_all(&mapping.plain_text);

    let plain_len = mapping.plain_text.len();
    let mut chunk_ranges = Vec::new();
    bisect(
        0,
        plain_len,
        &mapping,
        &penalties,
        &boundaries,
        options,
        &mut chunk_ranges,
    );

    chunk_ranges
        .into_iter()
        .filter_map(|range| {
            if range.start >= range.end || range.end > markdown.len() {
                return None;
            }
            let (_, trimmed) = trim::trim(range.start, &markdown[range]);
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

fn bisect(
    plain_start: usize,
    plain_end: usize,
    mapping: &PositionMapping,
    penalties: &[PenalizedRange],
    boundaries: &[Boundary],
    options: &ChunkdownOptions,
    out: &mut Vec<Range<usize>>,
) {
    if plain_start >= plain_end {
        return;
    }

    let markdown_start = mapping.to_markdown_offset(plain_start);
    let markdown_end = mapping.to_markdown_offset(plain_end);

    if content_size(&mapping.plain_text[plain_start..plain_end]) <= options.max_allowed() {
        out.push(markdown_start..markdown_end);
        return;
    }

    match pick_cut(plain_start, plain_end, mapping, penalties, boundaries) {
        Some(cut) if cut > plain_start && cut < plain_end => {
            bisect(plain_start, cut, mapping, penalties, boundaries, options, out);
            bisect(cut, plain_end, mapping, penalties, boundaries, options, out);
        }
        _ => {
            // No legal cut point exists in this range (e.g. one giant
            // protected span); emit it whole rather than loop forever.
            out.push(markdown_start..markdown_end);
        }
    }
}

/// Choose the best boundary in `(plain_start, plain_end)` (spec.md §4.8(e)):
/// `score = priority_weight(boundary) - max_penalty_over_ranges_covering_md_position
/// + balance_bonus`, skipping any boundary whose markdown offset falls
/// inside a hard-protected penalized range (an infinite penalty always loses).
fn pick_cut(
    plain_start: usize,
    plain_end: usize,
    mapping: &PositionMapping,
    penalties: &[PenalizedRange],
    boundaries: &[Boundary],
) -> Option<usize> {
    boundaries
        .iter()
        .filter(|b| b.offset > plain_start && b.offset < plain_end)
        .filter_map(|b| {
            let markdown_offset = mapping.to_markdown_offset(b.offset);
            let penalty = PenalizedRange::cost_at(penalties, markdown_offset);
            if penalty >= HARD_PROTECTED {
                return None;
            }
            let score = boundary::priority_weight(b.priority) - penalty
                + boundary::balance_bonus(b.offset, plain_start, plain_end);
            Some((score, b.offset))
        })
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, offset)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_not_split() {
        let options = ChunkdownOptions::new(1000).unwrap();
        let chunks = split_plain("A short sentence.", &options);
        assert_eq!(chunks, vec!["A short sentence.".to_string()]);
    }

    #[test]
    fn long_text_splits_on_sentence_boundary() {
        let options = ChunkdownOptions::new(20).unwrap();
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = split_plain(text, &options);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn never_splits_inside_a_protected_link() {
        let options = ChunkdownOptions::new(5).unwrap();
        let text = "see [a long link title](https://example.com/path) here";
        let chunks = split_plain(text, &options);
        let joined = chunks.join(" ");
        assert!(joined.contains("[a long link title](https://example.com/path)"));
    }
}
