/*!
Bidirectional plain-text ↔ markdown position mapping (spec.md §4.8(c)-(d)).

The text splitter bisects a node's *plain-text* rendering (so that cut points
land on word/sentence boundaries rather than inside `**bold**` syntax), then
needs to translate each plain-text cut point back into a markdown byte offset
before re-serializing. [`PositionMapping`] is that translation table, built by
walking the re-parsed local AST once and recording, for every text-bearing
leaf, the span of plain-text characters it contributed, the markdown byte
range it came from, and a per-character map between the two (spec.md
§4.8(c)): a leaf's literal text and its raw markdown span aren't always the
same length — CommonMark backslash escapes (`\*`, `\[`, `\]`, `\\`) collapse
two raw bytes into one literal character — so naive proportional byte
arithmetic mismaps any cut that lands after an escaped character.
*/

use std::ops::Range;

use comrak::nodes::{AstNode, NodeValue};

use crate::position::{node_range, LineIndex};

/// One contiguous correspondence between a plain-text character range and
/// the markdown byte range that produced it.
#[derive(Debug, Clone)]
pub(crate) struct Segment {
    pub(crate) plain: Range<usize>,
    pub(crate) markdown: Range<usize>,
    /// Absolute markdown byte offset of the start of each plain-text `char`
    /// in this segment, in order (spec.md §4.8(c)'s `char_map`). Has one
    /// entry per `char` in `plain_text[plain.start..plain.end]`.
    char_map: Vec<usize>,
    /// The markdown end offset of the node this segment came from. Used as
    /// the preferred mapping when a cut lands exactly at this segment's
    /// plain-text boundary (spec.md §4.8(d)'s `node_end`-prefer rule).
    node_end: usize,
}

/// The plain-text rendering of a subtree, plus the segment table needed to
/// map cut points in that rendering back to markdown byte offsets.
#[derive(Debug)]
pub(crate) struct PositionMapping {
    pub(crate) plain_text: String,
    segments: Vec<Segment>,
}

impl PositionMapping {
    /// Walk `root`'s subtree, building the plain-text rendering and its
    /// segment table in one depth-first pass.
    pub(crate) fn build<'a>(root: &'a AstNode<'a>, markdown: &str, index: &LineIndex) -> Self {
        let mut plain_text = String::new();
        let mut segments = Vec::new();
        walk(root, markdown, index, &mut plain_text, &mut segments);
        Self {
            plain_text,
            segments,
        }
    }

    /// Translate a byte offset in `self.plain_text` into the corresponding
    /// markdown byte offset.
    ///
    /// When `plain_offset` falls exactly on the boundary between two
    /// segments, prefers the *end* of the earlier segment's node
    /// (`node_end`) over the start of the later one (spec.md §4.8(d):
    /// "prefer the end of the node whose text precedes the cut"), so a cut
    /// placed just after a node lands right after that node's markdown span
    /// rather than at the start of whatever (possibly unrelated) markdown
    /// follows it.
    pub(crate) fn to_markdown_offset(&self, plain_offset: usize) -> usize {
        if self.segments.is_empty() {
            return 0;
        }
        if plain_offset == 0 {
            return self.segments[0].markdown.start;
        }

        let idx = self
            .segments
            .partition_point(|seg| seg.plain.end < plain_offset);

        let Some(seg) = self.segments.get(idx) else {
            return self.segments.last().map_or(0, |seg| seg.node_end);
        };

        if plain_offset <= seg.plain.start {
            // `plain_offset` lands in a gap before any segment (shouldn't
            // normally happen, since every plain-text byte comes from some
            // segment) — fall back to this segment's start.
            return seg.markdown.start;
        }

        if plain_offset == seg.plain.end {
            // Cut lands exactly at the end of this node's text: prefer its
            // own `node_end` over the next segment's start.
            return seg.node_end;
        }

        // Cut lands strictly inside this segment: count how many chars of
        // its plain text precede the cut, and look that index up in the
        // per-char map.
        let char_index = self.plain_text[seg.plain.start..plain_offset].chars().count();
        seg.char_map.get(char_index).copied().unwrap_or(seg.node_end)
    }
}

fn walk<'a>(
    node: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    plain_text: &mut String,
    segments: &mut Vec<Segment>,
) {
    let value = node.data.borrow().value.clone();
    match &value {
        NodeValue::Text(text) => push_leaf(text, node, markdown, index, plain_text, segments),
        NodeValue::Code(code) => {
            push_leaf(&code.literal, node, markdown, index, plain_text, segments)
        }
        NodeValue::HtmlInline(literal) => {
            push_leaf(literal, node, markdown, index, plain_text, segments)
        }
        NodeValue::SoftBreak => push_leaf(" ", node, markdown, index, plain_text, segments),
        NodeValue::LineBreak => push_leaf("\n", node, markdown, index, plain_text, segments),
        _ => {
            for child in node.children() {
                walk(child, markdown, index, plain_text, segments);
            }
        }
    }
}

fn push_leaf<'a>(
    text: &str,
    node: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    plain_text: &mut String,
    segments: &mut Vec<Segment>,
) {
    let start = plain_text.len();
    plain_text.push_str(text);
    let plain_range = start..plain_text.len();

    let Some(markdown_range) = node_range(node, markdown, index) else {
        // No usable sourcepos (synthetic node); fall back to treating the
        // leaf's own text as its markdown span so mapping stays total.
        segments.push(Segment {
            char_map: (0..text.chars().count()).map(|_| 0).collect(),
            node_end: 0,
            plain: plain_range,
            markdown: 0..0,
        });
        return;
    };

    let raw = &markdown[markdown_range.clone()];
    let char_map = build_char_map(raw, text, markdown_range.start);
    segments.push(Segment {
        plain: plain_range,
        node_end: markdown_range.end,
        markdown: markdown_range,
        char_map,
    });
}

/// Align a leaf's literal (unescaped) `text` against its raw markdown
/// source `raw`, producing one absolute markdown byte offset per `char` of
/// `text` — the start of whatever raw byte sequence produced that
/// character. Handles CommonMark backslash escapes (`\*`, `\[`, `\]`, `\\`,
/// …), where two raw bytes collapse into the one literal character that
/// follows the backslash; everything else is assumed to map one raw char to
/// one literal char (true for the plain-text leaf kinds this module reads:
/// `Text`, `Code`, `HtmlInline`, and the two break kinds, none of which
/// decode entities on their own — comrak resolves those before handing back
/// the literal).
fn build_char_map(raw: &str, text: &str, markdown_offset: usize) -> Vec<usize> {
    let mut map = Vec::with_capacity(text.chars().count());
    let mut raw_chars = raw.char_indices().peekable();
    let mut literal_chars = text.chars();

    while let Some(lit_ch) = literal_chars.next() {
        let Some(&(byte_idx, raw_ch)) = raw_chars.peek() else {
            // Raw ran out before literal did (shouldn't happen for a
            // well-formed leaf); point remaining chars at the end.
            map.push(markdown_offset + raw.len());
            continue;
        };

        if raw_ch == '\\' {
            let mut lookahead = raw_chars.clone();
            lookahead.next();
            if let Some((_, escaped_ch)) = lookahead.next() {
                if escaped_ch == lit_ch {
                    map.push(markdown_offset + byte_idx);
                    raw_chars = lookahead;
                    continue;
                }
            }
        }

        map.push(markdown_offset + byte_idx);
        raw_chars.next();
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use comrak::{parse_document, Arena, Options};

    fn build<'a>(arena: &'a Arena<AstNode<'a>>, text: &'a str) -> PositionMapping {
        let root = parse_document(arena, text, &Options::default());
        let index = LineIndex::new(text);
        let paragraph = root.children().next().unwrap();
        PositionMapping::build(paragraph, text, &index)
    }

    #[test]
    fn plain_text_strips_emphasis_syntax() {
        let arena = Arena::new();
        let text = "hello *world*";
        let mapping = build(&arena, text);
        assert_eq!(mapping.plain_text, "hello world");
    }

    #[test]
    fn maps_cut_after_first_word_back_to_markdown() {
        let arena = Arena::new();
        let text = "hello *world*";
        let mapping = build(&arena, text);
        // Cut right after "hello" in plain text.
        let cut = mapping.to_markdown_offset(5);
        assert_eq!(&text[..cut], "hello");
    }

    #[test]
    fn escaped_asterisk_maps_to_the_backslash_not_the_literal_star() {
        let arena = Arena::new();
        let text = r"a\*b";
        let mapping = build(&arena, text);
        assert_eq!(mapping.plain_text, "a*b");
        // Cut right after the escaped '*' in plain text (plain offset 2).
        let cut = mapping.to_markdown_offset(2);
        assert_eq!(&text[..cut], r"a\*");
    }

    #[test]
    fn escaped_brackets_round_trip() {
        let arena = Arena::new();
        let text = r"\[a\]";
        let mapping = build(&arena, text);
        assert_eq!(mapping.plain_text, "[a]");
        let cut = mapping.to_markdown_offset(1);
        assert_eq!(&text[..cut], r"\[");
        let cut_end = mapping.to_markdown_offset(3);
        assert_eq!(&text[..cut_end], r"\[a\]");
    }

    #[test]
    fn escaped_backslash_collapses_two_raw_bytes_into_one_char() {
        let arena = Arena::new();
        let text = r"a\\b";
        let mapping = build(&arena, text);
        assert_eq!(mapping.plain_text, r"a\b");
        let cut = mapping.to_markdown_offset(2);
        assert_eq!(&text[..cut], r"a\\");
    }
}
