/*!
Byte-offset adapter over comrak's `Sourcepos`.

comrak reports node positions as 1-indexed `(line, column)` pairs rather than
byte offsets. Every downstream stage of this crate (the position mapper, the
penalized-range walk, boundary scoring) is specified in terms of byte ranges,
so [`LineIndex`] converts once per parse.
*/

use std::ops::Range;

use comrak::nodes::{AstNode, LineColumn, Sourcepos};

/// A byte-offset lookup table built from a source text's line boundaries.
#[derive(Debug)]
pub(crate) struct LineIndex {
    /// Byte offset of the start of each line, 0-indexed by `line - 1`.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// Convert a 1-indexed `(line, column)` position into a byte offset.
    /// `column` is a 1-indexed count of Unicode scalar values from the start
    /// of the line, matching comrak's sourcepos convention.
    fn offset(&self, text: &str, line: usize, column: usize) -> usize {
        let line_start = self
            .line_starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(text.len());
        let line_end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(text.len());
        let line_text = text.get(line_start..line_end).unwrap_or_default();

        let mut offset = line_start;
        for (count, (byte_idx, _)) in line_text.char_indices().enumerate() {
            if count + 1 == column {
                return line_start + byte_idx;
            }
            offset = line_start + byte_idx;
        }
        // Column points past the last character on the line (common for
        // `end` positions, which comrak reports inclusive of the last char).
        offset.min(text.len())
    }

    /// Resolve a node's `sourcepos` into a half-open byte range, making the
    /// inclusive `end` column comrak reports exclusive.
    pub(crate) fn range(&self, text: &str, sourcepos: Sourcepos) -> Range<usize> {
        let start = self.offset(text, sourcepos.start.line, sourcepos.start.column);
        let mut end = self.offset(text, sourcepos.end.line, sourcepos.end.column);
        // Advance past the last (inclusive) character unless we're already
        // at the end of the text.
        if let Some(ch) = text[end..].chars().next() {
            end += ch.len_utf8();
        }
        if end < start {
            end = start;
        }
        Range { start, end }
    }
}

/// Look up a node's byte range in `text`, given the `LineIndex` built for it.
///
/// Returns `None` when the node carries no usable sourcepos (comrak reports
/// an all-zero sourcepos for some synthetically-constructed nodes). Per
/// spec.md's "Parser contract violation" recovery rule, callers should keep
/// walking the node's children instead of treating this as fatal.
pub(crate) fn node_range<'a>(
    node: &'a AstNode<'a>,
    text: &str,
    index: &LineIndex,
) -> Option<Range<usize>> {
    let sourcepos = node.data.borrow().sourcepos;
    if sourcepos.start.line == 0 && sourcepos.end.line == 0 {
        return None;
    }
    Some(index.range(text, sourcepos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_offsets() {
        let text = "hello world";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(text, 1, 1), 0);
        assert_eq!(index.offset(text, 1, 7), 6);
    }

    #[test]
    fn multi_line_offsets() {
        let text = "ab\ncd\nef";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(text, 1, 1), 0);
        assert_eq!(index.offset(text, 2, 1), 3);
        assert_eq!(index.offset(text, 3, 2), 7);
    }

    #[test]
    fn range_is_exclusive_end() {
        let text = "abc";
        let index = LineIndex::new(text);
        let range = index.range(
            text,
            Sourcepos {
                start: LineColumn { line: 1, column: 1 },
                end: LineColumn { line: 1, column: 3 },
            },
        );
        assert_eq!(range, 0..3);
    }

    #[test]
    fn handles_multibyte_columns() {
        let text = "héllo";
        let index = LineIndex::new(text);
        // 'é' is 2 bytes but 1 column, so column 3 ('l') starts at byte 3.
        assert_eq!(index.offset(text, 1, 3), 3);
    }
}
