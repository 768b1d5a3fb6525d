/*!
The size model (spec.md §4.1): every size in this crate is a `char` count of
visible text, matching the teacher's `Characters` sizer exactly so the
`chunk_size`/`max_raw_size` axes stay comparable.

Two sizes matter:

- **content size** — the rendered/visible text a node carries, stripping
  markdown syntax (what a reader sees).
- **raw size** — the literal markdown source span a node occupies, syntax
  included (what actually lands in the output chunk).
*/

use comrak::nodes::AstNode;

/// The visible-text character count of a markdown string, as produced by
/// plain-text extraction (spec.md §4.1, first bullet).
#[must_use]
pub fn content_size(text: &str) -> usize {
    text.chars().count()
}

/// The literal character count of a raw markdown source span.
#[must_use]
pub fn raw_size(text: &str) -> usize {
    text.chars().count()
}

/// `content_size` computed directly from a node's accumulated plain text,
/// without requiring a caller to have extracted a `String` first. Used by the
/// rule engine (`can_split_node`) to evaluate `SizeSplit` thresholds.
pub(crate) fn content_size_node<'a>(node: &'a AstNode<'a>) -> usize {
    let mut count = 0;
    collect_text_len(node, &mut count);
    count
}

fn collect_text_len<'a>(node: &'a AstNode<'a>, count: &mut usize) {
    use comrak::nodes::NodeValue;

    match &node.data.borrow().value {
        NodeValue::Text(text) | NodeValue::Code(comrak::nodes::NodeCode { literal: text, .. }) => {
            *count += text.chars().count();
        }
        NodeValue::CodeBlock(block) => {
            *count += block.literal.chars().count();
        }
        NodeValue::HtmlBlock(html) => {
            *count += html.literal.chars().count();
        }
        NodeValue::HtmlInline(literal) => {
            *count += literal.chars().count();
        }
        NodeValue::LineBreak | NodeValue::SoftBreak => {
            *count += 1;
        }
        _ => {}
    }
    for child in node.children() {
        collect_text_len(child, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(content_size("héllo"), 5);
        assert_eq!(raw_size("héllo"), 5);
    }

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(content_size(""), 0);
    }
}
