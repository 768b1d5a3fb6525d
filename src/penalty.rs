/*!
Penalized ranges (spec.md §4.8(b)): byte ranges in a re-parsed subtree's
markdown source that the bisection algorithm should avoid cutting inside,
weighted by how bad a cut there would be. A `+∞` weight means hard-protected
(never cut inside, no matter how oversized the resulting chunk).
*/

use std::ops::Range;

use comrak::nodes::{AstNode, NodeValue};

use crate::position::{node_range, LineIndex};
use crate::rules::{can_split_node, ChunkdownOptions};

/// `f64::INFINITY` stands in for the spec's `+∞` hard-protection weight.
pub(crate) const HARD_PROTECTED: f64 = f64::INFINITY;

#[derive(Debug, Clone)]
pub(crate) struct PenalizedRange {
    pub(crate) range: Range<usize>,
    pub(crate) weight: f64,
}

impl PenalizedRange {
    /// The cost of placing a cut at `offset`, or `0.0` if no penalized range
    /// covers it.
    pub(crate) fn cost_at(ranges: &[Self], offset: usize) -> f64 {
        ranges
            .iter()
            .filter(|r| r.range.start < offset && offset < r.range.end)
            .map(|r| r.weight)
            .fold(0.0, f64::max)
    }
}

/// The fixed finite-penalty table for node kinds the rule engine allows to
/// be split. Node kinds the rule engine protects (spec.md §4.3's
/// `can_split_node`) are handled separately in [`collect`] and get
/// [`HARD_PROTECTED`] regardless of whether they appear here.
fn weight_for(value: &NodeValue) -> Option<f64> {
    match value {
        // Inline code, links, and images read as nonsense if split mid-span.
        NodeValue::Code(_) | NodeValue::Link(_) | NodeValue::Image(_) => Some(50.0),
        // Emphasis/strong/strikethrough degrade gracefully but still lose
        // their closing delimiter if cut, so they're moderately penalized.
        NodeValue::Emph | NodeValue::Strong | NodeValue::Strikethrough => Some(30.0),
        _ => None,
    }
}

/// Walk `root`'s subtree, collecting a penalized range for every node the
/// rule engine protects or the fixed weight table names, in markdown
/// byte-offset terms. Overlapping ranges of equal or lesser weight are left
/// as separate entries; [`PenalizedRange::cost_at`] takes the max over all
/// ranges covering an offset, which has the same effect as merging without
/// needing an explicit interval-merge pass.
///
/// Implements spec.md §4.8(b): "if `can_split_node(node)` is false, push
/// `{start, end, +∞}`; else push `{start, end, penalty}` from the fixed
/// table."
pub(crate) fn build<'a>(
    root: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Vec<PenalizedRange> {
    let mut ranges = Vec::new();
    collect(root, markdown, index, options, &mut ranges);
    ranges
}

fn collect<'a>(
    node: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
    ranges: &mut Vec<PenalizedRange>,
) {
    let weight = if can_split_node(node, options) {
        weight_for(&node.data.borrow().value)
    } else {
        Some(HARD_PROTECTED)
    };
    if let Some(weight) = weight {
        if let Some(range) = node_range(node, markdown, index) {
            ranges.push(PenalizedRange { range, weight });
        }
    }
    for child in node.children() {
        collect(child, markdown, index, options, ranges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{NodeKind, NodeRule};
    use comrak::{parse_document, Arena, Options};

    #[test]
    fn link_is_hard_protected_by_default_rules() {
        let arena = Arena::new();
        let text = "see [here](https://example.com) now";
        let root = parse_document(&arena, text, &Options::default());
        let index = LineIndex::new(text);
        let options = ChunkdownOptions::new(100).unwrap();
        let ranges = build(root, text, &index, &options);
        let link_range = ranges.iter().find(|r| r.weight.is_infinite()).unwrap();
        assert_eq!(&text[link_range.range.clone()], "[here](https://example.com)");
    }

    #[test]
    fn link_gets_finite_weight_when_rule_allows_split() {
        let arena = Arena::new();
        let text = "see [here](https://example.com) now";
        let root = parse_document(&arena, text, &Options::default());
        let index = LineIndex::new(text);
        let options = ChunkdownOptions::new(100)
            .unwrap()
            .with_rule(NodeKind::Link, NodeRule::allow_split())
            .unwrap();
        let ranges = build(root, text, &index, &options);
        let link_range = ranges.iter().find(|r| r.weight == 50.0).unwrap();
        assert_eq!(&text[link_range.range.clone()], "[here](https://example.com)");
    }

    #[test]
    fn heading_is_hard_protected() {
        let arena = Arena::new();
        let text = "# Title\n\nbody\n";
        let root = parse_document(&arena, text, &Options::default());
        let index = LineIndex::new(text);
        let options = ChunkdownOptions::new(100).unwrap();
        let ranges = build(root, text, &index, &options);
        assert!(ranges.iter().any(|r| r.weight.is_infinite()));
    }

    #[test]
    fn cost_at_is_zero_outside_any_range() {
        let ranges = vec![PenalizedRange { range: 5..10, weight: 50.0 }];
        assert_eq!(PenalizedRange::cost_at(&ranges, 2), 0.0);
        assert_eq!(PenalizedRange::cost_at(&ranges, 7), 50.0);
    }
}
