/*!
The rule engine: per-node-kind split rules, and the table of options that
drive every other stage of the pipeline.
*/

use ahash::AHashMap;
use comrak::nodes::{AstNode, NodeValue};
use strum::EnumIter;

use crate::error::ChunkdownError;
use crate::size::content_size_node;

/// The sum type of node kinds the rule engine can key rules on. Mirrors the
/// CommonMark + GFM node kinds named in spec.md §3.
///
/// `LinkReference`, `ImageReference`, and `Definition` are kept in the enum
/// for rule-table completeness even though the comrak backend never
/// constructs them (see [`crate::reference`] for why).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumIter)]
#[non_exhaustive]
pub enum NodeKind {
    /// The document root.
    Root,
    /// A synthetic grouping of a heading with the content under it.
    Section,
    Paragraph,
    Heading,
    ThematicBreak,
    Blockquote,
    List,
    ListItem,
    Table,
    TableRow,
    TableCell,
    /// A fenced or indented code block.
    Code,
    InlineCode,
    Text,
    Emphasis,
    Strong,
    /// GFM strikethrough (`~~text~~`).
    Delete,
    Link,
    Image,
    LinkReference,
    ImageReference,
    Definition,
    /// A hard line break.
    Break,
    /// A raw HTML block or inline HTML span.
    Html,
    /// Catch-all for node kinds this splitter doesn't otherwise inspect
    /// (e.g. footnote definitions, description lists).
    Other,
}

impl NodeKind {
    /// The `formatting` fallback rule key applies to these three kinds when
    /// no explicit rule is registered for them (spec.md §3, §4.3).
    fn formatting_fallback(self) -> bool {
        matches!(self, Self::Emphasis | Self::Strong | Self::Delete)
    }
}

impl<'a> From<&'a NodeValue> for NodeKind {
    fn from(value: &'a NodeValue) -> Self {
        match value {
            NodeValue::Document => Self::Root,
            NodeValue::Paragraph => Self::Paragraph,
            NodeValue::Heading(_) => Self::Heading,
            NodeValue::ThematicBreak => Self::ThematicBreak,
            NodeValue::BlockQuote => Self::Blockquote,
            NodeValue::List(_) => Self::List,
            NodeValue::Item(_) => Self::ListItem,
            NodeValue::Table(_) => Self::Table,
            NodeValue::TableRow(_) => Self::TableRow,
            NodeValue::TableCell => Self::TableCell,
            NodeValue::CodeBlock(_) => Self::Code,
            NodeValue::Code(_) => Self::InlineCode,
            NodeValue::Text(_) => Self::Text,
            NodeValue::Emph => Self::Emphasis,
            NodeValue::Strong => Self::Strong,
            NodeValue::Strikethrough => Self::Delete,
            NodeValue::Link(_) => Self::Link,
            NodeValue::Image(_) => Self::Image,
            NodeValue::LineBreak => Self::Break,
            NodeValue::HtmlBlock(_) | NodeValue::HtmlInline(_) => Self::Html,
            _ => Self::Other,
        }
    }
}

/// One of the three split-rule shapes described in spec.md §3.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SplitRule {
    /// The node is a protected range; no cut may land strictly inside it.
    NeverSplit,
    /// The node has no special protection.
    AllowSplit,
    /// Protected while `content_size(node) <= size`; above that, splittable.
    SizeSplit {
        /// The content-size threshold, in characters.
        size: usize,
    },
}

/// How reference-style links/images should be handled for a given node kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReferenceStyle {
    /// Leave reference-style links/images as-is.
    Inline,
    /// Rewrite to reference style, synthesizing trailing definitions.
    Reference,
}

/// Per-node-kind configuration: a split rule and (for link/image) a
/// reference-normalization style.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeRule {
    pub split: Option<SplitRule>,
    pub style: Option<ReferenceStyle>,
}

impl NodeRule {
    #[must_use]
    pub fn never_split() -> Self {
        Self {
            split: Some(SplitRule::NeverSplit),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn allow_split() -> Self {
        Self {
            split: Some(SplitRule::AllowSplit),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn size_split(size: usize) -> Self {
        Self {
            split: Some(SplitRule::SizeSplit { size }),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ReferenceStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// The options surface described in spec.md §6: chunk target size, overflow
/// tolerance, an optional raw-size cap, per-node-kind rules, and the
/// `preserve_table_headers` experimental flag.
#[derive(Clone, Debug)]
pub struct ChunkdownOptions {
    pub(crate) chunk_size: usize,
    pub(crate) max_overflow_ratio: f64,
    pub(crate) max_raw_size: Option<usize>,
    pub(crate) rules: AHashMap<NodeKind, NodeRule>,
    pub(crate) preserve_table_headers: bool,
}

impl ChunkdownOptions {
    /// Create options with the given target `chunk_size` (in characters of
    /// visible text) and this crate's default rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk_size` is `0`.
    pub fn new(chunk_size: usize) -> Result<Self, ChunkdownError> {
        if chunk_size == 0 {
            return Err(ChunkdownError::chunk_size_zero());
        }
        Ok(Self {
            chunk_size,
            max_overflow_ratio: 1.0,
            max_raw_size: None,
            rules: default_rules(),
            preserve_table_headers: true,
        })
    }

    /// Set `max_overflow_ratio`. `max_allowed = chunk_size * max_overflow_ratio`.
    ///
    /// # Errors
    ///
    /// Returns an error if `ratio < 1.0`.
    pub fn with_max_overflow_ratio(mut self, ratio: f64) -> Result<Self, ChunkdownError> {
        if ratio < 1.0 {
            return Err(ChunkdownError::overflow_ratio_too_small(ratio));
        }
        self.max_overflow_ratio = ratio;
        Ok(self)
    }

    #[must_use]
    pub fn with_max_raw_size(mut self, max_raw_size: usize) -> Self {
        self.max_raw_size = Some(max_raw_size);
        self
    }

    /// Override the rule for a single node kind.
    ///
    /// # Errors
    ///
    /// Returns an error if `rule.style == Some(ReferenceStyle::Reference)`:
    /// the comrak backend resolves reference-style links/images while
    /// parsing, so there's no unresolved form left for this crate to
    /// normalize back into reference style (see [`crate::reference`]).
    pub fn with_rule(mut self, kind: NodeKind, rule: NodeRule) -> Result<Self, ChunkdownError> {
        if rule.style == Some(ReferenceStyle::Reference) {
            return Err(ChunkdownError::unsupported_reference_style(
                kind.label(),
            ));
        }
        self.rules.insert(kind, rule);
        Ok(self)
    }

    #[must_use]
    pub fn with_preserve_table_headers(mut self, preserve: bool) -> Self {
        self.preserve_table_headers = preserve;
        self
    }

    #[must_use]
    pub fn max_allowed(&self) -> usize {
        #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let max = (self.chunk_size as f64 * self.max_overflow_ratio).round() as usize;
        max.max(self.chunk_size)
    }

    pub(crate) fn rule_for(&self, kind: NodeKind) -> NodeRule {
        self.rules
            .get(&kind)
            .copied()
            .or_else(|| {
                kind.formatting_fallback()
                    .then(|| self.rules.get(&NodeKind::Other).copied())
                    .flatten()
            })
            .unwrap_or_default()
    }
}

impl NodeKind {
    fn label(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Section => "section",
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::ThematicBreak => "thematicBreak",
            Self::Blockquote => "blockquote",
            Self::List => "list",
            Self::ListItem => "listItem",
            Self::Table => "table",
            Self::TableRow => "tableRow",
            Self::TableCell => "tableCell",
            Self::Code => "code",
            Self::InlineCode => "inlineCode",
            Self::Text => "text",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Delete => "delete",
            Self::Link => "link",
            Self::Image => "image",
            Self::LinkReference => "linkReference",
            Self::ImageReference => "imageReference",
            Self::Definition => "definition",
            Self::Break => "break",
            Self::Html => "html",
            Self::Other => "formatting",
        }
    }
}

/// The default rules table (spec.md §6's "default rules table" export).
///
/// Never-split is the sane default for constructs that are unreadable or
/// meaningless when cut in half: inline code, links, images, headings, and
/// raw HTML (the conservative reading of the Open Question in spec.md §9).
/// Everything else is left unset, which the rule engine resolves to
/// "may split" (spec.md §4.3).
#[must_use]
pub fn default_rules() -> AHashMap<NodeKind, NodeRule> {
    let mut rules = AHashMap::new();
    rules.insert(NodeKind::InlineCode, NodeRule::never_split());
    rules.insert(NodeKind::Link, NodeRule::never_split());
    rules.insert(NodeKind::Image, NodeRule::never_split());
    rules.insert(NodeKind::Heading, NodeRule::never_split());
    rules.insert(NodeKind::Html, NodeRule::never_split());
    rules
}

/// The rule engine (`can_split_node`, spec.md §4.3): resolve whether `node`
/// may legally have a cut land inside it.
pub(crate) fn can_split_node<'a>(node: &'a AstNode<'a>, options: &ChunkdownOptions) -> bool {
    let kind = NodeKind::from(&node.data.borrow().value);
    match options.rule_for(kind).split {
        None | Some(SplitRule::AllowSplit) => true,
        Some(SplitRule::NeverSplit) => false,
        Some(SplitRule::SizeSplit { size }) => content_size_node(node) > size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_chunk_size() {
        assert!(ChunkdownOptions::new(0).is_err());
    }

    #[test]
    fn rejects_overflow_ratio_below_one() {
        let err = ChunkdownOptions::new(100)
            .unwrap()
            .with_max_overflow_ratio(0.5);
        assert!(err.is_err());
    }

    #[test]
    fn max_allowed_applies_ratio() {
        let options = ChunkdownOptions::new(100)
            .unwrap()
            .with_max_overflow_ratio(1.5)
            .unwrap();
        assert_eq!(options.max_allowed(), 150);
    }

    #[test]
    fn formatting_fallback_resolves_through_other_key() {
        let options = ChunkdownOptions::new(10)
            .unwrap()
            .with_rule(NodeKind::Other, NodeRule::size_split(30))
            .unwrap();
        assert_eq!(
            options.rule_for(NodeKind::Strong).split,
            Some(SplitRule::SizeSplit { size: 30 })
        );
        // Non-formatting kinds don't fall back to `formatting`.
        assert_eq!(options.rule_for(NodeKind::Paragraph).split, None);
    }

    #[test]
    fn rejects_reference_style_override() {
        let result = ChunkdownOptions::new(10).unwrap().with_rule(
            NodeKind::Link,
            NodeRule::never_split().with_style(ReferenceStyle::Reference),
        );
        assert!(result.is_err());
    }
}
