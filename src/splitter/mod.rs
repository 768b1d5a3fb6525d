/*!
The tree splitter (spec.md §4.4): orchestrates the whole-document split by
walking the hierarchical section tree (`crate::section`), recursing into
each section's content, dispatching block-level nodes to the structural
splitters below, and finally re-merging undersized sibling chunks so the
output doesn't fragment more than the size budget requires.
*/

mod blockquote;
pub(crate) mod container;
mod list;
mod table;
pub(crate) mod text;

use comrak::nodes::AstNode;

use crate::position::{node_range, LineIndex};
use crate::rules::{ChunkdownOptions, NodeKind};
use crate::section::{self, Section, SectionChild};
use crate::size::{content_size, content_size_node};

/// Split the whole document rooted at `root` into final chunks.
pub(crate) fn split_document<'a>(
    root: &'a AstNode<'a>,
    markdown: &str,
    options: &ChunkdownOptions,
) -> Vec<String> {
    let index = LineIndex::new(markdown);
    let tree = section::shape(root);
    process_hierarchical_section(&tree, markdown, &index, options)
}

/// Process one section: emit it whole if it already fits the budget,
/// otherwise break it down and re-merge what can be safely recombined.
fn process_hierarchical_section<'a>(
    section: &Section<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Vec<String> {
    if let Some(whole) = whole_section_chunk(section, markdown, index, options) {
        return vec![whole];
    }
    let pieces = break_down_section(section, markdown, index, options);
    merge_sibling_sections(pieces, options)
}

/// If every node in `section` (heading included) fits in one chunk together,
/// return that chunk's markdown; otherwise `None`.
///
/// The fit check sums each node's *visible* text size (spec.md §4.1's
/// `content_size`, via [`content_size_node`]), not the raw markdown slice's
/// length — a section whose syntax characters alone would push a raw-byte
/// count over budget must still be emitted whole if its rendered text fits.
fn whole_section_chunk<'a>(
    section: &Section<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Option<String> {
    let mut nodes = Vec::new();
    section::flatten(section, &mut nodes);
    if nodes.is_empty() {
        return None;
    }
    let visible_size: usize = nodes.iter().map(|node| content_size_node(node)).sum();
    if visible_size > options.max_allowed() {
        return None;
    }
    let mut combined = String::new();
    for node in &nodes {
        let range = node_range(node, markdown, index)?;
        combined.push_str(markdown[range].trim());
        combined.push_str("\n\n");
    }
    let trimmed = combined.trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Break a section that's too big to emit whole into its constituent
/// chunks: the heading (merged onto the first content chunk, per
/// spec.md §4.4's "a heading attaches to the start of its own content"),
/// followed by each child's own chunks.
fn break_down_section<'a>(
    section: &Section<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut heading_text: Option<String> = None;

    if let Some(heading) = section.heading {
        if let Some(range) = node_range(heading, markdown, index) {
            heading_text = Some(markdown[range].trim().to_string());
        }
    }

    let mut child_chunks = Vec::new();
    for child in &section.children {
        match child {
            SectionChild::Section(nested) => {
                child_chunks.extend(process_hierarchical_section(nested, markdown, index, options));
            }
            SectionChild::Node(node) => {
                child_chunks.extend(process_node(node, markdown, index, options));
            }
        }
    }

    match (heading_text, child_chunks.split_first()) {
        (Some(heading), Some((first, rest))) => {
            let merged = format!("{heading}\n\n{first}");
            pieces.push(merged);
            pieces.extend(rest.iter().cloned());
        }
        (Some(heading), None) => pieces.push(heading),
        (None, _) => pieces.extend(child_chunks),
    }

    pieces
}

/// Dispatch a single block-level node to its structural splitter (list,
/// table, blockquote) or, for anything else, emit it whole if it fits or
/// hand it to the text splitter if it doesn't (spec.md §4.4's dispatch
/// table).
fn process_node<'a>(
    node: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Vec<String> {
    let kind = NodeKind::from(&node.data.borrow().value);
    let structural = match kind {
        NodeKind::List => Some(list::split(node, markdown, index, options)),
        NodeKind::Table => Some(table::split(node, markdown, index, options)),
        NodeKind::Blockquote => Some(blockquote::split(node, markdown, index, options)),
        _ => None,
    };

    match structural {
        Some(Ok(chunks)) => chunks,
        Some(Err(_)) | None => default_dispatch(node, markdown, index, options),
    }
}

fn default_dispatch<'a>(
    node: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Vec<String> {
    let Some(range) = node_range(node, markdown, index) else {
        return Vec::new();
    };
    let raw = markdown[range].trim();
    if raw.is_empty() {
        return Vec::new();
    }
    // Fit decision uses the node's visible-text size (spec.md §4.1), not the
    // raw markdown slice's length, so syntax characters alone can't force an
    // otherwise-fitting node through the text splitter.
    if content_size_node(node) <= options.max_allowed() {
        vec![raw.to_string()]
    } else {
        text::split_node(node, markdown, index, options)
    }
}

/// Greedily recombine consecutive undersized chunks so the output doesn't
/// fragment beyond what the budget requires (spec.md §4.4's
/// "merge_sibling_sections"): scanning left to right, a chunk is folded into
/// the chunk being built as long as the combined content still fits.
fn merge_sibling_sections(chunks: Vec<String>, options: &ChunkdownOptions) -> Vec<String> {
    let mut merged = Vec::new();
    let mut current = String::new();

    for chunk in chunks {
        if chunk.is_empty() {
            continue;
        }
        if current.is_empty() {
            current = chunk;
            continue;
        }
        let candidate_size = content_size(&current) + 2 + content_size(&chunk);
        if candidate_size <= options.max_allowed() {
            current.push_str("\n\n");
            current.push_str(&chunk);
        } else {
            merged.push(std::mem::take(&mut current));
            current = chunk;
        }
    }
    if !current.is_empty() {
        merged.push(current);
    }
    merged
}
