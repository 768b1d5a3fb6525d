/*!
The hierarchical AST shaper (spec.md §4.2): groups a flat sequence of
top-level block nodes into a tree of synthetic `Section`s, one per heading,
nested by heading depth.
*/

use comrak::nodes::{AstNode, NodeValue};

use crate::rules::NodeKind;

/// One child of a [`Section`]: either a nested sub-section, or a leaf block
/// node carried through unchanged.
#[derive(Debug)]
pub(crate) enum SectionChild<'a> {
    Section(Section<'a>),
    Node(&'a AstNode<'a>),
}

/// A synthetic grouping of a heading with the block content nested under it,
/// built by walking the document's direct children and pushing/popping a
/// stack keyed on heading depth (spec.md §4.2).
#[derive(Debug)]
pub(crate) struct Section<'a> {
    /// `0` for the implicit top-level section that precedes the document's
    /// first heading ("orphaned" content, per spec.md §4.2's edge case).
    pub(crate) depth: u8,
    pub(crate) heading: Option<&'a AstNode<'a>>,
    pub(crate) children: Vec<SectionChild<'a>>,
}

impl<'a> Section<'a> {
    fn new(depth: u8, heading: Option<&'a AstNode<'a>>) -> Self {
        Self {
            depth,
            heading,
            children: Vec::new(),
        }
    }
}

fn heading_depth(node: &AstNode<'_>) -> Option<u8> {
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => Some(heading.level),
        _ => None,
    }
}

/// Build the section tree from `root`'s direct children.
///
/// Returns a single depth-0 `Section` that wraps everything: any content
/// before the first heading becomes its direct `Node` children, and every
/// heading opens a new nested `Section` at that heading's stack position.
pub(crate) fn shape<'a>(root: &'a AstNode<'a>) -> Section<'a> {
    let mut top = Section::new(0, None);
    // Stack of (depth, section) pairs currently open, root-most first.
    // `top` always stays at index conceptually "below" the stack; we track
    // open sections by their depth on a parallel stack of indices into a
    // path from `top`.
    let mut stack: Vec<Section<'a>> = vec![Section::new(0, None)];

    for node in root.children() {
        if let Some(depth) = heading_depth(node) {
            // Pop any open sections at this depth or deeper, folding each
            // into its parent as a nested SectionChild.
            while stack.len() > 1 && stack.last().unwrap().depth >= depth {
                let finished = stack.pop().unwrap();
                stack
                    .last_mut()
                    .unwrap()
                    .children
                    .push(SectionChild::Section(finished));
            }
            stack.push(Section::new(depth, Some(node)));
        } else {
            stack
                .last_mut()
                .unwrap()
                .children
                .push(SectionChild::Node(node));
        }
    }

    while stack.len() > 1 {
        let finished = stack.pop().unwrap();
        stack
            .last_mut()
            .unwrap()
            .children
            .push(SectionChild::Section(finished));
    }

    top.children = stack.pop().unwrap().children;
    top
}

/// The inverse of [`shape`]: flatten a section tree back into the ordered
/// sequence of nodes it represents, re-inserting each section's heading node
/// ahead of its children.
pub(crate) fn flatten<'a>(section: &Section<'a>, out: &mut Vec<&'a AstNode<'a>>) {
    if let Some(heading) = section.heading {
        out.push(heading);
    }
    for child in &section.children {
        match child {
            SectionChild::Section(nested) => flatten(nested, out),
            SectionChild::Node(node) => out.push(node),
        }
    }
}

/// `NodeKind::Section` is the rule-engine key for a synthetic `Section`
/// itself (as opposed to any node it wraps); exposed so the tree splitter can
/// look up a section's own split rule (spec.md §4.4).
pub(crate) const SECTION_KIND: NodeKind = NodeKind::Section;

#[cfg(test)]
mod tests {
    use super::*;
    use comrak::{parse_document, Arena, Options};

    fn parse<'a>(arena: &'a Arena<AstNode<'a>>, text: &str) -> &'a AstNode<'a> {
        parse_document(arena, text, &Options::default())
    }

    #[test]
    fn orphaned_content_before_first_heading() {
        let arena = Arena::new();
        let root = parse(&arena, "intro paragraph\n\n# Heading\n\nbody\n");
        let tree = shape(root);
        assert_eq!(tree.depth, 0);
        assert!(tree.heading.is_none());
        assert_eq!(tree.children.len(), 2); // orphaned paragraph node + nested section
        assert!(matches!(tree.children[0], SectionChild::Node(_)));
        assert!(matches!(tree.children[1], SectionChild::Section(_)));
    }

    #[test]
    fn nested_headings_stack_by_depth() {
        let arena = Arena::new();
        let root = parse(
            &arena,
            "# A\n\ntext a\n\n## A.1\n\ntext a1\n\n# B\n\ntext b\n",
        );
        let tree = shape(root);
        assert_eq!(tree.children.len(), 2);
        let SectionChild::Section(a) = &tree.children[0] else {
            panic!("expected section")
        };
        assert_eq!(a.depth, 1);
        assert_eq!(a.children.len(), 2); // text a, nested A.1
        let SectionChild::Section(a1) = &a.children[1] else {
            panic!("expected nested section")
        };
        assert_eq!(a1.depth, 2);
    }

    #[test]
    fn flatten_inverts_shape() {
        let arena = Arena::new();
        let text = "# A\n\ntext a\n\n## A.1\n\ntext a1\n";
        let root = parse(&arena, text);
        let tree = shape(root);
        let mut out = Vec::new();
        flatten(&tree, &mut out);
        let original: Vec<_> = root.children().collect();
        assert_eq!(out.len(), original.len());
    }
}
