/*!
Reference-link/image normalization (spec.md §4.9).

The parser backend (`comrak`, CommonMark-conformant) resolves reference-style
links and images into plain `Link`/`Image` nodes while parsing, and discards
link reference definitions whether or not anything used them. By the time a
document reaches this crate's AST, there is no unresolved reference-style
link left to normalize: `style: 'inline'` is therefore a no-op (the parser
already guarantees it), and `style: 'reference'` is rejected at
[`crate::ChunkdownOptions`] construction time rather than silently doing
nothing (see [`crate::error::ChunkdownErrorRepr::UnsupportedReferenceStyle`]).
*/

use crate::rules::{ChunkdownOptions, NodeKind, ReferenceStyle};

/// Confirm the option table carries no reference-style request for `Link`
/// or `Image`. `ChunkdownOptions::with_rule` already rejects this at the
/// point of construction; this is a second, cheap check run once per
/// `split_text` call so a `ChunkdownOptions` built by hand (outside the
/// builder, e.g. via `Default`-derived field mutation in a future version)
/// can't silently skip validation.
pub(crate) fn assert_inline_only(options: &ChunkdownOptions) {
    for kind in [NodeKind::Link, NodeKind::Image] {
        debug_assert_ne!(
            options.rule_for(kind).style,
            Some(ReferenceStyle::Reference),
            "reference style should have been rejected at options construction",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_style_is_always_fine() {
        let options = ChunkdownOptions::new(100).unwrap();
        assert_inline_only(&options);
    }
}
