/*!
Error types for `chunkdown`.

Follows the two-layer shape used throughout this crate: a public, opaque
error type wrapping a private `repr` enum, so new failure variants can be
added without a breaking change.
*/

use thiserror::Error;

/// Indicates there was a problem constructing a [`crate::ChunkdownOptions`].
///
/// The `Display` implementation provides a human-readable message; the
/// private representation is free to change across minor versions.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct ChunkdownError(#[from] ChunkdownErrorRepr);

#[derive(Error, Debug)]
pub(crate) enum ChunkdownErrorRepr {
    #[error("chunk_size must be at least 1")]
    ChunkSizeZero,
    #[error("max_overflow_ratio must be >= 1.0, got {0}")]
    OverflowRatioTooSmall(f64),
    #[error(
        "rules.{0}.style = 'reference' is not supported: the parser resolves reference-style \
         links and images during parsing, so there is no unresolved form left to normalize"
    )]
    UnsupportedReferenceStyle(&'static str),
}

impl ChunkdownError {
    pub(crate) fn chunk_size_zero() -> Self {
        Self(ChunkdownErrorRepr::ChunkSizeZero)
    }

    pub(crate) fn overflow_ratio_too_small(ratio: f64) -> Self {
        Self(ChunkdownErrorRepr::OverflowRatioTooSmall(ratio))
    }

    pub(crate) fn unsupported_reference_style(kind: &'static str) -> Self {
        Self(ChunkdownErrorRepr::UnsupportedReferenceStyle(kind))
    }
}

/// Internal invariant violations raised by the structural splitters
/// (list/table/blockquote) when handed a node whose shape doesn't match
/// what the splitter expects.
///
/// Callers of the public [`crate::Chunkdown::split_text`] entry point never
/// see this: the tree splitter only ever dispatches a node to the structural
/// splitter that matches its kind. It exists so the structural splitters can
/// be unit tested in isolation with a clear failure mode instead of
/// panicking.
#[derive(Error, Debug)]
pub(crate) enum SplitterError {
    #[error("expected a {expected} node, found {found}")]
    UnexpectedRootShape {
        expected: &'static str,
        found: &'static str,
    },
}
