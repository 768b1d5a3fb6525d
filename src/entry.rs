/*!
The public factory (spec.md §6): `chunkdown(options)` builds a [`Chunkdown`]
that owns a validated [`ChunkdownOptions`] and exposes `split_text`, the
pipeline's single entry point.
*/

use comrak::{Arena, Options as ParseOptions};

use crate::reference;
use crate::rules::ChunkdownOptions;
use crate::size::content_size;
use crate::splitter;

/// A configured splitter, constructed via [`chunkdown`].
#[derive(Debug, Clone)]
pub struct Chunkdown {
    options: ChunkdownOptions,
}

impl Chunkdown {
    /// Parse `markdown` as CommonMark + GFM and split it into an ordered
    /// sequence of markdown chunks, each within `options.max_allowed()`
    /// characters of visible text (spec.md §2).
    #[must_use]
    pub fn split_text(&self, markdown: &str) -> Vec<String> {
        reference::assert_inline_only(&self.options);

        let arena = Arena::new();
        let mut parse_options = ParseOptions::default();
        parse_options.extension.table = true;
        parse_options.extension.strikethrough = true;
        parse_options.extension.autolink = true;
        parse_options.extension.tasklist = true;
        let root = comrak::parse_document(&arena, markdown, &parse_options);

        let chunks = splitter::split_document(root, markdown, &self.options);

        match self.options.max_raw_size {
            Some(max_raw_size) => apply_max_raw_size(chunks, max_raw_size, &self.options),
            None => chunks,
        }
    }
}

/// Post-filter pass (spec.md §9 Open Question resolution): re-bisect any
/// chunk whose *raw* size (markdown syntax included) exceeds `max_raw_size`,
/// by running it back through the text splitter with the raw axis as the
/// limiting one.
fn apply_max_raw_size(chunks: Vec<String>, max_raw_size: usize, options: &ChunkdownOptions) -> Vec<String> {
    // Re-bisecting on the raw axis means temporarily treating the raw-size
    // cap as the chunk size the text splitter optimizes for.
    let tightened = ChunkdownOptions {
        chunk_size: max_raw_size,
        max_overflow_ratio: 1.0,
        max_raw_size: None,
        ..options.clone()
    };

    chunks
        .into_iter()
        .flat_map(|chunk| {
            if content_size(&chunk) <= max_raw_size {
                vec![chunk]
            } else {
                splitter::text::split_plain(&chunk, &tightened)
            }
        })
        .collect()
}

/// Construct a [`Chunkdown`] from validated `options` (spec.md §6's factory
/// function).
#[must_use]
pub fn chunkdown(options: ChunkdownOptions) -> Chunkdown {
    Chunkdown { options }
}
