/*!
Final-stage whitespace trimming (spec.md §2, step 8).
*/

const NEWLINES: [char; 2] = ['\n', '\r'];

/// Trim a chunk's surrounding whitespace, preserving indentation when it
/// carries meaning.
///
/// Leading newlines and trailing whitespace are always removed. If the
/// trimmed body still spans multiple lines, leading spaces/tabs on its first
/// line are kept (markdown list items, code fences, and blockquote markers
/// depend on that indentation); otherwise all leading whitespace goes too.
pub(crate) fn trim(offset: usize, chunk: &str) -> (usize, &str) {
    if chunk.trim().contains(NEWLINES) {
        let diff = chunk.len() - chunk.trim_start_matches(NEWLINES).len();
        (
            offset + diff,
            chunk.trim_start_matches(NEWLINES).trim_end(),
        )
    } else {
        let diff = chunk.len() - chunk.trim_start().len();
        (offset + diff, chunk.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_single_line_fully() {
        let chunk = "  hello world  ";
        let (offset, chunk) = trim(0, chunk);
        assert_eq!(offset, 2);
        assert_eq!(chunk, "hello world");
    }

    #[test]
    fn preserves_indentation_across_multiple_lines() {
        let chunk = "\n  hello\n  world  ";
        let (offset, chunk) = trim(0, chunk);
        assert_eq!(offset, 1);
        assert_eq!(chunk, "  hello\n  world");
    }
}
