use chunkdown::{chunkdown, ChunkdownOptions};

#[test]
fn protected_link_survives_a_tight_budget() {
    let options = ChunkdownOptions::new(15).unwrap();
    let splitter = chunkdown(options);
    let markdown = "Check out [the chunkdown docs](https://example.com/docs) for more.";
    let chunks = splitter.split_text(markdown);
    let joined = chunks.join(" ");
    assert!(joined.contains("[the chunkdown docs](https://example.com/docs)"));
}

#[test]
fn long_paragraph_splits_on_sentence_boundaries() {
    let options = ChunkdownOptions::new(30).unwrap();
    let splitter = chunkdown(options);
    let markdown = "Short first sentence here. A second sentence that is also short. \
        And a third one to round it out.";
    let chunks = splitter.split_text(markdown);
    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(!chunk.trim().is_empty());
    }
}

#[test]
fn table_splits_by_row_and_repeats_header() {
    let options = ChunkdownOptions::new(25).unwrap();
    let splitter = chunkdown(options);
    let markdown = "\
| Name | Role |
|------|------|
| Ada | Engineer |
| Grace | Engineer |
| Alan | Researcher |
| Linus | Maintainer |
";
    let chunks = splitter.split_text(markdown);
    assert!(chunks.len() > 1);
    for chunk in &chunks[1..] {
        assert!(chunk.contains("Name") && chunk.contains("Role"));
    }
}

#[test]
fn ordered_list_keeps_numbering_across_chunks() {
    let options = ChunkdownOptions::new(12).unwrap();
    let splitter = chunkdown(options);
    let markdown = "\
1. First item here
2. Second item here
3. Third item here
4. Fourth item here
";
    let chunks = splitter.split_text(markdown);
    assert!(chunks.len() > 1);
    // The second chunk should not restart numbering at 1.
    assert!(!chunks[1].trim_start().starts_with("1."));
}

#[test]
fn blockquote_is_packed_then_split_when_oversized() {
    let options = ChunkdownOptions::new(20).unwrap();
    let splitter = chunkdown(options);
    let markdown = "> A long quoted passage that will not fit in one small chunk.\n\
        >\n> A second paragraph inside the same blockquote.\n";
    let chunks = splitter.split_text(markdown);
    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.trim_start().starts_with('>'));
    }
}

#[test]
fn heading_attaches_to_its_own_content() {
    let options = ChunkdownOptions::new(1000).unwrap();
    let splitter = chunkdown(options);
    let markdown = "# Title\n\nBody text under the title.\n";
    let chunks = splitter.split_text(markdown);
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].starts_with("# Title"));
    assert!(chunks[0].contains("Body text under the title."));
}

#[test]
fn emphasis_and_strong_spans_stay_balanced_within_a_chunk() {
    let options = ChunkdownOptions::new(12).unwrap();
    let splitter = chunkdown(options);
    let markdown = "A sentence with **some bold text** and _some italic text_ \
        and ~~some struck text~~ inside it, going on a while longer.";
    let chunks = splitter.split_text(markdown);
    for chunk in &chunks {
        assert_eq!(chunk.matches("**").count() % 2, 0, "unbalanced ** in {chunk:?}");
        assert_eq!(chunk.matches("~~").count() % 2, 0, "unbalanced ~~ in {chunk:?}");
        assert_eq!(chunk.matches('_').count() % 2, 0, "unbalanced _ in {chunk:?}");
    }
}

#[test]
fn no_chunk_exceeds_the_overflow_budget() {
    let options = ChunkdownOptions::new(40)
        .unwrap()
        .with_max_overflow_ratio(1.2)
        .unwrap();
    let splitter = chunkdown(options.clone());
    let markdown = "\
# Report

This is the first paragraph, which is short.

This is a considerably longer second paragraph that should not fit entirely \
within the target chunk size and will need to be broken apart at a sentence \
or clause boundary somewhere in the middle of it.

- one
- two
- three
";
    let chunks = splitter.split_text(markdown);
    for chunk in chunks {
        assert!(chunkdown::content_size(&chunk) <= options.max_allowed());
    }
}
