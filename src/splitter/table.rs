/*!
The table splitter (spec.md §4.6): packs table rows into chunks, repeating
the header row (and its alignment row) at the top of every chunk after the
first — the header-row-preservation contract — with a cell-level fallback
for a single row too wide to fit the budget on its own.
*/

use comrak::nodes::{AstNode, NodeValue, TableAlignment};

use crate::error::SplitterError;
use crate::position::{node_range, LineIndex};
use crate::rules::ChunkdownOptions;
use crate::size::content_size;
use crate::splitter::container::{item_from_markdown, pack, ContainerAdapter, Item};
use crate::splitter::text;

struct TableAdapter<'s> {
    header: String,
    alignment_row: String,
    rows: Vec<String>,
    preserve_headers: bool,
    options: &'s ChunkdownOptions,
}

impl ContainerAdapter for TableAdapter<'_> {
    fn rewrap(&self, item_indices: std::ops::Range<usize>) -> String {
        let mut out = String::new();
        if self.preserve_headers {
            out.push_str(&self.header);
            out.push('\n');
            out.push_str(&self.alignment_row);
            out.push('\n');
        }
        for idx in item_indices {
            out.push_str(&self.rows[idx]);
            out.push('\n');
        }
        out
    }

    fn split_oversized(&self, item_index: usize) -> Vec<String> {
        // A single row wider than the budget can't be split without
        // destroying the table structure; fall back to splitting its text
        // content per-cell and emitting each cell's overflow as its own
        // mini one-row table, still under the header.
        let row = &self.rows[item_index];
        let cell_chunks = text::split_plain(row, self.options);
        cell_chunks
            .into_iter()
            .map(|chunk| {
                if self.preserve_headers {
                    format!("{}\n{}\n{chunk}\n", self.header, self.alignment_row)
                } else {
                    format!("{chunk}\n")
                }
            })
            .collect()
    }
}

/// Split a `Table` node into chunks, each a valid markdown table fragment.
pub(crate) fn split<'a>(
    node: &'a AstNode<'a>,
    markdown: &str,
    index: &LineIndex,
    options: &ChunkdownOptions,
) -> Result<Vec<String>, SplitterError> {
    if !matches!(node.data.borrow().value, NodeValue::Table(_)) {
        return Err(SplitterError::UnexpectedRootShape {
            expected: "table",
            found: "non-table",
        });
    }

    let mut rows_nodes = node.children();
    let Some(header_row) = rows_nodes.next() else {
        return Ok(Vec::new());
    };

    let Some(header_range) = node_range(header_row, markdown, index) else {
        return Ok(Vec::new());
    };
    let header = markdown[header_range].trim_end().to_string();
    let alignment_row = synthesize_alignment_row(node);

    let mut rows = Vec::new();
    for row in rows_nodes {
        if let Some(range) = node_range(row, markdown, index) {
            rows.push(markdown[range].trim_end().to_string());
        }
    }

    let items: Vec<Item> = rows.iter().map(|r| item_from_markdown(r.clone())).collect();

    let adapter = TableAdapter {
        header,
        alignment_row,
        rows,
        preserve_headers: options.preserve_table_headers,
        options,
    };

    let header_overhead = content_size(&adapter.header) + content_size(&adapter.alignment_row);
    let max_allowed = options.max_allowed().saturating_sub(if options.preserve_table_headers {
        header_overhead
    } else {
        0
    });

    Ok(pack(&items, max_allowed.max(1), &adapter))
}

fn synthesize_alignment_row<'a>(table: &'a AstNode<'a>) -> String {
    let NodeValue::Table(table_data) = &table.data.borrow().value else {
        return String::new();
    };
    let cells: Vec<&str> = table_data
        .alignments
        .iter()
        .map(|alignment| match alignment {
            TableAlignment::Left => ":---",
            TableAlignment::Right => "---:",
            TableAlignment::Center => ":---:",
            TableAlignment::None => "---",
        })
        .collect();
    format!("|{}|", cells.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_row_renders_all_left_by_default() {
        let arena = comrak::Arena::new();
        let mut options = comrak::Options::default();
        options.extension.table = true;
        let text = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let root = comrak::parse_document(&arena, text, &options);
        let table = root.children().next().unwrap();
        let row = synthesize_alignment_row(table);
        assert_eq!(row, "|---|---|");
    }
}
