use std::fmt::Write;

use crate::comments::is_comment;
use crate::notebook::{Cell, CellKind, Notebook};
use crate::scan::first_match;

pub const MARKDOWN_SNIPPET_CHARS: usize = 300;
pub const MAX_COMMENT_LINES: usize = 8;

fn markdown_snippet(cell: &Cell) -> String {
    cell.text()
        .trim()
        .replace('\n', " ")
        .chars()
        .take(MARKDOWN_SNIPPET_CHARS)
        .collect()
}

/// Summary block for one cell: header, a short body, trailing blank line.
pub fn render_cell(index: usize, cell: &Cell) -> String {
    let kind = cell.kind();
    let mut out = String::new();
    let _ = writeln!(out, "--- Cell {index} [{}] ---", kind.as_str());

    match kind {
        CellKind::Markdown => {
            let _ = writeln!(out, "{}", markdown_snippet(cell));
        }
        CellKind::Code => {
            let lines = cell.source_lines();
            for comment in lines
                .iter()
                .filter(|line| is_comment(line))
                .take(MAX_COMMENT_LINES)
            {
                let _ = writeln!(out, "{}", comment.trim_end_matches('\n'));
            }
            let first_code = first_match(&lines, |line| {
                (!is_comment(line) && !line.trim().is_empty()).then_some(line)
            });
            if let Some((_, line)) = first_code {
                let _ = writeln!(out, "[first code]: {}", line.trim_end_matches('\n'));
            }
        }
        CellKind::Other(_) | CellKind::Missing => {}
    }

    out.push('\n');
    out
}

/// Every cell summary, in document order.
pub fn render_notebook(notebook: &Notebook) -> String {
    notebook
        .cells()
        .iter()
        .enumerate()
        .map(|(index, cell)| render_cell(index, cell))
        .collect()
}
