use std::path::Path;

use crate::comments::rewrite_code_lines;
use crate::consistency::{apply_consistency_pass, ConsistencyReport};
use crate::markdown::rewrite_markdown;
use crate::notebook::{Cell, CellKind, Notebook, NotebookError};

/// Outcome of one rewrite run over a notebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub markdown_cells_rewritten: usize,
    pub code_cells_rewritten: usize,
    pub consistency: ConsistencyReport,
}

impl RewriteReport {
    pub fn changed(&self) -> bool {
        self.markdown_cells_rewritten > 0 || self.code_cells_rewritten > 0 || self.consistency.changed()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotebookRewriter {
    dry_run: bool,
}

impl NotebookRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the pipeline without ever writing the file back.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn rewrite_cell(cell: &mut Cell, report: &mut RewriteReport) {
        match cell.kind() {
            CellKind::Markdown => {
                let text = cell.text();
                let rewritten = rewrite_markdown(&text);
                if rewritten != text {
                    cell.set_text(rewritten);
                    report.markdown_cells_rewritten += 1;
                }
            }
            CellKind::Code => {
                let lines = cell.source_lines();
                let rewritten = rewrite_code_lines(&lines);
                if rewritten != lines {
                    cell.set_source_lines(rewritten);
                    report.code_cells_rewritten += 1;
                }
            }
            CellKind::Other(_) | CellKind::Missing => {}
        }
    }

    /// Rewrites every cell, then runs the document-wide pass.
    pub fn rewrite(&self, notebook: &mut Notebook) -> RewriteReport {
        let mut report = RewriteReport::default();
        for (index, cell) in notebook.cells_mut().iter_mut().enumerate() {
            let before = report;
            Self::rewrite_cell(cell, &mut report);
            if report != before {
                tracing::debug!(cell = index, kind = cell.kind().as_str(), "cell rewritten");
            }
        }
        report.consistency = apply_consistency_pass(notebook.cells_mut());
        report
    }

    /// Loads `path`, rewrites it and saves it back when anything changed.
    pub fn rewrite_file(&self, path: &Path) -> Result<RewriteReport, NotebookError> {
        let mut notebook = Notebook::load(path)?;
        let report = self.rewrite(&mut notebook);
        tracing::info!(
            path = %path.display(),
            markdown = report.markdown_cells_rewritten,
            code = report.code_cells_rewritten,
            changed = report.changed(),
            "notebook rewritten"
        );
        if report.changed() && !self.dry_run {
            notebook.save(path)?;
        }
        Ok(report)
    }
}
