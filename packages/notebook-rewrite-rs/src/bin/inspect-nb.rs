use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use notebook_rewrite_rs::{init_logging, render_notebook, Notebook};

const USAGE: &str = "Usage: inspect-nb <notebook.ipynb>";

/// Print a compact summary of every cell in a notebook.
#[derive(Debug, Parser)]
#[command(name = "inspect-nb", version)]
struct Args {
    /// Notebook to summarize.
    path: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    init_logging();
    let args = Args::parse();

    let Some(path) = args.path.filter(|path| path.exists()) else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    let notebook =
        Notebook::load(&path).with_context(|| format!("failed to read {}", path.display()))?;

    // Output is best-effort: a closed or misconfigured stdout must not fail the run.
    let mut out = io::stdout().lock();
    if let Err(err) = out
        .write_all(render_notebook(&notebook).as_bytes())
        .and_then(|()| out.flush())
    {
        tracing::debug!(error = %err, "stdout unavailable, output dropped");
    }

    Ok(ExitCode::SUCCESS)
}
