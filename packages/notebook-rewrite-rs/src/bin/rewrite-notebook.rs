use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use notebook_rewrite_rs::{init_logging, NotebookRewriter};

const USAGE: &str = "Usage: rewrite-notebook <notebook.ipynb> [--dry-run]";

/// Rewrite markdown and comment text of a notebook in place.
#[derive(Debug, Parser)]
#[command(name = "rewrite-notebook", version, override_usage = "rewrite-notebook <notebook.ipynb> [--dry-run]")]
struct Args {
    /// Notebook to rewrite.
    path: PathBuf,

    /// Report what would change without writing the notebook.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<ExitCode> {
    init_logging();
    let args = Args::parse();

    if !args.path.exists() {
        eprintln!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    }

    let report = NotebookRewriter::new()
        .dry_run(args.dry_run)
        .rewrite_file(&args.path)
        .with_context(|| format!("failed to rewrite {}", args.path.display()))?;

    if !report.changed() {
        println!("No changes detected");
    } else if args.dry_run {
        println!("Would update: {}", args.path.display());
    } else {
        println!("Updated: {}", args.path.display());
    }
    Ok(ExitCode::SUCCESS)
}
