//! Implementation of the `pocat fmt` command.

use std::fs::write;
use std::path::PathBuf;

use clap::Args;
use miette::{miette, Result};
use tracing::info;

use super::load_catalog;
use crate::output::print_warnings;

/// Arguments for the fmt command.
#[derive(Debug, Args)]
pub struct FmtArgs {
    /// Catalog to rewrite (.po)
    pub file: PathBuf,

    /// Write here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the fmt command.
pub fn run_fmt(args: FmtArgs) -> Result<i32> {
    let loaded = load_catalog(&args.file)?;
    print_warnings(&args.file, &loaded.content, &loaded.report.warnings);

    let formatted = loaded.catalog.to_po_string();
    match &args.output {
        Some(path) => {
            write(path, &formatted)
                .map_err(|e| miette!("Cannot write {}: {}", path.display(), e))?;
            info!(path = %path.display(), entries = loaded.catalog.len(), "wrote catalog");
        }
        None => print!("{}", formatted),
    }
    Ok(exitcode::OK)
}
