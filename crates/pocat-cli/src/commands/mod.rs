//! CLI command implementations.

mod check;
mod eval;
mod fmt;
mod get;
mod stats;

use std::fs::read_to_string;
use std::path::Path;

use miette::{miette, Result};
use pocat::{Catalog, ParseReport};

use crate::output::PoDiagnostic;

pub use check::{run_check, CheckArgs};
pub use eval::{run_eval, EvalArgs};
pub use fmt::{run_fmt, FmtArgs};
pub use get::{run_get, GetArgs};
pub use stats::{run_stats, StatsArgs};

/// A catalog file read from disk.
pub struct LoadedCatalog {
    /// Raw file contents, kept for diagnostics.
    pub content: String,
    pub catalog: Catalog,
    pub report: ParseReport,
}

/// Read and parse a catalog file.
///
/// Fatal parse errors become diagnostics pointing into the file.
pub fn load_catalog(path: &Path) -> Result<LoadedCatalog> {
    let content = read_to_string(path)
        .map_err(|e| miette!("Cannot read catalog {}: {}", path.display(), e))?;

    let catalog = Catalog::new();
    match catalog.parse(&content) {
        Ok(report) => Ok(LoadedCatalog {
            content,
            catalog,
            report,
        }),
        Err(e) => Err(PoDiagnostic::from_parse_error(path, &content, &e).into()),
    }
}
