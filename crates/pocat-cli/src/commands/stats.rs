//! Implementation of the `pocat stats` command.

use std::path::PathBuf;

use clap::Args;
use miette::{IntoDiagnostic, Result};
use pocat::{Catalog, Entry};

use super::load_catalog;
use crate::output::table::{format_stats_table, CatalogStats};

/// Arguments for the stats command.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Catalogs to report on (.po)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Run the stats command.
pub fn run_stats(args: StatsArgs) -> Result<i32> {
    let mut stats = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let loaded = load_catalog(path)?;
        stats.push(catalog_stats(path.display().to_string(), &loaded.catalog));
    }

    if args.json {
        let json_output = serde_json::to_string_pretty(&stats).into_diagnostic()?;
        println!("{}", json_output);
    } else {
        println!("{}", format_stats_table(&stats));
    }
    Ok(exitcode::OK)
}

/// Count entries by state. Fuzzy entries are not counted as translated.
fn catalog_stats(file: String, catalog: &Catalog) -> CatalogStats {
    let nplurals = catalog.nplurals().unwrap_or(2);
    let mut stats = CatalogStats {
        file,
        language: catalog.language(),
        entries: 0,
        translated: 0,
        fuzzy: 0,
        untranslated: 0,
    };

    for entry in catalog.entries().iter().filter(|e| !e.is_header()) {
        stats.entries += 1;
        if entry.is_fuzzy() {
            stats.fuzzy += 1;
        } else if is_complete(entry, nplurals) {
            stats.translated += 1;
        } else {
            stats.untranslated += 1;
        }
    }
    stats
}

/// Every form the catalog declares has a translation.
fn is_complete(entry: &Entry, nplurals: usize) -> bool {
    if entry.is_plural() {
        (0..nplurals).all(|index| entry.is_translated_n(index))
    } else {
        entry.is_translated()
    }
}
