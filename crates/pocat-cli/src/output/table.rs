//! Table formatting utilities for CLI output.

use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

/// Translation progress of one catalog file.
#[derive(Debug, Serialize)]
pub struct CatalogStats {
    /// Path as given on the command line.
    pub file: String,
    /// `Language` header, if any.
    pub language: Option<String>,
    /// Entries, header excluded.
    pub entries: usize,
    pub translated: usize,
    pub fuzzy: usize,
    pub untranslated: usize,
}

/// One evaluated count of a plural rule.
#[derive(Debug, Serialize)]
pub struct PluralRow {
    pub n: u64,
    /// `None` when the rule selects no valid form.
    pub index: Option<usize>,
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Format catalog statistics as a table.
pub fn format_stats_table(stats: &[CatalogStats]) -> Table {
    let mut table = new_table(vec![
        "File",
        "Language",
        "Entries",
        "Translated",
        "Fuzzy",
        "Untranslated",
    ]);

    for row in stats {
        table.add_row(vec![
            row.file.clone(),
            row.language.clone().unwrap_or_else(|| "-".to_string()),
            row.entries.to_string(),
            row.translated.to_string(),
            row.fuzzy.to_string(),
            row.untranslated.to_string(),
        ]);
    }
    for index in 2..6 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table
}

/// Format plural rule evaluations as a table.
pub fn format_plural_table(rows: &[PluralRow]) -> Table {
    let mut table = new_table(vec!["n", "Form"]);
    for row in rows {
        table.add_row(vec![
            row.n.to_string(),
            row.index
                .map_or_else(|| "-".to_string(), |index| index.to_string()),
        ]);
    }
    table
}
