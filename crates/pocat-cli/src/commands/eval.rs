//! Implementation of the `pocat eval` command.

use std::path::PathBuf;

use clap::ArgGroup;
use miette::{IntoDiagnostic, Result};
use pocat::PluralRule;

use super::load_catalog;
use crate::output::table::{format_plural_table, PluralRow};

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
#[command(group(ArgGroup::new("source").required(true).args(["rule", "file"])))]
pub struct EvalArgs {
    /// Plural rule, e.g. "nplurals=2; plural=(n != 1);"
    #[arg(long)]
    pub rule: Option<String>,

    /// Catalog whose Plural-Forms header is evaluated (.po)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Counts to evaluate (repeatable); defaults to 0 through 20
    #[arg(short = 'n', long = "count")]
    pub counts: Vec<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> Result<i32> {
    let counts = if args.counts.is_empty() {
        (0..=20).collect()
    } else {
        args.counts.clone()
    };

    let rows: Vec<PluralRow> = if let Some(rule) = &args.rule {
        let compiled = match rule.parse::<PluralRule>() {
            Ok(compiled) => compiled,
            Err(e) => {
                if args.json {
                    let output = serde_json::json!({
                        "error": e.to_string()
                    });
                    eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
                } else {
                    eprintln!("Invalid plural rule: {}", e);
                }
                return Ok(exitcode::DATAERR);
            }
        };
        counts
            .iter()
            .map(|&n| PluralRow {
                n,
                index: compiled.select(n),
            })
            .collect()
    } else if let Some(path) = &args.file {
        let loaded = load_catalog(path)?;
        counts
            .iter()
            .map(|&n| PluralRow {
                n,
                index: loaded.catalog.plural_index(n),
            })
            .collect()
    } else {
        return Ok(exitcode::USAGE);
    };

    if args.json {
        let json_output = serde_json::to_string_pretty(&rows).into_diagnostic()?;
        println!("{}", json_output);
    } else {
        println!("{}", format_plural_table(&rows));
    }
    Ok(exitcode::OK)
}
