//! Implementation of the `pocat check` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use miette::{IntoDiagnostic, Report, Result};
use owo_colors::{OwoColorize, Stream};
use pocat::Catalog;
use serde::Serialize;

use crate::output::{print_warnings, PoDiagnostic};

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Files to check (.po)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,
}

/// JSON output for one checked file.
#[derive(Debug, Serialize)]
struct CheckResult {
    file: String,
    entries: usize,
    warnings: Vec<String>,
    error: Option<String>,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let mut results = Vec::with_capacity(args.files.len());
    let mut unreadable = false;

    for path in &args.files {
        let file = path.display().to_string();
        let content = match read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                unreadable = true;
                if !args.json {
                    eprintln!(
                        "{} cannot read {}: {}",
                        "error:".if_supports_color(Stream::Stderr, |t| t.red()),
                        file,
                        e
                    );
                }
                results.push(CheckResult {
                    file,
                    entries: 0,
                    warnings: Vec::new(),
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        let catalog = Catalog::new();
        let result = match catalog.parse(&content) {
            Ok(report) => {
                if !args.json {
                    print_warnings(path, &content, &report.warnings);
                    let mark = if report.is_clean() { "ok" } else { "warn" };
                    println!(
                        "{} {} ({} entries, {} warnings)",
                        mark.if_supports_color(Stream::Stdout, |t| t.green()),
                        file,
                        report.entries,
                        report.warnings.len()
                    );
                }
                CheckResult {
                    file,
                    entries: report.entries,
                    warnings: report.warnings.iter().map(ToString::to_string).collect(),
                    error: None,
                }
            }
            Err(e) => {
                if !args.json {
                    let diagnostic = PoDiagnostic::from_parse_error(path, &content, &e);
                    eprintln!("{:?}", Report::new(diagnostic));
                }
                CheckResult {
                    file,
                    entries: 0,
                    warnings: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    if args.json {
        let json_output = serde_json::to_string_pretty(&results).into_diagnostic()?;
        println!("{}", json_output);
    }

    let failed = results.iter().any(|r| r.error.is_some());
    let warned = results.iter().any(|r| !r.warnings.is_empty());
    if unreadable {
        Ok(exitcode::NOINPUT)
    } else if failed || (args.strict && warned) {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
