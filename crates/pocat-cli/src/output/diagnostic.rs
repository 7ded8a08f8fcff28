//! Miette diagnostic wrappers for PO parse errors and warnings.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use std::path::Path;

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use pocat::parser::quote;
use pocat::{ParseError, ParseWarning};
use thiserror::Error;

/// A miette-compatible diagnostic for a catalog that cannot be used at all.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("invalid catalog: {message}")]
#[diagnostic(code(pocat::parse))]
pub struct PoDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl PoDiagnostic {
    /// Create a diagnostic from a ParseError with source context.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        let help = match err {
            ParseError::Empty => "a catalog needs at least one msgid/msgstr entry",
            ParseError::NoEntries { .. } => "every entry needs a msgid line",
        };
        let first_content = content
            .lines()
            .position(|line| !line.trim().is_empty())
            .map_or(1, |index| index + 1);

        PoDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: line_span(content, first_content),
            message: err.to_string(),
            help: Some(help.to_string()),
        }
    }
}

/// A miette-compatible diagnostic for a recoverable parse problem.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(pocat::warning), severity(Warning))]
pub struct PoWarning {
    #[source_code]
    src: NamedSource<String>,

    #[label("skipped")]
    span: SourceSpan,

    message: String,
}

impl PoWarning {
    /// Create a diagnostic from a ParseWarning with source context.
    pub fn from_parse_warning(path: &Path, content: &str, warning: &ParseWarning) -> Self {
        let (line, message) = match warning {
            ParseWarning::MalformedEntry { line, message } => (*line, message.clone()),
            ParseWarning::MissingMsgid { line } => {
                (*line, "block has no msgid and was ignored".to_string())
            }
            ParseWarning::MalformedPluralRule { .. } => {
                (find_line(content, "Plural-Forms:"), warning.to_string())
            }
            ParseWarning::VariantOutOfRange { id, .. } => (
                find_line(content, &format!("msgid {}", quote(id))),
                warning.to_string(),
            ),
        };

        PoWarning {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: line_span(content, line),
            message,
        }
    }
}

/// Print every warning of a parse as a rendered diagnostic on stderr.
pub fn print_warnings(path: &Path, content: &str, warnings: &[ParseWarning]) {
    for warning in warnings {
        let report = Report::new(PoWarning::from_parse_warning(path, content, warning));
        eprintln!("{:?}", report);
    }
}

/// Span covering one-based line `line`, clamped to the content.
fn line_span(content: &str, line: usize) -> SourceSpan {
    let offset = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    let offset = offset.min(content.len());
    let length = content[offset..]
        .find('\n')
        .unwrap_or(content.len() - offset);
    (offset, length).into()
}

/// One-based number of the first line containing `needle`, or 1.
fn find_line(content: &str, needle: &str) -> usize {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map_or(1, |index| index + 1)
}
