//! Implementation of the `pocat get` command.

use std::path::PathBuf;

use clap::Args;
use miette::{IntoDiagnostic, Result};
use pocat::{Entry, MessageKey};
use serde::Serialize;

use super::load_catalog;

/// Arguments for the get command.
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Catalog to read (.po)
    #[arg(long)]
    pub file: PathBuf,

    /// Source phrase (msgid)
    pub id: String,

    /// Message context (msgctxt)
    #[arg(long)]
    pub context: Option<String>,

    /// Plural source phrase (msgid_plural)
    #[arg(long, requires = "count")]
    pub plural: Option<String>,

    /// Count used to select the plural form
    #[arg(long, requires = "plural")]
    pub count: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for a lookup. `entry` is the stored entry, if any.
#[derive(Serialize)]
struct GetResult<'a> {
    id: &'a str,
    context: Option<&'a str>,
    translated: bool,
    result: String,
    entry: Option<Entry>,
}

/// Run the get command.
pub fn run_get(args: GetArgs) -> Result<i32> {
    let catalog = load_catalog(&args.file)?.catalog;
    let id = args.id.as_str();

    let (result, translated) = match (&args.context, &args.plural, args.count) {
        (None, None, _) => (catalog.get(id), catalog.is_translated(id)),
        (Some(context), None, _) => (
            catalog.get_with_context(id, context),
            catalog.is_translated_with_context(id, context),
        ),
        (None, Some(plural), Some(n)) => (
            catalog.get_plural(id, plural, n),
            catalog.is_translated_plural(id, n),
        ),
        (Some(context), Some(plural), Some(n)) => (
            catalog.get_plural_with_context(id, context, plural, n),
            catalog.is_translated_plural_with_context(id, context, n),
        ),
        (_, Some(_), None) => return Ok(exitcode::USAGE),
    };

    if args.json {
        let key = match args.context.as_deref() {
            Some(context) => MessageKey::with_context(context, id),
            None => MessageKey::new(id),
        };
        let output = GetResult {
            id,
            context: args.context.as_deref(),
            translated,
            result,
            entry: catalog.entry(key),
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        println!("{}", result);
    }

    if translated {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}
