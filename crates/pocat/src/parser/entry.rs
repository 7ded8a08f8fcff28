//! Block-by-block entry parser.
//!
//! A catalog is a sequence of blocks separated by blank lines. Each block
//! holds comment lines (`#`, `#.`, `#:`, `#,`, `#|`) and keyword lines
//! (`msgctxt`, `msgid`, `msgid_plural`, `msgstr`, `msgstr[K]`) and produces
//! at most one [`Entry`]. Problems inside a block are reported as
//! [`ParseWarning`]s and the offending line is skipped.

use tracing::debug;

use super::cursor::{LineCursor, is_blank};
use super::error::{ParseError, ParseWarning};
use crate::plural::MAX_PLURAL_FORMS;
use crate::types::Entry;

/// Entries and warnings produced by [`parse_entries`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCatalog {
    /// Entries in the order their blocks appear.
    pub entries: Vec<Entry>,
    /// Recoverable problems, in input order.
    pub warnings: Vec<ParseWarning>,
}

/// Parse catalog text into entries without filing them anywhere.
///
/// Duplicate keys are kept as separate entries; resolving them is up to
/// the store. An entry without any `msgstr` line gets an empty first form,
/// the same as an explicit `msgstr ""`.
///
/// # Example
///
/// ```
/// use pocat::parser::parse_entries;
///
/// let parsed = parse_entries("msgid \"hello\"\nmsgstr \"\"\n\"hal\"\n\"lo\"\n").unwrap();
/// assert_eq!(parsed.entries[0].variants.get(0), Some("hallo"));
/// ```
pub fn parse_entries(text: &str) -> Result<ParsedCatalog, ParseError> {
    let mut cursor = LineCursor::new(text);
    let mut parsed = ParsedCatalog::default();
    let mut blocks = 0;

    while cursor.skip_blank().is_some() {
        blocks += 1;
        if let Some(entry) = parse_block(&mut cursor, &mut parsed.warnings) {
            parsed.entries.push(entry);
        }
    }

    if blocks == 0 {
        return Err(ParseError::Empty);
    }
    if parsed.entries.is_empty() {
        return Err(ParseError::NoEntries { blocks });
    }

    debug!(
        blocks,
        entries = parsed.entries.len(),
        warnings = parsed.warnings.len(),
        "parsed catalog text"
    );
    Ok(parsed)
}

/// Parse one block, stopping at the next blank line or end of input.
fn parse_block(cursor: &mut LineCursor<'_>, warnings: &mut Vec<ParseWarning>) -> Option<Entry> {
    let first_line = cursor.line_number();
    let mut entry = Entry::default();
    let mut has_id = false;

    while let Some(line) = cursor.current() {
        if is_blank(line) {
            break;
        }
        let line_number = cursor.line_number();
        cursor.next_line();

        let line = line.trim();
        let result = if line.starts_with('#') {
            parse_comment(&mut entry, line, cursor)
        } else {
            parse_keyword(&mut entry, line, cursor).map(|is_id| has_id |= is_id)
        };

        if let Err(message) = result {
            debug!(line = line_number, %message, "skipping malformed line");
            warnings.push(ParseWarning::MalformedEntry {
                line: line_number,
                message,
            });
        }
    }

    if !has_id {
        debug!(line = first_line, "skipping block without msgid");
        warnings.push(ParseWarning::MissingMsgid { line: first_line });
        return None;
    }
    if entry.variants.get(0).is_none() {
        entry.variants.set(0, "");
    }
    Some(entry)
}

/// Parse a comment line. `line` starts with `#`.
fn parse_comment(entry: &mut Entry, line: &str, cursor: &mut LineCursor<'_>) -> Result<(), String> {
    let rest = &line[1..];
    let Some(marker) = rest.chars().next() else {
        entry.translator_comments.push(String::new());
        return Ok(());
    };
    let body = &rest[marker.len_utf8()..];

    match marker {
        '.' => entry.extracted_comments.push(body.trim().to_string()),
        ':' => entry
            .references
            .extend(body.split_whitespace().map(str::to_string)),
        ',' => entry.flags.extend(
            body.split(',')
                .map(str::trim)
                .filter(|flag| !flag.is_empty())
                .map(str::to_string),
        ),
        '|' => parse_previous(entry, body, cursor)?,
        _ => entry.translator_comments.push(rest.trim().to_string()),
    }
    Ok(())
}

/// Parse a `#| keyword "value"` comment. Continuation lines carry the
/// same `#|` prefix.
fn parse_previous(entry: &mut Entry, body: &str, cursor: &mut LineCursor<'_>) -> Result<(), String> {
    let (keyword, value) = split_keyword(body.trim())
        .ok_or_else(|| format!("previous-value comment without a value: '#|{body}'"))?;
    let target = match keyword {
        "msgctxt" => &mut entry.previous_context,
        "msgid" => &mut entry.previous_id,
        "msgid_plural" => &mut entry.previous_plural_id,
        other => return Err(format!("unknown keyword '{other}' in previous-value comment")),
    };
    let value = cursor
        .read_quoted_string(value, "#|")
        .map_err(|e| format!("#| {keyword}: {e}"))?;
    *target = Some(value);
    Ok(())
}

/// Parse a keyword line. Returns true if it was the entry's `msgid`.
///
/// The value is always read, so continuation lines are consumed even when
/// the keyword turns out to be unusable.
fn parse_keyword(entry: &mut Entry, line: &str, cursor: &mut LineCursor<'_>) -> Result<bool, String> {
    let (keyword, value) =
        split_keyword(line).ok_or_else(|| format!("expected a keyword and a value, found '{line}'"))?;
    let value = cursor
        .read_quoted_string(value, "")
        .map_err(|e| format!("{keyword}: {e}"));

    match keyword {
        "msgctxt" => entry.context = Some(value?),
        "msgid" => {
            entry.id = value?;
            return Ok(true);
        }
        "msgid_plural" => entry.plural_id = Some(value?),
        "msgstr" => entry.variants.set(0, value?),
        _ if keyword.starts_with("msgstr") => {
            let index = plural_index(keyword)
                .ok_or_else(|| format!("malformed plural index in '{keyword}'"))?;
            if index >= MAX_PLURAL_FORMS {
                return Err(format!(
                    "plural index in '{keyword}' exceeds the limit of {MAX_PLURAL_FORMS} forms"
                ));
            }
            entry.variants.set(index, value?);
        }
        other => return Err(format!("unknown keyword '{other}'")),
    }
    Ok(false)
}

/// Split `keyword rest` on the first whitespace; the rest is trimmed.
fn split_keyword(line: &str) -> Option<(&str, &str)> {
    let (keyword, rest) = line.split_once(char::is_whitespace)?;
    Some((keyword, rest.trim()))
}

/// The `K` of `msgstr[K]`.
fn plural_index(keyword: &str) -> Option<usize> {
    keyword
        .strip_prefix("msgstr[")?
        .strip_suffix(']')?
        .trim()
        .parse()
        .ok()
}
