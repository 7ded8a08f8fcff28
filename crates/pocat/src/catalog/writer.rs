//! Canonical PO output.
//!
//! The header block comes first, then every other entry in store order,
//! blocks separated by one blank line. Output is stable: parsing it and
//! writing again produces the same text.

use std::fmt::{Result as FmtResult, Write};

use crate::parser::quote;
use crate::plural::MAX_PLURAL_FORMS;
use crate::types::{Entry, Headers};

/// Write the whole catalog.
///
/// `nplurals` is the declared number of plural forms; plural entries get a
/// `msgstr[K]` line for every form below [`plural_form_count`], followed by
/// any stored forms above it.
pub(crate) fn write_catalog(
    out: &mut impl Write,
    entries: &[Entry],
    headers: &Headers,
    nplurals: Option<usize>,
) -> FmtResult {
    let header = entries.iter().find(|entry| entry.is_header());
    let mut first = true;

    if header.is_some() || !headers.is_empty() {
        write_header(out, header, headers)?;
        first = false;
    }

    for entry in entries.iter().filter(|entry| !entry.is_header()) {
        if !first {
            out.write_char('\n')?;
        }
        first = false;
        write_entry(out, entry, nplurals)?;
    }
    Ok(())
}

/// Number of `msgstr[K]` lines every plural entry is written with.
pub(crate) fn plural_form_count(nplurals: Option<usize>) -> usize {
    nplurals.unwrap_or(2).clamp(1, MAX_PLURAL_FORMS)
}

/// Render header fields as the `Key: Value\n` text stored in the header
/// entry's `msgstr`.
pub(crate) fn render_headers(headers: &Headers) -> String {
    headers
        .iter()
        .map(|(key, value)| format!("{key}: {value}\n"))
        .collect()
}

fn write_header(out: &mut impl Write, header: Option<&Entry>, headers: &Headers) -> FmtResult {
    if let Some(entry) = header {
        write_comments(out, entry)?;
    }
    out.write_str("msgid \"\"\nmsgstr \"\"\n")?;
    for (key, value) in headers.iter() {
        writeln!(out, "{}", quote(&format!("{key}: {value}\n")))?;
    }
    Ok(())
}

fn write_entry(out: &mut impl Write, entry: &Entry, nplurals: Option<usize>) -> FmtResult {
    write_comments(out, entry)?;

    if let Some(context) = &entry.context {
        write_string(out, "", "msgctxt", context)?;
    }
    write_string(out, "", "msgid", &entry.id)?;

    match &entry.plural_id {
        Some(plural) => {
            write_string(out, "", "msgid_plural", plural)?;
            let count = plural_form_count(nplurals);
            for index in 0..count {
                let keyword = format!("msgstr[{index}]");
                write_string(out, "", &keyword, entry.variants.get(index).unwrap_or(""))?;
            }
            for (index, value) in entry.variants.iter().filter(|(index, _)| *index >= count) {
                let keyword = format!("msgstr[{index}]");
                write_string(out, "", &keyword, value)?;
            }
        }
        None => {
            write_string(out, "", "msgstr", entry.variants.get(0).unwrap_or(""))?;
            for (index, value) in entry.variants.iter().filter(|(index, _)| *index > 0) {
                let keyword = format!("msgstr[{index}]");
                write_string(out, "", &keyword, value)?;
            }
        }
    }
    Ok(())
}

fn write_comments(out: &mut impl Write, entry: &Entry) -> FmtResult {
    for comment in &entry.translator_comments {
        write_comment(out, "#", comment)?;
    }
    for comment in &entry.extracted_comments {
        write_comment(out, "#.", comment)?;
    }
    for reference in &entry.references {
        writeln!(out, "#: {reference}")?;
    }
    if !entry.flags.is_empty() {
        writeln!(out, "#, {}", entry.flags.join(", "))?;
    }

    let previous = [
        ("msgctxt", &entry.previous_context),
        ("msgid", &entry.previous_id),
        ("msgid_plural", &entry.previous_plural_id),
    ];
    for (keyword, value) in previous {
        if let Some(value) = value {
            write_string(out, "#| ", keyword, value)?;
        }
    }
    Ok(())
}

fn write_comment(out: &mut impl Write, marker: &str, text: &str) -> FmtResult {
    if text.is_empty() {
        writeln!(out, "{marker}")
    } else {
        writeln!(out, "{marker} {text}")
    }
}

/// Write `keyword "value"`, splitting values with an inner newline into one
/// quoted line per `\n`-terminated chunk after an empty first line.
fn write_string(out: &mut impl Write, prefix: &str, keyword: &str, value: &str) -> FmtResult {
    let multiline = value
        .find('\n')
        .is_some_and(|position| position + 1 < value.len());
    if !multiline {
        return writeln!(out, "{prefix}{keyword} {}", quote(value));
    }

    writeln!(out, "{prefix}{keyword} \"\"")?;
    for chunk in value.split_inclusive('\n') {
        writeln!(out, "{prefix}{}", quote(chunk))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_trailing_newline_stays_on_one_line() {
        let mut out = String::new();
        write_string(&mut out, "", "msgid", "hello\n").unwrap();
        assert_eq!(out, "msgid \"hello\\n\"\n");
    }

    #[test]
    fn inner_newline_splits_into_chunks() {
        let mut out = String::new();
        write_string(&mut out, "#| ", "msgid", "a\nb").unwrap();
        assert_eq!(out, "#| msgid \"\"\n#| \"a\\n\"\n#| \"b\"\n");
    }

    #[test]
    fn forms_beyond_the_declared_count_are_written_sparsely() {
        let mut entry = Entry::builder().id("a").plural_id("as".to_string()).build();
        entry.set_translation_n(1, "one");
        entry.set_translation_n(usize::MAX, "far");
        let mut out = String::new();
        write_entry(&mut out, &entry, Some(3)).unwrap();
        assert_eq!(
            out,
            format!(
                "msgid \"a\"\nmsgid_plural \"as\"\nmsgstr[0] \"\"\nmsgstr[1] \"one\"\nmsgstr[2] \"\"\nmsgstr[{}] \"far\"\n",
                usize::MAX
            )
        );
    }

    #[test]
    fn form_count_is_clamped() {
        assert_eq!(plural_form_count(None), 2);
        assert_eq!(plural_form_count(Some(1)), 1);
        assert_eq!(plural_form_count(Some(usize::MAX)), MAX_PLURAL_FORMS);
    }
}
