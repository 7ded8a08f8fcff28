//! Integration tests for block-by-block entry parsing.

use pocat::parser::{ParsedCatalog, parse_entries, parse_headers};
use pocat::{ParseError, ParseWarning};

fn parse(text: &str) -> ParsedCatalog {
    parse_entries(text).unwrap()
}

// =========================================================================
// Keywords
// =========================================================================

#[test]
fn simple_entry() {
    let parsed = parse("msgid \"Hello\"\nmsgstr \"Hallo\"\n");
    assert_eq!(parsed.entries.len(), 1);
    assert!(parsed.warnings.is_empty());
    let entry = &parsed.entries[0];
    assert_eq!(entry.id, "Hello");
    assert_eq!(entry.variants.get(0), Some("Hallo"));
    assert_eq!(entry.context, None);
    assert!(!entry.is_dirty());
}

#[test]
fn context_and_multiline_value() {
    let parsed = parse("msgctxt \"问候2\"\nmsgid \"你好\"\nmsgstr \"\"\n\"hello\\n\"\n\"hi\"\n");
    let entry = &parsed.entries[0];
    assert_eq!(entry.context.as_deref(), Some("问候2"));
    assert_eq!(entry.id, "你好");
    assert_eq!(entry.variants.get(0), Some("hello\nhi"));
}

#[test]
fn plural_entry() {
    let parsed = parse(
        "msgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"Datei\"\nmsgstr[1] \"Dateien\"\n",
    );
    let entry = &parsed.entries[0];
    assert_eq!(entry.plural_id.as_deref(), Some("files"));
    assert_eq!(entry.variants.get(0), Some("Datei"));
    assert_eq!(entry.variants.get(1), Some("Dateien"));
    assert!(entry.is_plural());
}

#[test]
fn blocks_are_separated_by_blank_lines() {
    let parsed = parse("msgid \"a\"\nmsgstr \"A\"\n\n\n  \nmsgid \"b\"\nmsgstr \"B\"");
    let ids: Vec<&str> = parsed.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn windows_line_endings() {
    let parsed = parse("msgid \"a\"\r\nmsgstr \"\"\r\n\"x\"\r\n\"y\"\r\n");
    assert_eq!(parsed.entries[0].variants.get(0), Some("xy"));
}

#[test]
fn lone_carriage_returns_end_lines() {
    let parsed = parse("msgid \"a\"\rmsgstr \"A\"\r\rmsgid \"b\"\rmsgstr \"B\"\r");
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[1].variants.get(0), Some("B"));
    assert!(parsed.warnings.is_empty());
}

#[test]
fn missing_msgstr_reads_as_empty_translation() {
    let parsed = parse("msgid \"a\"\n\nmsgid \"b\"\nmsgid_plural \"bs\"\nmsgstr[1] \"B\"\n");
    assert_eq!(parsed.entries[0].variants.get(0), Some(""));
    assert!(!parsed.entries[0].is_translated());
    assert_eq!(parsed.entries[1].variants.get(0), Some(""));
    assert_eq!(parsed.entries[1].variants.get(1), Some("B"));
    assert!(parsed.warnings.is_empty());
}

#[test]
fn duplicate_keys_are_kept_in_order() {
    let parsed = parse("msgid \"a\"\nmsgstr \"1\"\n\nmsgid \"a\"\nmsgstr \"2\"\n");
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[1].variants.get(0), Some("2"));
}

// =========================================================================
// Comments
// =========================================================================

#[test]
fn all_comment_kinds() {
    let parsed = parse(
        r#"# translator note
#. extracted note
#: src/main.rs:10 src/lib.rs:20
#:   src/extra.rs:3
#, fuzzy, c-format
#| msgctxt "old context"
#| msgid "old id"
#| msgid_plural "old ids"
msgid "id"
msgstr "translated"
"#,
    );
    let entry = &parsed.entries[0];
    assert_eq!(entry.translator_comments, vec!["translator note"]);
    assert_eq!(entry.extracted_comments, vec!["extracted note"]);
    assert_eq!(
        entry.references,
        vec!["src/main.rs:10", "src/lib.rs:20", "src/extra.rs:3"]
    );
    assert_eq!(entry.flags, vec!["fuzzy", "c-format"]);
    assert!(entry.is_fuzzy());
    assert_eq!(entry.previous_context.as_deref(), Some("old context"));
    assert_eq!(entry.previous_id.as_deref(), Some("old id"));
    assert_eq!(entry.previous_plural_id.as_deref(), Some("old ids"));
}

#[test]
fn previous_id_continues_across_lines() {
    let parsed = parse("#| msgid \"\"\n#| \"first \"\n#| \"second\"\nmsgid \"x\"\nmsgstr \"\"\n");
    assert_eq!(
        parsed.entries[0].previous_id.as_deref(),
        Some("first second")
    );
}

#[test]
fn bare_hash_and_unknown_markers_are_translator_comments() {
    let parsed = parse("#\n#~unusual\nmsgid \"x\"\nmsgstr \"\"\n");
    assert_eq!(parsed.entries[0].translator_comments, vec!["", "~unusual"]);
}

#[test]
fn empty_flags_are_skipped() {
    let parsed = parse("#, fuzzy,, ,python-format\nmsgid \"x\"\nmsgstr \"\"\n");
    assert_eq!(parsed.entries[0].flags, vec!["fuzzy", "python-format"]);
}

// =========================================================================
// Warnings
// =========================================================================

#[test]
fn unknown_keyword_is_skipped_with_warning() {
    let parsed = parse("msgid \"a\"\nmsgfoo \"bar\"\n\"continued\"\nmsgstr \"A\"\n");
    assert_eq!(parsed.entries[0].variants.get(0), Some("A"));
    assert_eq!(
        parsed.warnings,
        vec![ParseWarning::MalformedEntry {
            line: 2,
            message: "unknown keyword 'msgfoo'".to_string(),
        }]
    );
}

#[test]
fn malformed_plural_index_is_skipped() {
    let parsed = parse("msgid \"a\"\nmsgid_plural \"as\"\nmsgstr[x] \"bad\"\nmsgstr[1] \"good\"\n");
    let entry = &parsed.entries[0];
    assert_eq!(entry.variants.get(0), Some(""));
    assert_eq!(entry.variants.get(1), Some("good"));
    assert_eq!(entry.variants.len(), 2);
    assert!(matches!(
        parsed.warnings.as_slice(),
        [ParseWarning::MalformedEntry { line: 3, .. }]
    ));
}

#[test]
fn plural_index_beyond_limit_is_skipped() {
    let parsed = parse(
        "msgid \"a\"\nmsgid_plural \"as\"\nmsgstr[18446744073709551615] \"x\"\nmsgstr[64] \"y\"\nmsgstr[63] \"z\"\n",
    );
    let entry = &parsed.entries[0];
    assert_eq!(entry.variants.max_index(), Some(63));
    assert_eq!(entry.variants.get(63), Some("z"));
    assert_eq!(
        parsed.warnings,
        vec![
            ParseWarning::MalformedEntry {
                line: 3,
                message: "plural index in 'msgstr[18446744073709551615]' exceeds the limit of 64 forms"
                    .to_string(),
            },
            ParseWarning::MalformedEntry {
                line: 4,
                message: "plural index in 'msgstr[64]' exceeds the limit of 64 forms".to_string(),
            },
        ]
    );
}

#[test]
fn keyword_without_value_is_skipped() {
    let parsed = parse("msgid \"a\"\nmsgstr\n");
    assert_eq!(parsed.entries[0].variants.get(0), Some(""));
    assert!(matches!(
        parsed.warnings.as_slice(),
        [ParseWarning::MalformedEntry { line: 2, .. }]
    ));
}

#[test]
fn bad_context_leaves_entry_without_context() {
    let parsed = parse("msgctxt \"bad \\q\"\nmsgid \"a\"\nmsgstr \"A\"\n");
    let entry = &parsed.entries[0];
    assert_eq!(entry.context, None);
    assert_eq!(entry.variants.get(0), Some("A"));
    assert_eq!(parsed.warnings.len(), 1);
}

#[test]
fn block_without_msgid_is_dropped() {
    let parsed = parse("# orphan comment\nmsgstr \"lost\"\n\nmsgid \"a\"\nmsgstr \"A\"\n");
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.warnings, vec![ParseWarning::MissingMsgid { line: 1 }]);
}

#[test]
fn warning_messages_carry_line_numbers() {
    let parsed = parse("msgid \"a\"\nbogus\n");
    assert_eq!(
        parsed.warnings[0].to_string(),
        "line 2: expected a keyword and a value, found 'bogus'"
    );
}

// =========================================================================
// Fatal Errors
// =========================================================================

#[test]
fn empty_input_is_fatal() {
    assert_eq!(parse_entries(""), Err(ParseError::Empty));
    assert_eq!(parse_entries("\n  \n\t\n"), Err(ParseError::Empty));
}

#[test]
fn input_without_entries_is_fatal() {
    assert_eq!(
        parse_entries("# just a comment\n\nmsgstr \"x\"\n"),
        Err(ParseError::NoEntries { blocks: 2 })
    );
}

// =========================================================================
// Headers
// =========================================================================

#[test]
fn header_lines_split_on_first_colon() {
    let headers = parse_headers(
        "Content-Type: text/plain; charset=UTF-8\nPOT-Creation-Date: 2024-01-01 10:00+0000\nno colon here\n: empty key\n",
    );
    assert_eq!(headers.len(), 2);
    assert_eq!(
        headers.get("content-type"),
        Some("text/plain; charset=UTF-8")
    );
    assert_eq!(
        headers.get("POT-Creation-Date"),
        Some("2024-01-01 10:00+0000")
    );
}
