//! Integration tests for the catalog store.

use std::sync::Arc;
use std::thread;

use pocat::{Catalog, MessageKey, ParseError, ParseWarning, PluralError};

const SAMPLE: &str = r#"# Chinese translations.
msgid ""
msgstr ""
"Project-Id-Version: demo 1.0\n"
"Language: zh_CN\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

#: src/greet.rs:10
msgid "你好"
msgstr "hello"

msgctxt "问候2"
msgid "你好"
msgstr ""
"hello\n"
"hi"

msgid "apple"
msgid_plural "apples"
msgstr[0] "一个苹果"
msgstr[1] "%d个苹果"

msgid "untranslated"
msgstr ""
"#;

fn sample() -> Catalog {
    Catalog::from_po(SAMPLE).unwrap()
}

// =========================================================================
// Parsing and Headers
// =========================================================================

#[test]
fn sample_parses_cleanly() {
    let catalog = Catalog::new();
    let report = catalog.parse(SAMPLE).unwrap();
    assert_eq!(report.entries, 5);
    assert!(report.is_clean(), "{:?}", report.warnings);
    assert_eq!(catalog.len(), 5);
}

#[test]
fn headers_are_surfaced() {
    let catalog = sample();
    assert_eq!(catalog.language().as_deref(), Some("zh_CN"));
    assert_eq!(
        catalog.plural_forms().as_deref(),
        Some("nplurals=2; plural=(n != 1);")
    );
    assert_eq!(
        catalog.header("content-type").as_deref(),
        Some("text/plain; charset=UTF-8")
    );
    assert_eq!(catalog.headers().len(), 4);
}

#[test]
fn plural_forms_header_drives_selection() {
    let catalog = sample();
    assert_eq!(catalog.nplurals(), Some(2));
    assert_eq!(catalog.plural_index(0), Some(1));
    assert_eq!(catalog.plural_index(1), Some(0));
    assert_eq!(catalog.plural_index(2), Some(1));
}

#[test]
fn malformed_plural_forms_falls_back_to_default() {
    let catalog = Catalog::new();
    let report = catalog
        .parse("msgid \"\"\nmsgstr \"Plural-Forms: nplurals=3; plural=n ? x : 1;\\n\"\n")
        .unwrap();
    assert!(matches!(
        report.warnings.as_slice(),
        [ParseWarning::MalformedPluralRule {
            error: PluralError::UnknownIdentifier { .. },
            ..
        }]
    ));
    assert_eq!(catalog.nplurals(), Some(2));
    assert_eq!(catalog.plural_index(1), Some(0));
}

#[test]
fn variants_beyond_nplurals_are_reported_and_kept() {
    let catalog = Catalog::new();
    let report = catalog
        .parse(
            "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=1; plural=0;\\n\"\n\n\
             msgid \"a\"\nmsgid_plural \"as\"\nmsgstr[0] \"x\"\nmsgstr[1] \"y\"\n",
        )
        .unwrap();
    assert_eq!(
        report.warnings,
        vec![ParseWarning::VariantOutOfRange {
            id: "a".to_string(),
            index: 1,
            nplurals: 1,
        }]
    );
    let entry = catalog.entry("a").unwrap();
    assert_eq!(entry.variants.get(1), Some("y"));
}

#[test]
fn fatal_errors_propagate() {
    assert_eq!(Catalog::from_po("").unwrap_err(), ParseError::Empty);
    assert_eq!(
        Catalog::from_po("# nothing\n").unwrap_err(),
        ParseError::NoEntries { blocks: 1 }
    );
}

#[test]
fn set_header_updates_header_and_rule() {
    let catalog = sample();
    catalog.set_header("Language", "zh_TW");
    catalog.set_header("Plural-Forms", "nplurals=1; plural=0;");
    assert_eq!(catalog.language().as_deref(), Some("zh_TW"));
    assert_eq!(catalog.nplurals(), Some(1));
    assert_eq!(catalog.plural_index(5), Some(0));

    let header = catalog.entry("").unwrap();
    assert!(header.variants.get(0).unwrap().contains("Language: zh_TW\n"));
}

// =========================================================================
// Lookup
// =========================================================================

#[test]
fn get_returns_translation() {
    let catalog = sample();
    assert_eq!(catalog.get("你好"), "hello");
}

#[test]
fn get_with_context_reads_multiline_value() {
    let catalog = sample();
    assert_eq!(catalog.get_with_context("你好", "问候2"), "hello\nhi");
    assert!(catalog.is_translated_with_context("你好", "问候2"));
}

#[test]
fn empty_translation_falls_back_to_id() {
    let catalog = sample();
    assert_eq!(catalog.get("untranslated"), "untranslated");
    assert!(!catalog.is_translated("untranslated"));
}

#[test]
fn missing_entry_falls_back_to_id() {
    let catalog = sample();
    assert_eq!(catalog.get("nowhere"), "nowhere");
    assert_eq!(catalog.get_with_context("你好", "unknown"), "你好");
    assert!(!catalog.is_translated("nowhere"));
}

#[test]
fn get_plural_selects_by_count() {
    let catalog = sample();
    assert_eq!(catalog.get_plural("apple", "apples", 1), "一个苹果");
    assert_eq!(catalog.get_plural("apple", "apples", 3), "%d个苹果");
    assert!(catalog.is_translated_plural("apple", 1));
    assert!(catalog.is_translated_plural("apple", 7));
}

#[test]
fn plural_fallback_uses_source_phrases() {
    let catalog = sample();
    assert_eq!(catalog.get_plural("pear", "pears", 1), "pear");
    assert_eq!(catalog.get_plural("pear", "pears", 2), "pears");
    assert!(!catalog.is_translated_plural("pear", 2));
}

#[test]
fn missing_plural_entry_follows_source_language_rule() {
    let catalog = Catalog::from_po(
        "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=1; plural=0;\\n\"\n\n\
         msgid \"pear\"\nmsgid_plural \"pears\"\nmsgstr[0] \"\"\n",
    )
    .unwrap();
    assert_eq!(catalog.plural_index(5), Some(0));
    assert_eq!(catalog.get_plural("apple", "apples", 5), "apples");
    assert_eq!(catalog.get_plural("apple", "apples", 1), "apple");
    assert_eq!(catalog.get_plural_with_context("apple", "fruit", "apples", 0), "apples");
    assert_eq!(catalog.get_plural("pear", "pears", 5), "pear");
}

#[test]
fn plural_fallback_prefers_entry_plural_id() {
    let catalog = Catalog::from_po("msgid \"box\"\nmsgid_plural \"boxes\"\nmsgstr[0] \"\"\nmsgstr[1] \"\"\n").unwrap();
    assert_eq!(catalog.get_plural("box", "", 4), "boxes");
    assert_eq!(catalog.get_plural("box", "", 1), "box");
}

#[test]
fn selector_miss_uses_default_two_form_source() {
    let catalog = sample();
    catalog.set_plural_forms("nplurals=2; plural=n == 1 ? 0;").unwrap();
    assert_eq!(catalog.plural_index(3), None);
    assert_eq!(catalog.get_plural("apple", "apples", 3), "apples");
    assert_eq!(catalog.get_plural("apple", "apples", 1), "一个苹果");
    assert!(!catalog.is_translated_plural("apple", 3));
}

#[test]
fn lookup_by_plural_id() {
    let catalog = sample();
    let entry = catalog.entry_by_plural_id("apples").unwrap();
    assert_eq!(entry.id, "apple");
    assert!(catalog.entry_by_plural_id("oranges").is_none());
}

// =========================================================================
// Plural Selection
// =========================================================================

#[test]
fn custom_resolver_takes_precedence() {
    let catalog = sample();
    catalog.set_plural_resolver(|_| 0);
    assert_eq!(catalog.get_plural("apple", "apples", 5), "一个苹果");

    catalog.clear_plural_resolver();
    assert_eq!(catalog.get_plural("apple", "apples", 5), "%d个苹果");
}

#[test]
fn custom_resolver_is_bounded_by_nplurals() {
    let catalog = sample();
    catalog.set_plural_resolver(|_| 9);
    assert_eq!(catalog.plural_index(5), None);
    assert_eq!(catalog.get_plural("apple", "apples", 5), "apples");
}

#[test]
fn invalid_plural_forms_installs_default() {
    let catalog = Catalog::new();
    catalog.set_plural_forms("nplurals=1; plural=0;").unwrap();
    assert_eq!(catalog.plural_index(5), Some(0));

    let error = catalog.set_plural_forms("nplurals=2; plural=n % 0;").unwrap_err();
    assert_eq!(error, PluralError::ZeroDivisor { offset: 4 });
    assert_eq!(catalog.plural_index(5), Some(1));
}

#[test]
fn later_parse_replaces_installed_plural_rule() {
    let catalog = Catalog::new();
    catalog.set_plural_forms("nplurals=1; plural=0;").unwrap();
    assert_eq!(catalog.plural_index(5), Some(0));

    catalog.parse("msgid \"a\"\nmsgstr \"A\"\n").unwrap();
    assert_eq!(catalog.plural_index(5), Some(0));

    catalog
        .parse("msgid \"\"\nmsgstr \"Plural-Forms: nplurals=2; plural=(n != 1);\\n\"\n")
        .unwrap();
    assert_eq!(catalog.nplurals(), Some(2));
    assert_eq!(catalog.plural_index(5), Some(1));
}

#[test]
fn parse_fills_every_declared_form() {
    let catalog = Catalog::from_po(
        "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;\\n\"\n\n\
         msgid \"cat\"\nmsgid_plural \"cats\"\nmsgstr[0] \"kot\"\n",
    )
    .unwrap();
    let entry = catalog.entry("cat").unwrap();
    assert_eq!(entry.variants.len(), 3);
    assert_eq!(entry.variants.get(2), Some(""));
    assert!(!entry.is_dirty());
    assert!(!catalog.is_translated_plural("cat", 5));
    assert_eq!(catalog.get_plural("cat", "cats", 5), "cats");
}

#[test]
fn oversized_nplurals_is_rejected() {
    let catalog = Catalog::new();
    let report = catalog
        .parse("msgid \"\"\nmsgstr \"Plural-Forms: nplurals=100000000; plural=0;\\n\"\n")
        .unwrap();
    assert!(matches!(
        report.warnings.as_slice(),
        [ParseWarning::MalformedPluralRule {
            error: PluralError::InvalidNplurals(_),
            ..
        }]
    ));
    assert_eq!(catalog.nplurals(), Some(2));
}

// =========================================================================
// Mutation
// =========================================================================

#[test]
fn set_creates_and_updates() {
    let catalog = sample();
    catalog.set("new", "neu");
    catalog.set("你好", "hey");
    assert_eq!(catalog.get("new"), "neu");
    assert_eq!(catalog.get("你好"), "hey");
    assert!(catalog.entry("new").unwrap().is_dirty());
    assert!(catalog.has_changes());
}

#[test]
fn set_with_context_is_separate_from_plain() {
    let catalog = Catalog::new();
    catalog.set("open", "öffnen");
    catalog.set_with_context("open", "adjective", "offen");
    assert_eq!(catalog.get("open"), "öffnen");
    assert_eq!(catalog.get_with_context("open", "adjective"), "offen");
    assert_eq!(catalog.len(), 2);
}

#[test]
fn set_plural_fills_the_selected_slot() {
    let catalog = Catalog::new();
    catalog.set_plural("day", "days", 1, "Tag");
    catalog.set_plural("day", "days", 2, "Tage");
    assert_eq!(catalog.get_plural("day", "days", 1), "Tag");
    assert_eq!(catalog.get_plural("day", "days", 10), "Tage");
    assert_eq!(catalog.entry_by_plural_id("days").unwrap().id, "day");

    catalog.set_plural_with_context("day", "calendar", "days", 2, "Kalendertage");
    assert_eq!(
        catalog.get_plural_with_context("day", "calendar", "days", 2),
        "Kalendertage"
    );
    assert!(catalog.is_translated_plural_with_context("day", "calendar", 2));
    assert!(!catalog.is_translated_plural_with_context("day", "calendar", 1));
}

#[test]
fn fresh_parse_has_no_changes() {
    let catalog = sample();
    assert!(!catalog.has_changes());
}

// =========================================================================
// References
// =========================================================================

#[test]
fn add_refs_merges_in_first_seen_order() {
    let catalog = sample();
    assert!(catalog.add_refs("你好", ["a.rs:1", "src/greet.rs:10", "b.rs:2"]));
    assert!(!catalog.add_refs("你好", ["b.rs:2", "a.rs:1"]));
    assert_eq!(
        catalog.get_refs("你好"),
        vec!["src/greet.rs:10", "a.rs:1", "b.rs:2"]
    );
}

#[test]
fn add_refs_without_change_keeps_entry_stale() {
    let catalog = sample();
    assert!(!catalog.add_refs("你好", ["src/greet.rs:10"]));
    assert!(!catalog.entry("你好").unwrap().is_dirty());
}

#[test]
fn add_refs_creates_missing_entry() {
    let catalog = Catalog::new();
    catalog.add_refs(MessageKey::with_context("menu", "Open"), ["ui.rs:4"]);
    let entry = catalog.entry(MessageKey::with_context("menu", "Open")).unwrap();
    assert_eq!(entry.references, vec!["ui.rs:4"]);
    assert!(catalog.entry("Open").is_none());
}

#[test]
fn set_refs_replaces_and_marks_dirty() {
    let catalog = sample();
    catalog.set_refs("你好", vec!["only.rs:1".to_string()]);
    assert_eq!(catalog.get_refs("你好"), vec!["only.rs:1"]);
    assert!(catalog.entry("你好").unwrap().is_dirty());
    assert!(catalog.get_refs("missing").is_empty());
}

// =========================================================================
// Stale Entries
// =========================================================================

#[test]
fn drop_stale_removes_untouched_entries() {
    let catalog = sample();
    catalog.set("apple", "苹果");
    catalog.add_refs(MessageKey::with_context("问候2", "你好"), ["new.rs:1"]);

    let removed = catalog.drop_stale();
    assert_eq!(removed, 2);

    let ids: Vec<String> = catalog.entries().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["", "你好", "apple"]);
    assert_eq!(catalog.get("你好"), "你好");
    assert_eq!(catalog.get_with_context("你好", "问候2"), "hello\nhi");
    assert_eq!(catalog.entry_by_plural_id("apples").unwrap().id, "apple");
    assert_eq!(catalog.language().as_deref(), Some("zh_CN"));
}

#[test]
fn drop_stale_right_after_parse_keeps_only_header() {
    let catalog = sample();
    assert_eq!(catalog.drop_stale(), 4);
    assert_eq!(catalog.len(), 1);
    assert!(catalog.entry("").is_some());
}

// =========================================================================
// Merging
// =========================================================================

#[test]
fn second_parse_is_last_write_wins() {
    let catalog = sample();
    let report = catalog
        .parse("msgid \"你好\"\nmsgstr \"hi there\"\n\nmsgid \"extra\"\nmsgstr \"mehr\"\n")
        .unwrap();
    assert_eq!(report.entries, 2);

    assert_eq!(catalog.get("你好"), "hi there");
    assert_eq!(catalog.get("extra"), "mehr");
    assert_eq!(catalog.get_plural("apple", "apples", 2), "%d个苹果");
    assert_eq!(catalog.language().as_deref(), Some("zh_CN"));

    let ids: Vec<String> = catalog.entries().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["", "你好", "你好", "apple", "untranslated", "extra"]);
}

#[test]
fn duplicate_in_one_text_keeps_first_position() {
    let catalog =
        Catalog::from_po("msgid \"a\"\nmsgstr \"1\"\n\nmsgid \"b\"\nmsgstr \"B\"\n\nmsgid \"a\"\nmsgstr \"2\"\n")
            .unwrap();
    assert_eq!(catalog.get("a"), "2");
    let ids: Vec<String> = catalog.entries().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn catalog_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Catalog>();
}

#[test]
fn concurrent_readers_and_writers() {
    let catalog = Arc::new(sample());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                for i in 0..100 {
                    let id = format!("w{worker}-{i}");
                    catalog.set(&id, "x");
                    assert_eq!(catalog.get(&id), "x");
                    assert_eq!(catalog.get_with_context("你好", "问候2"), "hello\nhi");
                    let _ = catalog.plural_index(i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(catalog.len(), 5 + 800);
}
