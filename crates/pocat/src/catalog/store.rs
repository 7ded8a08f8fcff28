//! The catalog store.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Result as FmtResult, Write};
use std::mem;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace, warn};

use super::plural_state::{PluralState, default_index};
use super::writer::{plural_form_count, render_headers, write_catalog};
use crate::parser::{ParseError, ParseWarning, parse_entries, parse_headers};
use crate::plural::{PluralError, PluralRule};
use crate::types::{Entry, Headers, MessageKey};

const LANGUAGE: &str = "Language";
const PLURAL_FORMS: &str = "Plural-Forms";

/// Outcome of a successful [`Catalog::parse`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// Number of entries read from the text, duplicates included.
    pub entries: usize,
    /// Recoverable problems, in input order.
    pub warnings: Vec<ParseWarning>,
}

impl ParseReport {
    /// Returns true if the text parsed without warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Entries plus the indices that address them.
///
/// All three indices hold positions into `entries`; the vector order is the
/// order entries were first parsed or created.
#[derive(Debug, Default)]
struct Store {
    entries: Vec<Entry>,
    by_id: HashMap<String, usize>,
    by_context: HashMap<String, HashMap<String, usize>>,
    by_plural: HashMap<String, usize>,
    headers: Headers,
}

impl Store {
    fn position(&self, key: MessageKey<'_>) -> Option<usize> {
        match key.context {
            Some(context) => self.by_context.get(context)?.get(key.id).copied(),
            None => self.by_id.get(key.id).copied(),
        }
    }

    fn get(&self, key: MessageKey<'_>) -> Option<&Entry> {
        self.position(key).map(|position| &self.entries[position])
    }

    /// The entry for `key`, created if absent.
    fn get_or_create(&mut self, key: MessageKey<'_>) -> &mut Entry {
        let position = match self.position(key) {
            Some(position) => position,
            None => {
                let mut entry = Entry::new(key.id);
                entry.context = key.context.map(str::to_string);
                self.push(entry)
            }
        };
        &mut self.entries[position]
    }

    /// File an entry; an entry with the same key is replaced in place.
    fn file(&mut self, entry: Entry) -> usize {
        let position = match self.position(entry.key()) {
            Some(position) => {
                self.unregister_plural(position);
                self.entries[position] = entry;
                position
            }
            None => self.push(entry),
        };
        self.register_plural(position);
        position
    }

    fn push(&mut self, entry: Entry) -> usize {
        let position = self.entries.len();
        self.register_key(&entry, position);
        self.entries.push(entry);
        position
    }

    fn register_key(&mut self, entry: &Entry, position: usize) {
        match &entry.context {
            Some(context) => {
                self.by_context
                    .entry(context.clone())
                    .or_default()
                    .insert(entry.id.clone(), position);
            }
            None => {
                self.by_id.insert(entry.id.clone(), position);
            }
        }
    }

    fn register_plural(&mut self, position: usize) {
        if let Some(plural) = &self.entries[position].plural_id {
            self.by_plural.insert(plural.clone(), position);
        }
    }

    fn unregister_plural(&mut self, position: usize) {
        if let Some(plural) = &self.entries[position].plural_id
            && self.by_plural.get(plural) == Some(&position)
        {
            self.by_plural.remove(plural);
        }
    }

    /// Point the entry at `position` to a new plural phrase.
    fn set_plural_id(&mut self, position: usize, plural: &str) {
        if self.entries[position].plural_id.as_deref() == Some(plural) {
            return;
        }
        self.unregister_plural(position);
        self.entries[position].plural_id = Some(plural.to_string());
        self.register_plural(position);
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        self.by_context.clear();
        self.by_plural.clear();
        let entries = mem::take(&mut self.entries);
        for (position, entry) in entries.iter().enumerate() {
            self.register_key(entry, position);
        }
        self.entries = entries;
        for position in 0..self.entries.len() {
            self.register_plural(position);
        }
    }

    /// Give every plural entry a string, empty if missing, for each of the
    /// first `count` forms.
    fn fill_plural_forms(&mut self, count: usize) {
        for entry in self.entries.iter_mut().filter(|entry| entry.is_plural()) {
            for index in 0..count {
                if entry.variants.get(index).is_none() {
                    entry.variants.set(index, "");
                }
            }
        }
    }

    fn header_entry(&self) -> Option<&Entry> {
        self.get(MessageKey::new(""))
    }

    /// Re-read header fields from the header entry.
    fn extract_headers(&mut self) {
        self.headers = self
            .header_entry()
            .map(|entry| parse_headers(entry.variants.get(0).unwrap_or("")))
            .unwrap_or_default();
    }

    /// Write header fields back into the header entry.
    fn sync_header_entry(&mut self) {
        let raw = render_headers(&self.headers);
        let header = self.get_or_create(MessageKey::new(""));
        header.variants.set(0, raw);
        header.mark_dirty();
    }
}

/// An in-memory PO catalog.
///
/// A catalog is safe to share between threads: lookups take a read lock,
/// mutations a write lock. Plural selection state has its own lock, always
/// taken after the entry lock.
///
/// # Example
///
/// ```
/// use pocat::Catalog;
///
/// let catalog = Catalog::from_po(r#"
/// msgid ""
/// msgstr ""
/// "Language: de\n"
/// "Plural-Forms: nplurals=2; plural=(n != 1);\n"
///
/// msgid "file"
/// msgid_plural "files"
/// msgstr[0] "Datei"
/// msgstr[1] "Dateien"
/// "#).unwrap();
///
/// assert_eq!(catalog.language().as_deref(), Some("de"));
/// assert_eq!(catalog.get_plural("file", "files", 1), "Datei");
/// assert_eq!(catalog.get_plural("file", "files", 3), "Dateien");
/// assert_eq!(catalog.get("missing"), "missing");
/// ```
#[derive(Debug, Default)]
pub struct Catalog {
    store: RwLock<Store>,
    plural: RwLock<PluralState>,
}

impl Catalog {
    /// Create an empty catalog using the default two-form plural rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse text into a fresh catalog.
    ///
    /// Warnings are dropped; use [`Catalog::parse`] to inspect them.
    pub fn from_po(text: &str) -> Result<Self, ParseError> {
        let catalog = Self::new();
        catalog.parse(text)?;
        Ok(catalog)
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Parse text into this catalog.
    ///
    /// Incoming entries replace entries with the same key and keep the
    /// replaced entry's position; all other entries stay. Headers are re-read
    /// from the header entry, and a `Plural-Forms` header replaces the active
    /// rule, including one installed with [`Catalog::set_plural_forms`] (a
    /// rule that does not compile installs the default rule and is reported
    /// as a warning). Plural entries then hold a string, possibly empty, for
    /// every form the writer emits, so written text parses back to the same
    /// entries.
    pub fn parse(&self, text: &str) -> Result<ParseReport, ParseError> {
        let parsed = parse_entries(text)?;
        let mut store = self.write_store();
        let mut plural = self.write_plural();

        let entries = parsed.entries.len();
        let mut warnings = parsed.warnings;
        let filed: BTreeSet<usize> = parsed
            .entries
            .into_iter()
            .map(|entry| store.file(entry))
            .collect();

        store.extract_headers();
        if let Some(rule) = store.headers.get(PLURAL_FORMS) {
            match PluralRule::compile(rule) {
                Ok(compiled) => plural.rule = compiled,
                Err(error) => {
                    warn!(rule, %error, "invalid Plural-Forms header, using the default rule");
                    warnings.push(ParseWarning::MalformedPluralRule {
                        rule: rule.to_string(),
                        error,
                    });
                    plural.rule = PluralRule::default();
                }
            }
        }

        if let Some(nplurals) = plural.nplurals() {
            for &position in &filed {
                let entry = &store.entries[position];
                for (index, _) in entry.variants.iter().filter(|(index, _)| *index >= nplurals) {
                    warnings.push(ParseWarning::VariantOutOfRange {
                        id: entry.id.clone(),
                        index,
                        nplurals,
                    });
                }
            }
        }

        store.fill_plural_forms(plural_form_count(plural.nplurals()));

        debug!(
            entries,
            total = store.entries.len(),
            warnings = warnings.len(),
            "parsed catalog"
        );
        Ok(ParseReport { entries, warnings })
    }

    // =========================================================================
    // Translation
    // =========================================================================

    /// Set the singular translation of `id`, creating the entry if needed.
    pub fn set(&self, id: &str, value: impl Into<String>) {
        self.write_store()
            .get_or_create(MessageKey::new(id))
            .set_translation(value);
    }

    /// Set the singular translation of `id` in `context`.
    pub fn set_with_context(&self, id: &str, context: &str, value: impl Into<String>) {
        self.write_store()
            .get_or_create(MessageKey::with_context(context, id))
            .set_translation(value);
    }

    /// Set the translation of `id` used for count `n`.
    pub fn set_plural(&self, id: &str, plural: &str, n: u64, value: impl Into<String>) {
        self.set_plural_at(MessageKey::new(id), plural, n, value.into());
    }

    /// Set the translation of `id` in `context` used for count `n`.
    pub fn set_plural_with_context(
        &self,
        id: &str,
        context: &str,
        plural: &str,
        n: u64,
        value: impl Into<String>,
    ) {
        self.set_plural_at(MessageKey::with_context(context, id), plural, n, value.into());
    }

    /// The translation of `id`, or `id` itself if untranslated.
    pub fn get(&self, id: &str) -> String {
        let store = self.read_store();
        lookup(store.get(MessageKey::new(id)), id, None, 0)
    }

    /// The translation of `id` in `context`, or `id` itself if untranslated.
    pub fn get_with_context(&self, id: &str, context: &str) -> String {
        let store = self.read_store();
        lookup(store.get(MessageKey::with_context(context, id)), id, None, 0)
    }

    /// The translation of `id` for count `n`.
    ///
    /// Falls back to the source phrases: `id` for the first form, the plural
    /// phrase for the others. When `id` has no entry at all, the source
    /// phrase follows the two-form rule of the source language (`id` for
    /// `n == 1`, the plural phrase otherwise), whatever the catalog's rule.
    pub fn get_plural(&self, id: &str, plural: &str, n: u64) -> String {
        self.get_plural_at(MessageKey::new(id), plural, n)
    }

    /// The translation of `id` in `context` for count `n`.
    pub fn get_plural_with_context(&self, id: &str, context: &str, plural: &str, n: u64) -> String {
        self.get_plural_at(MessageKey::with_context(context, id), plural, n)
    }

    /// Returns true if `id` has a non-empty singular translation.
    pub fn is_translated(&self, id: &str) -> bool {
        self.read_store()
            .get(MessageKey::new(id))
            .is_some_and(Entry::is_translated)
    }

    /// Returns true if `id` in `context` has a non-empty singular translation.
    pub fn is_translated_with_context(&self, id: &str, context: &str) -> bool {
        self.read_store()
            .get(MessageKey::with_context(context, id))
            .is_some_and(Entry::is_translated)
    }

    /// Returns true if the form of `id` selected for count `n` is translated.
    pub fn is_translated_plural(&self, id: &str, n: u64) -> bool {
        self.is_translated_plural_at(MessageKey::new(id), n)
    }

    /// Returns true if the form of `id` in `context` selected for count `n`
    /// is translated.
    pub fn is_translated_plural_with_context(&self, id: &str, context: &str, n: u64) -> bool {
        self.is_translated_plural_at(MessageKey::with_context(context, id), n)
    }

    fn set_plural_at(&self, key: MessageKey<'_>, plural: &str, n: u64, value: String) {
        let mut store = self.write_store();
        let index = self.plural_index(n).unwrap_or_else(|| default_index(n));
        let entry = store.get_or_create(key);
        entry.set_translation_n(index, value);
        if let Some(position) = store.position(key) {
            store.set_plural_id(position, plural);
        }
    }

    fn get_plural_at(&self, key: MessageKey<'_>, plural: &str, n: u64) -> String {
        let store = self.read_store();
        let Some(entry) = store.get(key) else {
            return source_text(None, key.id, Some(plural), default_index(n)).to_string();
        };
        match self.plural_index(n) {
            Some(index) => lookup(Some(entry), key.id, Some(plural), index),
            None => {
                let index = default_index(n);
                trace!(n, index, id = key.id, "no plural form for count, using source text");
                source_text(Some(entry), key.id, Some(plural), index).to_string()
            }
        }
    }

    fn is_translated_plural_at(&self, key: MessageKey<'_>, n: u64) -> bool {
        let store = self.read_store();
        let Some(entry) = store.get(key) else {
            return false;
        };
        self.plural_index(n)
            .is_some_and(|index| entry.is_translated_n(index))
    }

    // =========================================================================
    // References
    // =========================================================================

    /// Replace the references of an entry, creating it if needed.
    pub fn set_refs<'k>(&self, key: impl Into<MessageKey<'k>>, refs: Vec<String>) {
        self.write_store().get_or_create(key.into()).set_refs(refs);
    }

    /// Merge references into an entry, creating it if needed.
    ///
    /// New references are appended in order; existing ones are skipped. The
    /// entry is marked dirty only if its reference list changed. Returns
    /// whether it changed.
    pub fn add_refs<'k, I, S>(&self, key: impl Into<MessageKey<'k>>, refs: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write_store().get_or_create(key.into()).add_refs(refs)
    }

    /// The references of an entry; empty if the entry does not exist.
    pub fn get_refs<'k>(&self, key: impl Into<MessageKey<'k>>) -> Vec<String> {
        self.read_store()
            .get(key.into())
            .map(|entry| entry.references.clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Remove every entry not changed since it was parsed. The header entry
    /// is kept. Returns the number of entries removed.
    pub fn drop_stale(&self) -> usize {
        let mut store = self.write_store();
        let before = store.entries.len();
        store
            .entries
            .retain(|entry| entry.is_dirty() || entry.is_header());
        let removed = before - store.entries.len();
        if removed > 0 {
            store.reindex();
        }
        debug!(removed, kept = store.entries.len(), "dropped stale entries");
        removed
    }

    /// A copy of the entry at `key`.
    pub fn entry<'k>(&self, key: impl Into<MessageKey<'k>>) -> Option<Entry> {
        self.read_store().get(key.into()).cloned()
    }

    /// A copy of the entry registered under the plural phrase `plural`.
    pub fn entry_by_plural_id(&self, plural: &str) -> Option<Entry> {
        let store = self.read_store();
        store
            .by_plural
            .get(plural)
            .map(|&position| store.entries[position].clone())
    }

    /// Copies of all entries, header included, in catalog order.
    pub fn entries(&self) -> Vec<Entry> {
        self.read_store().entries.clone()
    }

    /// Number of entries, header included.
    pub fn len(&self) -> usize {
        self.read_store().entries.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.read_store().entries.is_empty()
    }

    /// Returns true if any entry was changed since it was parsed.
    pub fn has_changes(&self) -> bool {
        self.read_store().entries.iter().any(Entry::is_dirty)
    }

    // =========================================================================
    // Headers
    // =========================================================================

    /// A copy of all header fields.
    pub fn headers(&self) -> Headers {
        self.read_store().headers.clone()
    }

    /// The value of header `key` (case-insensitive).
    pub fn header(&self, key: &str) -> Option<String> {
        self.read_store().headers.get(key).map(str::to_string)
    }

    /// Set a header field, creating the header entry if needed.
    ///
    /// Setting `Plural-Forms` also replaces the active plural rule; a rule
    /// that does not compile installs the default rule.
    pub fn set_header(&self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let mut store = self.write_store();
        store.headers.insert(key, value.as_str());
        store.sync_header_entry();

        if key.eq_ignore_ascii_case(PLURAL_FORMS) {
            let mut plural = self.write_plural();
            plural.rule = PluralRule::compile(&value).unwrap_or_else(|error| {
                warn!(rule = %value, %error, "invalid Plural-Forms header, using the default rule");
                PluralRule::default()
            });
        }
    }

    /// The `Language` header.
    pub fn language(&self) -> Option<String> {
        self.header(LANGUAGE)
    }

    /// The raw `Plural-Forms` header.
    pub fn plural_forms(&self) -> Option<String> {
        self.header(PLURAL_FORMS)
    }

    // =========================================================================
    // Plural Selection
    // =========================================================================

    /// Install a custom plural selector that takes precedence over the rule.
    ///
    /// Indices it returns are still bounded by the declared number of forms.
    pub fn set_plural_resolver(&self, resolver: impl Fn(u64) -> usize + Send + Sync + 'static) {
        self.write_plural().resolver = Some(Arc::new(resolver));
    }

    /// Remove the custom plural selector.
    pub fn clear_plural_resolver(&self) {
        self.write_plural().resolver = None;
    }

    /// Compile and install a plural rule.
    ///
    /// On failure the default two-form rule is installed and the error is
    /// returned. The `Plural-Forms` header is left unchanged, and a later
    /// [`Catalog::parse`] of text with a `Plural-Forms` header replaces the
    /// installed rule.
    pub fn set_plural_forms(&self, rule: &str) -> Result<(), PluralError> {
        let mut plural = self.write_plural();
        match PluralRule::compile(rule) {
            Ok(compiled) => {
                plural.rule = compiled;
                Ok(())
            }
            Err(error) => {
                plural.rule = PluralRule::default();
                Err(error)
            }
        }
    }

    /// The plural-form index selected for count `n`, or `None` on a miss.
    pub fn plural_index(&self, n: u64) -> Option<usize> {
        self.read_plural().select(n)
    }

    /// The declared number of plural forms of the active rule.
    pub fn nplurals(&self) -> Option<usize> {
        self.read_plural().nplurals()
    }

    /// A copy of the active plural rule.
    pub fn plural_rule(&self) -> PluralRule {
        self.read_plural().rule.clone()
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Write the catalog as PO text.
    pub fn write_po(&self, out: &mut impl Write) -> FmtResult {
        let store = self.read_store();
        let nplurals = self.nplurals();
        write_catalog(out, &store.entries, &store.headers, nplurals)
    }

    /// The catalog as PO text.
    pub fn to_po_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_po(&mut out);
        out
    }

    fn read_store(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_plural(&self) -> RwLockReadGuard<'_, PluralState> {
        self.plural.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_plural(&self) -> RwLockWriteGuard<'_, PluralState> {
        self.plural.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The translation at `index`, or the source text for it.
fn lookup(entry: Option<&Entry>, id: &str, plural: Option<&str>, index: usize) -> String {
    entry
        .and_then(|entry| entry.variants.translated(index))
        .unwrap_or_else(|| source_text(entry, id, plural, index))
        .to_string()
}

/// Source text for form `index`: `id` for the first form; otherwise the
/// entry's plural phrase, the caller's plural phrase, or `id`.
fn source_text<'a>(entry: Option<&'a Entry>, id: &'a str, plural: Option<&'a str>, index: usize) -> &'a str {
    if index == 0 {
        return id;
    }
    entry
        .and_then(|entry| entry.plural_id.as_deref())
        .or(plural)
        .filter(|plural| !plural.is_empty())
        .unwrap_or(id)
}
