use std::collections::BTreeMap;

use bon::Builder;
use serde::Serialize;

use super::MessageKey;

/// Translated strings of one entry, keyed by plural-form index.
///
/// Index 0 is the singular (or only) form. A missing index and an empty
/// string both mean "untranslated" for that form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Variants(BTreeMap<usize, String>);

impl Variants {
    /// Create an empty variant map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored string at `index`, which may be empty.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    /// The stored string at `index` if it is a real translation (non-empty).
    pub fn translated(&self, index: usize) -> Option<&str> {
        self.get(index).filter(|s| !s.is_empty())
    }

    /// Store a string at `index`, replacing any previous value.
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        self.0.insert(index, value.into());
    }

    /// Highest index present, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.0.keys().next_back().copied()
    }

    /// Number of stored forms.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no form is stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(index, value)| (*index, value.as_str()))
    }
}

impl FromIterator<(usize, String)> for Variants {
    fn from_iter<T: IntoIterator<Item = (usize, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One catalog entry: a source phrase, its translations and annotations.
///
/// # Example
///
/// ```
/// use pocat::Entry;
///
/// let mut entry = Entry::builder().id("file").plural_id("files".to_string()).build();
/// assert_eq!(entry.translation(), "file");
/// assert_eq!(entry.translation_n(1), "files");
///
/// entry.set_translation_n(1, "Dateien");
/// assert_eq!(entry.translation_n(1), "Dateien");
/// assert!(entry.is_dirty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize)]
#[builder(on(String, into))]
pub struct Entry {
    /// Source phrase (`msgid`). Empty for the header entry.
    pub id: String,

    /// Plural source phrase (`msgid_plural`).
    pub plural_id: Option<String>,

    /// Translations (`msgstr`, `msgstr[K]`).
    #[builder(default)]
    pub variants: Variants,

    /// Disambiguating context (`msgctxt`).
    pub context: Option<String>,

    /// Source locations from `#:` comments.
    #[builder(default)]
    pub references: Vec<String>,

    /// `# ` comments.
    #[builder(default)]
    pub translator_comments: Vec<String>,

    /// `#.` comments.
    #[builder(default)]
    pub extracted_comments: Vec<String>,

    /// `#,` flags such as `fuzzy` or `c-format`.
    #[builder(default)]
    pub flags: Vec<String>,

    /// `#| msgctxt` of the previous source phrase.
    pub previous_context: Option<String>,

    /// `#| msgid` of the previous source phrase.
    pub previous_id: Option<String>,

    /// `#| msgid_plural` of the previous source phrase.
    pub previous_plural_id: Option<String>,

    /// Set once the entry is changed programmatically after parsing.
    #[builder(skip)]
    #[serde(skip)]
    dirty: bool,
}

impl Entry {
    /// Create an untranslated entry for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Entry::builder().id(id.into()).build()
    }

    /// The key addressing this entry in a catalog.
    pub fn key(&self) -> MessageKey<'_> {
        MessageKey {
            context: self.context.as_deref(),
            id: &self.id,
        }
    }

    /// Returns true for the header entry: empty id, no context.
    pub fn is_header(&self) -> bool {
        self.id.is_empty() && self.context.is_none()
    }

    /// Returns true if the entry has a plural source phrase.
    pub fn is_plural(&self) -> bool {
        self.plural_id.is_some()
    }

    /// Returns true if the entry carries the `fuzzy` flag.
    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|flag| flag == "fuzzy")
    }

    /// Returns true if the entry was changed since it was parsed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns true if the entry was not changed since it was parsed.
    pub fn is_stale(&self) -> bool {
        !self.dirty
    }

    /// The singular translation, or the source phrase if untranslated.
    pub fn translation(&self) -> &str {
        self.variants.translated(0).unwrap_or(&self.id)
    }

    /// The translation for plural form `index`, falling back to the source
    /// phrase: `id` for index 0, the plural phrase (or `id` when there is
    /// none) for every other index.
    pub fn translation_n(&self, index: usize) -> &str {
        if let Some(text) = self.variants.translated(index) {
            return text;
        }
        match (index, &self.plural_id) {
            (0, _) | (_, None) => &self.id,
            (_, Some(plural)) => plural,
        }
    }

    /// Returns true if the singular form has a non-empty translation.
    pub fn is_translated(&self) -> bool {
        self.variants.translated(0).is_some()
    }

    /// Returns true if plural form `index` has a non-empty translation.
    pub fn is_translated_n(&self, index: usize) -> bool {
        self.variants.translated(index).is_some()
    }

    /// Set the singular translation.
    pub fn set_translation(&mut self, value: impl Into<String>) {
        self.set_translation_n(0, value);
    }

    /// Set the translation of plural form `index`.
    pub fn set_translation_n(&mut self, index: usize, value: impl Into<String>) {
        self.variants.set(index, value);
        self.dirty = true;
    }

    /// Replace the reference list.
    pub fn set_refs(&mut self, refs: Vec<String>) {
        self.references = refs;
        self.dirty = true;
    }

    /// Append references not already present, preserving order.
    ///
    /// Returns true (and marks the entry dirty) only if the list changed.
    pub fn add_refs<I, S>(&mut self, refs: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut changed = false;
        for reference in refs {
            let reference = reference.into();
            if !self.references.contains(&reference) {
                self.references.push(reference);
                changed = true;
            }
        }
        self.dirty |= changed;
        changed
    }

    /// Remove all references.
    pub fn clear_refs(&mut self) {
        self.references.clear();
        self.dirty = true;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
