//! Catalogs for several languages and domains.

use std::collections::HashMap;

use bon::Builder;
use tracing::debug;

use super::error::LoadError;
use super::plural_state::default_index;
use super::store::{Catalog, ParseReport};

/// A set of catalogs keyed by language and domain, with a current language
/// and a default domain that route lookups.
///
/// Lookups never fail: with no catalog loaded for the current language and
/// domain they return the source phrase.
///
/// # Example
///
/// ```
/// use pocat::Catalogs;
///
/// let mut catalogs = Catalogs::builder().language("de").build();
/// catalogs
///     .load_str("de", "messages", "msgid \"Hello\"\nmsgstr \"Hallo\"\n")
///     .unwrap();
///
/// assert_eq!(catalogs.get("Hello"), "Hallo");
///
/// catalogs.set_language("fr");
/// assert_eq!(catalogs.get("Hello"), "Hello");
/// ```
#[derive(Debug, Builder)]
#[builder(on(String, into))]
pub struct Catalogs {
    /// Current language code (e.g. "de", "zh_CN").
    #[builder(default = "en".to_string())]
    language: String,

    /// Domain used by lookups that do not name one.
    #[builder(default = "messages".to_string())]
    domain: String,

    #[builder(skip)]
    catalogs: HashMap<(String, String), Catalog>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Catalogs::builder().build()
    }
}

impl Catalogs {
    /// Create an empty set with language "en" and domain "messages".
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// The current language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Change the current language. Catalogs are not reloaded.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// The default domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Change the default domain.
    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.domain = domain.into();
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Add a catalog, returning the one it replaces.
    pub fn insert(
        &mut self,
        language: impl Into<String>,
        domain: impl Into<String>,
        catalog: Catalog,
    ) -> Option<Catalog> {
        self.catalogs.insert((language.into(), domain.into()), catalog)
    }

    /// Parse text into the catalog for `language` and `domain`.
    ///
    /// An existing catalog is merged into (last write wins). A new catalog is
    /// only added if the text parses.
    pub fn load_str(
        &mut self,
        language: &str,
        domain: &str,
        text: &str,
    ) -> Result<ParseReport, LoadError> {
        let to_load_error = |source| LoadError::Parse {
            language: language.to_string(),
            domain: domain.to_string(),
            source,
        };

        let key = (language.to_string(), domain.to_string());
        let report = match self.catalogs.get(&key) {
            Some(catalog) => catalog.parse(text).map_err(to_load_error)?,
            None => {
                let catalog = Catalog::new();
                let report = catalog.parse(text).map_err(to_load_error)?;
                self.catalogs.insert(key, catalog);
                report
            }
        };

        debug!(
            language,
            domain,
            entries = report.entries,
            warnings = report.warnings.len(),
            "loaded catalog"
        );
        Ok(report)
    }

    /// The catalog for `language` and `domain`.
    pub fn catalog(&self, language: &str, domain: &str) -> Option<&Catalog> {
        self.catalogs
            .get(&(language.to_string(), domain.to_string()))
    }

    /// The catalog for the current language and default domain.
    pub fn current(&self) -> Option<&Catalog> {
        self.catalog(&self.language, &self.domain)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Translate `id` in the current language and default domain.
    pub fn get(&self, id: &str) -> String {
        self.current()
            .map_or_else(|| id.to_string(), |catalog| catalog.get(id))
    }

    /// Translate `id` in `context`.
    pub fn get_with_context(&self, id: &str, context: &str) -> String {
        self.current().map_or_else(
            || id.to_string(),
            |catalog| catalog.get_with_context(id, context),
        )
    }

    /// Translate `id` for count `n`.
    pub fn get_plural(&self, id: &str, plural: &str, n: u64) -> String {
        self.current().map_or_else(
            || untranslated_plural(id, plural, n),
            |catalog| catalog.get_plural(id, plural, n),
        )
    }

    /// Translate `id` in `context` for count `n`.
    pub fn get_plural_with_context(&self, id: &str, context: &str, plural: &str, n: u64) -> String {
        self.current().map_or_else(
            || untranslated_plural(id, plural, n),
            |catalog| catalog.get_plural_with_context(id, context, plural, n),
        )
    }

    /// Translate `id` in the current language and a specific domain.
    pub fn get_in(&self, domain: &str, id: &str) -> String {
        self.catalog(&self.language, domain)
            .map_or_else(|| id.to_string(), |catalog| catalog.get(id))
    }
}

fn untranslated_plural(id: &str, plural: &str, n: u64) -> String {
    match default_index(n) {
        0 => id.to_string(),
        _ => plural.to_string(),
    }
}
