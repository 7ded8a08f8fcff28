//! Error types for catalog loading.

use thiserror::Error;

use crate::parser::ParseError;

/// Errors that occur while loading catalog text into a [`Catalogs`](super::Catalogs).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The text could not be parsed as a catalog.
    #[error("failed to load '{domain}' for language '{language}': {source}")]
    Parse {
        language: String,
        domain: String,
        #[source]
        source: ParseError,
    },
}
