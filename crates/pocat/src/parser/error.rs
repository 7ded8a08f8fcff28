//! Parse error and warning types for PO catalogs.

use thiserror::Error;

use crate::plural::PluralError;

/// A fatal error: the input cannot be used as a catalog at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input contains nothing but whitespace.
    #[error("catalog is empty")]
    Empty,

    /// The input has blocks, but none of them defines a `msgid`.
    #[error("catalog has no entries: none of its {blocks} block(s) contains a msgid")]
    NoEntries { blocks: usize },
}

/// A recoverable problem found while parsing.
///
/// Warnings never abort a parse. The offending line (or header field) is
/// skipped and the rest of the catalog is read normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    /// A comment or keyword line could not be interpreted.
    #[error("line {line}: {message}")]
    MalformedEntry { line: usize, message: String },

    /// A block of lines never defined a `msgid` and was dropped.
    #[error("line {line}: block has no msgid and was ignored")]
    MissingMsgid { line: usize },

    /// The `Plural-Forms` header did not compile; the default rule is used.
    #[error("invalid Plural-Forms '{rule}': {error}")]
    MalformedPluralRule { rule: String, error: PluralError },

    /// An entry has a `msgstr[K]` beyond the declared number of plural forms.
    #[error("msgid '{id}' has msgstr[{index}] but the catalog declares nplurals={nplurals}")]
    VariantOutOfRange {
        id: String,
        index: usize,
        nplurals: usize,
    },
}

/// An error raised while reading a single quoted string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// The line does not start and end with a double quote.
    #[error("expected a quoted string, found '{0}'")]
    NotQuoted(String),

    /// A backslash sequence that is not a known escape.
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    /// A bare `"` inside the string body.
    #[error("unescaped quote at offset {offset}")]
    UnescapedQuote { offset: usize },

    /// Byte escapes (`\x`, octal) that do not form valid UTF-8.
    #[error("escaped bytes do not form valid UTF-8")]
    InvalidUtf8,
}
