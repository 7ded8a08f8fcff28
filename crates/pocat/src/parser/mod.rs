//! PO catalog parser.
//!
//! Turns catalog text into [`Entry`](crate::Entry) values. The parser is
//! pure: it never touches a store and never fails on a single bad line.
//! Bad lines become [`ParseWarning`]s; only input with no usable entry at
//! all is a [`ParseError`].

mod cursor;
mod entry;
pub mod error;
mod header;
mod quoted;

pub use cursor::{LineCursor, is_blank, normalize_line_endings};
pub use entry::{ParsedCatalog, parse_entries};
pub use error::{ParseError, ParseWarning, QuoteError};
pub use header::parse_headers;
pub use quoted::{escape, is_quoted_line, quote, unquote};
