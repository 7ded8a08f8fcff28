//! Reading, querying and writing gettext PO catalogs.
//!
//! ```
//! use pocat::{Catalog, MessageKey};
//!
//! let catalog = Catalog::from_po(r#"
//! msgctxt "问候2"
//! msgid "你好"
//! msgstr ""
//! "hello\n"
//! "hi"
//! "#).unwrap();
//!
//! assert_eq!(catalog.get_with_context("你好", "问候2"), "hello\nhi");
//! assert!(catalog.entry(MessageKey::with_context("问候2", "你好")).is_some());
//! ```

pub mod catalog;
pub mod parser;
pub mod plural;
pub mod types;

pub use catalog::{Catalog, Catalogs, LoadError, ParseReport, PluralResolver};
pub use parser::{ParseError, ParseWarning, QuoteError, parse_entries};
pub use plural::{MAX_PLURAL_FORMS, PluralError, PluralRule};
pub use types::{Entry, Headers, MessageKey, Variants};
