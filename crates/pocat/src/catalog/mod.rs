//! In-memory catalogs: lookup, mutation, stale pruning and PO output.

mod catalogs;
mod error;
mod plural_state;
mod store;
mod writer;

pub use catalogs::Catalogs;
pub use error::LoadError;
pub use plural_state::PluralResolver;
pub use store::{Catalog, ParseReport};
