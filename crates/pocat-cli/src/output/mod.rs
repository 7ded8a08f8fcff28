//! Terminal output: diagnostics and tables.

mod diagnostic;
pub mod table;

pub use diagnostic::{print_warnings, PoDiagnostic};
