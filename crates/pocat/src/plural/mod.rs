//! Plural-Forms rule compiler.
//!
//! A catalog header declares how counts map to plural forms with a C-like
//! expression over `n`, for example
//! `nplurals=3; plural=n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2;`.
//! This module compiles such rules once into an immutable decision tree that
//! is then evaluated for every plural lookup.

mod compiler;
mod error;
mod expr;
mod lexer;
mod rule;

pub use compiler::{compile, compile_expr};
pub use error::PluralError;
pub use expr::{CompareOp, Operand, PluralExpr, Test};
pub use rule::{MAX_PLURAL_FORMS, PluralRule};
