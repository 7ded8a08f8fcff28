use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::compiler::compile;
use super::error::PluralError;
use super::expr::{CompareOp, Operand, PluralExpr, Test};

/// Upper bound on the number of plural forms a rule may declare and on the
/// `K` of a `msgstr[K]` line (exclusive).
pub const MAX_PLURAL_FORMS: usize = 64;

/// A compiled `Plural-Forms` rule: the expression plus the declared number
/// of forms, if any.
///
/// The default rule is the two-form rule used by English and German:
/// `nplurals=2; plural=(n != 1);`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRule {
    nplurals: Option<usize>,
    expr: PluralExpr,
}

impl PluralRule {
    pub(crate) fn new(nplurals: Option<usize>, expr: PluralExpr) -> Self {
        Self { nplurals, expr }
    }

    /// Compile a rule string. See [`compile`](super::compile).
    pub fn compile(rule: &str) -> Result<Self, PluralError> {
        compile(rule)
    }

    /// The declared number of plural forms.
    pub fn nplurals(&self) -> Option<usize> {
        self.nplurals
    }

    /// The compiled expression.
    pub fn expr(&self) -> &PluralExpr {
        &self.expr
    }

    /// Select the plural-form index for `n`.
    ///
    /// Returns `None` if the rule has no result for `n` or selects an index
    /// outside the declared `nplurals`.
    pub fn select(&self, n: u64) -> Option<usize> {
        let index = self.expr.eval(n)?;
        match self.nplurals {
            Some(count) if index >= count => None,
            _ => Some(index),
        }
    }
}

impl Default for PluralRule {
    fn default() -> Self {
        Self {
            nplurals: Some(2),
            expr: PluralExpr::Ternary {
                test: Test::Compare {
                    op: CompareOp::Eq,
                    lhs: Operand::N,
                    rhs: Operand::Literal(1),
                },
                then: Some(Box::new(PluralExpr::Const(0))),
                otherwise: Some(Box::new(PluralExpr::Const(1))),
            },
        }
    }
}

impl FromStr for PluralRule {
    type Err = PluralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

impl Display for PluralRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(count) = self.nplurals {
            write!(f, "nplurals={count}; ")?;
        }
        write!(f, "plural={};", self.expr)
    }
}
