//! Compiled plural expression trees.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::NonZeroU64;

/// A compiled plural expression: a decision tree over `n`.
///
/// Leaves are constant plural-form indices. A branch that the rule leaves
/// undefined (a `?` without `:`) is `None` and evaluates to no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluralExpr {
    /// A fixed plural-form index.
    Const(usize),
    /// `test ? then : otherwise`.
    Ternary {
        test: Test,
        then: Option<Box<PluralExpr>>,
        otherwise: Option<Box<PluralExpr>>,
    },
}

/// A boolean condition over `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Test {
    Or(Box<Test>, Box<Test>),
    And(Box<Test>, Box<Test>),
    Compare {
        op: CompareOp,
        lhs: Operand,
        rhs: Operand,
    },
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// An arithmetic value over `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// The count being pluralized.
    N,
    Literal(u64),
    /// `operand % divisor`; the divisor is never zero.
    Mod(Box<Operand>, NonZeroU64),
}

impl PluralExpr {
    /// Select the plural-form index for `n`.
    ///
    /// Returns `None` when the path taken through the tree has no result.
    pub fn eval(&self, n: u64) -> Option<usize> {
        match self {
            PluralExpr::Const(index) => Some(*index),
            PluralExpr::Ternary {
                test,
                then,
                otherwise,
            } => {
                let branch = if test.holds(n) { then } else { otherwise };
                branch.as_ref()?.eval(n)
            }
        }
    }
}

impl Test {
    /// Evaluate the condition for `n`.
    pub fn holds(&self, n: u64) -> bool {
        match self {
            Test::Or(lhs, rhs) => lhs.holds(n) || rhs.holds(n),
            Test::And(lhs, rhs) => lhs.holds(n) && rhs.holds(n),
            Test::Compare { op, lhs, rhs } => op.apply(lhs.value(n), rhs.value(n)),
        }
    }
}

impl CompareOp {
    fn apply(self, lhs: u64, rhs: u64) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

impl Operand {
    /// Evaluate the operand for `n`.
    pub fn value(&self, n: u64) -> u64 {
        match self {
            Operand::N => n,
            Operand::Literal(value) => *value,
            Operand::Mod(operand, divisor) => operand.value(n) % divisor.get(),
        }
    }
}

// Display renders a fully parenthesized form that compiles back to the
// same tree.

impl Display for PluralExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PluralExpr::Const(index) => write!(f, "{index}"),
            PluralExpr::Ternary {
                test,
                then,
                otherwise,
            } => {
                write!(f, "({test} ?")?;
                if let Some(then) = then {
                    write!(f, " {then}")?;
                }
                if let Some(otherwise) = otherwise {
                    write!(f, " : {otherwise}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Display for Test {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Test::Or(lhs, rhs) => write!(f, "({lhs} || {rhs})"),
            Test::And(lhs, rhs) => write!(f, "({lhs} && {rhs})"),
            Test::Compare { op, lhs, rhs } => write!(f, "{lhs} {} {rhs}", op.symbol()),
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Operand::N => write!(f, "n"),
            Operand::Literal(value) => write!(f, "{value}"),
            Operand::Mod(operand, divisor) => write!(f, "{operand} % {divisor}"),
        }
    }
}
