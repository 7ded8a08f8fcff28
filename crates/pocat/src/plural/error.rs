//! Error types for plural rule compilation.

use thiserror::Error;

/// An error that occurred while compiling a plural rule.
///
/// Offsets are byte positions within the `plural=` expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluralError {
    /// A character that starts no token.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    /// An identifier other than `n`.
    #[error("unknown identifier '{name}' at offset {offset}: only 'n' is allowed")]
    UnknownIdentifier { name: String, offset: usize },

    /// A token that does not fit the grammar at this point.
    #[error("unexpected '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    /// The expression stops in the middle of a construct.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A parenthesis without its partner.
    #[error("unbalanced parenthesis at offset {offset}")]
    UnbalancedParen { offset: usize },

    /// `% 0`.
    #[error("modulo by zero at offset {offset}")]
    ZeroDivisor { offset: usize },

    /// An integer literal that does not fit.
    #[error("integer literal '{literal}' is too large")]
    Overflow { literal: String },

    /// `nplurals` that is not an integer in `1..=MAX_PLURAL_FORMS`.
    #[error("invalid nplurals value '{0}'")]
    InvalidNplurals(String),

    /// The rule has no expression to compile.
    #[error("rule has no plural expression")]
    MissingExpression,

    /// A `? :` expression used where a condition or number is expected.
    #[error("conditional expression at offset {offset} cannot be used as an operand")]
    NestedConditional { offset: usize },

    /// A comparison used as an arithmetic operand.
    #[error("comparison at offset {offset} cannot be used as a number")]
    ConditionAsOperand { offset: usize },

    /// An arithmetic value involving `n` used as the selected index.
    #[error("expression at offset {offset} does not select a constant plural form")]
    ValueAsResult { offset: usize },

    /// Parentheses or conditionals nested beyond the supported depth.
    #[error("expression nested deeper than {max} levels")]
    TooDeep { max: usize },
}
