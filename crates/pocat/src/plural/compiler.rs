//! Recursive-descent compiler from plural expressions to decision trees.
//!
//! Precedence follows C, lowest first: `?:`, `||`, `&&`, `== !=`,
//! `< <= > >=`, `%`. Comparisons do not chain and `%` only takes an
//! integer literal divisor.

use std::num::NonZeroU64;

use super::error::PluralError;
use super::expr::{CompareOp, Operand, PluralExpr, Test};
use super::lexer::{Spanned, Token, tokenize};
use super::rule::{MAX_PLURAL_FORMS, PluralRule};

/// Maximum nesting of parentheses and conditionals.
const MAX_DEPTH: usize = 64;

/// Compile a full rule: `nplurals=N; plural=EXPR;` or a bare expression.
///
/// # Example
///
/// ```
/// let rule = pocat::plural::compile("nplurals=2; plural=(n != 1);").unwrap();
/// assert_eq!(rule.nplurals(), Some(2));
/// assert_eq!(rule.select(1), Some(0));
/// assert_eq!(rule.select(5), Some(1));
/// ```
pub fn compile(rule: &str) -> Result<PluralRule, PluralError> {
    let (nplurals, source) = split_rule(rule)?;
    let expr = compile_expr(source)?;
    Ok(PluralRule::new(nplurals, expr))
}

/// Compile a bare plural expression such as `n%10==1 ? 0 : 1`.
pub fn compile_expr(source: &str) -> Result<PluralExpr, PluralError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(PluralError::MissingExpression);
    }

    let mut parser = Parser::new(tokens, source.len());
    let node = parser.ternary()?;
    if let Some(rest) = parser.peek() {
        return Err(match rest.token {
            Token::RParen => PluralError::UnbalancedParen {
                offset: rest.offset,
            },
            token => PluralError::UnexpectedToken {
                token: token.to_string(),
                offset: rest.offset,
            },
        });
    }
    node.into_expr(0)
}

/// Separate the `nplurals` count from the `plural` expression.
///
/// Strings without a `plural=` field are taken as a bare expression.
/// `nplurals` must lie in `1..=MAX_PLURAL_FORMS`.
fn split_rule(rule: &str) -> Result<(Option<usize>, &str), PluralError> {
    let mut nplurals = None;
    let mut plural = None;
    for part in rule.split(';') {
        let part = part.trim();
        if let Some(value) = field_value(part, "nplurals") {
            let value = value.trim();
            let count = value
                .parse::<usize>()
                .ok()
                .filter(|count| (1..=MAX_PLURAL_FORMS).contains(count))
                .ok_or_else(|| PluralError::InvalidNplurals(value.to_string()))?;
            nplurals = Some(count);
        } else if let Some(value) = field_value(part, "plural") {
            plural = Some(value);
        }
    }

    match plural {
        Some(expr) => Ok((nplurals, expr)),
        None if nplurals.is_some() => Err(PluralError::MissingExpression),
        None => Ok((None, rule.trim().trim_end_matches(';'))),
    }
}

/// The value of `key=value`, allowing spaces around `=` but not `==`.
fn field_value<'a>(part: &'a str, key: &str) -> Option<&'a str> {
    let value = part.strip_prefix(key)?.trim_start().strip_prefix('=')?;
    (!value.starts_with('=')).then_some(value)
}

/// An intermediate parse result. Whether a sub-expression is a number, a
/// condition or a full conditional is only known once its context is.
enum Node {
    Value(Operand),
    Test(Test),
    Expr(PluralExpr),
}

impl Node {
    /// Use as the condition of `?` or an operand of `&&`/`||`.
    /// A number means "non-zero", as in C.
    fn into_test(self, offset: usize) -> Result<Test, PluralError> {
        match self {
            Node::Value(operand) => Ok(Test::Compare {
                op: CompareOp::Ne,
                lhs: operand,
                rhs: Operand::Literal(0),
            }),
            Node::Test(test) => Ok(test),
            Node::Expr(_) => Err(PluralError::NestedConditional { offset }),
        }
    }

    /// Use as the selected index. A condition selects 1 or 0, as in C.
    fn into_expr(self, offset: usize) -> Result<PluralExpr, PluralError> {
        match self {
            Node::Value(Operand::Literal(value)) => usize::try_from(value)
                .map(PluralExpr::Const)
                .map_err(|_| PluralError::Overflow {
                    literal: value.to_string(),
                }),
            Node::Value(_) => Err(PluralError::ValueAsResult { offset }),
            Node::Test(test) => Ok(PluralExpr::Ternary {
                test,
                then: Some(Box::new(PluralExpr::Const(1))),
                otherwise: Some(Box::new(PluralExpr::Const(0))),
            }),
            Node::Expr(expr) => Ok(expr),
        }
    }

    /// Use as an arithmetic operand of a comparison or `%`.
    fn into_operand(self, offset: usize) -> Result<Operand, PluralError> {
        match self {
            Node::Value(operand) => Ok(operand),
            Node::Test(_) => Err(PluralError::ConditionAsOperand { offset }),
            Node::Expr(_) => Err(PluralError::NestedConditional { offset }),
        }
    }
}

struct Parser<'a> {
    tokens: Vec<Spanned<'a>>,
    position: usize,
    depth: usize,
    /// Offset reported for errors at end of input.
    end: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Spanned<'a>>, end: usize) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            end,
        }
    }

    fn peek(&self) -> Option<Spanned<'a>> {
        self.tokens.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<Spanned<'a>> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    /// Offset of the next token.
    fn offset(&self) -> usize {
        self.peek().map_or(self.end, |spanned| spanned.offset)
    }

    /// Consume the next token if it is `expected`.
    fn eat(&mut self, expected: Token<'_>) -> bool {
        let matches = self.peek().is_some_and(|spanned| spanned.token == expected);
        if matches {
            self.position += 1;
        }
        matches
    }

    /// Consume the next token if it is one of the comparison operators in `ops`.
    fn eat_compare(&mut self, ops: &[(Token<'static>, CompareOp)]) -> Option<CompareOp> {
        let next = self.peek()?;
        let (_, op) = ops.iter().find(|(token, _)| *token == next.token)?;
        self.position += 1;
        Some(*op)
    }

    fn ternary(&mut self) -> Result<Node, PluralError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(PluralError::TooDeep { max: MAX_DEPTH });
        }

        let start = self.offset();
        let condition = self.or()?;
        let node = if self.eat(Token::Question) {
            let test = condition.into_test(start)?;
            let then_start = self.offset();
            let then = self.ternary()?.into_expr(then_start)?;
            let otherwise = if self.eat(Token::Colon) {
                let otherwise_start = self.offset();
                Some(Box::new(self.ternary()?.into_expr(otherwise_start)?))
            } else {
                None
            };
            Node::Expr(PluralExpr::Ternary {
                test,
                then: Some(Box::new(then)),
                otherwise,
            })
        } else {
            condition
        };

        self.depth -= 1;
        Ok(node)
    }

    fn or(&mut self) -> Result<Node, PluralError> {
        let start = self.offset();
        let mut node = self.and()?;
        while self.eat(Token::Or) {
            let rhs_start = self.offset();
            let rhs = self.and()?.into_test(rhs_start)?;
            let lhs = node.into_test(start)?;
            node = Node::Test(Test::Or(Box::new(lhs), Box::new(rhs)));
        }
        Ok(node)
    }

    fn and(&mut self) -> Result<Node, PluralError> {
        let start = self.offset();
        let mut node = self.equality()?;
        while self.eat(Token::And) {
            let rhs_start = self.offset();
            let rhs = self.equality()?.into_test(rhs_start)?;
            let lhs = node.into_test(start)?;
            node = Node::Test(Test::And(Box::new(lhs), Box::new(rhs)));
        }
        Ok(node)
    }

    fn equality(&mut self) -> Result<Node, PluralError> {
        const OPS: &[(Token<'static>, CompareOp)] =
            &[(Token::Eq, CompareOp::Eq), (Token::Ne, CompareOp::Ne)];
        let start = self.offset();
        let lhs = self.relational()?;
        self.comparison(lhs, start, OPS, Self::relational)
    }

    fn relational(&mut self) -> Result<Node, PluralError> {
        const OPS: &[(Token<'static>, CompareOp)] = &[
            (Token::Lt, CompareOp::Lt),
            (Token::Le, CompareOp::Le),
            (Token::Gt, CompareOp::Gt),
            (Token::Ge, CompareOp::Ge),
        ];
        let start = self.offset();
        let lhs = self.modulo()?;
        self.comparison(lhs, start, OPS, Self::modulo)
    }

    /// Parse an optional `op rhs` after `lhs`.
    fn comparison(
        &mut self,
        lhs: Node,
        start: usize,
        ops: &[(Token<'static>, CompareOp)],
        operand: fn(&mut Self) -> Result<Node, PluralError>,
    ) -> Result<Node, PluralError> {
        let Some(op) = self.eat_compare(ops) else {
            return Ok(lhs);
        };
        let rhs_start = self.offset();
        let rhs = operand(self)?.into_operand(rhs_start)?;
        Ok(Node::Test(Test::Compare {
            op,
            lhs: lhs.into_operand(start)?,
            rhs,
        }))
    }

    fn modulo(&mut self) -> Result<Node, PluralError> {
        let start = self.offset();
        let mut node = self.atom()?;
        while self.eat(Token::Percent) {
            let divisor = self.divisor()?;
            node = Node::Value(Operand::Mod(Box::new(node.into_operand(start)?), divisor));
        }
        Ok(node)
    }

    fn divisor(&mut self) -> Result<NonZeroU64, PluralError> {
        match self.advance() {
            Some(Spanned {
                token: Token::Number(text),
                offset,
            }) => NonZeroU64::new(parse_literal(text)?)
                .ok_or(PluralError::ZeroDivisor { offset }),
            Some(Spanned { token, offset }) => Err(PluralError::UnexpectedToken {
                token: token.to_string(),
                offset,
            }),
            None => Err(PluralError::UnexpectedEnd),
        }
    }

    fn atom(&mut self) -> Result<Node, PluralError> {
        match self.advance() {
            Some(Spanned {
                token: Token::Number(text),
                ..
            }) => Ok(Node::Value(Operand::Literal(parse_literal(text)?))),
            Some(Spanned {
                token: Token::Ident("n"),
                ..
            }) => Ok(Node::Value(Operand::N)),
            Some(Spanned {
                token: Token::Ident(name),
                offset,
            }) => Err(PluralError::UnknownIdentifier {
                name: name.to_string(),
                offset,
            }),
            Some(Spanned {
                token: Token::LParen,
                offset,
            }) => {
                let inner = self.ternary()?;
                if self.eat(Token::RParen) {
                    Ok(inner)
                } else {
                    Err(PluralError::UnbalancedParen { offset })
                }
            }
            Some(Spanned { token, offset }) => Err(PluralError::UnexpectedToken {
                token: token.to_string(),
                offset,
            }),
            None => Err(PluralError::UnexpectedEnd),
        }
    }
}

fn parse_literal(text: &str) -> Result<u64, PluralError> {
    text.parse().map_err(|_| PluralError::Overflow {
        literal: text.to_string(),
    })
}
