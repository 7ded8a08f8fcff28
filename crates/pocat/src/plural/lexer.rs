//! Tokenizer for plural expressions using winnow.

use std::fmt::{Display, Formatter, Result as FmtResult};

use winnow::combinator::alt;
use winnow::prelude::*;
use winnow::token::take_while;

use super::error::PluralError;

/// A lexical token of a plural expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Number(&'a str),
    Ident(&'a str),
    Or,
    And,
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    Percent,
    Question,
    Colon,
    LParen,
    RParen,
}

/// A token with its byte offset in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let text = match self {
            Token::Number(text) | Token::Ident(text) => *text,
            Token::Or => "||",
            Token::And => "&&",
            Token::Eq => "==",
            Token::Ne => "!=",
            Token::Le => "<=",
            Token::Ge => ">=",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Percent => "%",
            Token::Question => "?",
            Token::Colon => ":",
            Token::LParen => "(",
            Token::RParen => ")",
        };
        f.write_str(text)
    }
}

/// Split an expression into tokens, skipping whitespace.
pub fn tokenize(source: &str) -> Result<Vec<Spanned<'_>>, PluralError> {
    let mut remaining = source;
    let mut tokens = Vec::new();
    loop {
        // Whitespace never fails to parse.
        let _ = ws(&mut remaining);
        if remaining.is_empty() {
            return Ok(tokens);
        }
        let offset = source.len() - remaining.len();
        match token(&mut remaining) {
            Ok(token) => tokens.push(Spanned { token, offset }),
            Err(_) => {
                return Err(PluralError::UnexpectedChar {
                    ch: remaining.chars().next().unwrap_or('?'),
                    offset,
                });
            }
        }
    }
}

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

fn token<'i>(input: &mut &'i str) -> ModalResult<Token<'i>> {
    alt((
        take_while(1.., |c: char| c.is_ascii_digit()).map(Token::Number),
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').map(Token::Ident),
        operator,
    ))
    .parse_next(input)
}

/// Two-character operators are tried before their one-character prefixes.
fn operator<'i>(input: &mut &'i str) -> ModalResult<Token<'i>> {
    alt((
        "||".value(Token::Or),
        "&&".value(Token::And),
        "==".value(Token::Eq),
        "!=".value(Token::Ne),
        "<=".value(Token::Le),
        ">=".value(Token::Ge),
        '<'.value(Token::Lt),
        '>'.value(Token::Gt),
        '%'.value(Token::Percent),
        '?'.value(Token::Question),
        ':'.value(Token::Colon),
        '('.value(Token::LParen),
        ')'.value(Token::RParen),
    ))
    .parse_next(input)
}
