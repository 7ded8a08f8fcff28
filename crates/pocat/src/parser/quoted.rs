//! Quoted string literals using C escape conventions.
//!
//! Catalog values are written as `"..."` with backslash escapes. A value may
//! be continued across several quoted lines; this module handles a single
//! line, the cursor handles continuation.

use std::fmt::Write;

use winnow::combinator::{alt, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use super::error::QuoteError;

/// A decoded piece of a quoted string body.
enum Fragment<'i> {
    Literal(&'i str),
    Char(char),
    Byte(u8),
}

/// Returns true if the line, ignoring surrounding whitespace, is a quoted
/// string: at least two characters, starting and ending with `"`.
pub fn is_quoted_line(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('"') && line.ends_with('"')
}

/// Strip the surrounding quotes from a line and resolve its escapes.
pub fn unquote(line: &str) -> Result<String, QuoteError> {
    let trimmed = line.trim();
    if !is_quoted_line(trimmed) {
        return Err(QuoteError::NotQuoted(trimmed.to_string()));
    }

    let body = &trimmed[1..trimmed.len() - 1];
    let mut remaining = body;
    let fragments: Vec<Fragment<'_>> = repeat(0.., fragment)
        .parse_next(&mut remaining)
        .map_err(|_| QuoteError::InvalidEscape { offset: 1 })?;

    // The opening quote counts towards offsets.
    let offset = 1 + body.len() - remaining.len();
    match remaining.chars().next() {
        None => {}
        Some('"') => return Err(QuoteError::UnescapedQuote { offset }),
        Some(_) => return Err(QuoteError::InvalidEscape { offset }),
    }

    let mut bytes = Vec::with_capacity(body.len());
    for fragment in fragments {
        match fragment {
            Fragment::Literal(text) => bytes.extend_from_slice(text.as_bytes()),
            Fragment::Char(c) => {
                let mut buf = [0; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            Fragment::Byte(b) => bytes.push(b),
        }
    }
    String::from_utf8(bytes).map_err(|_| QuoteError::InvalidUtf8)
}

/// Escape a value for output between double quotes.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

/// Escape a value and wrap it in double quotes.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

/// Parse one fragment of a string body: an escape or a run of plain text.
fn fragment<'i>(input: &mut &'i str) -> ModalResult<Fragment<'i>> {
    alt((literal_run.map(Fragment::Literal), escape_sequence)).parse_next(input)
}

/// Parse a run of characters that need no decoding.
fn literal_run<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c != '\\' && c != '"').parse_next(input)
}

/// Parse a backslash escape.
///
/// Unknown escapes backtrack so that the caller can report the offset of
/// the offending backslash.
fn escape_sequence<'i>(input: &mut &'i str) -> ModalResult<Fragment<'i>> {
    '\\'.parse_next(input)?;
    let c = any.parse_next(input)?;
    let fragment = match c {
        'n' => Fragment::Char('\n'),
        't' => Fragment::Char('\t'),
        'r' => Fragment::Char('\r'),
        'a' => Fragment::Char('\u{07}'),
        'b' => Fragment::Char('\u{08}'),
        'f' => Fragment::Char('\u{0C}'),
        'v' => Fragment::Char('\u{0B}'),
        '\\' | '"' | '\'' | '?' => Fragment::Char(c),
        '0'..='7' => {
            let rest: &str = take_while(0..=2, is_octal_digit).parse_next(input)?;
            let mut digits = String::with_capacity(3);
            digits.push(c);
            digits.push_str(rest);
            let value = u32::from_str_radix(&digits, 8).map_err(|_| backtrack())?;
            Fragment::Byte(u8::try_from(value).map_err(|_| backtrack())?)
        }
        'x' => {
            let digits: &str = take_while(2..=2, is_hex_digit).parse_next(input)?;
            Fragment::Byte(u8::from_str_radix(digits, 16).map_err(|_| backtrack())?)
        }
        'u' => Fragment::Char(unicode_escape(input, 4)?),
        'U' => Fragment::Char(unicode_escape(input, 8)?),
        _ => return Err(backtrack()),
    };
    Ok(fragment)
}

/// Parse the hex digits of a `\u` or `\U` escape.
fn unicode_escape(input: &mut &str, width: usize) -> ModalResult<char> {
    let digits: &str = take_while(width..=width, is_hex_digit).parse_next(input)?;
    let code = u32::from_str_radix(digits, 16).map_err(|_| backtrack())?;
    char::from_u32(code).ok_or_else(backtrack)
}

fn is_octal_digit(c: char) -> bool {
    ('0'..='7').contains(&c)
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_plain_text() {
        assert_eq!(unquote(r#""hello world""#).unwrap(), "hello world");
        assert_eq!(unquote(r#"  """#).unwrap(), "");
    }

    #[test]
    fn unquote_c_escapes() {
        assert_eq!(unquote(r#""a\nb\tc\\d\"e""#).unwrap(), "a\nb\tc\\d\"e");
        assert_eq!(unquote(r#""\x41\101é""#).unwrap(), "AAé");
    }

    #[test]
    fn unquote_utf8_byte_escapes() {
        assert_eq!(unquote(r#""\xc3\xa9""#).unwrap(), "é");
        assert_eq!(unquote(r#""\xff""#), Err(QuoteError::InvalidUtf8));
    }

    #[test]
    fn unquote_rejects_bad_input() {
        assert!(matches!(unquote("hello"), Err(QuoteError::NotQuoted(_))));
        assert!(matches!(unquote("\""), Err(QuoteError::NotQuoted(_))));
        assert_eq!(
            unquote(r#""ab\qc""#),
            Err(QuoteError::InvalidEscape { offset: 3 })
        );
        assert_eq!(
            unquote(r#""a"b""#),
            Err(QuoteError::UnescapedQuote { offset: 2 })
        );
    }

    #[test]
    fn escape_is_inverse_of_unquote() {
        let original = "tab\there \"quoted\" back\\slash\nbell\u{07}\u{01}";
        assert_eq!(unquote(&quote(original)).unwrap(), original);
        assert_eq!(escape("\u{01}"), "\\x01");
    }
}
