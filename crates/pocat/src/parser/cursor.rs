//! Line-at-a-time cursor over catalog text.

use std::borrow::Cow;

use super::error::QuoteError;
use super::quoted::{is_quoted_line, unquote};

/// Collapse `\r\n` and lone `\r` line endings to `\n`.
///
/// Borrows the input when it contains no carriage return.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Returns true for empty or whitespace-only lines.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// A cursor over the lines of a catalog with one-line lookahead.
///
/// The cursor borrows its text; lines are slices of the input. `\n`,
/// `\r\n` and lone `\r` all end a line, giving the same lines as
/// [`normalize_line_endings`] followed by a split on `\n`.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor positioned at the first line.
    pub fn new(text: &'a str) -> Self {
        let lines = text
            .split('\n')
            .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
            .collect();
        Self { lines, position: 0 }
    }

    /// The line at the cursor, without advancing.
    pub fn current(&self) -> Option<&'a str> {
        self.lines.get(self.position).copied()
    }

    /// The line at the cursor; advances past it.
    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.current()?;
        self.position += 1;
        Some(line)
    }

    /// Step back one line. Does nothing at the first line.
    pub fn rewind_one(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Advance past blank lines and return the first non-blank line
    /// (without consuming it), or `None` at end of input.
    pub fn skip_blank(&mut self) -> Option<&'a str> {
        while let Some(line) = self.current() {
            if !is_blank(line) {
                return Some(line);
            }
            self.position += 1;
        }
        None
    }

    /// One-based number of the line at the cursor.
    pub fn line_number(&self) -> usize {
        self.position + 1
    }

    /// Read a quoted string that may continue on following lines.
    ///
    /// `head` is the already-consumed first part (the text after the
    /// keyword). Following lines are appended while they are quoted strings;
    /// when `prefix` is non-empty it is stripped from each following line
    /// first (e.g. `#|` for previous-value comments). The first line that is
    /// not a continuation is left unconsumed.
    ///
    /// On an invalid escape the continuation run is still consumed so the
    /// caller does not misread it as new keywords.
    pub fn read_quoted_string(&mut self, head: &str, prefix: &str) -> Result<String, QuoteError> {
        let mut value = unquote(head)?;
        let mut error = None;

        while let Some(line) = self.next_line() {
            let line = match prefix {
                "" => line,
                prefix => line.strip_prefix(prefix).unwrap_or(line),
            };
            if !is_quoted_line(line) {
                self.rewind_one();
                break;
            }
            match unquote(line) {
                Ok(part) => value.push_str(&part),
                Err(e) => {
                    error.get_or_insert(e);
                }
            }
        }

        match error {
            Some(e) => Err(e),
            None => Ok(value),
        }
    }
}
