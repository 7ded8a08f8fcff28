use std::fmt::{Display, Formatter, Result as FmtResult};

/// Address of an entry: its `msgid` plus optional `msgctxt`.
///
/// A plain `&str` converts into a context-less key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageKey<'a> {
    pub context: Option<&'a str>,
    pub id: &'a str,
}

impl<'a> MessageKey<'a> {
    /// Key for an entry without context.
    pub fn new(id: &'a str) -> Self {
        Self { context: None, id }
    }

    /// Key for an entry in `context`.
    pub fn with_context(context: &'a str, id: &'a str) -> Self {
        Self {
            context: Some(context),
            id,
        }
    }
}

impl<'a> From<&'a str> for MessageKey<'a> {
    fn from(id: &'a str) -> Self {
        Self::new(id)
    }
}

impl<'a> From<&'a String> for MessageKey<'a> {
    fn from(id: &'a String) -> Self {
        Self::new(id)
    }
}

impl Display for MessageKey<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.context {
            Some(context) => write!(f, "[{context}] {}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}
