//! Character primitives used by the lexer.
//!
//! `Char` is a single source character (or the end-of-input sentinel) with
//! the classification predicates the lexer dispatches on. `Buffer`
//! accumulates a run of characters while a token is being scanned.

use core::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharError {
    #[error("{0:?} is not a single letter")]
    NotSingle(String),
}

/// One character of source text.
///
/// `Char::EOF` stands in for "past the end of the input"; peeking never
/// fails, it yields the sentinel instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Char(Option<char>);

impl Char {
    pub const EOF: Char = Char(None);

    pub const fn new(ch: char) -> Self {
        Char(Some(ch))
    }

    /// The wrapped character, or `None` for the sentinel.
    pub fn get(self) -> Option<char> {
        self.0
    }

    pub fn is_eof(self) -> bool {
        self.0.is_none()
    }

    pub fn is_alpha(self) -> bool {
        self.0.is_some_and(|ch| ch.is_ascii_alphabetic())
    }

    pub fn is_numeric(self) -> bool {
        self.0.is_some_and(|ch| ch.is_ascii_digit())
    }

    pub fn is_alphanumeric(self) -> bool {
        self.is_alpha() || self.is_numeric()
    }

    pub fn is_quote(self) -> bool {
        self.equals('"') || self.equals('\'')
    }

    pub fn is_backtick(self) -> bool {
        self.equals('`')
    }

    /// Space or tab. Newlines are classified separately.
    pub fn is_whitespace(self) -> bool {
        self.equals(' ') || self.equals('\t')
    }

    pub fn is_newline(self) -> bool {
        self.equals('\n')
    }

    pub fn equals(self, ch: char) -> bool {
        self.0 == Some(ch)
    }

    pub fn is_one_of(self, set: &[char]) -> bool {
        self.0.is_some_and(|ch| set.contains(&ch))
    }
}

impl From<char> for Char {
    fn from(ch: char) -> Self {
        Char::new(ch)
    }
}

impl TryFrom<&str> for Char {
    type Error = CharError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(Char::new(ch)),
            _ => Err(CharError::NotSingle(text.to_string())),
        }
    }
}

impl fmt::Display for Char {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ch) => write!(f, "{ch}"),
            None => f.write_str("EoF"),
        }
    }
}

/// Growable run of characters collected while scanning one token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    text: String,
    len: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer::default()
    }

    /// Append a character. The end-of-input sentinel is ignored.
    pub fn push(&mut self, ch: Char) {
        if let Some(ch) = ch.get() {
            self.text.push(ch);
            self.len += 1;
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.len = 0;
    }

    pub fn equals(&self, value: &str) -> bool {
        self.text == value
    }

    pub fn has_contents(&self) -> bool {
        self.len > 0
    }

    /// Number of characters (not bytes) in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Take the accumulated text, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        self.len = 0;
        core::mem::take(&mut self.text)
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
