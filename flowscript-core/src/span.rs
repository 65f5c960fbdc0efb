//! Source positions attached to tokens and errors.

use core::fmt;

/// Location of a token (or an error) in the source text.
///
/// `offset` and `length` count characters, not bytes, so that a caret
/// rendered under `column` lines up with what the user typed. `line` and
/// `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub length: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(offset: usize, length: usize, line: usize, column: usize) -> Self {
        Position {
            offset,
            length,
            line,
            column,
        }
    }

    /// Offset one past the last character covered by this position.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Extend this position so that it also covers `other`.
    ///
    /// The start (offset, line, column) is kept; only the length grows.
    pub fn cover(self, other: Position) -> Position {
        let end = self.end().max(other.end());
        Position {
            length: end - self.offset,
            ..self
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ln: {}, col: {}", self.line, self.column)
    }
}
