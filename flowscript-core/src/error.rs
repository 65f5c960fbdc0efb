use std::path::PathBuf;

use thiserror::Error;

use crate::lexer::TokenKind;
use crate::span::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unterminated string! Expected `{expected}`, got EoF")]
    UnterminatedString { expected: char, position: Position },
    #[error("Unterminated comment! Expected `*/`, got EoF")]
    UnterminatedComment { position: Position },
    #[error("Unexpected assignment! Expected '>'")]
    UnexpectedAssignment { position: Position },
    #[error("Cannot consume, end of file.")]
    EndOfInput { position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position, .. }
            | LexError::UnterminatedComment { position }
            | LexError::UnexpectedAssignment { position }
            | LexError::EndOfInput { position } => *position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("I don't know what to do with this {kind} at {position}")]
    UnexpectedToken { kind: TokenKind, position: Position },
    #[error("Expected '{expected}' at pos {offset} ({position}).", offset = .position.offset)]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        position: Position,
    },
    #[error("Expected '{expected}' at pos EoF.")]
    UnexpectedEof { expected: TokenKind },
}

impl ParseError {
    /// Position of the offending token; `None` when the input ran out.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::ExpectedToken { position, .. } => Some(*position),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("Unknown bracket type! Could not match.")]
    NotABracket { kind: TokenKind },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read source: {0}")]
    SourceIo(#[from] std::io::Error),
    #[error("source directory was not found at {0}")]
    MissingSourceDir(PathBuf),
    #[error("unknown flowchart direction: {0}")]
    UnknownDirection(String),
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error("{file}: {error}", file = .path.display())]
    InSource {
        path: PathBuf,
        #[source]
        error: Box<CoreError>,
    },
}

impl CoreError {
    /// Source position the error points at, if it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            CoreError::Lex(err) => Some(err.position()),
            CoreError::Parse(err) => err.position(),
            CoreError::InSource { error, .. } => error.position(),
            _ => None,
        }
    }
}
