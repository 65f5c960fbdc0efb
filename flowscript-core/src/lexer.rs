//! Lexer for FlowScript pseudocode.
//!
//! The scanner is stateful: whether an unquoted run of text ends at a
//! bracket depends on the token emitted just before it, and consecutive
//! line comments are folded into the comment token already emitted.

use core::fmt;

use tracing::trace;

use crate::chars::{Buffer, Char};
use crate::error::{CoreError, LexError, StructuralError};
use crate::span::Position;

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Brackets
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    // Shape delimiters
    ForwardSlash,  // /
    BackwardSlash, // \

    // Text carrying
    Comment,
    String,

    Semi,  // ;
    Arrow, // =>

    // Keywords
    Return,
    If,
    Else,
    While,
    Switch,
}

impl TokenKind {
    /// True for tokens after which an unquoted run stops at the matching
    /// closing character instead of running on to the next `;`.
    pub fn is_opening(self) -> bool {
        matches!(
            self,
            TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::ForwardSlash
                | TokenKind::BackwardSlash
        )
    }

    /// The character that pairs with this bracket kind.
    ///
    /// Slashes pair with themselves since they both open and close the
    /// parallelogram shapes.
    pub fn matching_bracket(self) -> Result<char, StructuralError> {
        match self {
            TokenKind::LParen => Ok(')'),
            TokenKind::RParen => Ok('('),
            TokenKind::LBracket => Ok(']'),
            TokenKind::RBracket => Ok('['),
            TokenKind::LBrace => Ok('}'),
            TokenKind::RBrace => Ok('{'),
            TokenKind::ForwardSlash => Ok('/'),
            TokenKind::BackwardSlash => Ok('\\'),
            kind => Err(StructuralError::NotABracket { kind }),
        }
    }

    /// Whether `next` may directly follow this keyword for it to count as
    /// the keyword rather than the start of a longer word.
    fn accepts_boundary(self, next: Char) -> bool {
        if next.is_eof() || next.is_whitespace() || next.is_newline() || next.equals('\r') {
            return true;
        }
        match self {
            TokenKind::If | TokenKind::While | TokenKind::Switch => next.equals('('),
            TokenKind::Else => next.equals('{'),
            TokenKind::Return => next.equals(';'),
            _ => false,
        }
    }

    fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "while" => Some(TokenKind::While),
            "else" => Some(TokenKind::Else),
            "switch" => Some(TokenKind::Switch),
            _ => None,
        }
    }

    fn bracket(ch: Char) -> Option<TokenKind> {
        match ch.get()? {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LParen => "L_PAREN",
            TokenKind::RParen => "R_PAREN",
            TokenKind::LBracket => "L_BRACKET",
            TokenKind::RBracket => "R_BRACKET",
            TokenKind::LBrace => "L_BRACE",
            TokenKind::RBrace => "R_BRACE",
            TokenKind::ForwardSlash => "FORWARD_SLASH",
            TokenKind::BackwardSlash => "BACKWARD_SLASH",
            TokenKind::Comment => "COMMENT",
            TokenKind::String => "STRING",
            TokenKind::Semi => "SEMI",
            TokenKind::Arrow => "ARROW",
            TokenKind::Return => "RETURN",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Switch => "SWITCH",
        };
        f.write_str(name)
    }
}

/// A single token with its kind and position.
///
/// `value` is only set for `String` and `Comment` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<String>,
    pub pos: Position,
}

impl Token {
    /// The carried text, or the empty string for kinds without a value.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Lex a source string into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CoreError> {
    Lexer::new(source).run()
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    offset: usize,
    line: usize,
    column: usize,
}

struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
    buffer: Buffer,
    tokens: Vec<Token>,
    /// Set while the most recent token is a line comment that a following
    /// line comment should be folded into.
    line_comment_open: bool,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
            buffer: Buffer::new(),
            tokens: Vec::new(),
            line_comment_open: false,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, CoreError> {
        loop {
            let next = self.peek();
            let Some(ch) = next.get() else { break };

            if next.is_quote() {
                self.lex_quoted(ch)?;
            } else if next.is_backtick() {
                self.lex_backtick()?;
            } else if next.is_alphanumeric() {
                self.lex_word()?;
            } else if next.equals('=') {
                self.lex_arrow()?;
            } else if next.equals(';') {
                self.simple_token(TokenKind::Semi)?;
            } else if next.equals('/') {
                self.lex_forward_slash()?;
            } else if next.equals('\\') {
                self.simple_token(TokenKind::BackwardSlash)?;
            } else if let Some(kind) = TokenKind::bracket(next) {
                self.simple_token(kind)?;
            } else {
                // Whitespace, newlines and unrecognised symbols. Only
                // whitespace keeps a line comment open for merging.
                let skipped = self.consume()?;
                if !(skipped.is_whitespace() || skipped.is_newline() || skipped.equals('\r')) {
                    self.line_comment_open = false;
                }
            }
            self.buffer.clear();
        }
        Ok(self.tokens)
    }

    fn simple_token(&mut self, kind: TokenKind) -> Result<(), LexError> {
        let start = self.mark();
        self.consume()?;
        self.push(kind, None, self.span_from(start));
        Ok(())
    }

    fn lex_quoted(&mut self, quote: char) -> Result<(), LexError> {
        let start = self.mark();
        self.consume()?;
        loop {
            if self.peek().is_eof() {
                return Err(self.unterminated(quote));
            }
            let ch = self.consume()?;
            if ch.equals('\\') {
                if self.peek().is_eof() {
                    return Err(self.unterminated(quote));
                }
                let escaped = self.consume()?;
                self.buffer.push(escaped);
                continue;
            }
            if ch.equals(quote) {
                break;
            }
            self.buffer.push(ch);
        }
        let value = self.buffer.take();
        self.push(TokenKind::String, Some(value), self.span_from(start));
        Ok(())
    }

    /// Backtick strings keep their delimiters and escapes verbatim so the
    /// renderer can interpret them as markdown labels.
    fn lex_backtick(&mut self) -> Result<(), LexError> {
        let start = self.mark();
        let opener = self.consume()?;
        self.buffer.push(opener);
        loop {
            if self.peek().is_eof() {
                return Err(self.unterminated('`'));
            }
            let ch = self.consume()?;
            self.buffer.push(ch);
            if ch.equals('\\') {
                if self.peek().is_eof() {
                    return Err(self.unterminated('`'));
                }
                let escaped = self.consume()?;
                self.buffer.push(escaped);
                continue;
            }
            if ch.is_backtick() {
                break;
            }
        }
        let value = self.buffer.take();
        self.push(TokenKind::String, Some(value), self.span_from(start));
        Ok(())
    }

    fn lex_word(&mut self) -> Result<(), CoreError> {
        let start = self.mark();
        let closer = self.closing_bracket()?;
        let first = self.consume()?;
        self.buffer.push(first);

        loop {
            let next = self.peek();
            if next.is_eof() || next.equals(';') || closer.is_some_and(|c| next.equals(c)) {
                break;
            }
            let ch = self.consume()?;
            self.buffer.push(ch);

            if let Some(kind) = TokenKind::keyword(self.buffer.as_str()) {
                if kind.accepts_boundary(self.peek()) {
                    self.push(kind, None, self.span_from(start));
                    return Ok(());
                }
            }
        }

        let value = self.buffer.take();
        self.push(TokenKind::String, Some(value), self.span_from(start));
        Ok(())
    }

    /// Closing character for the bracket the previous token opened, if any.
    fn closing_bracket(&self) -> Result<Option<char>, StructuralError> {
        match self.tokens.last() {
            Some(token) if token.kind.is_opening() => token.kind.matching_bracket().map(Some),
            _ => Ok(None),
        }
    }

    fn lex_arrow(&mut self) -> Result<(), LexError> {
        let start = self.mark();
        self.consume()?;
        if !self.peek().equals('>') {
            return Err(LexError::UnexpectedAssignment {
                position: self.here(),
            });
        }
        self.consume()?;
        self.push(TokenKind::Arrow, None, self.span_from(start));
        Ok(())
    }

    fn lex_forward_slash(&mut self) -> Result<(), LexError> {
        let start = self.mark();
        let after = self.peek_at(1);
        if after.equals('/') {
            self.consume()?;
            self.consume()?;
            self.lex_line_comment(start)
        } else if after.equals('*') {
            self.consume()?;
            self.consume()?;
            self.lex_block_comment(start)
        } else {
            self.simple_token(TokenKind::ForwardSlash)
        }
    }

    fn lex_line_comment(&mut self, start: Mark) -> Result<(), LexError> {
        while self.peek().is_whitespace() {
            self.consume()?;
        }
        while !self.peek().is_newline() && !self.peek().is_eof() {
            let ch = self.consume()?;
            self.buffer.push(ch);
        }
        let mut value = self.buffer.take();
        if value.ends_with('\r') {
            value.pop();
        }
        let position = self.span_from(start);

        if self.line_comment_open {
            if let Some(previous) = self.tokens.last_mut() {
                let joined = match previous.value.take() {
                    Some(text) => format!("{text}\n{value}"),
                    None => value,
                };
                previous.value = Some(joined);
                previous.pos = previous.pos.cover(position);
                trace!(length = previous.pos.length, "merged line comment");
                return Ok(());
            }
        }

        self.push(TokenKind::Comment, Some(value), position);
        self.line_comment_open = true;
        Ok(())
    }

    fn lex_block_comment(&mut self, start: Mark) -> Result<(), LexError> {
        loop {
            if self.peek().is_eof() {
                return Err(LexError::UnterminatedComment {
                    position: self.here(),
                });
            }
            if self.peek().equals('*') && self.peek_at(1).equals('/') {
                self.consume()?;
                self.consume()?;
                break;
            }
            let ch = self.consume()?;
            self.buffer.push(ch);
        }
        let value = self.buffer.take();
        self.push(TokenKind::Comment, Some(value), self.span_from(start));
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, value: Option<String>, pos: Position) {
        trace!(%kind, offset = pos.offset, length = pos.length, "token");
        self.tokens.push(Token { kind, value, pos });
        self.line_comment_open = false;
    }

    fn unterminated(&self, expected: char) -> LexError {
        LexError::UnterminatedString {
            expected,
            position: self.here(),
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            offset: self.index,
            line: self.line,
            column: self.column,
        }
    }

    fn span_from(&self, start: Mark) -> Position {
        Position::new(start.offset, self.index - start.offset, start.line, start.column)
    }

    /// Zero-length position at the cursor.
    fn here(&self) -> Position {
        Position::new(self.index, 0, self.line, self.column)
    }

    fn peek(&self) -> Char {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Char {
        self.chars
            .get(self.index + ahead)
            .copied()
            .map_or(Char::EOF, Char::new)
    }

    fn consume(&mut self) -> Result<Char, LexError> {
        let next = self.peek();
        if next.is_eof() {
            return Err(LexError::EndOfInput {
                position: self.here(),
            });
        }
        self.index += 1;
        if next.is_newline() {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Ok(next)
    }
}
