//! Human-readable rendering of compile failures.
//!
//! A diagnostic is the error message plus, when the error points into the
//! source, the offending line with a caret under the column:
//!
//! ```text
//! Unterminated string! Expected `"`, got EoF
//! Ln: 1, Col: 12
//!
//! start; "abc
//!            ^
//! ```

use core::fmt::Write as _;

use crate::error::CoreError;
use crate::span::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub position: Option<Position>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, position: Option<Position>) -> Self {
        Diagnostic {
            message: message.into(),
            position,
        }
    }

    pub fn from_error(err: &CoreError) -> Self {
        Diagnostic::error(err.to_string(), err.position())
    }

    /// Render against the source the error came from.
    pub fn render(&self, source: &str) -> String {
        let mut out = format!("{}\n", self.message);
        let Some(position) = self.position else {
            return out;
        };

        let line = source
            .split('\n')
            .nth(position.line.saturating_sub(1))
            .unwrap_or("")
            .trim_end_matches('\r');
        let indent = " ".repeat(position.column.saturating_sub(1));
        let _ = write!(
            out,
            "Ln: {}, Col: {}\n\n{line}\n{indent}^\n",
            position.line, position.column
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::options::CompileOptions;

    fn diagnose(source: &str) -> String {
        let err = compile(source, &CompileOptions::default()).unwrap_err();
        Diagnostic::from_error(&err).render(source)
    }

    #[test]
    fn points_at_the_end_of_an_unterminated_string() {
        assert_eq!(
            diagnose("start; \"abc"),
            "Unterminated string! Expected `\"`, got EoF\nLn: 1, Col: 12\n\nstart; \"abc\n           ^\n"
        );
    }

    #[test]
    fn shows_only_the_offending_line() {
        assert_eq!(
            diagnose("first;\r\n  while (x) {}\nlast;"),
            "I don't know what to do with this WHILE at ln: 2, col: 3\nLn: 2, Col: 3\n\n  while (x) {}\n  ^\n"
        );
    }

    #[test]
    fn errors_without_a_position_render_the_message_only() {
        assert_eq!(
            diagnose("if (x) { a;"),
            "Expected 'R_BRACE' at pos EoF.\n"
        );
        let err = CoreError::UnknownTheme("neon".to_string());
        assert_eq!(Diagnostic::from_error(&err).render(""), "unknown theme: neon\n");
    }
}
