//! Compile-time configuration.

use core::fmt;
use core::str::FromStr;

use crate::error::CoreError;
use crate::theme::Theme;

pub const DEFAULT_TRUE_LABEL: &str = "True";
pub const DEFAULT_FALSE_LABEL: &str = "False";

/// Layout direction of the flowchart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `TD`
    #[default]
    TopDown,
    /// `LR`
    LeftRight,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopDown => "TD",
            Direction::LeftRight => "LR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TD" => Ok(Direction::TopDown),
            "LR" => Ok(Direction::LeftRight),
            _ => Err(CoreError::UnknownDirection(value.to_string())),
        }
    }
}

/// Options accepted by [`crate::compile`].
///
/// Branch labels are only set through the builder so that an empty label
/// always falls back to the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    true_label: String,
    false_label: String,
    pub direction: Direction,
    pub theme: Theme,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            true_label: DEFAULT_TRUE_LABEL.to_string(),
            false_label: DEFAULT_FALSE_LABEL.to_string(),
            direction: Direction::default(),
            theme: Theme::default(),
        }
    }
}

impl CompileOptions {
    pub fn true_label(&self) -> &str {
        &self.true_label
    }

    pub fn false_label(&self) -> &str {
        &self.false_label
    }

    pub fn with_true_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.is_empty() {
            self.true_label = label;
        }
        self
    }

    pub fn with_false_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.is_empty() {
            self.false_label = label;
        }
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let options = CompileOptions::default();
        assert_eq!(options.true_label, "True");
        assert_eq!(options.false_label, "False");
        assert_eq!(options.direction, Direction::TopDown);
        assert_eq!(options.theme, Theme::None);
    }

    #[test]
    fn empty_labels_keep_the_defaults() {
        let options = CompileOptions::default()
            .with_true_label("")
            .with_false_label("");
        assert_eq!(options.true_label(), "True");
        assert_eq!(options.false_label(), "False");
    }

    #[test]
    fn builder_overrides_each_field() {
        let options = CompileOptions::default()
            .with_true_label("yes")
            .with_false_label("no")
            .with_direction(Direction::LeftRight)
            .with_theme(Theme::Bright);
        assert_eq!(options.true_label(), "yes");
        assert_eq!(options.false_label(), "no");
        assert_eq!(options.direction, Direction::LeftRight);
        assert_eq!(options.theme, Theme::Bright);
    }

    #[test]
    fn parses_directions() {
        assert_eq!("TD".parse::<Direction>().unwrap(), Direction::TopDown);
        assert_eq!("lr".parse::<Direction>().unwrap(), Direction::LeftRight);
        let err = "BT".parse::<Direction>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownDirection(value) if value == "BT"));
    }
}
