//! Style themes applied to the generated flowchart.

use core::fmt;
use core::str::FromStr;

use crate::ast::Shape;
use crate::error::CoreError;

/// Named set of fill declarations, keyed by shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    /// No styling at all.
    #[default]
    None,
    Bright,
    Vivid,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::None, Theme::Bright, Theme::Vivid];

    pub fn key(self) -> &'static str {
        match self {
            Theme::None => "none",
            Theme::Bright => "bright",
            Theme::Vivid => "vivid",
        }
    }

    /// Fill value for boxes of `shape`, if this theme styles them.
    pub fn fill(self, shape: Shape) -> Option<&'static str> {
        match (self, shape) {
            (Theme::None, _) => None,
            (Theme::Bright, Shape::Condition) => Some("#c3516b"),
            (Theme::Bright, _) => None,
            (Theme::Vivid, Shape::Condition) => Some("hotpink"),
            (Theme::Vivid, Shape::Square) => Some("coral"),
            (Theme::Vivid, Shape::Rounded) => Some("black,color:white"),
            (Theme::Vivid, Shape::Circular) => Some("mediumseagreen"),
            (Theme::Vivid, _) => None,
        }
    }

    /// Default stroke for every link, if this theme sets one.
    pub fn link_stroke(self) -> Option<&'static str> {
        match self {
            Theme::Vivid => Some("red"),
            Theme::None | Theme::Bright => None,
        }
    }

    /// Class suffix appended to a box line, e.g. `:::condition`.
    pub fn class_suffix(self, shape: Shape) -> String {
        match self.fill(shape) {
            Some(_) => format!(":::{}", shape.name()),
            None => String::new(),
        }
    }

    /// `classDef` line for `shape`, including the trailing newline.
    pub fn class_def(self, shape: Shape) -> Option<String> {
        self.fill(shape)
            .map(|fill| format!("classDef {} fill:{fill}\n", shape.name()))
    }

    /// `linkStyle` line, including the trailing newline.
    pub fn link_style(self) -> Option<String> {
        self.link_stroke()
            .map(|stroke| format!("linkStyle default stroke: {stroke}\n"))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.key() == key)
            .ok_or_else(|| CoreError::UnknownTheme(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_styles_nothing() {
        assert_eq!(Theme::None.fill(Shape::Condition), None);
        assert_eq!(Theme::None.class_suffix(Shape::Square), "");
        assert_eq!(Theme::None.class_def(Shape::Square), None);
        assert_eq!(Theme::None.link_style(), None);
    }

    #[test]
    fn bright_only_styles_conditions() {
        assert_eq!(
            Theme::Bright.class_def(Shape::Condition).as_deref(),
            Some("classDef condition fill:#c3516b\n")
        );
        assert_eq!(Theme::Bright.class_suffix(Shape::Condition), ":::condition");
        assert_eq!(Theme::Bright.class_suffix(Shape::Square), "");
    }

    #[test]
    fn vivid_styles_shapes_and_links() {
        assert_eq!(
            Theme::Vivid.class_def(Shape::Rounded).as_deref(),
            Some("classDef rounded fill:black,color:white\n")
        );
        assert_eq!(Theme::Vivid.fill(Shape::Parallelogram), None);
        assert_eq!(
            Theme::Vivid.link_style().as_deref(),
            Some("linkStyle default stroke: red\n")
        );
    }

    #[test]
    fn parses_theme_keys() {
        assert_eq!("none".parse::<Theme>().unwrap(), Theme::None);
        assert_eq!("Bright".parse::<Theme>().unwrap(), Theme::Bright);
        assert_eq!(" vivid ".parse::<Theme>().unwrap(), Theme::Vivid);
        let err = "neon".parse::<Theme>().unwrap_err();
        assert_eq!(err.to_string(), "unknown theme: neon");
    }
}
