//! Stroke and line-style definitions.
//!
//! # Overview
//!
//! Exported types:
//! - [`StrokeDefinition`]: Color, width and dash style of a line or border
//! - [`StrokeStyle`]: The fixed set of dash patterns draw.io offers
//! - [`apply_stroke!`](crate::apply_stroke!): Macro for applying stroke attributes to SVG elements
//!
//! # draw.io Dash Patterns
//!
//! draw.io stores a dashed line as `dashed=1` plus an optional
//! `dashPattern`. Only the patterns the editor offers in its line-style menu
//! are recognized:
//!
//! | `dashPattern` | Style | SVG `stroke-dasharray` |
//! |---------------|-------|------------------------|
//! | `1 1` | [`StrokeStyle::Dotted1`] | `1 1` |
//! | `1 2` | [`StrokeStyle::Dotted2`] | `1 2` |
//! | `1 4` | [`StrokeStyle::Dotted3`] | `1 4` |
//! | absent | [`StrokeStyle::Dashed1`] | `3 3` |
//! | `8 8` | [`StrokeStyle::Dashed2`] | `8 8` |
//! | `12 12` | [`StrokeStyle::Dashed3`] | `12 12` |
//!
//! # Applying to SVG Elements
//!
//! ```
//! use mxdraw_core::draw::StrokeDefinition;
//! use mxdraw_core::color::Color;
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::new(Color::new("black").unwrap(), 2.0);
//! let rect = svg_element::Rectangle::new()
//!     .set("x", 0)
//!     .set("y", 0);
//!
//! let rect = mxdraw_core::apply_stroke!(rect, &stroke);
//! ```

use crate::color::Color;

/// Visual style of a stroke, including its dash pattern.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    Dotted1,
    Dotted2,
    Dotted3,
    Dashed1,
    Dashed2,
    Dashed3,
}

impl StrokeStyle {
    /// Maps a draw.io `dashPattern` value to a dashed stroke style.
    ///
    /// `None` is the editor's default dash.
    ///
    /// # Examples
    ///
    /// ```
    /// use mxdraw_core::draw::StrokeStyle;
    ///
    /// assert_eq!(StrokeStyle::from_dash_pattern(None), Ok(StrokeStyle::Dashed1));
    /// assert_eq!(StrokeStyle::from_dash_pattern(Some("1 4")), Ok(StrokeStyle::Dotted3));
    /// assert!(StrokeStyle::from_dash_pattern(Some("5 2 1")).is_err());
    /// ```
    pub fn from_dash_pattern(pattern: Option<&str>) -> Result<Self, String> {
        match pattern.map(str::trim) {
            Some("1 1") => Ok(Self::Dotted1),
            Some("1 2") => Ok(Self::Dotted2),
            Some("1 4") => Ok(Self::Dotted3),
            None => Ok(Self::Dashed1),
            Some("8 8") => Ok(Self::Dashed2),
            Some("12 12") => Ok(Self::Dashed3),
            Some(other) => Err(format!(
                "invalid dash pattern `{other}`, valid values: 1 1, 1 2, 1 4, 8 8, 12 12"
            )),
        }
    }

    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dotted1 => Some("1 1"),
            Self::Dotted2 => Some("1 2"),
            Self::Dotted3 => Some("1 4"),
            Self::Dashed1 => Some("3 3"),
            Self::Dashed2 => Some("8 8"),
            Self::Dashed3 => Some("12 12"),
        }
    }
}

/// A stroke definition for rendering lines and borders.
///
/// # Examples
///
/// ```
/// use mxdraw_core::draw::{StrokeDefinition, StrokeStyle};
/// use mxdraw_core::color::Color;
///
/// // Default stroke (black, 1px, solid)
/// let stroke = StrokeDefinition::default();
/// assert_eq!(stroke.width(), 1.0);
///
/// let mut stroke = StrokeDefinition::new(Color::new("red").unwrap(), 2.0);
/// stroke.set_style(StrokeStyle::Dashed2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// This macro applies color, opacity, width and the dash pattern (if not
/// solid) to any SVG element.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
