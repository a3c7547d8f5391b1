//! Style defaults and typed access to style values.

use serde::Deserialize;

use crate::{
    color::Color,
    draw::{StrokeDefinition, StrokeStyle},
    geometry::Direction,
    identifier::Id,
    semantic::{ResolveError, StyleMap},
};

/// Values used when a cell's style does not set a key.
///
/// These match what the draw.io editor assumes for a blank style.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f32,
    pub font_family: String,
    pub font_size: f32,
    /// When unset, text falls back to the cell's stroke color
    pub font_color: Option<String>,
    pub start_arrow: String,
    pub end_arrow: String,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            fill_color: "#fff".to_string(),
            stroke_color: "#000".to_string(),
            stroke_width: 1.0,
            font_family: "Helvetica".to_string(),
            font_size: 12.0,
            font_color: None,
            start_arrow: "none".to_string(),
            end_arrow: "classic".to_string(),
        }
    }
}

/// A style map bound to the cell it belongs to, so that every failure
/// names the cell and key.
pub(crate) struct CellStyle<'a> {
    cell: Id,
    style: &'a StyleMap,
}

impl<'a> CellStyle<'a> {
    pub(crate) fn new(cell: Id, style: &'a StyleMap) -> Self {
        Self { cell, style }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a str> {
        self.style.get(key)
    }

    pub(crate) fn has(&self, key: &str) -> bool {
        self.style.contains_key(key)
    }

    /// `1` means set; absent or anything else is unset
    pub(crate) fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.trim() == "1")
    }

    pub(crate) fn text_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub(crate) fn invalid(&self, key: &str, message: impl Into<String>) -> ResolveError {
        ResolveError::InvalidStyleValue {
            cell: self.cell,
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Parses a number, accepting a trailing `px` unit.
    pub(crate) fn number(&self, key: &str) -> Result<Option<f32>, ResolveError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        parse_number(raw)
            .map(Some)
            .ok_or_else(|| self.invalid(key, format!("`{raw}` is not a number")))
    }

    pub(crate) fn number_or(&self, key: &str, default: f32) -> Result<f32, ResolveError> {
        Ok(self.number(key)?.unwrap_or(default))
    }

    /// Resolves a paint key; `none` yields no paint, `default` or an absent
    /// key yields `default`.
    pub(crate) fn paint(&self, key: &str, default: &str) -> Result<Option<Color>, ResolveError> {
        let raw = match self.get(key) {
            Some(value) if value != "default" => value,
            _ => default,
        };
        Color::parse_optional(raw).map_err(|err| self.invalid(key, err))
    }

    pub(crate) fn direction(&self) -> Result<Direction, ResolveError> {
        match self.get("direction") {
            None => Ok(Direction::default()),
            Some(raw) => raw
                .parse::<Direction>()
                .map_err(|err| self.invalid("direction", err)),
        }
    }

    /// Builds the stroke from `strokeColor`, `strokeWidth`, `dashed` and
    /// `dashPattern`.
    pub(crate) fn stroke(&self, defaults: &StyleDefaults) -> Result<StrokeDefinition, ResolveError> {
        let color = self
            .paint("strokeColor", &defaults.stroke_color)?
            .unwrap_or_else(|| Color::default().with_alpha(0.0));
        let width = self.number_or("strokeWidth", defaults.stroke_width)?;
        let mut stroke = StrokeDefinition::new(color, width);
        if self.get("dashed").is_some_and(|v| v.trim() != "0") {
            let style = StrokeStyle::from_dash_pattern(self.get("dashPattern"))
                .map_err(|err| self.invalid("dashPattern", err))?;
            stroke.set_style(style);
        }
        Ok(stroke)
    }
}

fn parse_number(raw: &str) -> Option<f32> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed);
    trimmed.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}
