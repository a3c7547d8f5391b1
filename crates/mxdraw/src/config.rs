//! Configuration types for mxdraw rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration.
//! - [`StyleDefaults`] - Values assumed for style keys a cell does not set.
//! - [`LayoutConfig`] - Connector routing distances.
//! - [`TextConfig`] - Which font metrics provider lays out text.
//! - [`StyleConfig`] - Document background and view box padding.
//!
//! # Example
//!
//! ```
//! # use mxdraw::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().margin(), 20.0);
//! assert!(config.style().background_color().is_ok());
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use mxdraw_core::{
    color::Color,
    draw::{CosmicMetrics, FixedMetrics, FontMetrics},
};

pub use mxdraw_core::semantic::StyleDefaults;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    defaults: StyleDefaults,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    text: TextConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(
        defaults: StyleDefaults,
        layout: LayoutConfig,
        text: TextConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            defaults,
            layout,
            text,
            style,
        }
    }

    /// Style values used when a cell leaves a key unset
    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn text(&self) -> &TextConfig {
        &self.text
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Connector routing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance of a routed connector's first bend from the box side
    margin: f32,
    /// How far an end with an arrowhead is pulled back from its anchor
    cap_trim: f32,
}

impl LayoutConfig {
    pub fn new(margin: f32, cap_trim: f32) -> Self {
        Self { margin, cap_trim }
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn cap_trim(&self) -> f32 {
        self.cap_trim
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            cap_trim: 1.0,
        }
    }
}

/// Source of glyph metrics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontBackend {
    /// System fonts shaped with cosmic-text
    #[default]
    System,
    /// Synthetic metrics proportional to the font size
    Fixed,
}

/// Text layout settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    backend: FontBackend,
    /// Emit text as glyph outlines rather than `<text>` runs, for the
    /// system backend
    glyph_paths: bool,
    /// Font files loaded in addition to the system fonts
    font_files: Vec<PathBuf>,
    /// Advance of every character as a fraction of the font size, for the
    /// fixed backend
    advance_ratio: f32,
    /// Ascent as a fraction of the font size, for the fixed backend
    ascent_ratio: f32,
}

impl TextConfig {
    pub fn new(backend: FontBackend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    pub fn backend(&self) -> FontBackend {
        self.backend
    }

    pub fn glyph_paths(&self) -> bool {
        self.glyph_paths
    }

    pub fn font_files(&self) -> &[PathBuf] {
        &self.font_files
    }

    /// Loads an extra font file into the system backend
    pub fn with_font_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_files.push(path.into());
        self
    }

    /// Creates the metrics provider this configuration selects.
    pub fn metrics(&self) -> Box<dyn FontMetrics> {
        match self.backend {
            FontBackend::System if self.font_files.is_empty() => {
                Box::new(CosmicMetrics::new().with_outlines(self.glyph_paths))
            }
            FontBackend::System => Box::new(
                CosmicMetrics::with_font_files(self.font_files.iter().cloned())
                    .with_outlines(self.glyph_paths),
            ),
            FontBackend::Fixed => Box::new(FixedMetrics::new(self.advance_ratio, self.ascent_ratio)),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            backend: FontBackend::default(),
            glyph_paths: true,
            font_files: Vec::new(),
            advance_ratio: FixedMetrics::DEFAULT_ADVANCE_RATIO,
            ascent_ratio: FixedMetrics::DEFAULT_ASCENT_RATIO,
        }
    }
}

/// Visual styling of the output document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color, as a color string
    background_color: Option<String>,
    /// Padding added around the drawing on every side of the view box
    viewbox_padding: f32,
}

impl StyleConfig {
    pub fn new(background_color: Option<String>, viewbox_padding: f32) -> Self {
        Self {
            background_color,
            viewbox_padding,
        }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn viewbox_padding(&self) -> f32 {
        self.viewbox_padding
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            viewbox_padding: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_config_background_color() {
        let style = StyleConfig {
            background_color: Some("#fafafa".to_string()),
            ..StyleConfig::default()
        };
        assert!(style.background_color().unwrap().is_some());

        let style = StyleConfig {
            background_color: Some("not-a-color".to_string()),
            ..StyleConfig::default()
        };
        assert!(style.background_color().is_err());
        assert!(StyleConfig::default().background_color().unwrap().is_none());
    }

    #[test]
    fn test_text_config_fixed_metrics() {
        let metrics = TextConfig::new(FontBackend::Fixed).metrics();
        let face = mxdraw_core::draw::FontFace::new(
            "Helvetica",
            mxdraw_core::draw::FontVariant::Regular,
            10.0,
        );
        assert_eq!(metrics.advance(&face, 'x'), 5.0);
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.layout().cap_trim(), 1.0);
        assert_eq!(config.style().viewbox_padding(), 0.5);
        assert_eq!(config.text().backend(), FontBackend::System);
        assert!(config.text().glyph_paths());
        assert!(config.text().font_files().is_empty());
        assert_eq!(config.defaults().end_arrow, "classic");
    }
}
