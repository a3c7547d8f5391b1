//! SVG export backend.
//!
//! [`SvgBuilder`] configures an [`Svg`] exporter over any [`io::Write`]
//! target. Items are written in the layout's paint order; arrow markers are
//! collected while rendering and emitted once per stroke color.

mod item;
mod marker;

use std::io::{self, Write};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use mxdraw_core::{color::Color, geometry::Bounds};

use crate::{
    config::StyleConfig,
    export::{self, Exporter},
    layout::DiagramLayout,
};
use marker::MarkerSet;

/// Builder for [`Svg`] exporters.
pub struct SvgBuilder<'a, W> {
    output: W,
    style: Option<&'a StyleConfig>,
}

impl<'a, W: Write> SvgBuilder<'a, W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            style: None,
        }
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// Creates the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if the configured background color
    /// cannot be parsed.
    pub fn build(self) -> Result<Svg<W>, export::Error> {
        let default_style = StyleConfig::default();
        let style = self.style.unwrap_or(&default_style);
        let background_color = style.background_color().map_err(export::Error::Render)?;
        Ok(Svg {
            output: self.output,
            background_color,
            padding: style.viewbox_padding(),
            markers: MarkerSet::default(),
        })
    }
}

/// SVG exporter writing one document per exported layout.
pub struct Svg<W> {
    output: W,
    background_color: Option<Color>,
    padding: f32,
    markers: MarkerSet,
}

impl<W: Write> Svg<W> {
    /// Renders a layout into an SVG document.
    pub fn render_layout(&mut self, layout: &DiagramLayout) -> Document {
        let view_box = layout
            .bounds()
            .map(|bounds| bounds.expand(self.padding, self.padding))
            .unwrap_or_default();
        debug!(view_box:?; "SVG view box");

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    view_box.min_x(),
                    view_box.min_y(),
                    view_box.width(),
                    view_box.height()
                ),
            )
            .set("width", view_box.width())
            .set("height", view_box.height());

        if let Some(color) = self.background_color {
            doc = doc.add(background(view_box, color));
        }

        let mut content = svg_element::Group::new();
        for (_, scene_item) in layout.items() {
            content = content.add(item::render(scene_item, &mut self.markers));
        }

        doc.add(self.markers.definitions()).add(content)
    }

    fn write_document(&mut self, doc: &Document) -> Result<(), export::Error> {
        if let Err(err) = svg::write(&mut self.output, doc) {
            error!(err:%; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }
        self.output.flush().map_err(export::Error::Io)
    }
}

impl<W: Write> Exporter for Svg<W> {
    fn export_layout(&mut self, layout: &DiagramLayout) -> Result<(), export::Error> {
        let doc = self.render_layout(layout);
        debug!("SVG document rendered");
        self.write_document(&doc)?;
        info!("SVG document written");
        Ok(())
    }
}

fn background(view_box: Bounds, color: Color) -> svg_element::Rectangle {
    svg_element::Rectangle::new()
        .set("x", view_box.min_x())
        .set("y", view_box.min_y())
        .set("width", view_box.width())
        .set("height", view_box.height())
        .set("fill", color.to_string())
        .set("fill-opacity", color.alpha())
}

/// Renders a layout into an in-memory SVG string.
pub(crate) fn render_to_string(
    layout: &DiagramLayout,
    style: &StyleConfig,
) -> Result<String, export::Error> {
    let mut buffer = Vec::new();
    SvgBuilder::new(&mut buffer)
        .with_style(style)
        .build()?
        .export_layout(layout)?;
    String::from_utf8(buffer)
        .map_err(|err| export::Error::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_layout_is_zero_sized() {
        let svg = render_to_string(&DiagramLayout::default(), &StyleConfig::default()).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 0 0""#));
        assert!(svg.contains(r#"width="0""#));
        assert!(svg.contains(r#"height="0""#));
    }

    #[test]
    fn test_background_rect_covers_view_box() {
        let style = StyleConfig::new(Some("#ffffff".to_string()), 0.5);
        let svg = render_to_string(&DiagramLayout::default(), &style).unwrap();
        assert!(svg.contains("<rect"));
    }

    #[test]
    fn test_invalid_background_color() {
        let style = StyleConfig::new(Some("nope".to_string()), 0.5);
        let result = SvgBuilder::new(Vec::new()).with_style(&style).build();
        assert!(matches!(result, Err(export::Error::Render(_))));
    }
}
