//! mxdraw - Convert draw.io diagrams into tightly bounded SVG drawings.
//!
//! Reading, connector routing, text layout and rendering of draw.io
//! (`mxfile`) documents. Boxes keep their authored geometry; connectors
//! without explicit waypoints get an orthogonal route, and text is wrapped
//! and placed with the same rules draw.io uses.

pub mod config;

mod error;
mod export;
mod layout;

pub use mxdraw_core::{color, draw, geometry, identifier, semantic};
pub use mxdraw_parser::{PageSelector, ParseError};

pub use error::{ConnectorEnd, LayoutError, MxDrawError};
pub use export::Error as ExportError;
pub use layout::{
    DiagramLayout, PlacedBox, PlacedRun, PlacedShape, RoutedConnector, SceneItem, TextBlock,
};

use log::{debug, info, trace, warn};

use config::AppConfig;
use draw::FontMetrics;
use layout::LayoutEngine;

/// Builder for parsing, laying out and rendering draw.io diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use mxdraw::{DiagramBuilder, PageSelector, config::AppConfig};
///
/// let source = std::fs::read_to_string("diagram.drawio").expect("Failed to read");
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let diagram = builder
///     .parse(&source, &PageSelector::default())
///     .expect("Failed to parse");
/// let svg = builder.render_svg(&diagram).expect("Failed to render");
/// ```
pub struct DiagramBuilder {
    config: AppConfig,
    metrics: Box<dyn FontMetrics>,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// The font metrics provider is the one the text configuration selects.
    pub fn new(config: AppConfig) -> Self {
        let metrics = config.text().metrics();
        Self { config, metrics }
    }

    /// Replaces the font metrics provider.
    ///
    /// # Examples
    ///
    /// ```
    /// use mxdraw::{DiagramBuilder, draw::FixedMetrics};
    ///
    /// let builder = DiagramBuilder::default().with_metrics(FixedMetrics::default());
    /// ```
    pub fn with_metrics(mut self, metrics: impl FontMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse one page of a draw.io document into a resolved diagram.
    ///
    /// # Errors
    ///
    /// Returns `MxDrawError::Parse` for malformed documents or a missing page,
    /// and `MxDrawError::Resolve` for dangling references or parent cycles.
    /// Invalid style values only affect their own entity and surface as
    /// layout failures.
    pub fn parse(
        &self,
        source: &str,
        page: &PageSelector,
    ) -> Result<semantic::Diagram, MxDrawError> {
        info!(page:%; "Parsing diagram");

        let raw = mxdraw_parser::parse_page(source, page)?;
        debug!(page:? = raw.name, cells = raw.cells.len(); "Page read");

        let diagram = semantic::Diagram::resolve(raw.cells, self.config.defaults())?;
        trace!(diagram:?; "Resolved diagram");

        Ok(diagram)
    }

    /// Lay out a resolved diagram.
    ///
    /// Entities that cannot be laid out are reported in
    /// [`DiagramLayout::failures`]; the rest of the diagram is still laid out.
    pub fn layout(&self, diagram: &semantic::Diagram) -> DiagramLayout {
        LayoutEngine::new(self.config.layout(), self.metrics.as_ref()).layout(diagram)
    }

    /// Render a resolved diagram to an SVG string.
    ///
    /// Per-entity layout failures are logged and the affected entities are
    /// left out of the drawing.
    ///
    /// # Errors
    ///
    /// Returns `MxDrawError::Export` if the document cannot be written, for
    /// example because the configured background color is invalid.
    pub fn render_svg(&self, diagram: &semantic::Diagram) -> Result<String, MxDrawError> {
        let layout = self.layout(diagram);
        if !layout.failures().is_empty() {
            warn!(failures = layout.failures().len(); "Some entities were not drawn");
        }

        let svg = export::svg::render_to_string(&layout, self.config.style())?;
        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
