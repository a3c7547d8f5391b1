//! Export of laid out diagrams.
//!
//! # Pipeline Position
//!
//! ```text
//! draw.io document
//!     ↓ parse
//! Diagram
//!     ↓ layout
//! DiagramLayout
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]

/// SVG export backend.
pub mod svg;

use thiserror::Error;

use crate::layout::DiagramLayout;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Writes a laid out diagram in the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_layout(&mut self, layout: &DiagramLayout) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug, Error)]
pub enum Error {
    /// A rendering or conversion failure
    #[error("Render error: {0}")]
    Render(String),

    /// Writing the output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
