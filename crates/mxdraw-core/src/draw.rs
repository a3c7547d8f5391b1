//! Drawing primitives shared by layout and export.
//!
//! - [`StrokeDefinition`] and [`StrokeStyle`] describe lines and borders
//! - [`Path`] is the vector path vocabulary for templates and glyphs
//! - [`ShapeTemplate`] produces outlines for non-rectangular nodes
//! - [`FontMetrics`] is the font capability text layout measures with

mod font;
mod path;
mod shape;
mod stroke;

pub use font::{CosmicMetrics, FixedMetrics, FontFace, FontMetrics, FontVariant, VerticalMetrics};
pub use path::{Path, PathCommand};
pub use shape::{ShapeOutline, ShapeTemplate};
pub use stroke::{StrokeDefinition, StrokeStyle};
