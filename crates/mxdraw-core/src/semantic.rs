//! Diagram entity model.
//!
//! # Pipeline Position
//!
//! ```text
//! draw.io document
//!     ↓ mxdraw-parser
//! Raw cells (raw) - ids, kind, style map, parent-relative geometry
//!     ↓ Diagram::resolve
//! Entities (these types) - typed, absolute coordinates, resolved references
//!     ↓ layout
//! Scene (routed connectors, placed text, node primitives)
//!     ↓ export
//! SVG
//! ```
//!
//! # Organization
//!
//! - [`raw`] - The cells a document reader hands over: [`RawCell`], [`StyleMap`]
//! - [`style`] - [`StyleDefaults`] and typed access to style values
//! - [`entity`] - [`Entity`] and its variants: [`Node`], [`Connector`],
//!   [`ConnectorLabel`], [`StandaloneText`]
//! - [`diagram`] - The [`Diagram`] arena and reference resolution

pub mod diagram;
pub mod entity;
pub mod raw;
pub mod style;

mod error;
mod resolve;

pub use diagram::*;
pub use entity::*;
pub use error::ResolveError;
pub use raw::*;
pub use style::StyleDefaults;
