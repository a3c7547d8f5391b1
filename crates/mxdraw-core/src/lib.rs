//! mxdraw Core Types and Definitions
//!
//! This crate provides the foundational types for converting draw.io diagrams
//! into vector drawings. It includes:
//!
//! - **Identifiers**: Efficient string-interned cell identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, boxes, sides and directions ([`geometry`] module)
//! - **Draw**: Strokes, paths, shape templates and font metrics ([`draw`] module)
//! - **Semantic**: The diagram entity model and reference resolution ([`semantic`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod semantic;
