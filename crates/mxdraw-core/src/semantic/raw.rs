//! Raw cells as read from a draw.io document.
//!
//! A [`RawCell`] carries exactly what the document says: parent-relative
//! geometry, unresolved id references and the untyped style map. Turning
//! these into entities is the job of [`Diagram::resolve`](crate::semantic::Diagram::resolve).

use indexmap::IndexMap;

use crate::{geometry::Point, identifier::Id};

/// The kind discriminant of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Structural root and layer cells, never drawn
    Layer,
    Vertex,
    Text,
    Edge,
    EdgeLabel,
}

/// A cell's `key=value;` style attributes, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap(IndexMap<String, String>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key, replacing any earlier value while keeping its position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// The `<mxGeometry>` of a cell, relative to its parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGeometry {
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Set for geometries expressed relative to the parent, such as edge
    /// labels positioned along their edge
    pub relative: bool,
    pub source_point: Option<Point>,
    pub target_point: Option<Point>,
    pub offset: Option<Point>,
    /// Explicit interior waypoints of an edge
    pub points: Vec<Point>,
}

impl RawGeometry {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }
}

/// One `<mxCell>` of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCell {
    pub id: Id,
    pub value: String,
    pub kind: CellKind,
    pub style: StyleMap,
    pub parent: Option<Id>,
    pub source: Option<Id>,
    pub target: Option<Id>,
    pub geometry: Option<RawGeometry>,
}

impl RawCell {
    /// Creates a cell with an empty value and style and no references
    pub fn new(id: &str, kind: CellKind) -> Self {
        Self {
            id: Id::new(id),
            value: String::new(),
            kind,
            style: StyleMap::new(),
            parent: None,
            source: None,
            target: None,
            geometry: None,
        }
    }
}
