//! Positioned drawing primitives produced by layout.

use mxdraw_core::{
    color::Color,
    draw::{FontFace, Path, ShapeOutline, StrokeDefinition},
    geometry::{Bounds, Point},
    identifier::Id,
    semantic::{ArrowCap, EntityIndex},
};

use crate::error::LayoutError;

/// A filled and stroked rectangle.
#[derive(Debug, Clone)]
pub struct PlacedBox {
    pub(crate) id: Id,
    pub(crate) bounds: Bounds,
    pub(crate) fill: Option<Color>,
    pub(crate) stroke: StrokeDefinition,
    pub(crate) opacity: f32,
}

impl PlacedBox {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// A node drawn with a shape template.
#[derive(Debug, Clone)]
pub struct PlacedShape {
    pub(crate) id: Id,
    pub(crate) bounds: Bounds,
    pub(crate) outline: ShapeOutline,
    pub(crate) fill: Option<Color>,
    pub(crate) stroke: StrokeDefinition,
    pub(crate) opacity: f32,
}

impl PlacedShape {
    pub fn id(&self) -> Id {
        self.id
    }

    /// The node box, which the transformed outline covers
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn outline(&self) -> &ShapeOutline {
        &self.outline
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// A connector with its final polyline.
#[derive(Debug, Clone)]
pub struct RoutedConnector {
    pub(crate) id: Id,
    pub(crate) points: Vec<Point>,
    pub(crate) stroke: StrokeDefinition,
    pub(crate) start_cap: ArrowCap,
    pub(crate) end_cap: ArrowCap,
    pub(crate) bounds: Bounds,
}

impl RoutedConnector {
    pub fn id(&self) -> Id {
        self.id
    }

    /// Polyline from source to target, after cap trimming
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn start_cap(&self) -> ArrowCap {
        self.start_cap
    }

    pub fn end_cap(&self) -> ArrowCap {
        self.end_cap
    }

    /// Extent of the path, padded by half the stroke width
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The polyline as path data
    pub fn to_path(&self) -> Path {
        let mut path = Path::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(*first);
        }
        for point in points {
            path.line_to(*point);
        }
        path
    }
}

/// Consecutive characters of one line sharing face and color.
#[derive(Debug, Clone)]
pub struct PlacedRun {
    pub(crate) text: String,
    pub(crate) face: FontFace,
    pub(crate) origin: Point,
    pub(crate) color: Color,
    pub(crate) outline: Option<Path>,
}

impl PlacedRun {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn face(&self) -> &FontFace {
        &self.face
    }

    /// Baseline start of the run
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Glyph outlines, when the metrics provider supplies them
    pub fn outline(&self) -> Option<&Path> {
        self.outline.as_ref()
    }
}

/// Laid out text of one entity.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub(crate) id: Id,
    pub(crate) runs: Vec<PlacedRun>,
    pub(crate) bounds: Bounds,
}

impl TextBlock {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn runs(&self) -> &[PlacedRun] {
        &self.runs
    }

    /// Extent of the text after the vertical centering correction
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// One drawable primitive.
#[derive(Debug, Clone)]
pub enum SceneItem {
    Box(PlacedBox),
    Shape(PlacedShape),
    Connector(RoutedConnector),
    Text(TextBlock),
}

impl SceneItem {
    pub fn id(&self) -> Id {
        match self {
            Self::Box(item) => item.id,
            Self::Shape(item) => item.id,
            Self::Connector(item) => item.id,
            Self::Text(item) => item.id,
        }
    }

    pub fn as_connector(&self) -> Option<&RoutedConnector> {
        match self {
            Self::Connector(connector) => Some(connector),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// The laid out diagram.
#[derive(Debug, Clone, Default)]
pub struct DiagramLayout {
    pub(crate) items: Vec<(EntityIndex, SceneItem)>,
    pub(crate) bounds: Option<Bounds>,
    pub(crate) failures: Vec<LayoutError>,
}

impl DiagramLayout {
    /// Drawable items in paint order, tagged with the entity they came from
    pub fn items(&self) -> &[(EntityIndex, SceneItem)] {
        &self.items
    }

    /// Union of every item's extent; `None` when nothing is drawn
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Entities that could not be laid out
    pub fn failures(&self) -> &[LayoutError] {
        &self.failures
    }

    /// Items produced for the entity with the given cell id
    pub fn items_for(&self, id: &str) -> impl Iterator<Item = &SceneItem> {
        self.items
            .iter()
            .map(|(_, item)| item)
            .filter(move |item| item.id() == id)
    }

    /// The routed connector with the given cell id
    pub fn connector(&self, id: &str) -> Option<&RoutedConnector> {
        self.items_for(id).find_map(SceneItem::as_connector)
    }
}
