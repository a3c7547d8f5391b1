//! Typed diagram entities.
//!
//! Every drawable thing in a diagram is one variant of [`Entity`]. Links
//! between entities (a node's parent, a connector's endpoint nodes, a
//! label's connector) are [`EntityIndex`] values into the owning
//! [`Diagram`](crate::semantic::Diagram), never references.

use std::fmt;

use crate::{
    color::Color,
    draw::{FontFace, FontVariant, ShapeTemplate, StrokeDefinition},
    geometry::{Bounds, Direction, Point},
    identifier::Id,
};

/// Position of an entity in its diagram's paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityIndex(usize);

impl EntityIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A diagram entity.
#[derive(Debug, Clone)]
pub enum Entity {
    Node(Node),
    Connector(Connector),
    Label(ConnectorLabel),
    Text(StandaloneText),
}

impl Entity {
    pub fn id(&self) -> Id {
        match self {
            Self::Node(node) => node.id,
            Self::Connector(connector) => connector.id,
            Self::Label(label) => label.id,
            Self::Text(text) => text.id,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_connector(&self) -> Option<&Connector> {
        match self {
            Self::Connector(connector) => Some(connector),
            _ => None,
        }
    }
}

/// Where a text block sits relative to its owning box, along one axis.
///
/// Horizontally the draw.io values are `left`, `center` and `right`;
/// vertically `top`, `middle` and `bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutsidePosition {
    Before,
    Centered,
    After,
}

impl OutsidePosition {
    pub fn from_horizontal(value: &str) -> Result<Self, String> {
        match value {
            "left" => Ok(Self::Before),
            "center" => Ok(Self::Centered),
            "right" => Ok(Self::After),
            _ => Err(format!(
                "invalid label position `{value}`, valid values: left, center, right"
            )),
        }
    }

    pub fn from_vertical(value: &str) -> Result<Self, String> {
        match value {
            "top" => Ok(Self::Before),
            "middle" => Ok(Self::Centered),
            "bottom" => Ok(Self::After),
            _ => Err(format!(
                "invalid vertical label position `{value}`, valid values: top, middle, bottom"
            )),
        }
    }
}

/// How a line is aligned inside its box, along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsideAlign {
    Start,
    Center,
    End,
}

impl InsideAlign {
    pub fn from_horizontal(value: &str) -> Result<Self, String> {
        match value {
            "left" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::End),
            _ => Err(format!(
                "invalid align `{value}`, valid values: left, center, right"
            )),
        }
    }

    pub fn from_vertical(value: &str) -> Result<Self, String> {
        match value {
            "top" => Ok(Self::Start),
            "middle" => Ok(Self::Center),
            "bottom" => Ok(Self::End),
            _ => Err(format!(
                "invalid vertical align `{value}`, valid values: top, middle, bottom"
            )),
        }
    }
}

/// Typography and alignment of an entity's text.
///
/// Alignment values are kept as written; they are validated when the text
/// is laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    family: String,
    size_px: f32,
    font_color: Option<Color>,
    stroke_color: Color,
    bold: bool,
    italic: bool,
    formatted: bool,
    align: String,
    vertical_align: String,
    label_position: String,
    vertical_label_position: String,
}

impl TextStyle {
    /// Creates a plain style: centered inside and on the box, regular
    /// variant, no markup.
    pub fn new(family: impl Into<String>, size_px: f32, stroke_color: Color) -> Self {
        Self {
            family: family.into(),
            size_px,
            font_color: None,
            stroke_color,
            bold: false,
            italic: false,
            formatted: false,
            align: "center".to_string(),
            vertical_align: "middle".to_string(),
            label_position: "center".to_string(),
            vertical_label_position: "middle".to_string(),
        }
    }

    pub fn with_font_color(mut self, color: Option<Color>) -> Self {
        self.font_color = color;
        self
    }

    pub fn with_variant_flags(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }

    pub fn with_formatted(mut self, formatted: bool) -> Self {
        self.formatted = formatted;
        self
    }

    /// Sets the inside alignment (`align`, `verticalAlign`)
    pub fn with_alignment(mut self, align: &str, vertical_align: &str) -> Self {
        self.align = align.to_string();
        self.vertical_align = vertical_align.to_string();
        self
    }

    /// Sets the outside position (`labelPosition`, `verticalLabelPosition`)
    pub fn with_label_position(mut self, position: &str, vertical_position: &str) -> Self {
        self.label_position = position.to_string();
        self.vertical_label_position = vertical_position.to_string();
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// The face the entity's own style selects
    pub fn face(&self) -> FontFace {
        FontFace::new(
            self.family.clone(),
            FontVariant::from_flags(self.bold, self.italic),
            self.size_px,
        )
    }

    /// Explicit `fontColor`, if any
    pub fn font_color(&self) -> Option<Color> {
        self.font_color
    }

    /// Color used when neither the markup nor `fontColor` sets one
    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    /// Whether the value is rich-text markup rather than plain text
    pub fn formatted(&self) -> bool {
        self.formatted
    }

    pub fn align(&self) -> &str {
        &self.align
    }

    pub fn vertical_align(&self) -> &str {
        &self.vertical_align
    }

    pub fn label_position(&self) -> &str {
        &self.label_position
    }

    pub fn vertical_label_position(&self) -> &str {
        &self.vertical_label_position
    }
}

/// The outline a node is drawn with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeShape {
    Rectangle,
    Template(ShapeTemplate),
    /// A `shape` value no outline exists for; drawing the node fails
    Unsupported(String),
}

/// A box entity.
#[derive(Debug, Clone)]
pub struct Node {
    pub(super) id: Id,
    pub(super) label: Option<String>,
    pub(super) bounds: Option<Bounds>,
    pub(super) fill: Option<Color>,
    pub(super) stroke: StrokeDefinition,
    pub(super) opacity: f32,
    pub(super) shape: NodeShape,
    pub(super) direction: Direction,
    pub(super) rotation: f32,
    pub(super) flip_h: bool,
    pub(super) text_style: TextStyle,
    pub(super) parent: Option<EntityIndex>,
    pub(super) is_group: bool,
}

impl Node {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Absolute box, absent for structural cells without geometry
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// Opacity between 0 and 1
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn shape(&self) -> &NodeShape {
        &self.shape
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Extra rotation in degrees on top of the direction
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn flip_h(&self) -> bool {
        self.flip_h
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    /// The parent node, used for coordinate resolution only
    pub fn parent(&self) -> Option<EntityIndex> {
        self.parent
    }

    /// Group nodes are structural and never drawn
    pub fn is_group(&self) -> bool {
        self.is_group
    }

    /// Maps a fractional anchor on this node to an absolute point, honoring
    /// the node's direction.
    pub fn anchor_point(&self, fraction_x: f32, fraction_y: f32) -> Option<Point> {
        let bounds = self.bounds?;
        let (fx, fy) = self.direction.remap_fraction(fraction_x, fraction_y);
        Some(Point::new(
            bounds.x() + bounds.width() * fx,
            bounds.y() + bounds.height() * fy,
        ))
    }
}

/// One end of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    /// A point in absolute coordinates
    Free(Point),
    /// A node, optionally with a fractional anchor in `[0, 1] × [0, 1]`.
    /// Without an anchor the side is picked automatically.
    Node {
        node: EntityIndex,
        anchor: Option<(f32, f32)>,
    },
}

/// Decoration at one end of a connector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArrowCap {
    #[default]
    None,
    /// Filled arrowhead
    Classic,
}

/// An edge entity.
#[derive(Debug, Clone)]
pub struct Connector {
    pub(super) id: Id,
    pub(super) label: Option<String>,
    pub(super) source: Option<Endpoint>,
    pub(super) target: Option<Endpoint>,
    pub(super) waypoints: Vec<Point>,
    pub(super) stroke: StrokeDefinition,
    pub(super) start_cap: ArrowCap,
    pub(super) end_cap: ArrowCap,
    pub(super) text_style: TextStyle,
}

impl Connector {
    pub fn id(&self) -> Id {
        self.id
    }

    /// The edge's own value, drawn at the middle of the path
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn source(&self) -> Option<Endpoint> {
        self.source
    }

    pub fn target(&self) -> Option<Endpoint> {
        self.target
    }

    /// Explicit interior points in absolute coordinates
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
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

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }
}

/// How a connector label is positioned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelPlacement {
    /// A box in absolute coordinates
    Absolute(Bounds),
    /// A point along a connector's routed path
    Relative {
        connector: EntityIndex,
        /// Path percentage from −1 (first point) to 1 (last point)
        position: f32,
        /// Orthogonal distance from the path, positive to the clockwise side
        distance: f32,
        offset: Point,
    },
}

/// A text entity attached to a connector.
#[derive(Debug, Clone)]
pub struct ConnectorLabel {
    pub(super) id: Id,
    pub(super) text: String,
    pub(super) text_style: TextStyle,
    pub(super) placement: LabelPlacement,
}

impl ConnectorLabel {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    pub fn placement(&self) -> LabelPlacement {
        self.placement
    }
}

/// A free text box.
#[derive(Debug, Clone)]
pub struct StandaloneText {
    pub(super) id: Id,
    pub(super) text: String,
    pub(super) bounds: Bounds,
    pub(super) text_style: TextStyle,
}

impl StandaloneText {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Absolute box; width may be zero, which disables wrapping
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }
}
