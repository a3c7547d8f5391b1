//! Geometric primitives for diagram routing and layout.
//!
//! This module provides the geometry kernel used by every other part of
//! mxdraw: points, sizes, axis-aligned bounding boxes, box sides and the four
//! cardinal directions a box can be oriented in.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate, also used as a free vector
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum coordinates
//! - [`Side`] - One of the four sides of a box, in a fixed enumeration order
//! - [`Direction`] - A cardinal orientation with its rotation angle
//!
//! # Coordinate System
//!
//! mxdraw uses the draw.io coordinate system, which matches SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// A 2D point representing a position in diagram coordinate space.
///
/// Points double as free vectors: they support addition, subtraction,
/// scaling and sign normalization.
///
/// # Examples
///
/// ```
/// # use mxdraw_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum, Point::new(15.0, 25.0));
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid, Point::new(7.5, 12.5));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Reduces each coordinate to its sign: `-1`, `0` or `1`.
    ///
    /// Unlike a unit-length normalization, a diagonal vector keeps both
    /// components at magnitude one.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mxdraw_core::geometry::Point;
    /// assert_eq!(Point::new(-7.0, 0.0).signum(), Point::new(-1.0, 0.0));
    /// assert_eq!(Point::new(3.0, 12.0).signum(), Point::new(1.0, 1.0));
    /// ```
    pub fn signum(self) -> Self {
        fn sign(v: f32) -> f32 {
            if v == 0.0 { 0.0 } else { v.signum() }
        }
        Self {
            x: sign(self.x),
            y: sign(self.y),
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean length of this point treated as a vector
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points
    pub fn distance_to(self, other: Point) -> f32 {
        other.sub_point(self).hypot()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the size with width and height exchanged
    pub fn transpose(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// An axis-aligned box defined by its minimum and maximum coordinates.
///
/// A zero-extent bounds is a valid degenerate box sitting at a single point;
/// this is how a [`Point`] participates in [`Bounds::stretch_to_contain`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from its top-left corner and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Convenience constructor from draw.io style `x, y, width, height`
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new_from_top_left(Point::new(x, y), Size::new(width, height))
    }

    /// Grows `existing` so that it also covers `item`.
    ///
    /// When there is no existing box yet the result is seeded from `item`
    /// alone, so a fold over any sequence of boxes and points can start from
    /// `None`. The result is the smallest box whose edges are the min/max of
    /// the operands' edges; the operation is associative and commutative.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mxdraw_core::geometry::{Bounds, Point};
    /// let first = Bounds::stretch_to_contain(None, Point::new(10.0, 10.0));
    /// assert_eq!(first.width(), 0.0);
    ///
    /// let both = Bounds::stretch_to_contain(Some(first), Bounds::from_xywh(0.0, 0.0, 5.0, 5.0));
    /// assert_eq!(both, Bounds::from_xywh(0.0, 0.0, 10.0, 10.0));
    /// ```
    pub fn stretch_to_contain(existing: Option<Bounds>, item: impl Into<Bounds>) -> Bounds {
        let item = item.into();
        match existing {
            None => item,
            Some(existing) => existing.merge(&item),
        }
    }

    /// Returns the smallest bounds covering both `self` and `other`
    pub fn merge(&self, other: &Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Left edge
    pub fn x(&self) -> f32 {
        self.min_x
    }

    /// Top edge
    pub fn y(&self) -> f32 {
        self.min_y
    }

    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner
    pub fn min_point(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Returns the bottom-right corner
    pub fn max_point(&self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    pub fn center(&self) -> Point {
        self.min_point().midpoint(self.max_point())
    }

    pub fn to_size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns the bounds moved by `offset`
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Returns the bounds grown by `dx` on the left and right and by `dy` on
    /// the top and bottom
    pub fn expand(&self, dx: f32, dy: f32) -> Self {
        Self {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Checks whether a point lies inside or on the border of the bounds
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Returns the same box with width and height exchanged, keeping its center.
    pub fn transpose_about_center(&self) -> Self {
        Self::new_from_center(self.center(), self.to_size().transpose())
    }

    /// Returns the center point of one side of the box
    pub fn side_center(&self, side: Side) -> Point {
        let center = self.center();
        match side {
            Side::Left => Point::new(self.min_x, center.y),
            Side::Right => Point::new(self.max_x, center.y),
            Side::Top => Point::new(center.x, self.min_y),
            Side::Bottom => Point::new(center.x, self.max_y),
        }
    }

    /// Returns the four side-center points in [`Side::ALL`] order
    pub fn side_centers(&self) -> [(Side, Point); 4] {
        Side::ALL.map(|side| (side, self.side_center(side)))
    }

    /// Finds the side whose center point is nearest to `point`.
    ///
    /// Ties are resolved in favor of the side that comes first in
    /// [`Side::ALL`].
    pub fn closest_side(&self, point: Point) -> (Side, Point) {
        let mut best = (Side::Left, self.side_center(Side::Left));
        let mut best_distance = point.distance_to(best.1);
        for (side, center) in self.side_centers().into_iter().skip(1) {
            let distance = point.distance_to(center);
            if distance < best_distance {
                best = (side, center);
                best_distance = distance;
            }
        }
        best
    }
}

impl From<Point> for Bounds {
    fn from(point: Point) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }
}

/// One of the four sides of a box.
///
/// The declaration order is significant: it is the tie-break order for every
/// "closest side" query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// All sides in enumeration (tie-break) order
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    /// Returns true for the left and right sides
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Returns the side across the box from this one
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    /// Outward unit normal of the side
    pub fn normal(self) -> Point {
        match self {
            Self::Left => Point::new(-1.0, 0.0),
            Self::Right => Point::new(1.0, 0.0),
            Self::Top => Point::new(0.0, -1.0),
            Self::Bottom => Point::new(0.0, 1.0),
        }
    }
}

/// A cardinal orientation of a box.
///
/// A direction carries a fixed rotation angle and the rule for remapping a
/// fractional anchor expressed against the box's own (rotated) axes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    East,
    South,
    West,
    North,
}

impl Direction {
    /// Rotation angle in degrees
    pub fn rotation_angle(self) -> f32 {
        match self {
            Self::East => 0.0,
            Self::South => 270.0,
            Self::West => 180.0,
            Self::North => 90.0,
        }
    }

    /// Returns true when the direction turns the box on its side, exchanging
    /// width and height.
    pub fn swaps_extent(self) -> bool {
        matches!(self, Self::North | Self::South)
    }

    /// Maps a fractional anchor `(x, y)` in the box's local axes to
    /// unrotated fractions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mxdraw_core::geometry::Direction;
    /// assert_eq!(Direction::East.remap_fraction(0.25, 0.75), (0.25, 0.75));
    /// assert_eq!(Direction::South.remap_fraction(0.25, 0.75), (0.75, 0.25));
    /// assert_eq!(Direction::West.remap_fraction(0.25, 0.75), (0.75, 0.75));
    /// assert_eq!(Direction::North.remap_fraction(0.25, 0.75), (0.75, 0.75));
    /// ```
    pub fn remap_fraction(self, x: f32, y: f32) -> (f32, f32) {
        match self {
            Self::East => (x, y),
            Self::South => (y, x),
            Self::West => (1.0 - x, y),
            Self::North => (y, 1.0 - x),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "east" => Ok(Self::East),
            "south" => Ok(Self::South),
            "west" => Ok(Self::West),
            "north" => Ok(Self::North),
            _ => Err(format!(
                "invalid direction `{s}`, valid values: east, south, west, north"
            )),
        }
    }
}
