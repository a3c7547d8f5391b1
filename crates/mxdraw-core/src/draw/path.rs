//! Vector paths in diagram coordinates.
//!
//! [`Path`] is the common vocabulary shared by shape templates, glyph
//! outlines and the SVG sink. It is an ordered list of absolute
//! [`PathCommand`]s, serialized to SVG path data with
//! [`Path::to_svg_data`].

use std::fmt::Write;

use crate::geometry::{Bounds, Point};

/// A single absolute path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic bezier with one control point
    QuadTo(Point, Point),
    /// Cubic bezier with two control points
    CubicTo(Point, Point, Point),
    Close,
}

/// An ordered sequence of path commands.
///
/// # Examples
///
/// ```
/// use mxdraw_core::{draw::Path, geometry::Point};
///
/// let mut path = Path::new();
/// path.move_to(Point::new(0.0, 0.0));
/// path.line_to(Point::new(10.0, 0.0));
/// path.close();
/// assert_eq!(path.to_svg_data(), "M0,0 L10,0 Z");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, point: Point) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    pub fn line_to(&mut self, point: Point) {
        self.commands.push(PathCommand::LineTo(point));
    }

    pub fn quad_to(&mut self, control: Point, to: Point) {
        self.commands.push(PathCommand::QuadTo(control, to));
    }

    pub fn cubic_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.commands.push(PathCommand::CubicTo(control1, control2, to));
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Appends every command of `other`, e.g. to join glyph outlines
    pub fn append(&mut self, other: &Path) {
        self.commands.extend_from_slice(&other.commands);
    }

    /// Returns a copy of the path with every point moved by `offset`
    pub fn translate(&self, offset: Point) -> Self {
        let shift = |p: Point| p.add_point(offset);
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(shift(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(shift(p)),
                PathCommand::QuadTo(c, p) => PathCommand::QuadTo(shift(c), shift(p)),
                PathCommand::CubicTo(c1, c2, p) => {
                    PathCommand::CubicTo(shift(c1), shift(c2), shift(p))
                }
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Self { commands }
    }

    /// Bounding box of every on-curve and control point, if the path has any
    /// points at all.
    pub fn control_bounds(&self) -> Option<Bounds> {
        self.commands
            .iter()
            .flat_map(|command| match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
                PathCommand::QuadTo(c, p) => vec![c, p],
                PathCommand::CubicTo(c1, c2, p) => vec![c1, c2, p],
                PathCommand::Close => vec![],
            })
            .fold(None, |acc, p| Some(Bounds::stretch_to_contain(acc, p)))
    }

    /// Serializes the path into SVG path data
    pub fn to_svg_data(&self) -> String {
        let mut data = String::new();
        for (idx, command) in self.commands.iter().enumerate() {
            if idx > 0 {
                data.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = match *command {
                PathCommand::MoveTo(p) => write!(data, "M{},{}", p.x(), p.y()),
                PathCommand::LineTo(p) => write!(data, "L{},{}", p.x(), p.y()),
                PathCommand::QuadTo(c, p) => {
                    write!(data, "Q{},{} {},{}", c.x(), c.y(), p.x(), p.y())
                }
                PathCommand::CubicTo(c1, c2, p) => write!(
                    data,
                    "C{},{} {},{} {},{}",
                    c1.x(),
                    c1.y(),
                    c2.x(),
                    c2.y(),
                    p.x(),
                    p.y()
                ),
                PathCommand::Close => write!(data, "Z"),
            };
        }
        data
    }
}
