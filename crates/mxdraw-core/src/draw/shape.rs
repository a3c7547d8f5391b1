//! Outline templates for non-rectangular node shapes.
//!
//! A template is authored for an east-facing box. [`ShapeTemplate::outline`]
//! scales it to a node's box and reports the rotation and mirroring the sink
//! must apply about the outline's own center.

use crate::{
    draw::Path,
    geometry::{Bounds, Direction, Point},
};

/// Horizontal extent of the brace's curl; the straight arms take the rest.
const CURLY_WIDTH: f32 = 20.0;

/// Shape templates with a known outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeTemplate {
    /// draw.io `curlyBracket`: two hooked ends meeting a pointed middle
    CurlyBrace,
}

impl ShapeTemplate {
    /// Looks up a template by its draw.io `shape` style value
    pub fn from_style_name(name: &str) -> Option<Self> {
        match name {
            "curlyBracket" => Some(Self::CurlyBrace),
            _ => None,
        }
    }

    /// Produces the outline of this template for a node box.
    ///
    /// North and south facing boxes are turned on their side first: width
    /// and height are exchanged about the original center, so that after the
    /// rotation the outline covers the node's box again.
    ///
    /// The template is authored mirrored relative to draw.io's own rendering,
    /// so the outline is mirrored unless the node is flipped.
    pub fn outline(
        self,
        bounds: Bounds,
        direction: Direction,
        rotation: f32,
        flip_h: bool,
    ) -> ShapeOutline {
        let frame = if direction.swaps_extent() {
            bounds.transpose_about_center()
        } else {
            bounds
        };
        let path = match self {
            Self::CurlyBrace => curly_brace(frame),
        };
        ShapeOutline {
            path,
            frame,
            rotation: direction.rotation_angle() + rotation,
            mirror: !flip_h,
        }
    }
}

/// A template scaled to a box, plus the transform to apply about its center.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeOutline {
    path: Path,
    frame: Bounds,
    rotation: f32,
    mirror: bool,
}

impl ShapeOutline {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The box the path was generated in, before rotation
    pub fn frame(&self) -> Bounds {
        self.frame
    }

    /// Rotation in degrees about the frame center
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Whether the outline is mirrored horizontally about the frame center
    pub fn mirror(&self) -> bool {
        self.mirror
    }
}

fn curly_brace(frame: Bounds) -> Path {
    let x = frame.x();
    let y = frame.y();
    let right = frame.max_x();
    let bottom = frame.max_y();
    let center_y = frame.center().y();
    let curly_left = x + (frame.width() - CURLY_WIDTH) / 2.0;
    let curly_right = curly_left + CURLY_WIDTH;

    let mut path = Path::new();
    path.move_to(Point::new(x, bottom));
    path.line_to(Point::new(curly_left, bottom));
    path.cubic_to(
        Point::new(curly_right, bottom),
        Point::new(curly_left, center_y),
        Point::new(curly_right, center_y),
    );
    path.line_to(Point::new(right, center_y));
    path.move_to(Point::new(curly_right, center_y));
    path.cubic_to(
        Point::new(curly_left, center_y),
        Point::new(curly_right, y),
        Point::new(curly_left, y),
    );
    path.line_to(Point::new(x, y));
    // The trailing subpath is empty so the brace stays open.
    path.move_to(Point::new(x, bottom));
    path.close();
    path
}
