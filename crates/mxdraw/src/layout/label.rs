//! Placement of connector labels along routed paths.

use mxdraw_core::geometry::{Bounds, Point};

/// Anchor of a label on a polyline.
///
/// `position` runs from −1 at the first point to 1 at the last, measured by
/// arc length. The anchor is then moved `distance` along the clockwise
/// normal of the segment it falls on, and finally by `offset`. The result
/// is a zero-sized box, so the label's text centers on it.
pub(crate) fn anchor_on_path(
    points: &[Point],
    position: f32,
    distance: f32,
    offset: Point,
) -> Option<Bounds> {
    let first = *points.first()?;
    let fraction = ((position.clamp(-1.0, 1.0) + 1.0) / 2.0).clamp(0.0, 1.0);

    let total: f32 = points
        .windows(2)
        .map(|pair| pair[0].distance_to(pair[1]))
        .sum();

    let mut along = (first, Point::new(1.0, 0.0));
    let mut remaining = total * fraction;
    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let length = start.distance_to(end);
        if length == 0.0 {
            continue;
        }
        let direction = end.sub_point(start).scale(1.0 / length);
        along = (end, direction);
        if remaining <= length {
            along = (start.add_point(direction.scale(remaining)), direction);
            break;
        }
        remaining -= length;
    }

    let (point, direction) = along;
    let normal = Point::new(-direction.y(), direction.x());
    let anchor = point.add_point(normal.scale(distance)).add_point(offset);
    Some(Bounds::from(anchor))
}
