//! Connector routing.
//!
//! A connector is routed in a fixed sequence of steps:
//!
//! 1. Resolve the target anchor when it is constrained (a free point, or a
//!    node with a fractional anchor).
//! 2. Resolve the source anchor the same way.
//! 3. Pick a side center for every unconstrained end. The target goes
//!    first, choosing the side nearest the source anchor, or when the source
//!    is unconstrained too, the nearest pair of side centers of both nodes.
//!    The source then chooses the side nearest the target anchor.
//! 4. Synthesize interior points when both ends sit on nodes and the
//!    connector has no explicit waypoints.
//! 5. Add the anchors at both ends unless the path already ends there.
//! 6. Pull back each end carrying an arrowhead so the marker tip lands on
//!    the anchor.
//! 7. Accumulate the bounds, padded by half the stroke width.

use log::debug;

use mxdraw_core::{
    geometry::{Bounds, Point, Side},
    semantic::{ArrowCap, Connector, Diagram, Endpoint},
};

use super::scene::RoutedConnector;
use crate::{
    config::LayoutConfig,
    error::{ConnectorEnd, LayoutError},
};

/// An endpoint reduced as far as its own specification allows.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Anchor {
    /// A concrete point; `side` is set when it lies on a node
    Fixed { point: Point, side: Option<Side> },
    /// A node whose side is still to be chosen
    Pending(Bounds),
}

/// A resolved anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Resolved {
    point: Point,
    /// The node side the anchor sits on, `None` for free points
    side: Option<Side>,
}

/// Routes connectors against the resolved nodes of a diagram.
pub(crate) struct Router<'a> {
    diagram: &'a Diagram,
    margin: f32,
    cap_trim: f32,
}

impl<'a> Router<'a> {
    pub(crate) fn new(diagram: &'a Diagram, config: &LayoutConfig) -> Self {
        Self {
            diagram,
            margin: config.margin(),
            cap_trim: config.cap_trim(),
        }
    }

    pub(crate) fn route(&self, connector: &Connector) -> Result<RoutedConnector, LayoutError> {
        let target = self.anchor(connector, connector.target(), ConnectorEnd::Target)?;
        let source = self.anchor(connector, connector.source(), ConnectorEnd::Source)?;

        let target = match (target, source) {
            (Anchor::Fixed { point, side }, _) => Resolved { point, side },
            (Anchor::Pending(bounds), Anchor::Fixed { point, .. }) => nearest_side(bounds, point),
            (Anchor::Pending(bounds), Anchor::Pending(other)) => nearest_pair(bounds, other),
        };
        let source = match source {
            Anchor::Fixed { point, side } => Resolved { point, side },
            Anchor::Pending(bounds) => nearest_side(bounds, target.point),
        };

        let mut points = if !connector.waypoints().is_empty() {
            connector.waypoints().to_vec()
        } else if let (Some(source_side), Some(target_side)) = (source.side, target.side) {
            let interior = self.synthesize(source.point, source_side, target.point, target_side);
            if source_side == target_side {
                debug!(
                    connector:% = connector.id(),
                    side:? = source_side;
                    "Connector leaves and enters the same side, routing margins only"
                );
            }
            interior
        } else {
            Vec::new()
        };

        if points.last() != Some(&target.point) {
            points.push(target.point);
        }
        if points.first() != Some(&source.point) {
            points.insert(0, source.point);
        }

        self.trim_caps(&mut points, connector.start_cap(), connector.end_cap());

        let half_width = connector.stroke().width() / 2.0;
        let bounds = points
            .iter()
            .fold(None, |bounds, point| {
                Some(Bounds::stretch_to_contain(
                    bounds,
                    Bounds::from(*point).expand(half_width, half_width),
                ))
            })
            .unwrap_or_default();

        debug!(connector:% = connector.id(), points = points.len(); "Routed connector");
        Ok(RoutedConnector {
            id: connector.id(),
            points,
            stroke: connector.stroke().clone(),
            start_cap: connector.start_cap(),
            end_cap: connector.end_cap(),
            bounds,
        })
    }

    fn anchor(
        &self,
        connector: &Connector,
        endpoint: Option<Endpoint>,
        end: ConnectorEnd,
    ) -> Result<Anchor, LayoutError> {
        let unresolved = || LayoutError::UnresolvedEndpoint {
            connector: connector.id(),
            end,
        };
        match endpoint.ok_or_else(unresolved)? {
            Endpoint::Free(point) => Ok(Anchor::Fixed { point, side: None }),
            Endpoint::Node { node, anchor } => {
                let node = self.diagram.node(node).ok_or_else(unresolved)?;
                let bounds = node.bounds().ok_or_else(unresolved)?;
                match anchor {
                    Some((fx, fy)) => {
                        let point = node.anchor_point(fx, fy).ok_or_else(unresolved)?;
                        Ok(Anchor::Fixed {
                            point,
                            side: Some(bounds.closest_side(point).0),
                        })
                    }
                    None => Ok(Anchor::Pending(bounds)),
                }
            }
        }
    }

    /// Interior points between two node anchors.
    fn synthesize(
        &self,
        source: Point,
        source_side: Side,
        target: Point,
        target_side: Side,
    ) -> Vec<Point> {
        let source_margin = source.add_point(source_side.normal().scale(self.margin));
        let target_margin = target.add_point(target_side.normal().scale(self.margin));

        if source_side == target_side {
            return vec![source_margin, target_margin];
        }

        if source_side.opposite() == target_side {
            let mid = source_margin.midpoint(target_margin);
            let jog = if source_side.is_horizontal() {
                (source_margin.y() != target_margin.y()).then(|| {
                    [
                        Point::new(mid.x(), source_margin.y()),
                        Point::new(mid.x(), target_margin.y()),
                    ]
                })
            } else {
                (source_margin.x() != target_margin.x()).then(|| {
                    [
                        Point::new(source_margin.x(), mid.y()),
                        Point::new(target_margin.x(), mid.y()),
                    ]
                })
            };
            let mut points = vec![source_margin];
            points.extend(jog.into_iter().flatten());
            points.push(target_margin);
            return points;
        }

        let elbow = if source_side.is_horizontal() {
            Point::new(target_margin.x(), source_margin.y())
        } else {
            Point::new(source_margin.x(), target_margin.y())
        };
        vec![source_margin, elbow, target_margin]
    }

    fn trim_caps(&self, points: &mut [Point], start: ArrowCap, end: ArrowCap) {
        let len = points.len();
        if len < 2 {
            return;
        }
        if start == ArrowCap::Classic {
            let step = points[1].sub_point(points[0]).signum().scale(self.cap_trim);
            points[0] = points[0].add_point(step);
        }
        if end == ArrowCap::Classic {
            let step = points[len - 1]
                .sub_point(points[len - 2])
                .signum()
                .scale(self.cap_trim);
            points[len - 1] = points[len - 1].sub_point(step);
        }
    }
}

fn nearest_side(bounds: Bounds, reference: Point) -> Resolved {
    let (side, point) = bounds.closest_side(reference);
    Resolved {
        point,
        side: Some(side),
    }
}

/// Side center of `bounds` belonging to the closest pair of side centers
/// between `bounds` and `other`; earlier sides win ties.
fn nearest_pair(bounds: Bounds, other: Bounds) -> Resolved {
    let mut best: Option<(f32, Side, Point)> = None;
    for (side, point) in bounds.side_centers() {
        for (_, other_point) in other.side_centers() {
            let distance = point.distance_to(other_point);
            if best.is_none_or(|(best_distance, _, _)| distance < best_distance) {
                best = Some((distance, side, point));
            }
        }
    }
    let (side, point) = best
        .map(|(_, side, point)| (side, point))
        .unwrap_or_else(|| bounds.closest_side(other.center()));
    Resolved {
        point,
        side: Some(side),
    }
}
