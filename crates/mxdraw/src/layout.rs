//! Layout of a resolved diagram into drawable primitives.
//!
//! # Pipeline Position
//!
//! ```text
//! Diagram (absolute entities)
//!     ↓ layout (this module)
//! DiagramLayout (routed connectors, placed text, node primitives)
//!     ↓ export
//! SVG
//! ```
//!
//! Connectors are routed before anything else, since relative labels are
//! positioned along their connector's final path. Everything else is laid
//! out in paint order. An entity that cannot be laid out is recorded in
//! [`DiagramLayout::failures`] and skipped; the rest of the diagram is
//! unaffected.

mod connector;
mod label;
mod scene;
mod text;

pub use scene::*;

use std::collections::HashMap;

use log::{debug, info, warn};

use mxdraw_core::{
    draw::FontMetrics,
    geometry::{Bounds, Point},
    identifier::Id,
    semantic::{
        Connector, ConnectorLabel, Diagram, Entity, EntityIndex, LabelPlacement, Node, NodeShape,
        StandaloneText, TextStyle,
    },
};

use crate::{config::LayoutConfig, error::LayoutError};
use connector::Router;
use text::TextLayouter;

/// Lays out every entity of a diagram.
pub(crate) struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    metrics: &'a dyn FontMetrics,
}

impl<'a> LayoutEngine<'a> {
    pub(crate) fn new(config: &'a LayoutConfig, metrics: &'a dyn FontMetrics) -> Self {
        Self { config, metrics }
    }

    pub(crate) fn layout(&self, diagram: &Diagram) -> DiagramLayout {
        let router = Router::new(diagram, self.config);
        let texts = TextLayouter::new(self.metrics);
        let mut output = DiagramLayout::default();

        let mut routes: HashMap<EntityIndex, RoutedConnector> = HashMap::new();
        for (idx, entity) in diagram.iter() {
            if diagram.style_error(idx).is_some() {
                continue;
            }
            if let Entity::Connector(connector) = entity {
                match router.route(connector) {
                    Ok(route) => {
                        routes.insert(idx, route);
                    }
                    Err(err) => output.record_failure(err),
                }
            }
        }
        debug!(routed = routes.len(); "Connectors routed");

        for (idx, entity) in diagram.iter() {
            if let Some(err) = diagram.style_error(idx) {
                output.record_failure(LayoutError::InvalidStyle(err.clone()));
                continue;
            }
            let items = match entity {
                Entity::Node(node) => self.layout_node(&texts, node),
                Entity::Connector(connector) => match routes.get(&idx) {
                    Some(route) => self.layout_connector(&texts, connector, route.clone()),
                    None => continue,
                },
                Entity::Label(label) => self.layout_label(&texts, diagram, &routes, label),
                Entity::Text(text) => layout_text(&texts, text),
            };
            match items {
                Ok(items) => {
                    for item in items {
                        output.push(idx, item);
                    }
                }
                Err(err) => output.record_failure(err),
            }
        }

        info!(
            items = output.items.len(),
            failures = output.failures.len();
            "Diagram laid out"
        );
        output
    }

    fn layout_node(
        &self,
        texts: &TextLayouter<'_>,
        node: &Node,
    ) -> Result<Vec<SceneItem>, LayoutError> {
        let Some(bounds) = node.bounds() else {
            return Ok(Vec::new());
        };
        if node.is_group() {
            return Ok(Vec::new());
        }

        let body = match node.shape() {
            NodeShape::Rectangle => SceneItem::Box(PlacedBox {
                id: node.id(),
                bounds,
                fill: node.fill(),
                stroke: node.stroke().clone(),
                opacity: node.opacity(),
            }),
            NodeShape::Template(template) => SceneItem::Shape(PlacedShape {
                id: node.id(),
                bounds,
                outline: template.outline(
                    bounds,
                    node.direction(),
                    node.rotation(),
                    node.flip_h(),
                ),
                fill: node.fill(),
                stroke: node.stroke().clone(),
                opacity: node.opacity(),
            }),
            NodeShape::Unsupported(shape) => {
                return Err(LayoutError::UnsupportedShape {
                    node: node.id(),
                    shape: shape.clone(),
                });
            }
        };

        let mut items = vec![body];
        if let Some(label) = node.label() {
            let block = texts.layout(node.id(), label, node.text_style(), bounds)?;
            items.extend(block.map(SceneItem::Text));
        }
        Ok(items)
    }

    fn layout_connector(
        &self,
        texts: &TextLayouter<'_>,
        connector: &Connector,
        route: RoutedConnector,
    ) -> Result<Vec<SceneItem>, LayoutError> {
        let label = match connector.label() {
            Some(label) => {
                let anchor = label::anchor_on_path(route.points(), 0.0, 0.0, Point::default());
                match anchor {
                    Some(frame) => texts.layout(
                        connector.id().with_suffix("label"),
                        label,
                        connector.text_style(),
                        frame,
                    )?,
                    None => None,
                }
            }
            None => None,
        };

        let mut items = vec![SceneItem::Connector(route)];
        items.extend(label.map(SceneItem::Text));
        Ok(items)
    }

    fn layout_label(
        &self,
        texts: &TextLayouter<'_>,
        diagram: &Diagram,
        routes: &HashMap<EntityIndex, RoutedConnector>,
        label: &ConnectorLabel,
    ) -> Result<Vec<SceneItem>, LayoutError> {
        let frame = match label.placement() {
            LabelPlacement::Absolute(bounds) => bounds,
            LabelPlacement::Relative {
                connector,
                position,
                distance,
                offset,
            } => {
                let connector_id = diagram
                    .get(connector)
                    .map_or_else(|| Id::new("?"), Entity::id);
                let unrouted = || LayoutError::UnroutedConnector {
                    label: label.id(),
                    connector: connector_id,
                };
                let route = routes.get(&connector).ok_or_else(unrouted)?;
                label::anchor_on_path(route.points(), position, distance, offset)
                    .ok_or_else(unrouted)?
            }
        };
        text_items(texts, label.id(), label.text(), label.text_style(), frame)
    }
}

fn layout_text(
    texts: &TextLayouter<'_>,
    text: &StandaloneText,
) -> Result<Vec<SceneItem>, LayoutError> {
    text_items(texts, text.id(), text.text(), text.text_style(), text.bounds())
}

fn text_items(
    texts: &TextLayouter<'_>,
    id: Id,
    text: &str,
    style: &TextStyle,
    frame: Bounds,
) -> Result<Vec<SceneItem>, LayoutError> {
    let block = texts.layout(id, text, style, frame)?;
    Ok(block.map(SceneItem::Text).into_iter().collect())
}

impl DiagramLayout {
    fn push(&mut self, entity: EntityIndex, item: SceneItem) {
        let extent = match &item {
            SceneItem::Box(placed) => placed.bounds(),
            SceneItem::Shape(placed) => placed.bounds(),
            SceneItem::Connector(route) => route.bounds(),
            SceneItem::Text(block) => block.bounds(),
        };
        self.bounds = Some(Bounds::stretch_to_contain(self.bounds, extent));
        self.items.push((entity, item));
    }

    fn record_failure(&mut self, err: LayoutError) {
        warn!(entity:% = err.entity(), err:%; "Skipping entity");
        self.failures.push(err);
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use mxdraw_core::{
        draw::FixedMetrics,
        semantic::{CellKind, RawCell, RawGeometry, StyleDefaults},
    };
    use mxdraw_parser::parse_style;

    use super::*;

    fn layer() -> Vec<RawCell> {
        vec![
            RawCell::new("0", CellKind::Layer),
            RawCell {
                parent: Some(Id::new("0")),
                ..RawCell::new("1", CellKind::Layer)
            },
        ]
    }

    fn vertex(id: &str, x: f32, y: f32, w: f32, h: f32, style: &str) -> RawCell {
        RawCell {
            parent: Some(Id::new("1")),
            style: parse_style(style).unwrap(),
            geometry: Some(RawGeometry::new(x, y, w, h)),
            ..RawCell::new(id, CellKind::Vertex)
        }
    }

    fn edge(id: &str, source: &str, target: Option<&str>) -> RawCell {
        RawCell {
            parent: Some(Id::new("1")),
            source: Some(Id::new(source)),
            target: target.map(Id::new),
            geometry: Some(RawGeometry {
                relative: true,
                ..RawGeometry::default()
            }),
            ..RawCell::new(id, CellKind::Edge)
        }
    }

    fn lay_out(cells: Vec<RawCell>) -> DiagramLayout {
        let diagram = Diagram::resolve(cells, &StyleDefaults::default()).unwrap();
        let metrics = FixedMetrics::default();
        LayoutEngine::new(&LayoutConfig::default(), &metrics).layout(&diagram)
    }

    #[test]
    fn test_paint_order_and_bounds() {
        let mut cells = layer();
        cells.push(vertex("a", 0.0, 0.0, 100.0, 50.0, ""));
        cells.push(vertex("b", 300.0, 0.0, 100.0, 50.0, ""));
        cells.push(edge("e", "a", Some("b")));
        let layout = lay_out(cells);

        let ids: Vec<String> = layout
            .items()
            .iter()
            .map(|(_, item)| item.id().to_string())
            .collect();
        assert_eq!(ids, ["a", "b", "e"]);
        assert!(layout.failures().is_empty());

        let bounds = layout.bounds().unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 0.0);
        assert_approx_eq!(f32, bounds.max_x(), 400.0);
    }

    #[test]
    fn test_node_label_extends_bounds() {
        let mut cells = layer();
        let mut node = vertex("a", 0.0, 0.0, 20.0, 20.0, "labelPosition=right;align=left");
        node.value = "label".to_string();
        cells.push(node);
        let layout = lay_out(cells);

        let text = layout.items_for("a").find_map(SceneItem::as_text).unwrap();
        assert_approx_eq!(f32, text.bounds().min_x(), 20.0);
        assert!(layout.bounds().unwrap().max_x() > 20.0);
    }

    #[test]
    fn test_groups_and_geometryless_nodes_are_skipped() {
        let mut cells = layer();
        cells.push(vertex("g", 0.0, 0.0, 10.0, 10.0, "group"));
        cells.push(RawCell {
            parent: Some(Id::new("1")),
            ..RawCell::new("bare", CellKind::Vertex)
        });
        let layout = lay_out(cells);
        assert!(layout.items().is_empty());
        assert!(layout.bounds().is_none());
        assert!(layout.failures().is_empty());
    }

    #[test]
    fn test_unsupported_shape_is_collected() {
        let mut cells = layer();
        cells.push(vertex("a", 0.0, 0.0, 10.0, 10.0, "shape=cloud"));
        cells.push(vertex("b", 50.0, 0.0, 10.0, 10.0, ""));
        let layout = lay_out(cells);

        assert_eq!(layout.failures().len(), 1);
        assert!(matches!(
            &layout.failures()[0],
            LayoutError::UnsupportedShape { shape, .. } if shape == "cloud"
        ));
        assert_eq!(layout.items().len(), 1);
    }

    #[test]
    fn test_invalid_style_skips_only_that_entity() {
        let mut cells = layer();
        cells.push(vertex("good", 0.0, 0.0, 10.0, 10.0, ""));
        cells.push(vertex("bad", 50.0, 0.0, 10.0, 10.0, "dashed=1;dashPattern=4 4"));
        cells.push(RawCell {
            style: parse_style("strokeWidth=thick").unwrap(),
            ..edge("e", "good", Some("bad"))
        });
        let layout = lay_out(cells);

        let ids: Vec<String> = layout
            .items()
            .iter()
            .map(|(_, item)| item.id().to_string())
            .collect();
        assert_eq!(ids, ["good"]);

        let failing: Vec<String> = layout
            .failures()
            .iter()
            .map(|err| err.entity().to_string())
            .collect();
        assert_eq!(failing, ["bad", "e"]);
        assert!(matches!(&layout.failures()[0], LayoutError::InvalidStyle(_)));
    }

    #[test]
    fn test_template_node_is_a_shape() {
        let mut cells = layer();
        cells.push(vertex("brace", 0.0, 0.0, 20.0, 100.0, "shape=curlyBracket"));
        let layout = lay_out(cells);
        assert!(matches!(
            layout.items_for("brace").next(),
            Some(SceneItem::Shape(_))
        ));
    }

    #[test]
    fn test_edge_value_is_centered_on_path() {
        let mut cells = layer();
        cells.push(vertex("a", 0.0, 0.0, 100.0, 50.0, ""));
        cells.push(vertex("b", 300.0, 0.0, 100.0, 50.0, ""));
        let mut e = edge("e", "a", Some("b"));
        e.value = "go".to_string();
        cells.push(e);
        let layout = lay_out(cells);

        let text = layout
            .items_for("e-label")
            .find_map(SceneItem::as_text)
            .unwrap();
        // The end cap trims the path by one unit.
        assert_approx_eq!(f32, text.bounds().center().x(), 199.5);
    }

    #[test]
    fn test_relative_label_on_failed_connector() {
        let mut cells = layer();
        cells.push(vertex("a", 0.0, 0.0, 100.0, 50.0, ""));
        cells.push(edge("e", "a", None));
        cells.push(RawCell {
            parent: Some(Id::new("e")),
            value: "x".to_string(),
            geometry: Some(RawGeometry {
                relative: true,
                ..RawGeometry::default()
            }),
            ..RawCell::new("l", CellKind::EdgeLabel)
        });
        let layout = lay_out(cells);

        let failing: Vec<String> = layout
            .failures()
            .iter()
            .map(|err| err.entity().to_string())
            .collect();
        assert_eq!(failing, ["e", "l"]);
    }
}
