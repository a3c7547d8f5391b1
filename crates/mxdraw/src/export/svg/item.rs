//! SVG elements for scene items.

use svg::node::element as svg_element;

use mxdraw_core::{apply_stroke, color::Color};

use super::marker::MarkerSet;
use crate::layout::{PlacedBox, PlacedRun, PlacedShape, RoutedConnector, SceneItem, TextBlock};

pub(super) fn render(item: &SceneItem, markers: &mut MarkerSet) -> Box<dyn svg::Node> {
    match item {
        SceneItem::Box(placed) => Box::new(render_box(placed)),
        SceneItem::Shape(placed) => Box::new(render_shape(placed)),
        SceneItem::Connector(route) => Box::new(render_connector(route, markers)),
        SceneItem::Text(block) => Box::new(render_text(block)),
    }
}

fn render_box(placed: &PlacedBox) -> svg_element::Rectangle {
    let bounds = placed.bounds();
    let rect = svg_element::Rectangle::new()
        .set("id", placed.id().to_string())
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height());
    let rect = with_fill(rect, placed.fill());
    let rect = with_opacity(rect, placed.opacity());
    apply_stroke!(rect, placed.stroke())
}

fn render_shape(placed: &PlacedShape) -> svg_element::Path {
    let outline = placed.outline();
    let mut path = svg_element::Path::new()
        .set("id", placed.id().to_string())
        .set("d", outline.path().to_svg_data());

    let mut transforms = Vec::new();
    if outline.rotation() != 0.0 {
        transforms.push(format!("rotate({})", outline.rotation()));
    }
    if outline.mirror() {
        transforms.push("scale(-1,1)".to_string());
    }
    if !transforms.is_empty() {
        path = path
            .set("transform", transforms.join(" "))
            .set("style", "transform-box: fill-box; transform-origin: center;");
    }

    let path = with_fill(path, placed.fill());
    let path = with_opacity(path, placed.opacity());
    apply_stroke!(path, placed.stroke())
}

fn render_connector(route: &RoutedConnector, markers: &mut MarkerSet) -> svg_element::Path {
    let path = svg_element::Path::new()
        .set("id", route.id().to_string())
        .set("d", route.to_path().to_svg_data())
        .set("fill", "none");
    let mut path = apply_stroke!(path, route.stroke());

    let color = route.stroke().color();
    if let Some(marker) = markers.reference(route.start_cap(), color) {
        path = path.set("marker-start", marker);
    }
    if let Some(marker) = markers.reference(route.end_cap(), color) {
        path = path.set("marker-end", marker);
    }
    path
}

fn render_text(block: &TextBlock) -> svg_element::Group {
    block.runs().iter().fold(
        svg_element::Group::new().set("id", block.id().to_string()),
        |group, run| match run.outline() {
            Some(outline) => group.add(
                svg_element::Path::new()
                    .set("d", outline.to_svg_data())
                    .set("fill", run.color().to_string())
                    .set("fill-opacity", run.color().alpha()),
            ),
            None => group.add(text_run(run)),
        },
    )
}

fn text_run(run: &PlacedRun) -> svg_element::Text {
    let face = run.face();
    let mut text = svg_element::Text::new("")
        .set("x", run.origin().x())
        .set("y", run.origin().y())
        .set("font-family", face.family())
        .set("font-size", face.size_px())
        .set("fill", run.color().to_string())
        .set("fill-opacity", run.color().alpha())
        .set("xml:space", "preserve");
    if face.variant().is_bold() {
        text = text.set("font-weight", "bold");
    }
    if face.variant().is_italic() {
        text = text.set("font-style", "italic");
    }
    text.add(svg::node::Text::new(run.text()))
}

fn with_fill<T: svg::Node>(mut element: T, fill: Option<Color>) -> T {
    match fill {
        Some(color) => {
            element.assign("fill", color.to_string());
            element.assign("fill-opacity", color.alpha());
        }
        None => element.assign("fill", "none"),
    }
    element
}

fn with_opacity<T: svg::Node>(mut element: T, opacity: f32) -> T {
    if opacity < 1.0 {
        element.assign("opacity", opacity);
    }
    element
}

#[cfg(test)]
mod tests {
    use mxdraw_core::{
        draw::StrokeDefinition,
        geometry::{Bounds, Point},
        identifier::Id,
        semantic::ArrowCap,
    };

    use super::*;

    #[test]
    fn test_connector_references_markers() {
        let route = RoutedConnector {
            id: Id::new("edge"),
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            stroke: StrokeDefinition::default(),
            start_cap: ArrowCap::None,
            end_cap: ArrowCap::Classic,
            bounds: Bounds::from_xywh(0.0, -0.5, 10.0, 1.0),
        };
        let mut markers = MarkerSet::default();
        let svg = render_connector(&route, &mut markers).to_string();
        assert!(svg.contains(r#"d="M0,0 L10,0""#));
        assert!(svg.contains("marker-end"));
        assert!(!svg.contains("marker-start"));
        assert!(svg.contains(r#"fill="none""#));
    }

    #[test]
    fn test_box_without_fill_and_translucent() {
        let placed = PlacedBox {
            id: Id::new("box"),
            bounds: Bounds::from_xywh(1.0, 2.0, 3.0, 4.0),
            fill: None,
            stroke: StrokeDefinition::default(),
            opacity: 0.5,
        };
        let svg = render_box(&placed).to_string();
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"opacity="0.5""#));
        assert!(svg.contains(r#"x="1""#));
    }
}
