//! Integration tests for the DiagramBuilder API
//!
//! Every test feeds an inline draw.io document through the public API with
//! the fixed font backend, so measurements are reproducible.

use float_cmp::assert_approx_eq;

use mxdraw::{
    DiagramBuilder, DiagramLayout, LayoutError, PageSelector, SceneItem,
    config::{AppConfig, FontBackend, LayoutConfig, StyleConfig, StyleDefaults, TextConfig},
    geometry::Point,
};

fn builder() -> DiagramBuilder {
    DiagramBuilder::new(AppConfig::new(
        StyleDefaults::default(),
        LayoutConfig::default(),
        TextConfig::new(FontBackend::Fixed),
        StyleConfig::default(),
    ))
}

/// Wraps cells into a page with the usual root and layer cells
fn page(cells: &str) -> String {
    format!(
        r#"<mxfile><diagram name="Page-1" id="p1"><mxGraphModel><root>
            <mxCell id="0"/>
            <mxCell id="1" parent="0"/>
            {cells}
        </root></mxGraphModel></diagram></mxfile>"#
    )
}

fn vertex(id: &str, style: &str, (x, y, w, h): (f32, f32, f32, f32)) -> String {
    format!(
        r#"<mxCell id="{id}" value="" style="{style}" vertex="1" parent="1">
            <mxGeometry x="{x}" y="{y}" width="{w}" height="{h}" as="geometry"/>
        </mxCell>"#
    )
}

fn lay_out(source: &str) -> DiagramLayout {
    let builder = builder();
    let diagram = builder
        .parse(source, &PageSelector::default())
        .expect("Failed to parse diagram");
    builder.layout(&diagram)
}

fn route_points(layout: &DiagramLayout, id: &str) -> Vec<(f32, f32)> {
    layout
        .connector(id)
        .expect("connector should be routed")
        .points()
        .iter()
        .map(|p| (p.x(), p.y()))
        .collect()
}

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_side_by_side_boxes_route_straight() {
    let source = page(&format!(
        r#"{}{}
        <mxCell id="e" style="endArrow=none;" edge="1" parent="1" source="a" target="b">
            <mxGeometry relative="1" as="geometry"/>
        </mxCell>"#,
        vertex("a", "", (0.0, 0.0, 100.0, 50.0)),
        vertex("b", "", (300.0, 0.0, 100.0, 50.0)),
    ));
    let layout = lay_out(&source);
    assert_eq!(
        route_points(&layout, "e"),
        [(100.0, 25.0), (120.0, 25.0), (280.0, 25.0), (300.0, 25.0)]
    );
}

#[test]
fn test_default_end_cap_trims_path_and_adds_marker() {
    let source = page(&format!(
        r#"{}{}
        <mxCell id="e" edge="1" parent="1" source="a" target="b">
            <mxGeometry relative="1" as="geometry"/>
        </mxCell>"#,
        vertex("a", "", (0.0, 0.0, 100.0, 50.0)),
        vertex("b", "", (300.0, 0.0, 100.0, 50.0)),
    ));
    let layout = lay_out(&source);
    assert_eq!(route_points(&layout, "e").last(), Some(&(299.0, 25.0)));

    let builder = builder();
    let diagram = builder.parse(&source, &PageSelector::default()).unwrap();
    let svg = builder.render_svg(&diagram).unwrap();
    assert!(svg.contains("marker-end"));
    assert!(svg.contains("arrow-classic-"));
    assert!(svg.contains(r#"orient="auto-start-reverse""#));
}

#[test]
fn test_perpendicular_sides_make_an_l() {
    let source = page(&format!(
        r#"{}{}
        <mxCell id="e" edge="1" parent="1" source="a" target="b">
            <mxGeometry relative="1" as="geometry"/>
        </mxCell>"#,
        vertex("a", "", (0.0, 0.0, 100.0, 50.0)),
        vertex("b", "", (200.0, 100.0, 50.0, 100.0)),
    ));
    let layout = lay_out(&source);
    assert_eq!(
        route_points(&layout, "e"),
        [
            (100.0, 25.0),
            (120.0, 25.0),
            (225.0, 25.0),
            (225.0, 80.0),
            (225.0, 99.0)
        ]
    );
}

#[test]
fn test_waypoints_are_kept() {
    let source = page(&format!(
        r#"{}{}
        <mxCell id="e" style="endArrow=none;exitX=1;exitY=0.5;entryX=0.5;entryY=0;" edge="1" parent="1" source="a" target="b">
            <mxGeometry relative="1" as="geometry">
                <Array as="points"><mxPoint x="150" y="25"/></Array>
            </mxGeometry>
        </mxCell>"#,
        vertex("a", "", (0.0, 0.0, 100.0, 50.0)),
        vertex("b", "", (100.0, 180.0, 100.0, 50.0)),
    ));
    let layout = lay_out(&source);
    assert_eq!(
        route_points(&layout, "e"),
        [(100.0, 25.0), (150.0, 25.0), (150.0, 180.0)]
    );
}

#[test]
fn test_same_side_anchors_get_margins_only() {
    let source = page(&format!(
        r#"{}{}
        <mxCell id="e" style="endArrow=none;exitX=0.5;exitY=0;entryX=0.5;entryY=0;" edge="1" parent="1" source="a" target="b">
            <mxGeometry relative="1" as="geometry"/>
        </mxCell>"#,
        vertex("a", "", (0.0, 0.0, 100.0, 50.0)),
        vertex("b", "", (300.0, 0.0, 100.0, 50.0)),
    ));
    let layout = lay_out(&source);
    assert_eq!(
        route_points(&layout, "e"),
        [(50.0, 0.0), (50.0, -20.0), (350.0, -20.0), (350.0, 0.0)]
    );
}

#[test]
fn test_nested_vertex_coordinates_are_absolute() {
    let source = page(
        r#"<mxCell id="g" value="" style="group" vertex="1" connectable="0" parent="1">
            <mxGeometry x="100" y="100" width="50" height="50" as="geometry"/>
        </mxCell>
        <mxCell id="child" value="" style="" vertex="1" parent="g">
            <mxGeometry x="10" y="10" width="20" height="20" as="geometry"/>
        </mxCell>"#,
    );
    let layout = lay_out(&source);

    assert_eq!(layout.items_for("g").count(), 0);
    let Some(SceneItem::Box(child)) = layout.items_for("child").next() else {
        panic!("child should be drawn as a box");
    };
    assert_eq!(child.bounds().min_point(), Point::new(110.0, 110.0));
    assert_approx_eq!(f32, child.bounds().width(), 20.0);
}

#[test]
fn test_edge_label_follows_path() {
    let source = page(&format!(
        r#"{}{}
        <mxCell id="e" style="endArrow=none;" edge="1" parent="1" source="a" target="b">
            <mxGeometry relative="1" as="geometry"/>
        </mxCell>
        <mxCell id="l" value="yes" style="edgeLabel;html=1;" vertex="1" connectable="0" parent="e">
            <mxGeometry x="-1" relative="1" as="geometry">
                <mxPoint as="offset"/>
            </mxGeometry>
        </mxCell>"#,
        vertex("a", "", (0.0, 0.0, 100.0, 50.0)),
        vertex("b", "", (300.0, 0.0, 100.0, 50.0)),
    ));
    let layout = lay_out(&source);
    let label = layout
        .items_for("l")
        .find_map(SceneItem::as_text)
        .expect("label should be laid out");
    assert_approx_eq!(f32, label.bounds().center().x(), 100.0);
}

#[test]
fn test_invalid_alignment_skips_only_that_entity() {
    let source = page(&format!(
        r#"<mxCell id="bad" value="text" style="align=justify;" vertex="1" parent="1">
            <mxGeometry x="0" y="0" width="50" height="50" as="geometry"/>
        </mxCell>{}"#,
        vertex("good", "", (100.0, 0.0, 50.0, 50.0)),
    ));
    let layout = lay_out(&source);

    assert_eq!(layout.failures().len(), 1);
    assert!(matches!(
        &layout.failures()[0],
        LayoutError::InvalidAlignment { entity, .. } if *entity == "bad"
    ));
    assert_eq!(layout.items_for("bad").count(), 0);
    assert_eq!(layout.items_for("good").count(), 1);
}

#[test]
fn test_unsupported_shape_does_not_fail_render() {
    let source = page(&format!(
        "{}{}",
        vertex("cloud", "shape=cloud;", (0.0, 0.0, 50.0, 50.0)),
        vertex("box", "", (100.0, 0.0, 50.0, 50.0)),
    ));
    let builder = builder();
    let diagram = builder.parse(&source, &PageSelector::default()).unwrap();

    let layout = builder.layout(&diagram);
    assert!(matches!(
        &layout.failures()[0],
        LayoutError::UnsupportedShape { shape, .. } if shape == "cloud"
    ));

    let svg = builder.render_svg(&diagram).unwrap();
    assert!(svg.contains(r#"id="box""#));
    assert!(!svg.contains(r#"id="cloud""#));
}

#[test]
fn test_text_wraps_after_exact_fit() {
    // Size 12 advances 6 per character: ten characters fill 60 exactly.
    let text = |value: &str| {
        page(&format!(
            r#"<mxCell id="t" value="{value}" style="text;html=0;" vertex="1" parent="1">
                <mxGeometry x="0" y="0" width="60" height="20" as="geometry"/>
            </mxCell>"#
        ))
    };
    let runs = |source: &str| -> Vec<String> {
        let layout = lay_out(source);
        let block = layout.items_for("t").find_map(SceneItem::as_text).unwrap();
        block.runs().iter().map(|run| run.text().to_string()).collect()
    };

    assert_eq!(runs(&text("abcdefghij")), ["abcdefghij"]);
    assert_eq!(runs(&text("abcdefghijk")), ["abcdefghij", "k"]);
}

#[test]
fn test_formatted_label_runs() {
    let source = page(
        r#"<mxCell id="n" value="plain &lt;b&gt;bold&lt;/b&gt;&lt;br&gt;next" style="html=1;" vertex="1" parent="1">
            <mxGeometry x="0" y="0" width="200" height="50" as="geometry"/>
        </mxCell>"#,
    );
    let layout = lay_out(&source);
    let block = layout.items_for("n").find_map(SceneItem::as_text).unwrap();
    let texts: Vec<&str> = block.runs().iter().map(|run| run.text()).collect();
    assert_eq!(texts, ["plain ", "bold", "next"]);
    assert!(block.runs()[1].face().variant().is_bold());
    assert!(block.runs()[2].origin().y() > block.runs()[0].origin().y());
}

#[test]
fn test_view_box_pads_drawing() {
    let source = page(&vertex("a", "", (0.0, 0.0, 100.0, 50.0)));
    let builder = builder();
    let diagram = builder.parse(&source, &PageSelector::default()).unwrap();
    let svg = builder.render_svg(&diagram).unwrap();

    assert!(svg.contains(r#"viewBox="-0.5 -0.5 101 51""#));
    assert!(svg.contains(r#"width="101""#));
}

#[test]
fn test_select_page_by_name() {
    let source = r#"<mxfile>
        <diagram name="First"><mxGraphModel><root><mxCell id="0"/></root></mxGraphModel></diagram>
        <diagram name="Second"><mxGraphModel><root>
            <mxCell id="0"/>
            <mxCell id="1" parent="0"/>
            <mxCell id="only" value="" vertex="1" parent="1">
                <mxGeometry x="0" y="0" width="10" height="10" as="geometry"/>
            </mxCell>
        </root></mxGraphModel></diagram>
    </mxfile>"#;
    let builder = builder();

    let first = builder.parse(source, &PageSelector::default()).unwrap();
    assert!(first.find("only").is_none());

    let second = builder
        .parse(source, &PageSelector::Name("Second".to_string()))
        .unwrap();
    assert!(second.find("only").is_some());

    assert!(builder.parse(source, &PageSelector::Index(5)).is_err());
}

#[test]
fn test_invalid_style_value_skips_only_that_box() {
    let source = page(&format!(
        "{}{}",
        vertex("good", "", (0.0, 0.0, 100.0, 50.0)),
        vertex("bad", "dashed=1;dashPattern=4 4;", (200.0, 0.0, 100.0, 50.0)),
    ));
    let builder = builder();
    let diagram = builder
        .parse(&source, &PageSelector::default())
        .expect("a bad style value must not abort parsing");

    let layout = builder.layout(&diagram);
    assert!(layout.items_for("good").next().is_some());
    assert!(layout.items_for("bad").next().is_none());
    assert!(matches!(
        layout.failures(),
        [LayoutError::InvalidStyle(err)] if err.cell() == "bad"
    ));

    let svg = builder.render_svg(&diagram).unwrap();
    assert!(svg.contains(r#"id="good""#));
    assert!(!svg.contains(r#"id="bad""#));
}

#[test]
fn test_parse_invalid_document_returns_error() {
    let builder = builder();
    assert!(builder.parse("<mxfile>", &PageSelector::default()).is_err());
    assert!(
        builder
            .parse(&page(r#"<mxCell id="x" parent="missing"/>"#), &PageSelector::default())
            .is_err()
    );
}
