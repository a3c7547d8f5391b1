//! Reader for the `mxfile` XML container.

use log::{debug, trace};
use roxmltree::{Document, Node};

use mxdraw_core::{
    geometry::Point,
    semantic::{CellKind, RawCell, RawGeometry},
};

use crate::{error::ParseError, style::parse_style};

/// One page of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub name: Option<String>,
    pub id: Option<String>,
    /// Cells in document order
    pub cells: Vec<RawCell>,
}

/// Selects a page of a multi-page document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelector {
    /// Zero-based position of the page
    Index(usize),
    /// The page's `name` attribute
    Name(String),
}

impl Default for PageSelector {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl std::str::FromStr for PageSelector {
    type Err = String;

    /// Digits select by index, anything else by name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("page selector cannot be empty".to_string());
        }
        Ok(s.parse()
            .map(Self::Index)
            .unwrap_or_else(|_| Self::Name(s.to_string())))
    }
}

impl std::fmt::Display for PageSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Reads every page of a document.
pub fn parse_document(source: &str) -> Result<Vec<RawPage>, ParseError> {
    let document = Document::parse(source)?;
    page_nodes(&document)?
        .into_iter()
        .map(read_page)
        .collect()
}

/// Reads the selected page of a document.
pub fn parse_page(source: &str, selector: &PageSelector) -> Result<RawPage, ParseError> {
    let document = Document::parse(source)?;
    let pages = page_nodes(&document)?;
    let page = match selector {
        PageSelector::Index(index) => pages.get(*index).copied(),
        PageSelector::Name(name) => pages
            .iter()
            .find(|page| page.attribute("name") == Some(name.as_str()))
            .copied(),
    };
    let page = page.ok_or_else(|| ParseError::PageNotFound {
        page: selector.to_string(),
    })?;
    read_page(page)
}

/// The `<diagram>` elements of an `<mxfile>`, or a bare `<mxGraphModel>`
fn page_nodes<'a, 'input>(
    document: &'a Document<'input>,
) -> Result<Vec<Node<'a, 'input>>, ParseError> {
    let root = document.root_element();
    match root.tag_name().name() {
        "mxfile" => Ok(root
            .children()
            .filter(|node| node.has_tag_name("diagram"))
            .collect()),
        "mxGraphModel" => Ok(vec![root]),
        _ => Err(ParseError::MissingElement {
            element: "mxfile",
            parent: "document".to_string(),
        }),
    }
}

fn read_page(page: Node<'_, '_>) -> Result<RawPage, ParseError> {
    let name = page.attribute("name").map(str::to_string);
    let id = page.attribute("id").map(str::to_string);

    let model = if page.has_tag_name("mxGraphModel") {
        page
    } else {
        match child_element(page, "mxGraphModel") {
            Some(model) => model,
            None if page.text().is_some_and(|text| !text.trim().is_empty()) => {
                return Err(ParseError::CompressedPage {
                    page: name.unwrap_or_else(|| "unnamed".to_string()),
                });
            }
            None => {
                return Err(ParseError::MissingElement {
                    element: "mxGraphModel",
                    parent: "diagram".to_string(),
                });
            }
        }
    };

    let root = child_element(model, "root").ok_or_else(|| ParseError::MissingElement {
        element: "root",
        parent: "mxGraphModel".to_string(),
    })?;

    let cells = root
        .children()
        .filter(|node| node.is_element())
        .map(read_cell)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(page:? = name, cells = cells.len(); "Read page");
    Ok(RawPage { name, id, cells })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(name))
}

/// Reads an `<mxCell>`, or a `<UserObject>`/`<object>` wrapping one.
fn read_cell(node: Node<'_, '_>) -> Result<RawCell, ParseError> {
    let (cell, wrapper) = match node.tag_name().name() {
        "UserObject" | "object" => {
            let cell =
                child_element(node, "mxCell").ok_or_else(|| ParseError::MissingElement {
                    element: "mxCell",
                    parent: node.tag_name().name().to_string(),
                })?;
            (cell, Some(node))
        }
        _ => (node, None),
    };

    let id_source = wrapper.unwrap_or(cell);
    let id = id_source
        .attribute("id")
        .ok_or_else(|| ParseError::MissingAttribute {
            element: id_source.tag_name().name().to_string(),
            attribute: "id",
        })?;

    let value = match wrapper {
        Some(wrapper) => wrapper.attribute("label"),
        None => cell.attribute("value"),
    }
    .unwrap_or_default();

    let style = parse_style(cell.attribute("style").unwrap_or_default())?;
    let kind = if cell.attribute("edge") == Some("1") {
        CellKind::Edge
    } else if style.contains_key("edgeLabel") {
        CellKind::EdgeLabel
    } else if style.contains_key("text") {
        CellKind::Text
    } else if cell.attribute("vertex") == Some("1") {
        CellKind::Vertex
    } else {
        CellKind::Layer
    };

    let mut raw = RawCell::new(id, kind);
    raw.value = value.to_string();
    raw.style = style;
    raw.parent = cell.attribute("parent").map(Into::into);
    raw.source = cell.attribute("source").map(Into::into);
    raw.target = cell.attribute("target").map(Into::into);
    raw.geometry = child_element(cell, "mxGeometry")
        .map(|geometry| read_geometry(id, geometry))
        .transpose()?;

    trace!(id, kind:?; "Read cell");
    Ok(raw)
}

fn read_geometry(cell: &str, node: Node<'_, '_>) -> Result<RawGeometry, ParseError> {
    let mut geometry = RawGeometry {
        x: number(cell, node, "x")?.unwrap_or_default(),
        y: number(cell, node, "y")?.unwrap_or_default(),
        width: number(cell, node, "width")?,
        height: number(cell, node, "height")?,
        relative: node.attribute("relative") == Some("1"),
        ..RawGeometry::default()
    };

    for child in node.children().filter(|child| child.is_element()) {
        match (child.tag_name().name(), child.attribute("as")) {
            ("mxPoint", Some("sourcePoint")) => geometry.source_point = Some(point(cell, child)?),
            ("mxPoint", Some("targetPoint")) => geometry.target_point = Some(point(cell, child)?),
            ("mxPoint", Some("offset")) => geometry.offset = Some(point(cell, child)?),
            ("Array", Some("points")) => {
                geometry.points = child
                    .children()
                    .filter(|point| point.has_tag_name("mxPoint"))
                    .map(|node| point(cell, node))
                    .collect::<Result<_, _>>()?;
            }
            (element, role) => {
                debug!(cell, element, role:?; "Ignoring geometry child");
            }
        }
    }

    Ok(geometry)
}

fn point(cell: &str, node: Node<'_, '_>) -> Result<Point, ParseError> {
    Ok(Point::new(
        number(cell, node, "x")?.unwrap_or_default(),
        number(cell, node, "y")?.unwrap_or_default(),
    ))
}

fn number(cell: &str, node: Node<'_, '_>, attribute: &str) -> Result<Option<f32>, ParseError> {
    node.attribute(attribute)
        .map(|value| {
            value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| ParseError::InvalidNumber {
                    cell: cell.to_string(),
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PAGES: &str = r##"<mxfile host="app.diagrams.net">
  <diagram id="p1" name="First">
    <mxGraphModel dx="800" dy="600">
      <root>
        <mxCell id="0" />
        <mxCell id="1" parent="0" />
        <mxCell id="a" value="A" style="rounded=0;whiteSpace=wrap;" vertex="1" parent="1">
          <mxGeometry x="10" y="20" width="100" height="50" as="geometry" />
        </mxCell>
        <UserObject label="B &amp; co" id="b">
          <mxCell style="text;html=1;" vertex="1" parent="1">
            <mxGeometry x="200" y="20" width="60" height="30" as="geometry" />
          </mxCell>
        </UserObject>
        <mxCell id="e" style="endArrow=classic;" edge="1" parent="1" source="a" target="b">
          <mxGeometry relative="1" as="geometry">
            <mxPoint x="5" y="6" as="sourcePoint" />
            <Array as="points">
              <mxPoint x="150" y="45" />
              <mxPoint x="150" y="35" />
            </Array>
          </mxGeometry>
        </mxCell>
        <mxCell id="l" value="yes" style="edgeLabel;html=1;" vertex="1" connectable="0" parent="e">
          <mxGeometry x="-0.5" y="10" relative="1" as="geometry">
            <mxPoint x="1" y="-2" as="offset" />
          </mxGeometry>
        </mxCell>
      </root>
    </mxGraphModel>
  </diagram>
  <diagram id="p2" name="Second">
    <mxGraphModel><root><mxCell id="0" /></root></mxGraphModel>
  </diagram>
</mxfile>"##;

    #[test]
    fn test_parse_document_pages() {
        let pages = parse_document(TWO_PAGES).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].name.as_deref(), Some("First"));
        assert_eq!(pages[1].id.as_deref(), Some("p2"));
        assert_eq!(pages[0].cells.len(), 6);
    }

    #[test]
    fn test_parse_cells_kinds_and_references() {
        let page = parse_page(TWO_PAGES, &PageSelector::Index(0)).unwrap();
        let kinds: Vec<_> = page.cells.iter().map(|cell| cell.kind).collect();
        assert_eq!(
            kinds,
            [
                CellKind::Layer,
                CellKind::Layer,
                CellKind::Vertex,
                CellKind::Text,
                CellKind::Edge,
                CellKind::EdgeLabel,
            ]
        );

        let edge = &page.cells[4];
        assert_eq!(edge.source, Some("a".into()));
        assert_eq!(edge.target, Some("b".into()));
        assert_eq!(edge.parent, Some("1".into()));
        assert_eq!(edge.style.get("endArrow"), Some("classic"));
    }

    #[test]
    fn test_parse_user_object_wrapper() {
        let page = parse_page(TWO_PAGES, &PageSelector::Index(0)).unwrap();
        let wrapped = &page.cells[3];
        assert_eq!(wrapped.id, "b");
        assert_eq!(wrapped.value, "B & co");
        assert_eq!(wrapped.parent, Some("1".into()));
    }

    #[test]
    fn test_parse_geometry() {
        let page = parse_page(TWO_PAGES, &PageSelector::Index(0)).unwrap();
        let vertex = page.cells[2].geometry.as_ref().unwrap();
        assert_eq!(vertex, &RawGeometry::new(10.0, 20.0, 100.0, 50.0));

        let edge = page.cells[4].geometry.as_ref().unwrap();
        assert!(edge.relative);
        assert_eq!(edge.width, None);
        assert_eq!(edge.source_point, Some(Point::new(5.0, 6.0)));
        assert_eq!(
            edge.points,
            [Point::new(150.0, 45.0), Point::new(150.0, 35.0)]
        );

        let label = page.cells[5].geometry.as_ref().unwrap();
        assert_eq!(label.x, -0.5);
        assert_eq!(label.y, 10.0);
        assert_eq!(label.offset, Some(Point::new(1.0, -2.0)));
    }

    #[test]
    fn test_parse_page_by_name() {
        let page = parse_page(TWO_PAGES, &PageSelector::Name("Second".to_string())).unwrap();
        assert_eq!(page.cells.len(), 1);

        let err = parse_page(TWO_PAGES, &PageSelector::Name("Third".to_string())).unwrap_err();
        assert!(matches!(err, ParseError::PageNotFound { page } if page == "Third"));
        let err = parse_page(TWO_PAGES, &PageSelector::Index(2)).unwrap_err();
        assert!(matches!(err, ParseError::PageNotFound { .. }));
    }

    #[test]
    fn test_parse_bare_graph_model() {
        let source = r#"<mxGraphModel><root><mxCell id="0"/><mxCell id="1" parent="0"/></root></mxGraphModel>"#;
        let pages = parse_document(source).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, None);
        assert_eq!(pages[0].cells.len(), 2);
    }

    #[test]
    fn test_parse_compressed_page_rejected() {
        let source = r#"<mxfile><diagram name="Page-1">7VhRb5swEP41PK4CG0jymLTptmqbqmXSnj18gFWDkXHSpL9+NhgCI1EzJVu1KVIi3X13nM/+PvskeXhebD5KWhdfBAPuIZ9tPHzjIRSgKNA/FtkaJMTEAbniTNfaAUv2DBa0D+ZrzqCZFCohuOL1FExFVUGqJhiVUjxNy0rBp6vWNIdFwDKlfEF/cKYKgybIPwE/AcsLt/LOpZS0q3WZ8BHqqwVT7GqAHjuMG5NIt6C8xmQy+9ajyXvsyiWDhs9bvHxvGP75ccxgs4WFEoZWpFRcYuOYmvk5c+FVLXOo0txJ7KpC/Dv8wBJb9dHaV/k1A3wSk16O+pOHk/NzCG4ArSGhpvbSH/uwtd8dE+rQhX8i8fklr2wE7L8KzrzPrM0T0SiPjwzl7Aa5HeZWL9etGm3E6Qlxmh23c9VLjz2Eq9V+wgFVtYzKlp7W6j6cIHFO12BxKWKS4yCVw3HC/UXgCpBdK8Fp0+vUqZr2f0RlG4mmUVdaqxSbTo1rMy0adoEsqy64+5pbkB/bDnOrE1sMCq9Ch0R7y7MR8tYmGxJ3OYpRIzYHkL29Gs8kGu3WcX1VsoTEW1hlQ7qnNt0IW+fRTTRHHnS7NyhJG6hNTr9iXzIJmMP+2ZGMgN2ZgWL5lHmaPOgcwY/jAOA4fB+iLVm8LpPPfRcbM3RwJg/45/t5yp9PJdaGpQYrULLRdlyuv2+3qv6ofXXzqQ7w6IdUbSIlcGwbdIW5TgxlTVxRcbdAtMXoC9e7YMI4mR2l29aUm6i2m1tt9zOkG52E9zd+62JCb1flhJ3t7j0ibqznRPwpxeZtgPVR0h4pzj/o/Bgx7P0ufFMvuxgo3Xu6G8Bt/3zSGbfAA==</diagram></mxfile>"#;
        let err = parse_document(source).unwrap_err();
        assert!(matches!(err, ParseError::CompressedPage { page } if page == "Page-1"));
    }

    #[test]
    fn test_parse_invalid_number() {
        let source = r#"<mxGraphModel><root><mxCell id="a" vertex="1"><mxGeometry x="ten" as="geometry"/></mxCell></root></mxGraphModel>"#;
        let err = parse_document(source).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { cell, attribute, value }
                if cell == "a" && attribute == "x" && value == "ten"
        ));
    }

    #[test]
    fn test_parse_malformed_xml() {
        let err = parse_document("<mxfile><diagram>").unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)));
    }

    #[test]
    fn test_page_selector_from_str() {
        assert_eq!("2".parse::<PageSelector>(), Ok(PageSelector::Index(2)));
        assert_eq!(
            "Overview".parse::<PageSelector>(),
            Ok(PageSelector::Name("Overview".to_string()))
        );
        assert!("  ".parse::<PageSelector>().is_err());
    }
}
