//! Reference resolution from raw cells to entities.
//!
//! Cells may reference cells that appear later in the document. Resolution
//! therefore processes cells in a dependency order (nodes by nesting depth,
//! then connectors, then connector labels) and writes each entity into the
//! slot of its document position, so the final sequence is in paint order.
//!
//! Only broken references abort resolution. A style value that cannot be
//! interpreted falls back to its default and is recorded against the cell,
//! so the layout can skip that one entity.

use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    color::Color,
    draw::{ShapeTemplate, StrokeDefinition},
    geometry::{Bounds, Direction, Point},
    identifier::Id,
    semantic::{
        ArrowCap, CellKind, Connector, ConnectorLabel, Diagram, Endpoint, Entity, EntityIndex,
        LabelPlacement, Node, NodeShape, RawCell, RawGeometry, ResolveError, StandaloneText,
        StyleDefaults, TextStyle, style::CellStyle,
    },
};

impl Diagram {
    /// Resolves raw cells into a diagram.
    ///
    /// Node geometry becomes absolute by adding the origin of the nearest
    /// ancestor with geometry; connector points and absolute label boxes are
    /// offset the same way. The raw cells are consumed, so every cell is
    /// resolved exactly once.
    ///
    /// Invalid style values do not fail resolution; they are available per
    /// entity through [`Diagram::style_error`].
    ///
    /// # Errors
    ///
    /// Fails on the first parent, source or target reference to an unknown
    /// id, and on parent cycles.
    pub fn resolve(cells: Vec<RawCell>, defaults: &StyleDefaults) -> Result<Self, ResolveError> {
        debug!(cells = cells.len(); "Resolving diagram cells");

        let mut positions: HashMap<Id, usize> = HashMap::with_capacity(cells.len());
        for (idx, cell) in cells.iter().enumerate() {
            if positions.insert(cell.id, idx).is_some() {
                warn!(id:% = cell.id; "Duplicate cell id, later cell wins lookups");
            }
        }
        check_references(&cells, &positions)?;

        let depths = nesting_depths(&cells, &positions)?;
        let mut order: Vec<usize> = (0..cells.len()).collect();
        order.sort_by_key(|&idx| (tier(&cells, &positions, idx), depths[idx]));

        let mut resolver = Resolver {
            cells: &cells,
            positions: &positions,
            defaults,
            origins: vec![None; cells.len()],
        };
        let mut slots: Vec<Option<Entity>> = vec![None; cells.len()];
        let mut style_errors: Vec<Option<ResolveError>> = vec![None; cells.len()];
        for idx in order {
            let mut check = StyleCheck::default();
            slots[idx] = Some(resolver.resolve_cell(idx, &mut check));
            if let Some(err) = check.error {
                warn!(cell:% = cells[idx].id, err:%; "Invalid style value");
                style_errors[idx] = Some(err);
            }
        }

        let entities: Vec<Entity> = slots.into_iter().flatten().collect();
        let lookup = positions
            .into_iter()
            .map(|(id, idx)| (id, EntityIndex::new(idx)))
            .collect();
        debug!(entities = entities.len(); "Diagram resolved");
        Ok(Self {
            entities,
            lookup,
            style_errors,
        })
    }
}

/// Processing tier: everything a later tier links to is resolved in an
/// earlier one. Text placed on a connector waits for the connector.
fn tier(cells: &[RawCell], positions: &HashMap<Id, usize>, idx: usize) -> u8 {
    let cell = &cells[idx];
    match cell.kind {
        CellKind::Layer | CellKind::Vertex => 0,
        CellKind::Text => {
            let on_edge = cell
                .parent
                .and_then(|p| positions.get(&p))
                .is_some_and(|&p| cells[p].kind == CellKind::Edge);
            if on_edge { 2 } else { 0 }
        }
        CellKind::Edge => 1,
        CellKind::EdgeLabel => 2,
    }
}

/// Keeps the first invalid style value of one cell. The caller gets the
/// fallback, so the entity still resolves.
#[derive(Default)]
struct StyleCheck {
    error: Option<ResolveError>,
}

impl StyleCheck {
    fn or<T>(&mut self, value: Result<T, ResolveError>, fallback: T) -> T {
        value.unwrap_or_else(|err| {
            self.error.get_or_insert(err);
            fallback
        })
    }
}

fn check_references(cells: &[RawCell], positions: &HashMap<Id, usize>) -> Result<(), ResolveError> {
    for cell in cells {
        for reference in [cell.parent, cell.source, cell.target].into_iter().flatten() {
            if !positions.contains_key(&reference) {
                return Err(ResolveError::DanglingReference {
                    cell: cell.id,
                    reference,
                });
            }
        }
    }
    Ok(())
}

/// Number of parent links from each cell up to its root.
fn nesting_depths(
    cells: &[RawCell],
    positions: &HashMap<Id, usize>,
) -> Result<Vec<usize>, ResolveError> {
    let parent_of = |idx: usize| cells[idx].parent.and_then(|p| positions.get(&p).copied());
    let mut depths: Vec<Option<usize>> = vec![None; cells.len()];

    for start in 0..cells.len() {
        let mut chain = Vec::new();
        let mut current = start;
        let known = loop {
            if let Some(depth) = depths[current] {
                break Some(depth);
            }
            if chain.contains(&current) {
                return Err(ResolveError::CyclicParent {
                    cell: cells[start].id,
                });
            }
            chain.push(current);
            match parent_of(current) {
                Some(parent) => current = parent,
                None => break None,
            }
        };

        let mut depth = known.map_or(0, |d| d + 1);
        for &idx in chain.iter().rev() {
            depths[idx] = Some(depth);
            depth += 1;
        }
    }

    Ok(depths.into_iter().map(Option::unwrap_or_default).collect())
}

struct Resolver<'a> {
    cells: &'a [RawCell],
    positions: &'a HashMap<Id, usize>,
    defaults: &'a StyleDefaults,
    /// Origin each resolved cell passes on to its children
    origins: Vec<Option<Point>>,
}

impl Resolver<'_> {
    fn resolve_cell(&mut self, idx: usize, check: &mut StyleCheck) -> Entity {
        let cells = self.cells;
        let cell = &cells[idx];
        let parent = cell.parent.and_then(|p| self.positions.get(&p).copied());
        let origin = parent
            .and_then(|p| self.origins[p])
            .unwrap_or_default();

        match cell.kind {
            CellKind::Layer | CellKind::Vertex => {
                let node = self.node(cell, parent, origin, check);
                self.origins[idx] = Some(node.bounds.map_or(origin, |b| b.min_point()));
                Entity::Node(node)
            }
            CellKind::Text => {
                let text = self.text(cell, origin, check);
                self.origins[idx] = Some(text.bounds.min_point());
                Entity::Text(text)
            }
            CellKind::Edge => {
                self.origins[idx] = Some(origin);
                Entity::Connector(self.connector(cell, origin, check))
            }
            CellKind::EdgeLabel => {
                self.origins[idx] = Some(origin);
                Entity::Label(self.label(cell, parent, origin, check))
            }
        }
    }

    fn node(
        &self,
        cell: &RawCell,
        parent: Option<usize>,
        origin: Point,
        check: &mut StyleCheck,
    ) -> Node {
        let style = CellStyle::new(cell.id, &cell.style);
        let shape = match style.get("shape") {
            None | Some("rect") => NodeShape::Rectangle,
            Some(name) => ShapeTemplate::from_style_name(name)
                .map_or_else(|| NodeShape::Unsupported(name.to_string()), NodeShape::Template),
        };
        let parent = parent
            .filter(|&p| matches!(self.cells[p].kind, CellKind::Vertex | CellKind::Layer))
            .map(EntityIndex::new);

        Node {
            id: cell.id,
            label: non_empty(&cell.value),
            bounds: cell.geometry.as_ref().map(|g| absolute_box(g, origin)),
            fill: check.or(style.paint("fillColor", &self.defaults.fill_color), None),
            stroke: check.or(style.stroke(self.defaults), StrokeDefinition::default()),
            opacity: check.or(style.number_or("opacity", 100.0), 100.0) / 100.0,
            shape,
            direction: check.or(style.direction(), Direction::default()),
            rotation: check.or(style.number_or("rotation", 0.0), 0.0),
            flip_h: style.flag("flipH"),
            text_style: self.text_style(&style, check),
            parent,
            is_group: style.has("group"),
        }
    }

    fn text(&self, cell: &RawCell, origin: Point, check: &mut StyleCheck) -> StandaloneText {
        let style = CellStyle::new(cell.id, &cell.style);
        let bounds = cell
            .geometry
            .as_ref()
            .map_or_else(|| Bounds::from(origin), |g| absolute_box(g, origin));
        StandaloneText {
            id: cell.id,
            text: cell.value.clone(),
            bounds,
            text_style: self.text_style(&style, check),
        }
    }

    fn connector(&self, cell: &RawCell, origin: Point, check: &mut StyleCheck) -> Connector {
        let style = CellStyle::new(cell.id, &cell.style);
        let geometry = cell.geometry.clone().unwrap_or_default();

        let source = self.endpoint(
            &style,
            cell.source,
            ("exitX", "exitY"),
            geometry.source_point,
            origin,
            check,
        );
        let target = self.endpoint(
            &style,
            cell.target,
            ("entryX", "entryY"),
            geometry.target_point,
            origin,
            check,
        );

        Connector {
            id: cell.id,
            label: non_empty(&cell.value),
            source,
            target,
            waypoints: geometry
                .points
                .iter()
                .map(|p| p.add_point(origin))
                .collect(),
            stroke: check.or(style.stroke(self.defaults), StrokeDefinition::default()),
            start_cap: arrow_cap(&style, "startArrow", &self.defaults.start_arrow),
            end_cap: arrow_cap(&style, "endArrow", &self.defaults.end_arrow),
            text_style: self.text_style(&style, check),
        }
    }

    fn endpoint(
        &self,
        style: &CellStyle<'_>,
        node: Option<Id>,
        (key_x, key_y): (&str, &str),
        free_point: Option<Point>,
        origin: Point,
        check: &mut StyleCheck,
    ) -> Option<Endpoint> {
        let Some(node) = node.and_then(|id| self.positions.get(&id).copied()) else {
            return free_point.map(|p| Endpoint::Free(p.add_point(origin)));
        };
        // An anchor needs both fractions; a lone one leaves the side automatic.
        let anchor = check
            .or(style.number(key_x), None)
            .zip(check.or(style.number(key_y), None));
        Some(Endpoint::Node {
            node: EntityIndex::new(node),
            anchor,
        })
    }

    fn label(
        &self,
        cell: &RawCell,
        parent: Option<usize>,
        origin: Point,
        check: &mut StyleCheck,
    ) -> ConnectorLabel {
        let style = CellStyle::new(cell.id, &cell.style);
        let geometry = cell.geometry.clone().unwrap_or_default();
        let connector = parent.filter(|&p| self.cells[p].kind == CellKind::Edge);

        let placement = match connector {
            Some(connector) if geometry.relative => LabelPlacement::Relative {
                connector: EntityIndex::new(connector),
                position: geometry.x,
                distance: geometry.y,
                offset: geometry.offset.unwrap_or_default(),
            },
            _ => LabelPlacement::Absolute(absolute_box(&geometry, origin)),
        };

        ConnectorLabel {
            id: cell.id,
            text: cell.value.clone(),
            text_style: self.text_style(&style, check),
            placement,
        }
    }

    fn text_style(&self, style: &CellStyle<'_>, check: &mut StyleCheck) -> TextStyle {
        let defaults = self.defaults;
        let stroke_color = check
            .or(style.paint("strokeColor", &defaults.stroke_color), None)
            .unwrap_or_default();
        let font_color = match (style.get("fontColor"), defaults.font_color.as_deref()) {
            (Some(value), _) if value != "default" => Some(value),
            (_, default) => default,
        };
        let font_color = font_color.and_then(|value| {
            let parsed = Color::parse_optional(value).map_err(|err| style.invalid("fontColor", err));
            check.or(parsed, None)
        });
        let font_style = check.or(style.number_or("fontStyle", 0.0), 0.0) as u32;

        TextStyle::new(
            style.text_or("fontFamily", &defaults.font_family),
            check.or(style.number_or("fontSize", defaults.font_size), defaults.font_size),
            stroke_color,
        )
        .with_font_color(font_color)
        .with_variant_flags(font_style & 1 != 0, font_style & 2 != 0)
        .with_formatted(style.flag("html"))
        .with_alignment(
            style.get("align").unwrap_or("center"),
            style.get("verticalAlign").unwrap_or("middle"),
        )
        .with_label_position(
            style.get("labelPosition").unwrap_or("center"),
            style.get("verticalLabelPosition").unwrap_or("middle"),
        )
    }
}

fn absolute_box(geometry: &RawGeometry, origin: Point) -> Bounds {
    Bounds::from_xywh(
        geometry.x + origin.x(),
        geometry.y + origin.y(),
        geometry.width.unwrap_or(0.0),
        geometry.height.unwrap_or(0.0),
    )
}

fn arrow_cap(style: &CellStyle<'_>, key: &str, default: &str) -> ArrowCap {
    match style.get(key).unwrap_or(default) {
        "classic" => ArrowCap::Classic,
        "none" | "" => ArrowCap::None,
        other => {
            warn!(key, value = other; "Unsupported arrow cap, drawing none");
            ArrowCap::None
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}
