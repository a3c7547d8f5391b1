//! Arrow cap markers.

use std::collections::HashMap;

use svg::node::element as svg_element;

use mxdraw_core::{color::Color, semantic::ArrowCap};

/// Collects the marker definitions referenced by rendered connectors.
///
/// A marker is oriented `auto-start-reverse`, so one definition per color
/// serves both ends of a path.
#[derive(Debug, Default)]
pub(super) struct MarkerSet {
    classic: HashMap<String, Color>,
}

impl MarkerSet {
    /// Registers the marker for `cap` drawn in `color` and returns the
    /// reference to put on the path, if the cap has one.
    pub(super) fn reference(&mut self, cap: ArrowCap, color: Color) -> Option<String> {
        match cap {
            ArrowCap::None => None,
            ArrowCap::Classic => {
                let id = classic_id(color);
                let reference = format!("url(#{id})");
                self.classic.insert(id, color);
                Some(reference)
            }
        }
    }

    /// Marker definitions for every registered color
    pub(super) fn definitions(&self) -> svg_element::Definitions {
        let mut colors: Vec<(&String, &Color)> = self.classic.iter().collect();
        colors.sort_by(|a, b| a.0.cmp(b.0));
        colors
            .into_iter()
            .fold(svg_element::Definitions::new(), |defs, (id, color)| {
                defs.add(classic_marker(id, *color))
            })
    }
}

fn classic_id(color: Color) -> String {
    format!("arrow-classic-{}", color.to_id_safe_string())
}

fn classic_marker(id: &str, color: Color) -> svg_element::Marker {
    svg_element::Marker::new()
        .set("id", id)
        .set("viewBox", "0 0 10 15")
        .set("refX", 6.5)
        .set("refY", 7)
        .set("markerWidth", 10)
        .set("markerHeight", 10)
        .set("orient", "auto-start-reverse")
        .add(
            svg_element::Path::new()
                .set("d", "M7,7 L0,10.5 L1.75,7 L0,3.5 Z")
                .set("stroke", color.to_string())
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha()),
        )
}
