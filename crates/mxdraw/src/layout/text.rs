//! Text layout.
//!
//! Text is tokenized into runs, wrapped at character granularity against
//! the frame width and then placed line by line. Each line's origin
//! combines two policies: where the text block sits relative to the frame
//! (`labelPosition`, `verticalLabelPosition`) and how the line aligns
//! within it (`align`, `verticalAlign`). Lines are stacked with the regular
//! variant's em height whatever variants they use.

use log::{debug, trace};

use mxdraw_core::{
    color::Color,
    draw::{FontFace, FontMetrics, FontVariant, Path, VerticalMetrics},
    geometry::{Bounds, Point},
    identifier::Id,
    semantic::{InsideAlign, OutsidePosition, TextStyle},
};
use mxdraw_parser::{RunToken, tokenize_markup, tokenize_plain};

use super::scene::{PlacedRun, TextBlock};
use crate::error::LayoutError;

/// Outside and inside alignment of a text block.
#[derive(Debug, Clone, Copy)]
struct Alignment {
    outside_x: OutsidePosition,
    outside_y: OutsidePosition,
    inside_x: InsideAlign,
    inside_y: InsideAlign,
}

impl Alignment {
    fn from_style(entity: Id, style: &TextStyle) -> Result<Self, LayoutError> {
        let invalid = |message: String| LayoutError::InvalidAlignment { entity, message };
        Ok(Self {
            outside_x: OutsidePosition::from_horizontal(style.label_position()).map_err(invalid)?,
            outside_y: OutsidePosition::from_vertical(style.vertical_label_position())
                .map_err(invalid)?,
            inside_x: InsideAlign::from_horizontal(style.align()).map_err(invalid)?,
            inside_y: InsideAlign::from_vertical(style.vertical_align()).map_err(invalid)?,
        })
    }
}

/// Characters of one line sharing face and color.
#[derive(Debug, Clone)]
struct Segment {
    face: FontFace,
    color: Color,
    /// Characters with their x offset from the line start
    glyphs: Vec<(char, f32)>,
}

#[derive(Debug, Clone, Default)]
struct Line {
    segments: Vec<Segment>,
    width: f32,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn push(&mut self, ch: char, advance: f32, face: &FontFace, color: Color) {
        let offset = self.width;
        match self.segments.last_mut() {
            Some(segment) if segment.face == *face && segment.color == color => {
                segment.glyphs.push((ch, offset));
            }
            _ => self.segments.push(Segment {
                face: face.clone(),
                color,
                glyphs: vec![(ch, offset)],
            }),
        }
        self.width += advance;
    }
}

/// Lays out text against a [`FontMetrics`] provider.
pub(crate) struct TextLayouter<'a> {
    metrics: &'a dyn FontMetrics,
}

impl<'a> TextLayouter<'a> {
    pub(crate) fn new(metrics: &'a dyn FontMetrics) -> Self {
        Self { metrics }
    }

    /// Lays out `text` owned by `entity` against `frame`.
    ///
    /// A frame with zero width disables wrapping. Returns `None` when the
    /// text produces no lines.
    pub(crate) fn layout(
        &self,
        entity: Id,
        text: &str,
        style: &TextStyle,
        frame: Bounds,
    ) -> Result<Option<TextBlock>, LayoutError> {
        let alignment = Alignment::from_style(entity, style)?;
        let tokens = if style.formatted() {
            tokenize_markup(text)
        } else {
            tokenize_plain(text)
        };

        let lines = self.wrap(&tokens, style, frame.width());
        if lines.is_empty() {
            return Ok(None);
        }

        let base_face = style.face();
        let pitch = self
            .metrics
            .vertical_metrics(&base_face.with_variant(FontVariant::Regular))
            .em_height;

        let mut runs = Vec::new();
        let mut bounds: Option<Bounds> = None;
        let mut last_ascent = 0.0;
        for (index, line) in lines.iter().enumerate() {
            let metrics = self.line_metrics(line, &base_face);
            let origin = line_origin(frame, alignment, line.width, metrics)
                .add_point(Point::new(0.0, index as f32 * pitch));

            let line_box = Bounds::from_xywh(
                origin.x(),
                origin.y() - metrics.ascent,
                line.width,
                metrics.em_height,
            );
            bounds = Some(Bounds::stretch_to_contain(bounds, line_box));
            last_ascent = metrics.ascent;

            runs.extend(line.segments.iter().map(|segment| self.place(segment, origin)));
        }

        // Center the block on the exploded glyph rendering.
        let bounds = bounds.map(|union| {
            union.translate(Point::new(0.0, -union.height() / 2.0 + last_ascent / 2.0))
        });

        trace!(entity:%, lines = lines.len(), bounds:?; "Laid out text");
        Ok(bounds.map(|bounds| TextBlock {
            id: entity,
            runs,
            bounds,
        }))
    }

    /// Breaks the tokens into lines, wrapping before any character that
    /// would overflow `width`.
    fn wrap(&self, tokens: &[RunToken], style: &TextStyle, width: f32) -> Vec<Line> {
        let base_face = style.face();
        let default_color = style.font_color().unwrap_or(style.stroke_color());
        let wrap_width = (width > 0.0).then_some(width);

        let mut lines = Vec::new();
        let mut line = Line::default();
        for token in tokens {
            let run = match token {
                RunToken::LineBreak => {
                    lines.push(std::mem::take(&mut line));
                    continue;
                }
                RunToken::Text(run) => run,
            };

            let face = if style.formatted() {
                let variant = base_face.variant();
                base_face.with_variant(FontVariant::from_flags(
                    run.bold || variant.is_bold(),
                    run.italic || variant.is_italic(),
                ))
            } else {
                base_face.clone()
            };
            let color = match run.color.as_deref().map(Color::new) {
                Some(Ok(color)) => color,
                Some(Err(err)) => {
                    debug!(err:%; "Ignoring invalid run color");
                    default_color
                }
                None => default_color,
            };

            for ch in run.text.chars() {
                let advance = self.metrics.advance(&face, ch);
                let overflows = wrap_width.is_some_and(|limit| line.width + advance > limit);
                if overflows && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(ch, advance, &face, color);
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }

    /// Tallest metrics among the faces used on a line
    fn line_metrics(&self, line: &Line, base_face: &FontFace) -> VerticalMetrics {
        if line.is_empty() {
            return self.metrics.vertical_metrics(base_face);
        }
        line.segments
            .iter()
            .map(|segment| self.metrics.vertical_metrics(&segment.face))
            .fold(
                VerticalMetrics {
                    ascent: 0.0,
                    descent: 0.0,
                    em_height: 0.0,
                },
                |acc, m| VerticalMetrics {
                    ascent: acc.ascent.max(m.ascent),
                    descent: acc.descent.max(m.descent),
                    em_height: acc.em_height.max(m.em_height),
                },
            )
    }

    fn place(&self, segment: &Segment, line_origin: Point) -> PlacedRun {
        let start = segment.glyphs.first().map_or(0.0, |(_, offset)| *offset);
        let outline = segment
            .glyphs
            .iter()
            .try_fold(Path::new(), |mut path, (ch, offset)| {
                let origin = line_origin.add_point(Point::new(*offset, 0.0));
                let glyph = self.metrics.glyph_outline(&segment.face, *ch, origin)?;
                path.append(&glyph);
                Some(path)
            });
        PlacedRun {
            text: segment.glyphs.iter().map(|(ch, _)| ch).collect(),
            face: segment.face.clone(),
            origin: line_origin.add_point(Point::new(start, 0.0)),
            color: segment.color,
            outline,
        }
    }
}

/// Baseline origin of a line before vertical stacking.
fn line_origin(
    frame: Bounds,
    alignment: Alignment,
    line_width: f32,
    metrics: VerticalMetrics,
) -> Point {
    let x = match alignment.outside_x {
        OutsidePosition::Before => frame.min_x() - frame.width(),
        OutsidePosition::Centered => frame.min_x(),
        OutsidePosition::After => frame.max_x(),
    };
    let y = match alignment.outside_y {
        OutsidePosition::Before => frame.min_y() - frame.height(),
        OutsidePosition::Centered => frame.min_y(),
        OutsidePosition::After => frame.max_y(),
    };
    let dx = match alignment.inside_x {
        InsideAlign::Start => 0.0,
        InsideAlign::Center => frame.width() / 2.0 - line_width / 2.0,
        InsideAlign::End => frame.width() - line_width,
    };
    let dy = match alignment.inside_y {
        InsideAlign::Start => metrics.em_height,
        InsideAlign::Center => frame.height() / 2.0 + metrics.ascent / 2.0,
        InsideAlign::End => frame.height() - metrics.descent,
    };
    Point::new(x + dx, y + dy)
}
