//! Font metrics capability used by text layout.
//!
//! Text layout never decodes fonts itself. It asks a [`FontMetrics`]
//! provider for per-character advance widths, the vertical metrics of a face
//! and, when the provider can supply them, positioned glyph outlines.
//!
//! Two providers ship with mxdraw:
//!
//! - [`CosmicMetrics`] shapes characters with the system font database
//!   through cosmic-text and decodes unhinted glyph outlines, so text is
//!   emitted as `<path>` elements.
//! - [`FixedMetrics`] derives every metric from the pixel size with fixed
//!   ratios. Output does not depend on installed fonts, which keeps tests and
//!   golden files reproducible.

use std::{
    collections::HashMap,
    fmt,
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
};

use cosmic_text::{
    Attrs, Buffer, CacheKey, CacheKeyFlags, Command, Family, FontSystem, LayoutGlyph, Metrics,
    Shaping, Style, SwashCache, Weight, fontdb,
};
use log::{debug, info};

use crate::{draw::Path, geometry::Point};

/// One of the four style variants of a font family.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    /// Selects the variant from bold and italic flags
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => Self::Regular,
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (true, true) => Self::BoldItalic,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }
}

impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Regular => "regular",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::BoldItalic => "bold-italic",
        })
    }
}

/// A concrete face: family, variant and pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    family: String,
    variant: FontVariant,
    size_px: f32,
}

impl FontFace {
    pub fn new(family: impl Into<String>, variant: FontVariant, size_px: f32) -> Self {
        Self {
            family: family.into(),
            variant,
            size_px,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn variant(&self) -> FontVariant {
        self.variant
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// The same family and size in another variant
    pub fn with_variant(&self, variant: FontVariant) -> Self {
        Self {
            variant,
            ..self.clone()
        }
    }

    fn cache_key(&self) -> FaceKey {
        FaceKey {
            family: self.family.clone(),
            variant: self.variant,
            size_bits: self.size_px.to_bits(),
        }
    }
}

/// Vertical metrics of a face, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMetrics {
    /// Distance from the baseline to the top of the em box
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the em box, positive
    pub descent: f32,
    /// Units-per-em scaled to the pixel size
    pub em_height: f32,
}

/// Provider of glyph metrics and outlines.
pub trait FontMetrics {
    /// Horizontal advance of `ch` in pixels
    fn advance(&self, face: &FontFace, ch: char) -> f32;

    /// Ascent, descent and em height of the face
    fn vertical_metrics(&self, face: &FontFace) -> VerticalMetrics;

    /// Outline of `ch` with its baseline origin placed at `origin`.
    ///
    /// Providers that cannot decode outlines return `None`, in which case the
    /// text is written as text rather than as paths.
    fn glyph_outline(&self, _face: &FontFace, _ch: char, _origin: Point) -> Option<Path> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    variant: FontVariant,
    size_bits: u32,
}

#[derive(Default)]
struct MetricsCache {
    advances: HashMap<(FaceKey, char), f32>,
    vertical: HashMap<FaceKey, VerticalMetrics>,
}

/// A single line shaped by cosmic-text.
struct ShapedLine {
    width: f32,
    glyphs: Vec<LayoutGlyph>,
}

/// Metrics and outlines from real fonts, shaped with cosmic-text.
///
/// Advances and vertical metrics are cached per face and character; the
/// `FontSystem` is created once and shared behind a mutex. Outlines are
/// scaled without hinting so they match the advances exactly.
pub struct CosmicMetrics {
    font_system: Arc<Mutex<FontSystem>>,
    swash_cache: Mutex<SwashCache>,
    cache: Mutex<MetricsCache>,
    outlines: bool,
}

impl Default for CosmicMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CosmicMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmicMetrics")
            .field("outlines", &self.outlines)
            .finish_non_exhaustive()
    }
}

impl CosmicMetrics {
    /// Metrics over the system font database.
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self::from_font_system(FontSystem::new())
    }

    /// Metrics over the system fonts plus the given font files.
    ///
    /// Files that cannot be read are skipped by the font database.
    pub fn with_font_files<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let sources: Vec<_> = paths
            .into_iter()
            .map(|path| fontdb::Source::File(path.into()))
            .collect();
        info!(extra_fonts = sources.len(); "Initializing FontSystem");
        Self::from_font_system(FontSystem::new_with_fonts(sources))
    }

    fn from_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system: Arc::new(Mutex::new(font_system)),
            swash_cache: Mutex::new(SwashCache::new()),
            cache: Mutex::new(MetricsCache::default()),
            outlines: true,
        }
    }

    /// Enables or disables glyph outlines. Without outlines text is written
    /// as `<text>` runs.
    pub fn with_outlines(mut self, outlines: bool) -> Self {
        self.outlines = outlines;
        self
    }

    /// Shapes `text` on a single unbounded line.
    fn shape_line(font_system: &mut FontSystem, face: &FontFace, text: &str) -> Option<ShapedLine> {
        let size = face.size_px();
        let metrics = Metrics::new(size, size);
        let mut buffer = Buffer::new(font_system, metrics);
        let mut buffer = buffer.borrow_with(font_system);

        let attrs = Attrs::new()
            .family(Family::Name(face.family()))
            .weight(if face.variant().is_bold() {
                Weight::BOLD
            } else {
                Weight::NORMAL
            })
            .style(if face.variant().is_italic() {
                Style::Italic
            } else {
                Style::Normal
            });

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let run = buffer.layout_runs().next()?;
        let width = run
            .glyphs
            .last()
            .map(|glyph| glyph.x + glyph.w)
            .unwrap_or_default();
        Some(ShapedLine {
            width,
            glyphs: run.glyphs.to_vec(),
        })
    }

    fn fallback_advance(face: &FontFace) -> f32 {
        face.size_px() * 0.55
    }

    /// Ascent and descent of the font that shapes `H` in this face, scaled
    /// from font units to pixels.
    fn font_vertical_metrics(&self, face: &FontFace) -> Option<VerticalMetrics> {
        let mut font_system = self.lock_fonts();
        let shaped = Self::shape_line(&mut font_system, face, "H")?;
        let glyph = shaped.glyphs.first()?;
        let font = font_system.get_font(glyph.font_id, glyph.font_weight)?;

        let metrics = font.metrics();
        if metrics.units_per_em == 0 {
            return None;
        }
        let scale = face.size_px() / f32::from(metrics.units_per_em);
        Some(VerticalMetrics {
            ascent: metrics.ascent * scale,
            descent: -metrics.descent * scale,
            em_height: face.size_px(),
        })
    }

    fn lock_fonts(&self) -> MutexGuard<'_, FontSystem> {
        self.font_system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_cache(&self) -> MutexGuard<'_, MetricsCache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FontMetrics for CosmicMetrics {
    fn advance(&self, face: &FontFace, ch: char) -> f32 {
        let key = (face.cache_key(), ch);
        if let Some(advance) = self.lock_cache().advances.get(&key) {
            return *advance;
        }

        let mut buf = [0u8; 4];
        let shaped = Self::shape_line(&mut self.lock_fonts(), face, ch.encode_utf8(&mut buf));
        let advance = match shaped {
            Some(line) if line.width > 0.0 || ch.is_whitespace() => line.width,
            _ => {
                debug!(ch:?, family = face.family(); "No glyph shaped, using fallback advance");
                Self::fallback_advance(face)
            }
        };
        self.lock_cache().advances.insert(key, advance);
        advance
    }

    fn vertical_metrics(&self, face: &FontFace) -> VerticalMetrics {
        let key = face.cache_key();
        if let Some(metrics) = self.lock_cache().vertical.get(&key) {
            return *metrics;
        }

        let metrics = self.font_vertical_metrics(face).unwrap_or_else(|| {
            debug!(family = face.family(); "No font metrics, using fixed ratios");
            FixedMetrics::default().vertical_metrics(face)
        });
        self.lock_cache().vertical.insert(key, metrics);
        metrics
    }

    fn glyph_outline(&self, face: &FontFace, ch: char, origin: Point) -> Option<Path> {
        if !self.outlines {
            return None;
        }
        if ch.is_whitespace() {
            return Some(Path::new());
        }

        let mut font_system = self.lock_fonts();
        let mut buf = [0u8; 4];
        let shaped = Self::shape_line(&mut font_system, face, ch.encode_utf8(&mut buf))?;
        let mut swash_cache = self
            .swash_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut path = Path::new();
        for glyph in &shaped.glyphs {
            let (key, _, _) = CacheKey::new(
                glyph.font_id,
                glyph.glyph_id,
                glyph.font_size,
                (0.0, 0.0),
                glyph.font_weight,
                glyph.cache_key_flags | CacheKeyFlags::DISABLE_HINTING,
            );
            let commands = swash_cache.get_outline_commands(&mut font_system, key)?;

            // Outlines are y-up around the glyph origin.
            let base = origin.add_point(Point::new(
                glyph.x + glyph.font_size * glyph.x_offset,
                glyph.y - glyph.font_size * glyph.y_offset,
            ));
            let at = |x: f32, y: f32| base.add_point(Point::new(x, -y));
            for command in commands {
                match *command {
                    Command::MoveTo(p) => path.move_to(at(p.x, p.y)),
                    Command::LineTo(p) => path.line_to(at(p.x, p.y)),
                    Command::QuadTo(c, p) => path.quad_to(at(c.x, c.y), at(p.x, p.y)),
                    Command::CurveTo(c1, c2, p) => {
                        path.cubic_to(at(c1.x, c1.y), at(c2.x, c2.y), at(p.x, p.y))
                    }
                    Command::Close => path.close(),
                }
            }
        }
        Some(path)
    }
}

/// Deterministic metrics computed from the pixel size.
///
/// Every character advances by `advance_ratio × size`, bold faces by an
/// extra `bold_widening` factor. Whitespace advances like any other
/// character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMetrics {
    advance_ratio: f32,
    ascent_ratio: f32,
    bold_widening: f32,
}

impl FixedMetrics {
    pub const DEFAULT_ADVANCE_RATIO: f32 = 0.5;
    pub const DEFAULT_ASCENT_RATIO: f32 = 0.75;

    pub fn new(advance_ratio: f32, ascent_ratio: f32) -> Self {
        Self {
            advance_ratio,
            ascent_ratio: ascent_ratio.clamp(0.0, 1.0),
            bold_widening: 1.0,
        }
    }

    /// Sets how much wider bold variants advance than regular ones
    pub fn with_bold_widening(mut self, factor: f32) -> Self {
        self.bold_widening = factor;
        self
    }
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ADVANCE_RATIO, Self::DEFAULT_ASCENT_RATIO)
    }
}

impl FontMetrics for FixedMetrics {
    fn advance(&self, face: &FontFace, _ch: char) -> f32 {
        let base = face.size_px() * self.advance_ratio;
        if face.variant().is_bold() {
            base * self.bold_widening
        } else {
            base
        }
    }

    fn vertical_metrics(&self, face: &FontFace) -> VerticalMetrics {
        let em_height = face.size_px();
        let ascent = em_height * self.ascent_ratio;
        VerticalMetrics {
            ascent,
            descent: em_height - ascent,
            em_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::draw::PathCommand;

    #[test]
    fn test_variant_from_flags() {
        assert_eq!(FontVariant::from_flags(false, false), FontVariant::Regular);
        assert_eq!(FontVariant::from_flags(true, false), FontVariant::Bold);
        assert_eq!(FontVariant::from_flags(false, true), FontVariant::Italic);
        assert_eq!(FontVariant::from_flags(true, true), FontVariant::BoldItalic);
        assert!(FontVariant::BoldItalic.is_bold());
        assert!(FontVariant::BoldItalic.is_italic());
    }

    #[test]
    fn test_fixed_metrics() {
        let metrics = FixedMetrics::new(0.5, 0.75).with_bold_widening(1.2);
        let face = FontFace::new("Helvetica", FontVariant::Regular, 16.0);

        assert_approx_eq!(f32, metrics.advance(&face, 'a'), 8.0);
        assert_approx_eq!(
            f32,
            metrics.advance(&face.with_variant(FontVariant::Bold), 'a'),
            9.6
        );

        let vertical = metrics.vertical_metrics(&face);
        assert_approx_eq!(f32, vertical.ascent, 12.0);
        assert_approx_eq!(f32, vertical.descent, 4.0);
        assert_approx_eq!(f32, vertical.em_height, 16.0);
        assert!(metrics.glyph_outline(&face, 'a', Point::default()).is_none());
    }

    #[test]
    fn test_cosmic_metrics_are_positive_and_cached() {
        let metrics = CosmicMetrics::new();
        let face = FontFace::new("sans-serif", FontVariant::Regular, 12.0);

        let first = metrics.advance(&face, 'W');
        let second = metrics.advance(&face, 'W');
        assert!(first > 0.0);
        assert_approx_eq!(f32, first, second);

        let vertical = metrics.vertical_metrics(&face);
        assert!(vertical.ascent > 0.0);
        assert!(vertical.descent >= 0.0);
        assert_approx_eq!(f32, vertical.em_height, 12.0);
    }

    fn dejavu() -> CosmicMetrics {
        CosmicMetrics::with_font_files([concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fonts/DejaVuSans.ttf"
        )])
    }

    #[test]
    fn test_dejavu_metrics_scale_font_units() {
        let metrics = dejavu();
        let face = FontFace::new("DejaVu Sans", FontVariant::Regular, 16.0);

        // unitsPerEm 2048, hhea ascender 1901 and descender -483.
        let vertical = metrics.vertical_metrics(&face);
        assert_approx_eq!(f32, vertical.ascent, 14.851_562, epsilon = 1e-3);
        assert_approx_eq!(f32, vertical.descent, 3.773_437_5, epsilon = 1e-3);
        assert_approx_eq!(f32, vertical.em_height, 16.0);

        // 'H' advances 1540 units.
        assert_approx_eq!(f32, metrics.advance(&face, 'H'), 12.031_25, epsilon = 1e-3);
    }

    #[test]
    fn test_dejavu_outline_is_placed_at_origin() {
        let metrics = dejavu();
        // At 2048px one pixel is one font unit.
        let face = FontFace::new("DejaVu Sans", FontVariant::Regular, 2048.0);
        let origin = Point::new(10.0, 100.0);

        // 'I' is the rectangle x 201..403, y 0..1493 in font units.
        let outline = metrics.glyph_outline(&face, 'I', origin).unwrap();
        assert!(matches!(
            outline.commands().first(),
            Some(PathCommand::MoveTo(_))
        ));
        assert!(matches!(outline.commands().last(), Some(PathCommand::Close)));

        let bounds = outline.control_bounds().unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 211.0, epsilon = 1e-2);
        assert_approx_eq!(f32, bounds.max_x(), 413.0, epsilon = 1e-2);
        assert_approx_eq!(f32, bounds.min_y(), -1393.0, epsilon = 1e-2);
        assert_approx_eq!(f32, bounds.max_y(), 100.0, epsilon = 1e-2);
    }

    #[test]
    fn test_cosmic_outlines_can_be_disabled() {
        let face = FontFace::new("DejaVu Sans", FontVariant::Regular, 16.0);

        let metrics = dejavu();
        let space = metrics.glyph_outline(&face, ' ', Point::default()).unwrap();
        assert!(space.is_empty());

        let metrics = metrics.with_outlines(false);
        assert!(metrics.glyph_outline(&face, 'I', Point::default()).is_none());
    }
}
