//! Text measurement and glyph stamping.
//! Uses fontdue for CPU-based font rasterization behind the [`Typeface`]
//! trait, so layout code never touches a concrete font type.

use std::path::Path;

use fontdue::{Font, FontSettings};
use titler_core::{FrameBuffer, Ink, TitlerError, TitlerResult};

/// A rasterized glyph: an 8-bit coverage mask plus its placement relative
/// to the pen position on the baseline.
#[derive(Debug, Clone, Default)]
pub struct GlyphBitmap {
    /// Left edge offset from the pen position.
    pub xmin: i32,
    /// Bottom edge offset from the baseline (negative for descenders).
    pub ymin: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// A measurable, rasterizable font face. Implementations are shared
/// read-only across render threads.
pub trait Typeface: Send + Sync {
    /// Baseline-to-baseline distance at `px` pixels per em.
    fn line_height(&self, px: f32) -> f32;

    /// Horizontal pen advance for `ch`.
    fn advance(&self, ch: char, px: f32) -> f32;

    /// Kerning adjustment between two adjacent characters.
    fn kern(&self, _left: char, _right: char, _px: f32) -> f32 {
        0.0
    }

    fn glyph(&self, ch: char, px: f32) -> GlyphBitmap;
}

/// Font size, resolution and outline settings for a whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontParams {
    /// Point size. 0 asks the renderer to compute one.
    pub size: f32,
    pub dpi: f32,
    /// Outline radius in pixels.
    pub stroke_weight: u32,
}

impl FontParams {
    pub fn new(size: f32, dpi: f32, stroke_weight: u32) -> Self {
        Self {
            size,
            dpi,
            stroke_weight,
        }
    }

    /// Pixels per em at this size and DPI.
    pub fn pixel_size(&self) -> f32 {
        point_to_px(self.size, self.dpi)
    }

    pub fn with_size(self, size: f32) -> Self {
        Self { size, ..self }
    }
}

impl Default for FontParams {
    fn default() -> Self {
        Self::new(0.0, 72.0, 3)
    }
}

/// Convert a point size to pixels per em.
pub fn point_to_px(points: f32, dpi: f32) -> f32 {
    points * dpi / 72.0
}

/// Outline font backed by fontdue.
pub struct OutlineFont {
    font: Font,
}

impl OutlineFont {
    /// Load a TrueType/OpenType font from a file path.
    pub fn load(path: &Path) -> TitlerResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| TitlerError::font(format!("failed to read font file: {}", e), path))?;
        Self::from_bytes(data).map_err(|e| match e {
            TitlerError::Font { message, .. } => TitlerError::font(message, path),
            other => other,
        })
    }

    pub fn from_bytes(data: Vec<u8>) -> TitlerResult<Self> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| TitlerError::font(format!("failed to parse font: {}", e), "<memory>"))?;
        Ok(Self { font })
    }

    pub fn name(&self) -> Option<&str> {
        self.font.name()
    }
}

impl Typeface for OutlineFont {
    fn line_height(&self, px: f32) -> f32 {
        self.font
            .horizontal_line_metrics(px)
            .map(|m| m.new_line_size)
            .unwrap_or(px * 1.3)
    }

    fn advance(&self, ch: char, px: f32) -> f32 {
        self.font.metrics(ch, px).advance_width
    }

    fn kern(&self, left: char, right: char, px: f32) -> f32 {
        self.font.horizontal_kern(left, right, px).unwrap_or(0.0)
    }

    fn glyph(&self, ch: char, px: f32) -> GlyphBitmap {
        let (metrics, coverage) = self.font.rasterize(ch, px);
        GlyphBitmap {
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            width: metrics.width,
            height: metrics.height,
            coverage,
        }
    }
}

/// Rendered pixel width of a single line, kerning included.
pub fn measure_line(face: &dyn Typeface, text: &str, px: f32) -> f32 {
    let mut width = 0.0;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(left) = prev {
            width += face.kern(left, ch, px);
        }
        width += face.advance(ch, px);
        prev = Some(ch);
    }
    width
}

/// A line rasterized once and stamped many times (every stroke offset plus
/// the fill pass).
pub struct ShapedLine {
    glyphs: Vec<(i32, GlyphBitmap)>,
}

impl ShapedLine {
    pub fn new(face: &dyn Typeface, text: &str, px: f32) -> Self {
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen = 0.0f32;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(left) = prev {
                pen += face.kern(left, ch, px);
            }
            let glyph = face.glyph(ch, px);
            if glyph.width > 0 && glyph.height > 0 {
                glyphs.push((pen.round() as i32, glyph));
            }
            pen += face.advance(ch, px);
            prev = Some(ch);
        }
        Self { glyphs }
    }

    /// Paint the line with its pen origin at `x` and baseline at `baseline`.
    pub fn stamp(&self, fb: &mut FrameBuffer, x: i32, baseline: i32, ink: Ink) {
        for (pen, glyph) in &self.glyphs {
            let left = x + pen + glyph.xmin;
            let top = baseline - (glyph.height as i32 + glyph.ymin);
            for gy in 0..glyph.height {
                let row = &glyph.coverage[gy * glyph.width..(gy + 1) * glyph.width];
                for (gx, &coverage) in row.iter().enumerate() {
                    fb.paint(left + gx as i32, top + gy as i32, ink, coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::BlockFace;

    #[test]
    fn test_point_to_px() {
        assert_eq!(point_to_px(24.0, 72.0), 24.0);
        assert_eq!(point_to_px(24.0, 96.0), 32.0);
        assert_eq!(FontParams::new(12.0, 144.0, 3).pixel_size(), 24.0);
    }

    #[test]
    fn test_measure_line() {
        let face = BlockFace::new(0.5);
        assert_eq!(measure_line(&face, "abcd", 20.0), 40.0);
        assert_eq!(measure_line(&face, "", 20.0), 0.0);
    }

    #[test]
    fn test_stamp_paints_glyph_boxes() {
        let face = BlockFace::new(0.5);
        let line = ShapedLine::new(&face, "a b", 10.0);
        let mut fb = FrameBuffer::solid(40, 20, [0, 128, 0, 255]);
        line.stamp(&mut fb, 2, 15, Ink::Fill);

        // first glyph occupies x 2..6, rows above the baseline
        assert_eq!(fb.get_pixel(2, 14), Some([255, 255, 255, 255]));
        assert_eq!(fb.get_pixel(5, 14), Some([255, 255, 255, 255]));
        // the space leaves a gap
        assert_eq!(fb.get_pixel(8, 14), Some([0, 128, 0, 255]));
        // third glyph at pen 10
        assert_eq!(fb.get_pixel(12, 14), Some([255, 255, 255, 255]));
        // nothing on or below the baseline
        assert_eq!(fb.get_pixel(2, 15), Some([0, 128, 0, 255]));
    }

    #[test]
    fn test_stamp_clips_at_edges() {
        let face = BlockFace::new(0.5);
        let line = ShapedLine::new(&face, "WIDE LINE", 10.0);
        let mut fb = FrameBuffer::solid(8, 8, [0, 0, 0, 255]);
        line.stamp(&mut fb, -3, 4, Ink::Fill);
        line.stamp(&mut fb, 0, 100, Ink::Fill);
        assert_eq!(fb.get_pixel(0, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_load_missing_font() {
        let result = OutlineFont::load(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(TitlerError::Font { .. })));
    }

    #[test]
    fn test_reject_garbage_font_bytes() {
        let result = OutlineFont::from_bytes(b"definitely not a font".to_vec());
        assert!(result.is_err());
    }
}
