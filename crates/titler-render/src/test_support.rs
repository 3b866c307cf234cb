use crate::text::{GlyphBitmap, Typeface};

/// Monospace face where every visible character is a solid box resting on
/// the baseline. Lets layout and raster tests run without a font file.
pub struct BlockFace {
    /// Advance per character, as a fraction of the pixel size.
    pub advance: f32,
    /// Box height as a fraction of the pixel size.
    pub ascent: f32,
    /// Line height as a fraction of the pixel size.
    pub line_height: f32,
}

impl BlockFace {
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            ascent: 0.75,
            line_height: 1.0,
        }
    }
}

impl Typeface for BlockFace {
    fn line_height(&self, px: f32) -> f32 {
        self.line_height * px
    }

    fn advance(&self, _ch: char, px: f32) -> f32 {
        self.advance * px
    }

    fn glyph(&self, ch: char, px: f32) -> GlyphBitmap {
        if ch.is_whitespace() {
            return GlyphBitmap::default();
        }
        let width = ((self.advance * px) as usize).saturating_sub(1);
        let height = (self.ascent * px) as usize;
        GlyphBitmap {
            xmin: 0,
            ymin: 0,
            width,
            height,
            coverage: vec![255; width * height],
        }
    }
}
