use serde::{Deserialize, Serialize};

/// The two reserved colors caption rendering paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ink {
    /// Outline drawn around the glyphs (black).
    Stroke,
    /// Glyph body drawn on top of the outline (white).
    Fill,
}

impl Ink {
    /// Opaque RGB value of this ink.
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            Ink::Stroke => [0, 0, 0],
            Ink::Fill => [255, 255, 255],
        }
    }

    /// Opaque RGBA value of this ink.
    pub const fn rgba(self) -> [u8; 4] {
        let [r, g, b] = self.rgb();
        [r, g, b, 255]
    }
}
