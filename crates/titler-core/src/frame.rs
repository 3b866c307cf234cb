use crate::color::Ink;
use crate::time::Duration;

/// An 8-bit RGBA pixel buffer (4 bytes per pixel, row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Create a frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&rgba);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap existing RGBA bytes. Returns None if the length does not match.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    /// Paint `ink` over the pixel at (x, y) with the given coverage (0-255).
    /// Signed coordinates so glyphs hanging off an edge clip cleanly.
    pub fn paint(&mut self, x: i32, y: i32, ink: Ink, coverage: u8) {
        if coverage == 0 || x < 0 || y < 0 {
            return;
        }
        if x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let dst = &mut self.data[offset..offset + 4];
        if coverage == 255 {
            dst.copy_from_slice(&ink.rgba());
            return;
        }

        let sa = coverage as u32;
        let inv_sa = 255 - sa;
        let [r, g, b] = ink.rgb();
        for (d, s) in dst.iter_mut().zip([r, g, b]) {
            *d = ((s as u32 * sa + *d as u32 * inv_sa) / 255) as u8;
        }
        dst[3] = (sa + (dst[3] as u32 * inv_sa) / 255) as u8;
    }
}

/// One frame of an animated sequence: its pixels plus how long it stays on
/// screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub buffer: FrameBuffer,
    pub delay: Duration,
}

impl Frame {
    pub fn new(buffer: FrameBuffer, delay: Duration) -> Self {
        Self { buffer, delay }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    pub fn height(&self) -> u32 {
        self.buffer.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_buffer_solid() {
        let fb = FrameBuffer::solid(320, 240, [1, 2, 3, 4]);
        assert_eq!(fb.data.len(), 320 * 240 * 4);
        assert_eq!(fb.get_pixel(319, 239), Some([1, 2, 3, 4]));
    }

    #[test]
    fn test_frame_buffer_from_raw_checks_len() {
        assert!(FrameBuffer::from_raw(2, 2, vec![0; 16]).is_some());
        assert!(FrameBuffer::from_raw(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_frame_buffer_get_pixel() {
        let mut data = vec![0; 10 * 10 * 4];
        data[(5 * 10 + 5) * 4..][..4].copy_from_slice(&[128, 64, 32, 255]);
        let fb = FrameBuffer::from_raw(10, 10, data).unwrap();
        assert_eq!(fb.get_pixel(5, 5), Some([128, 64, 32, 255]));
        assert_eq!(fb.get_pixel(10, 0), None);
    }

    #[test]
    fn test_paint_full_coverage() {
        let mut fb = FrameBuffer::solid(3, 3, [10, 200, 30, 255]);
        fb.paint(1, 1, Ink::Fill, 255);
        assert_eq!(fb.get_pixel(1, 1), Some([255, 255, 255, 255]));
        fb.paint(1, 1, Ink::Stroke, 255);
        assert_eq!(fb.get_pixel(1, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_paint_partial_coverage_blends() {
        let mut fb = FrameBuffer::solid(1, 1, [0, 0, 0, 255]);
        fb.paint(0, 0, Ink::Fill, 128);
        let [r, g, b, a] = fb.get_pixel(0, 0).unwrap();
        assert!(r > 100 && r < 160);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_paint_clips_out_of_bounds() {
        let mut fb = FrameBuffer::solid(2, 2, [1, 2, 3, 255]);
        let before = fb.clone();
        fb.paint(-1, 0, Ink::Fill, 255);
        fb.paint(0, 2, Ink::Fill, 255);
        fb.paint(0, 0, Ink::Fill, 0);
        assert_eq!(fb, before);
    }
}
