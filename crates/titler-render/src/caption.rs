//! Caption layout and stroked rasterization for a single frame.
//!
//! Lines stack upward from the bottom of the padded box: the last caption
//! line sits on the padded baseline, each earlier line one line height plus
//! twice the stroke weight above the line below it. Every line is centered
//! on the full frame width on its own.

use titler_core::{FrameBuffer, Ink, MAX_STROKE_WEIGHT};

use crate::autosize::FRAME_PADDING;
use crate::text::{measure_line, FontParams, ShapedLine, Typeface};

/// Where one caption line is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Pen origin x.
    pub x: f32,
    /// Baseline y.
    pub baseline: f32,
    pub width: f32,
    /// The line plus its outline is wider than the padded box.
    pub overflows: bool,
}

/// Summary of one frame's render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub lines: usize,
    pub overflowed: usize,
}

/// Place every non-blank line of `text` on a `width` x `height` frame.
/// Lines are returned top to bottom.
pub fn layout_caption(
    text: &str,
    width: u32,
    height: u32,
    font: &FontParams,
    face: &dyn Typeface,
) -> Vec<PlacedLine> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let padded_width = (FRAME_PADDING * width as f64) as i64 as f32;
    let padded_height = (FRAME_PADDING * height as f64) as i64 as f32;
    let px = font.pixel_size();
    let line_height = face.line_height(px);
    let stroke = font.stroke_weight.min(MAX_STROKE_WEIGHT) as f32;

    let mut placed = Vec::with_capacity(lines.len());
    let mut offset = 0.0f32;
    for line in lines.iter().rev() {
        let line_width = measure_line(face, line, px);
        placed.push(PlacedLine {
            text: line.to_string(),
            x: width as f32 / 2.0 - line_width / 2.0,
            baseline: padded_height - offset,
            width: line_width,
            overflows: line_width + 2.0 * stroke > padded_width,
        });
        offset += line_height + 2.0 * stroke;
    }
    placed.reverse();
    placed
}

/// Draw `text` onto `fb` with a rounded outline: the line is stamped in
/// [`Ink::Stroke`] at every offset inside the stroke disk, then once in
/// [`Ink::Fill`] at its exact position. Lines wider than the padded box are
/// drawn anyway and reported.
pub fn render_caption(
    fb: &mut FrameBuffer,
    text: &str,
    font: &FontParams,
    face: &dyn Typeface,
) -> RenderReport {
    let placed = layout_caption(text, fb.width, fb.height, font, face);
    let px = font.pixel_size();
    let offsets = stroke_offsets(font.stroke_weight);
    let mut report = RenderReport::default();

    for line in &placed {
        if line.overflows {
            tracing::warn!(
                "Caption line {:?} is {:.0}px wide (+{}px outline), wider than the {}px available",
                line.text,
                line.width,
                2 * u64::from(font.stroke_weight),
                (FRAME_PADDING * fb.width as f64) as i64,
            );
            report.overflowed += 1;
        }

        let shaped = ShapedLine::new(face, &line.text, px);
        let x = line.x.round() as i32;
        let baseline = line.baseline.round() as i32;

        for &(dx, dy) in &offsets {
            shaped.stamp(fb, x + dx, baseline + dy, Ink::Stroke);
        }
        shaped.stamp(fb, x, baseline, Ink::Fill);
        report.lines += 1;
    }

    report
}

/// Offsets the outline is stamped at: every point strictly inside a disk of
/// radius `weight`, which rounds the outline's corners. Weights above
/// [`MAX_STROKE_WEIGHT`] are clamped to it.
pub fn stroke_offsets(weight: u32) -> Vec<(i32, i32)> {
    let w = i64::from(weight.min(MAX_STROKE_WEIGHT));
    let mut offsets = Vec::new();
    for dy in -w..=w {
        for dx in -w..=w {
            if dx * dx + dy * dy < w * w {
                offsets.push((dx as i32, dy as i32));
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::BlockFace;

    const BG: [u8; 4] = [0, 128, 0, 255];

    fn params(size: f32, stroke: u32) -> FontParams {
        FontParams::new(size, 72.0, stroke)
    }

    #[test]
    fn test_layout_empty_text() {
        let face = BlockFace::new(0.5);
        assert!(layout_caption("", 100, 100, &params(10.0, 2), &face).is_empty());
        assert!(layout_caption(" \n\n  \n", 100, 100, &params(10.0, 2), &face).is_empty());
    }

    #[test]
    fn test_layout_single_line_centered_on_padded_baseline() {
        let face = BlockFace::new(0.5);
        let placed = layout_caption("  abcd  ", 100, 50, &params(10.0, 2), &face);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "abcd");
        assert_eq!(placed[0].width, 20.0);
        assert_eq!(placed[0].x, 40.0);
        assert_eq!(placed[0].baseline, 45.0);
        assert!(!placed[0].overflows);
    }

    #[test]
    fn test_layout_stacks_bottom_up() {
        let face = BlockFace::new(0.5);
        let placed = layout_caption("one\ntwo\n\nthree", 200, 100, &params(10.0, 3), &face);
        let texts: Vec<_> = placed.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        // line height 10 + 2 * stroke 3 = 16 between baselines
        assert_eq!(placed[2].baseline, 90.0);
        assert_eq!(placed[1].baseline, 74.0);
        assert_eq!(placed[0].baseline, 58.0);
        // each line centered on its own width
        assert_eq!(placed[2].x, 100.0 - 12.5);
        assert_eq!(placed[0].x, 100.0 - 7.5);
    }

    #[test]
    fn test_layout_flags_overflow() {
        let face = BlockFace::new(0.5);
        // padded width 90; 18 chars * 5 = 90, plus 2 * 1 stroke overflows
        let placed = layout_caption(&"x".repeat(18), 100, 100, &params(10.0, 1), &face);
        assert!(placed[0].overflows);
        let placed = layout_caption(&"x".repeat(17), 100, 100, &params(10.0, 1), &face);
        assert!(!placed[0].overflows);
    }

    #[test]
    fn test_stroke_offsets_disk() {
        assert!(stroke_offsets(0).is_empty());
        assert_eq!(stroke_offsets(1), vec![(0, 0)]);
        let three = stroke_offsets(3);
        assert_eq!(three.len(), 25);
        assert!(!three.contains(&(3, 0)));
        assert!(!three.contains(&(2, 3)));
        assert!(three.contains(&(2, 2)));
        assert!(three.contains(&(0, -2)));
    }

    #[test]
    fn test_stroke_offsets_huge_weight_clamped() {
        let huge = stroke_offsets(50_000);
        assert_eq!(huge.len(), stroke_offsets(MAX_STROKE_WEIGHT).len());
        assert!(huge.contains(&(254, 0)));
        assert!(!huge.contains(&(255, 0)));
    }

    #[test]
    fn test_render_empty_caption_is_noop() {
        let face = BlockFace::new(0.5);
        let mut fb = FrameBuffer::solid(64, 48, BG);
        let before = fb.clone();
        let report = render_caption(&mut fb, "", &params(10.0, 3), &face);
        assert_eq!(report, RenderReport::default());
        assert_eq!(fb, before);
    }

    #[test]
    fn test_render_fill_over_stroke() {
        let face = BlockFace::new(0.5);
        let mut fb = FrameBuffer::solid(100, 50, BG);
        let report = render_caption(&mut fb, "abcd", &params(10.0, 2), &face);
        assert_eq!(report, RenderReport { lines: 1, overflowed: 0 });

        // glyph body (x 40..44, rows 38..45) is white
        assert_eq!(fb.get_pixel(41, 40), Some([255, 255, 255, 255]));
        // just left of the first glyph is outline
        assert_eq!(fb.get_pixel(39, 40), Some([0, 0, 0, 255]));
        // the outline is rounded: the diagonal corner stays untouched
        assert_eq!(fb.get_pixel(38, 36), Some(BG));
        // far away from the text nothing changes
        assert_eq!(fb.get_pixel(5, 5), Some(BG));
    }

    #[test]
    fn test_render_reports_overflow() {
        let face = BlockFace::new(0.5);
        let mut fb = FrameBuffer::solid(100, 100, BG);
        let report = render_caption(&mut fb, &"x".repeat(40), &params(10.0, 1), &face);
        assert_eq!(report, RenderReport { lines: 1, overflowed: 1 });
    }
}
