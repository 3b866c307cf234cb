//! Picks one font size for the whole run so the longest caption line fits
//! the padded frame width.

use titler_core::{CueIndex, Duration, Frame, TitlerError, TitlerResult};

use crate::text::{measure_line, point_to_px, Typeface};
use crate::timeline::TimelineWalker;

/// Point size the longest line is measured at before scaling.
pub const REFERENCE_POINT_SIZE: f32 = 24.0;

/// Fraction of the frame kept as the drawable box.
pub const FRAME_PADDING: f64 = 0.9;

/// Extra slack applied to the padded width when auto-sizing.
pub const AUTOSIZE_PADDING: f64 = 0.9;

/// Longest caption line (by character count) across every freshly queried
/// cue set. Carried-over sets are skipped so a long cue is counted once.
/// Ties keep the line found first.
pub fn longest_line<I>(index: &CueIndex, delays: I, offset: Duration) -> String
where
    I: IntoIterator<Item = Duration>,
{
    let mut walker = TimelineWalker::new(index, offset);
    let mut longest = String::new();
    let mut longest_len = 0usize;

    for delay in delays {
        let step = walker.step(delay);
        if !step.refreshed {
            continue;
        }
        for line in step.lines() {
            let len = line.chars().count();
            if len > longest_len {
                longest_len = len;
                longest = line.to_string();
            }
        }
    }
    longest
}

/// Point size at which `line` spans 81% of `frame_width`, assuming width
/// scales linearly with size.
pub fn fit_font_size(
    line: &str,
    frame_width: u32,
    face: &dyn Typeface,
    dpi: f32,
) -> TitlerResult<f32> {
    if line.is_empty() {
        return Err(TitlerError::DegenerateAutoSize(
            "no caption text to measure".into(),
        ));
    }

    let padded_width = (FRAME_PADDING * frame_width as f64) as i64;
    let desired_width = padded_width as f64 * AUTOSIZE_PADDING;

    let reference_px = point_to_px(REFERENCE_POINT_SIZE, dpi);
    let measured = measure_line(face, line, reference_px).floor() as f64;
    if measured <= 0.0 {
        return Err(TitlerError::DegenerateAutoSize(format!(
            "line '{}' measures {}px at {}pt",
            line, measured, REFERENCE_POINT_SIZE
        )));
    }

    Ok((REFERENCE_POINT_SIZE as f64 * desired_width / measured) as f32)
}

/// Auto-size for a frame sequence. The first frame's width stands in for
/// every frame.
pub fn auto_font_size(
    frames: &[Frame],
    index: &CueIndex,
    offset: Duration,
    face: &dyn Typeface,
    dpi: f32,
) -> TitlerResult<f32> {
    let first = frames
        .first()
        .ok_or_else(|| TitlerError::Render("no frames to size captions for".into()))?;
    let line = longest_line(index, frames.iter().map(|f| f.delay), offset);
    tracing::debug!("Longest caption line: {:?}", line);
    fit_font_size(&line, first.width(), face, dpi)
}
