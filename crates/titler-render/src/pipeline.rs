use std::sync::Arc;

use rayon::prelude::*;
use titler_core::{CueIndex, Duration, Frame, TitlerResult};

use crate::autosize::auto_font_size;
use crate::caption::{render_caption, RenderReport};
use crate::text::{FontParams, Typeface};
use crate::timeline::plan_captions;

/// Totals for one captioning run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    /// Frames that had a caption drawn on them.
    pub captioned: usize,
    pub overflowed_lines: usize,
    /// Point size actually used (the computed one when auto-sizing).
    pub font_size: f32,
}

/// Burns captions into a frame sequence.
///
/// The timeline walk runs on the calling thread; each frame that gets a
/// caption is then rendered as its own rayon task. Frames are disjoint, and
/// the face and font parameters are shared read-only.
pub struct CaptionRenderer {
    face: Arc<dyn Typeface>,
    font: FontParams,
}

impl CaptionRenderer {
    pub fn new(face: Arc<dyn Typeface>, font: FontParams) -> Self {
        Self { face, font }
    }

    /// Caption every frame in place. A font size of 0 is replaced by an
    /// auto-sized one before any frame is drawn.
    pub fn render_sequence(
        &self,
        frames: &mut [Frame],
        cues: &CueIndex,
        offset: Duration,
    ) -> TitlerResult<RunSummary> {
        let captions = plan_captions(cues, frames.iter().map(|f| f.delay), offset);
        let captioned = captions.iter().filter(|c| c.is_some()).count();
        tracing::debug!(
            "Resolved captions for {} of {} frames",
            captioned,
            frames.len()
        );

        let mut font = self.font;
        if captioned == 0 {
            tracing::info!("No cues fall inside the animation; frames left untouched");
            return Ok(RunSummary {
                frames: frames.len(),
                captioned: 0,
                overflowed_lines: 0,
                font_size: font.size,
            });
        }
        if font.size == 0.0 {
            let size = auto_font_size(frames, cues, offset, self.face.as_ref(), font.dpi)?;
            tracing::info!("Calculated font size to be {:.2}pt", size);
            font = font.with_size(size);
        }

        let face = self.face.as_ref();
        let reports: Vec<RenderReport> = frames
            .par_iter_mut()
            .zip(captions.par_iter())
            .filter_map(|(frame, caption)| {
                caption
                    .as_deref()
                    .map(|text| render_caption(&mut frame.buffer, text, &font, face))
            })
            .collect();

        Ok(RunSummary {
            frames: frames.len(),
            captioned: reports.len(),
            overflowed_lines: reports.iter().map(|r| r.overflowed).sum(),
            font_size: font.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::BlockFace;
    use titler_core::{Cue, FrameBuffer, Timestamp, TitlerError};

    const BG: [u8; 4] = [0, 128, 0, 255];

    fn frames(count: usize, delay_ms: u64) -> Vec<Frame> {
        (0..count)
            .map(|_| Frame::new(FrameBuffer::solid(120, 60, BG), Duration::from_millis(delay_ms)))
            .collect()
    }

    fn renderer(size: f32) -> CaptionRenderer {
        CaptionRenderer::new(Arc::new(BlockFace::new(0.5)), FontParams::new(size, 72.0, 2))
    }

    #[test]
    fn test_no_cues_leaves_frames_untouched() {
        let mut seq = frames(4, 100);
        let before = seq.clone();
        let summary = renderer(0.0)
            .render_sequence(&mut seq, &CueIndex::default(), Duration::ZERO)
            .unwrap();
        assert_eq!(summary.captioned, 0);
        assert_eq!(summary.frames, 4);
        assert_eq!(seq, before);
    }

    #[test]
    fn test_auto_size_applied() {
        let cues = CueIndex::new(vec![Cue::new(
            Timestamp::ZERO,
            Timestamp::from_millis(1_000),
            "HELLO",
        )]);
        let mut seq = frames(2, 100);
        let summary = renderer(0.0)
            .render_sequence(&mut seq, &cues, Duration::ZERO)
            .unwrap();
        // 120px frame: floor(0.9 * 120) * 0.9 = 97.2; "HELLO" is 60px at 24pt
        assert!((summary.font_size - 24.0 * 97.2 / 60.0).abs() < 1e-3);
        assert_eq!(summary.captioned, 2);
    }

    #[test]
    fn test_explicit_size_kept() {
        let cues = CueIndex::new(vec![Cue::new(
            Timestamp::ZERO,
            Timestamp::from_millis(150),
            "hi",
        )]);
        let mut seq = frames(3, 100);
        let summary = renderer(10.0)
            .render_sequence(&mut seq, &cues, Duration::ZERO)
            .unwrap();
        assert_eq!(summary.font_size, 10.0);
        assert_eq!(summary.captioned, 2);
        assert_ne!(seq[0].buffer, FrameBuffer::solid(120, 60, BG));
        assert_eq!(seq[2].buffer, FrameBuffer::solid(120, 60, BG));
    }

    #[test]
    fn test_auto_size_failure_stops_run() {
        let cues = CueIndex::new(vec![Cue::new(
            Timestamp::ZERO,
            Timestamp::from_millis(1_000),
            "",
        )]);
        let mut seq = frames(3, 100);
        let before = seq.clone();
        let err = renderer(0.0)
            .render_sequence(&mut seq, &cues, Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, TitlerError::DegenerateAutoSize(_)));
        assert_eq!(seq, before);
    }
}
