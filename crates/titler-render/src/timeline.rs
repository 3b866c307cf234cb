//! Walks the frame sequence along the subtitle timeline and decides which
//! cues each frame shows.
//!
//! The walker holds on to the cues returned by the last index query until
//! the last of them has ended. Because [`CueIndex::active`] only reports cues
//! that *start* inside a window, this hold is what keeps a long cue on screen
//! across the frames after the one it started in.

use titler_core::{Cue, CueIndex, Duration, Timestamp};

/// Outcome of advancing the walker by one frame.
#[derive(Debug, Clone)]
pub struct WalkStep<'a> {
    /// Start of this frame's display window.
    pub window_start: Timestamp,
    /// The held cue set for this frame, in start order.
    pub cues: Vec<&'a Cue>,
    /// True if the set came from a fresh index query on this step, false if
    /// it was carried over from an earlier frame.
    pub refreshed: bool,
}

impl WalkStep<'_> {
    /// Caption text for the frame: every held cue's text joined by line
    /// breaks, or None when nothing is held.
    pub fn caption(&self) -> Option<String> {
        if self.cues.is_empty() {
            return None;
        }
        let texts: Vec<&str> = self.cues.iter().map(|c| c.text.as_str()).collect();
        Some(texts.join("\n"))
    }

    /// Every individual text line across the held cues.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.cues.iter().flat_map(|c| c.lines())
    }
}

/// Running clock plus held cue set.
pub struct TimelineWalker<'a> {
    index: &'a CueIndex,
    now: Timestamp,
    held: Vec<&'a Cue>,
}

impl<'a> TimelineWalker<'a> {
    pub fn new(index: &'a CueIndex, offset: Duration) -> Self {
        Self {
            index,
            now: Timestamp::from(offset),
            held: Vec::new(),
        }
    }

    /// Current position on the timeline.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Advance past one frame that stays on screen for `delay`.
    pub fn step(&mut self, delay: Duration) -> WalkStep<'a> {
        let refreshed = match self.held.last() {
            None => true,
            Some(last) => last.end <= self.now,
        };
        if refreshed {
            self.held = self.index.active(self.now, delay);
        }

        let step = WalkStep {
            window_start: self.now,
            cues: self.held.clone(),
            refreshed,
        };
        self.now += delay;
        step
    }
}

/// Resolve the caption of every frame, given each frame's delay.
pub fn plan_captions<I>(index: &CueIndex, delays: I, offset: Duration) -> Vec<Option<String>>
where
    I: IntoIterator<Item = Duration>,
{
    let mut walker = TimelineWalker::new(index, offset);
    delays
        .into_iter()
        .map(|delay| walker.step(delay).caption())
        .collect()
}
