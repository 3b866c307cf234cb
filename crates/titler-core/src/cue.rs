//! Subtitle cues and the start-ordered index the caption timeline queries.

use serde::{Deserialize, Serialize};

use crate::time::{Duration, Timestamp};

/// Optional on-screen box carried by some SubRip cues
/// (`X1:left X2:right Y1:top Y2:bottom`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueBounds {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// A timestamped caption. `text` may contain embedded `\n` line breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub start: Timestamp,
    pub end: Timestamp,
    pub text: String,
    /// Positioning hint from the source file. Parsed and kept, never used
    /// for layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<CueBounds>,
}

impl Cue {
    pub fn new(start: Timestamp, end: Timestamp, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: CueBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Text lines of this cue, split on embedded line breaks.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Every cue of a run, sorted once by start time.
#[derive(Debug, Clone, Default)]
pub struct CueIndex {
    cues: Vec<Cue>,
}

impl CueIndex {
    /// Build the index. The sort is stable, so cues sharing a start time
    /// keep their source order.
    pub fn new(mut cues: Vec<Cue>) -> Self {
        cues.sort_by_key(|cue| cue.start);
        Self { cues }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    /// Cues that begin inside the window `[window_start, window_start + window_len]`.
    ///
    /// A cue that started before `window_start` is not returned even when it
    /// is still on screen; the timeline walker keeps such cues alive by
    /// holding its previous result until the last held cue ends.
    pub fn active(&self, window_start: Timestamp, window_len: Duration) -> Vec<&Cue> {
        let window_end = window_start + window_len;
        let mut found = Vec::new();
        for cue in &self.cues {
            if cue.start < window_start {
                continue;
            }
            if cue.start > window_end {
                break;
            }
            found.push(cue);
        }
        found
    }
}

impl From<Vec<Cue>> for CueIndex {
    fn from(cues: Vec<Cue>) -> Self {
        CueIndex::new(cues)
    }
}
