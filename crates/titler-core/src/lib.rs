//! # titler-core
//!
//! Core types shared by every giftitler crate: timecodes, subtitle cues and
//! their index, frame buffers, the reserved caption inks, error types and the
//! run configuration.

pub mod color;
pub mod config;
pub mod cue;
pub mod error;
pub mod frame;
pub mod time;

pub use color::Ink;
pub use config::{Strictness, TitlerConfig, MAX_STROKE_WEIGHT};
pub use cue::{Cue, CueBounds, CueIndex};
pub use error::{TitlerError, TitlerResult};
pub use frame::{Frame, FrameBuffer};
pub use time::{Duration, Timestamp};
