//! # titler-encode
//!
//! Animated GIF in and out. Frames are handed to the caption engine as
//! composited RGBA buffers with their delays, and written back with the same
//! per-frame timing.

pub mod gif;

pub use gif::{decode_gif, GifEncoder};
