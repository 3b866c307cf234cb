//! # titler-render
//!
//! The caption engine. Pairs every frame with the subtitle cues active
//! during its display window, optionally derives one font size for the run,
//! and rasterizes outlined text onto the frames in parallel.

pub mod autosize;
pub mod caption;
pub mod pipeline;
pub mod text;
pub mod timeline;

#[cfg(test)]
mod test_support;

pub use autosize::{auto_font_size, fit_font_size, longest_line};
pub use caption::{layout_caption, render_caption, PlacedLine, RenderReport};
pub use pipeline::{CaptionRenderer, RunSummary};
pub use text::{measure_line, FontParams, GlyphBitmap, OutlineFont, Typeface};
pub use timeline::{plan_captions, TimelineWalker, WalkStep};
