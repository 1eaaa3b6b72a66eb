//! Preview frame sinks.
//!
//! Sinks consume rasterized frames in index order and are fed by `render::pipeline::render_frames`.

/// `ffmpeg`-based MP4 output.
pub mod ffmpeg;
/// Numbered PNG frame output.
pub mod png;
/// Frame sink trait and the in-memory sink.
pub mod sink;
