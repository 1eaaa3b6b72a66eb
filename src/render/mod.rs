//! Draw-command lowering, rasterization, and the batch render pipeline.

/// Backend-neutral draw commands.
pub mod command;
/// Fixed-clock sampling and batch rasterization.
pub mod pipeline;
/// SVG rasterization.
pub mod raster;
/// SVG document output.
pub mod svg;
