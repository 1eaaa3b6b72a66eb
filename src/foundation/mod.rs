//! Shared primitives: errors, geometry re-exports, colors, and small math helpers.

/// Straight-alpha colors.
pub mod color;
/// Frame rates, canvases, and geometry re-exports.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Interpolation and pixel helpers.
pub mod math;
