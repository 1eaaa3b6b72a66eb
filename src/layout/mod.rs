//! Pure geometry: stage marker placement, polylines, and the flow network diagram.

/// Team network diagram geometry.
pub mod network;
/// Arc-length parameterized polylines.
pub mod polyline;
/// Stage marker layouts.
pub mod stage;
