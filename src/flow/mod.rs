//! Marker flow through the team network diagram.

/// Frame-driven flow simulation.
pub mod animator;
/// Marker records and counters.
pub mod markers;
