//! Easing curves and the seekable segment timeline.

/// Named easing curves.
pub mod ease;
/// Segment timeline builder and sampler.
pub mod timeline;
