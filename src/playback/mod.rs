//! Host-driven playback of step timelines.

/// Playback and control-mode state machines.
pub mod animator;
/// Host commands and key chords.
pub mod input;
