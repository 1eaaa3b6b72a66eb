//! Process data model and its choreography.

/// Timeline generation from a process.
pub mod choreography;
/// Steps, stages, and processes.
pub mod model;
