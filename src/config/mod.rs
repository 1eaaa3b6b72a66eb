//! Scene configuration and the built-in studio presets.

/// Built-in studio process and team network.
pub mod presets;
/// JSON-loadable scene configuration.
pub mod scene;
