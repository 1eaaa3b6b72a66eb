/// Convenience result type used across flowline.
pub type FlowlineResult<T> = Result<T, FlowlineError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Simulation ticks never return errors; failures surface only while building timelines,
/// loading configuration, or rendering previews.
#[derive(thiserror::Error, Debug)]
pub enum FlowlineError {
    /// Invalid user-provided layout, process, or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or querying a timeline.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Errors while lowering, rasterizing, or encoding preview frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowlineError {
    /// Build a [`FlowlineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlowlineError::Timeline`] value.
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`FlowlineError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FlowlineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FlowlineError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
