use crate::foundation::error::{FlowlineError, FlowlineResult};

/// Easing curve applied to a segment's normalized progress.
///
/// `Quad`, `Cubic` and `Quart` correspond to the `power1`, `power2` and `power3` families used
/// by tween libraries; see [`Ease::from_power_name`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Constant rate.
    #[default]
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in-out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in-out.
    InOutCubic,
    /// Quartic ease-out.
    OutQuart,
}

impl Ease {
    /// Map normalized progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }

    /// Parse a `powerN.dir` / `none` ease name.
    pub fn from_power_name(name: &str) -> FlowlineResult<Self> {
        Ok(match name.trim() {
            "none" | "linear" => Self::Linear,
            "power1.in" => Self::InQuad,
            "power1.out" => Self::OutQuad,
            "power1.inOut" => Self::InOutQuad,
            "power2.in" => Self::InCubic,
            "power2.out" => Self::OutCubic,
            "power2.inOut" => Self::InOutCubic,
            "power3.out" => Self::OutQuart,
            other => {
                return Err(FlowlineError::validation(format!(
                    "unknown ease name '{other}'"
                )));
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
