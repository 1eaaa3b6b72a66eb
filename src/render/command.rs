use crate::foundation::color::Rgba8;
use crate::foundation::core::{BezPath, Point, Rect};

#[derive(Clone, Debug, PartialEq)]
/// Backend-neutral draw operation produced from a simulated frame.
///
/// Commands are painted in order; later commands draw over earlier ones.
pub enum RenderCommand {
    /// Stroked connector path.
    Wire {
        /// Path in canvas pixels.
        path: BezPath,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width.
        width: f64,
        /// Dash and gap lengths, if dashed.
        dash: Option<(f64, f64)>,
    },
    /// Rounded card, optionally highlighted.
    Card {
        /// Card bounds.
        rect: Rect,
        /// Corner radius.
        radius: f64,
        /// Body fill.
        fill: Rgba8,
        /// Border color.
        stroke: Rgba8,
        /// Highlight color bleeding out of the card edge.
        glow_color: Rgba8,
        /// Highlight strength in `[0, 1]`.
        glow: f64,
        /// Card title, drawn centred if text rendering is available.
        title: Option<String>,
    },
    /// Round glowing marker (indicator, traveler).
    Dot {
        /// Centre.
        center: Point,
        /// Core radius; the halo extends beyond it.
        radius: f64,
        /// Fill color.
        color: Rgba8,
        /// Opacity in `[0, 1]`.
        opacity: f64,
    },
    /// Small square marker flowing along a wire.
    Block {
        /// Centre.
        center: Point,
        /// Edge length.
        size: f64,
        /// Fill color.
        color: Rgba8,
        /// Opacity in `[0, 1]`.
        opacity: f64,
    },
}

impl RenderCommand {
    /// Whether drawing this command would leave the canvas unchanged.
    pub fn is_invisible(&self) -> bool {
        match self {
            RenderCommand::Dot { opacity, radius, .. } => *opacity <= 0.0 || *radius <= 0.0,
            RenderCommand::Block { opacity, size, .. } => *opacity <= 0.0 || *size <= 0.0,
            RenderCommand::Wire { color, width, .. } => color.a == 0 || *width <= 0.0,
            RenderCommand::Card { rect, .. } => rect.area() <= 0.0,
        }
    }
}
