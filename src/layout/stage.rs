use crate::foundation::core::{Point, Size, Vec2};
use crate::foundation::error::{FlowlineError, FlowlineResult};

/// Side of a stage a card (and its traveler) sits on.
///
/// In the branching layout `Upper` cards are above the spine and `Lower` cards below. In the
/// column layout they become the left and right side respectively.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Lane {
    /// Client-facing side.
    Upper,
    /// Studio-facing side.
    Lower,
}

impl Lane {
    /// Both lanes in display order.
    pub const ALL: [Lane; 2] = [Lane::Upper, Lane::Lower];

    /// `-1` for [`Lane::Upper`], `+1` for [`Lane::Lower`].
    pub fn sign(self) -> f64 {
        match self {
            Lane::Upper => -1.0,
            Lane::Lower => 1.0,
        }
    }
}

/// Source of stage marker positions.
///
/// Positions are read on every evaluation and never cached by the animator, so an
/// implementation is free to change between ticks (resize, reflow). Returning `None` means the
/// marker cannot be resolved right now; callers keep the last known position.
pub trait StageGeometry {
    /// Number of stages this geometry can place.
    fn stage_count(&self) -> usize;

    /// Centre of the marker dot for `stage`.
    fn marker(&self, stage: usize) -> Option<Point>;

    /// Point a traveler starts from before flowing into the marker of `stage`.
    fn lane_origin(&self, stage: usize, lane: Lane) -> Option<Point>;

    /// Centre of a `size` card on `lane` of `stage`.
    ///
    /// By default the card sits one card height past the traveler origin, above the spine for
    /// [`Lane::Upper`] and below it for [`Lane::Lower`].
    fn card_centre(&self, stage: usize, lane: Lane, size: Size) -> Option<Point> {
        self.lane_origin(stage, lane)
            .map(|p| p + Vec2::new(0.0, lane.sign() * size.height))
    }
}

/// Wide-viewport layout: markers along a horizontal spine with cards above and below.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BranchingLayout {
    /// Number of stages placed on the spine.
    pub stages: usize,
    /// Position of the first marker.
    pub origin: Point,
    /// Horizontal distance between consecutive markers.
    pub column_spacing: f64,
    /// Connector length between spine and card.
    pub connector: f64,
}

impl Default for BranchingLayout {
    fn default() -> Self {
        Self {
            stages: 0,
            origin: Point::new(100.0, 360.0),
            column_spacing: 180.0,
            connector: 56.0,
        }
    }
}

impl BranchingLayout {
    /// Default layout sized for `stages` columns.
    pub fn new(stages: usize) -> Self {
        Self {
            stages,
            ..Self::default()
        }
    }

    fn validate(&self) -> FlowlineResult<()> {
        check_point("branching origin", self.origin)?;
        check_positive("branching column_spacing", self.column_spacing)?;
        check_non_negative("branching connector", self.connector)
    }
}

impl StageGeometry for BranchingLayout {
    fn stage_count(&self) -> usize {
        self.stages
    }

    fn marker(&self, stage: usize) -> Option<Point> {
        (stage < self.stages)
            .then(|| self.origin + Vec2::new(stage as f64 * self.column_spacing, 0.0))
    }

    fn lane_origin(&self, stage: usize, lane: Lane) -> Option<Point> {
        let reach = self.connector + 10.0;
        self.marker(stage)
            .map(|p| p + Vec2::new(0.0, lane.sign() * reach))
    }
}

/// Narrow-viewport layout: markers down a vertical spine, one row per stage.
///
/// Client (`Upper`) cards sit left of the spine and their travelers arrive from the right; studio
/// (`Lower`) travelers arrive from the left.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// Number of stages placed on the spine.
    pub stages: usize,
    /// Position of the first marker.
    pub origin: Point,
    /// Vertical distance between consecutive markers.
    pub row_spacing: f64,
    /// Horizontal distance a traveler covers before reaching the spine.
    pub travel: f64,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            stages: 0,
            origin: Point::new(260.0, 60.0),
            row_spacing: 120.0,
            travel: 80.0,
        }
    }
}

impl ColumnLayout {
    /// Default layout sized for `stages` rows.
    pub fn new(stages: usize) -> Self {
        Self {
            stages,
            ..Self::default()
        }
    }

    fn validate(&self) -> FlowlineResult<()> {
        check_point("column origin", self.origin)?;
        check_positive("column row_spacing", self.row_spacing)?;
        check_non_negative("column travel", self.travel)
    }
}

impl StageGeometry for ColumnLayout {
    fn stage_count(&self) -> usize {
        self.stages
    }

    fn marker(&self, stage: usize) -> Option<Point> {
        (stage < self.stages).then(|| self.origin + Vec2::new(0.0, stage as f64 * self.row_spacing))
    }

    fn lane_origin(&self, stage: usize, lane: Lane) -> Option<Point> {
        self.marker(stage)
            .map(|p| p + Vec2::new(-lane.sign() * self.travel, 0.0))
    }

    fn card_centre(&self, stage: usize, lane: Lane, size: Size) -> Option<Point> {
        let reach = self.travel + size.width / 2.0;
        self.marker(stage)
            .map(|p| p + Vec2::new(lane.sign() * reach, 0.0))
    }
}

/// Picks the branching or column layout from the viewport width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResponsiveLayout {
    /// Widths strictly below this use the column layout.
    pub breakpoint: f64,
    /// Wide layout.
    pub branching: BranchingLayout,
    /// Narrow layout.
    pub column: ColumnLayout,
}

impl Default for ResponsiveLayout {
    fn default() -> Self {
        Self {
            breakpoint: 1024.0,
            branching: BranchingLayout::default(),
            column: ColumnLayout::default(),
        }
    }
}

impl ResponsiveLayout {
    /// Copy of this layout with both variants sized for `stages`.
    pub fn with_stages(mut self, stages: usize) -> Self {
        self.branching.stages = stages;
        self.column.stages = stages;
        self
    }

    /// Whether `width` selects the column layout.
    pub fn is_narrow(&self, width: f64) -> bool {
        width < self.breakpoint
    }

    /// Geometry for a viewport of `width` pixels.
    pub fn for_width(&self, width: f64) -> &dyn StageGeometry {
        if self.is_narrow(width) {
            &self.column
        } else {
            &self.branching
        }
    }

    /// Validate spacing parameters of both variants.
    pub fn validate(&self) -> FlowlineResult<()> {
        check_positive("layout breakpoint", self.breakpoint)?;
        self.branching.validate()?;
        self.column.validate()
    }
}

/// Host-measured marker positions, e.g. read back from a live render tree.
///
/// `None` entries stand for markers that are not mounted yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasuredGeometry {
    /// Per-stage marker centres.
    pub markers: Vec<Option<Point>>,
    /// Offset of the `Lower` lane origin from its marker; `Upper` uses the negation.
    pub lane_offset: Vec2,
}

impl StageGeometry for MeasuredGeometry {
    fn stage_count(&self) -> usize {
        self.markers.len()
    }

    fn marker(&self, stage: usize) -> Option<Point> {
        self.markers.get(stage).copied().flatten()
    }

    fn lane_origin(&self, stage: usize, lane: Lane) -> Option<Point> {
        self.marker(stage).map(|p| p + self.lane_offset * lane.sign())
    }
}

fn check_point(name: &str, p: Point) -> FlowlineResult<()> {
    if !p.x.is_finite() || !p.y.is_finite() {
        return Err(FlowlineError::validation(format!("{name} must be finite")));
    }
    Ok(())
}

fn check_positive(name: &str, v: f64) -> FlowlineResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(FlowlineError::validation(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

pub(crate) fn check_non_negative(name: &str, v: f64) -> FlowlineResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(FlowlineError::validation(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/stage.rs"]
mod tests;
