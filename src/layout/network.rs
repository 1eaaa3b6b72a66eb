//! Hub-and-spoke diagram geometry.
//!
//! The chain of hub nodes sits in one row, vertically centred on the member stack. A trunk path
//! runs through the chain to a vertical spine; the spine splits up and down, and every member gets
//! a branch from the spine into its card.

use crate::foundation::core::{Point, Rect, Size};
use crate::foundation::error::{FlowlineError, FlowlineResult};
use crate::layout::polyline::Polyline;

/// A named card in the diagram.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Display name; also the hover key.
    pub name: String,
    /// Secondary line under the name.
    #[serde(default)]
    pub role: String,
    /// Short badge text.
    #[serde(default)]
    pub initials: String,
}

impl Node {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, role: impl Into<String>, initials: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            initials: initials.into(),
        }
    }
}

/// Declared diagram layout.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkSpec {
    /// Hub nodes from left to right; the trunk leaves the last one into the spine.
    pub chain: Vec<Node>,
    /// Satellite nodes stacked top to bottom right of the spine.
    pub members: Vec<Node>,
    /// Card size.
    #[serde(default = "default_card")]
    pub card: Size,
    /// Vertical gap between member cards.
    #[serde(default = "default_vgap")]
    pub vgap: f64,
    /// Horizontal gap between columns.
    #[serde(default = "default_hgap")]
    pub hgap: f64,
}

fn default_card() -> Size {
    Size::new(130.0, 130.0)
}

fn default_vgap() -> f64 {
    22.0
}

fn default_hgap() -> f64 {
    90.0
}

impl NetworkSpec {
    /// Validate node counts and spacing.
    pub fn validate(&self) -> FlowlineResult<()> {
        if self.chain.is_empty() {
            return Err(FlowlineError::validation("network chain must not be empty"));
        }
        if self.members.is_empty() {
            return Err(FlowlineError::validation(
                "network members must not be empty",
            ));
        }
        let mut names = std::collections::BTreeSet::new();
        for node in self.chain.iter().chain(&self.members) {
            if node.name.trim().is_empty() {
                return Err(FlowlineError::validation("node name must be non-empty"));
            }
            if !names.insert(node.name.as_str()) {
                return Err(FlowlineError::validation(format!(
                    "duplicate node name '{}'",
                    node.name
                )));
            }
        }
        for (name, v) in [("card.width", self.card.width), ("card.height", self.card.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(FlowlineError::validation(format!(
                    "network {name} must be finite and > 0"
                )));
            }
        }
        for (name, v) in [("vgap", self.vgap), ("hgap", self.hgap)] {
            if !v.is_finite() || v < 0.0 {
                return Err(FlowlineError::validation(format!(
                    "network {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Direction a spine marker travels from the junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SpineDir {
    /// Towards the top member.
    Up,
    /// Towards the bottom member.
    Down,
}

/// Resolved diagram geometry.
#[derive(Clone, Debug)]
pub struct NetworkGeometry {
    spec: NetworkSpec,
    chain_rects: Vec<Rect>,
    member_rects: Vec<Rect>,
    trunk: Polyline,
    spine_up: Polyline,
    spine_down: Polyline,
    branches: Vec<Polyline>,
    lane_dirs: Vec<SpineDir>,
    junction: Point,
    size: Size,
}

impl NetworkGeometry {
    /// Compute card rectangles and flow paths for `spec`.
    pub fn from_spec(spec: NetworkSpec) -> FlowlineResult<Self> {
        spec.validate()?;

        let cw = spec.card.width;
        let ch = spec.card.height;
        let m = spec.members.len() as f64;
        let stack_h = m * ch + (m - 1.0) * spec.vgap;
        let centre_y = stack_h / 2.0;
        let col_x = |k: usize| k as f64 * (cw + spec.hgap);
        let member_y = |i: usize| i as f64 * (ch + spec.vgap);

        let chain_rects = (0..spec.chain.len())
            .map(|k| Rect::from_origin_size(Point::new(col_x(k), centre_y - ch / 2.0), spec.card))
            .collect::<Vec<_>>();
        let team_x = col_x(spec.chain.len());
        let member_rects = (0..spec.members.len())
            .map(|i| Rect::from_origin_size(Point::new(team_x, member_y(i)), spec.card))
            .collect::<Vec<_>>();

        let last_chain = chain_rects[chain_rects.len() - 1];
        let spine_x = last_chain.x1 + spec.hgap / 2.0;
        let junction = Point::new(spine_x, centre_y);

        let mut trunk_pts = vec![Point::new(chain_rects[0].x1, centre_y)];
        for r in &chain_rects[1..] {
            trunk_pts.push(Point::new(r.x0, centre_y));
            trunk_pts.push(Point::new(r.x1, centre_y));
        }
        trunk_pts.push(junction);
        let trunk = Polyline::new(&trunk_pts)?;

        let top_y = member_rects[0].center().y;
        let bottom_y = member_rects[member_rects.len() - 1].center().y;
        let spine_up = Polyline::new(&[junction, Point::new(spine_x, top_y)])?;
        let spine_down = Polyline::new(&[junction, Point::new(spine_x, bottom_y)])?;

        let mut branches = Vec::with_capacity(member_rects.len());
        let mut lane_dirs = Vec::with_capacity(member_rects.len());
        for r in &member_rects {
            let y = r.center().y;
            branches.push(Polyline::new(&[
                Point::new(spine_x, y),
                Point::new(r.x0, y),
                Point::new(r.x0 + cw / 2.0, y),
            ])?);
            lane_dirs.push(if y <= centre_y {
                SpineDir::Up
            } else {
                SpineDir::Down
            });
        }

        let size = Size::new(team_x + cw + 30.0, stack_h + 10.0);

        Ok(Self {
            spec,
            chain_rects,
            member_rects,
            trunk,
            spine_up,
            spine_down,
            branches,
            lane_dirs,
            junction,
            size,
        })
    }

    /// The declared spec.
    pub fn spec(&self) -> &NetworkSpec {
        &self.spec
    }

    /// Hub → junction path.
    pub fn trunk(&self) -> &Polyline {
        &self.trunk
    }

    /// Junction → top or bottom member path.
    pub fn spine(&self, dir: SpineDir) -> &Polyline {
        match dir {
            SpineDir::Up => &self.spine_up,
            SpineDir::Down => &self.spine_down,
        }
    }

    /// Spine → member card path for `lane`.
    pub fn branch(&self, lane: usize) -> Option<&Polyline> {
        self.branches.get(lane)
    }

    /// Number of member lanes.
    pub fn lane_count(&self) -> usize {
        self.branches.len()
    }

    /// Spine direction serving `lane`: lanes at or above the junction are served going up.
    pub fn lane_dir(&self, lane: usize) -> Option<SpineDir> {
        self.lane_dirs.get(lane).copied()
    }

    /// Where the branch for `lane` leaves the spine.
    pub fn branch_origin(&self, lane: usize) -> Option<Point> {
        self.branches.get(lane).map(Polyline::start)
    }

    /// Point where the trunk meets the spine.
    pub fn junction(&self) -> Point {
        self.junction
    }

    /// Hub card rectangles paired with their nodes.
    pub fn chain_cards(&self) -> impl Iterator<Item = (&Node, Rect)> {
        self.spec.chain.iter().zip(self.chain_rects.iter().copied())
    }

    /// Member card rectangles paired with their nodes.
    pub fn member_cards(&self) -> impl Iterator<Item = (&Node, Rect)> {
        self.spec.members.iter().zip(self.member_rects.iter().copied())
    }

    /// Bounding size of the whole diagram.
    pub fn size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/network.rs"]
mod tests;
