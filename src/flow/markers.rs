//! Moving markers of the network flow diagram.
//!
//! Each kind lives on one path family and only ever moves forward along it; the animator drops a
//! marker once it has overrun its path end.

use smallvec::SmallVec;

use crate::foundation::core::Point;
use crate::layout::network::SpineDir;

/// Identifier unique within one [`crate::flow::animator::FlowAnimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct MarkerId(pub u64);

/// Marker on the hub trunk.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TrunkMarker {
    /// Identity.
    pub id: MarkerId,
    /// Distance travelled along the trunk.
    pub dist: f64,
    /// Whether this marker already spawned its spine pair.
    pub spawned_spine: bool,
}

/// Marker travelling up or down the spine.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SpineMarker {
    /// Identity.
    pub id: MarkerId,
    /// Spine half this marker runs on.
    pub dir: SpineDir,
    /// Distance travelled from the junction.
    pub dist: f64,
    /// Per-lane flag: a branch marker was already emitted for that lane.
    pub emitted: SmallVec<[bool; 8]>,
}

impl SpineMarker {
    /// Fresh marker at the junction with no lane served yet.
    pub fn new(id: MarkerId, dir: SpineDir, lanes: usize) -> Self {
        Self {
            id,
            dir,
            dist: 0.0,
            emitted: smallvec::smallvec![false; lanes],
        }
    }
}

/// Marker travelling from the spine into a member card.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BranchMarker {
    /// Identity.
    pub id: MarkerId,
    /// Member lane index.
    pub lane: usize,
    /// Distance travelled along the branch.
    pub dist: f64,
}

/// Which path a drawn marker sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum MarkerKind {
    /// Hub trunk.
    Trunk,
    /// Spine half.
    Spine(SpineDir),
    /// Branch into member lane `n`.
    Branch(usize),
}

/// A marker resolved to a drawable position and opacity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MarkerSprite {
    /// Identity of the underlying marker.
    pub id: MarkerId,
    /// Path family.
    pub kind: MarkerKind,
    /// Position on the path.
    pub position: Point,
    /// Fade-in times fade-out, in `[0, 1]`.
    pub opacity: f64,
}

/// Running counters, mostly for tests and telemetry.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct FlowStats {
    /// Trunk markers spawned, including the initial one.
    pub trunk_spawned: u64,
    /// Spine markers spawned going up.
    pub spine_up_spawned: u64,
    /// Spine markers spawned going down.
    pub spine_down_spawned: u64,
    /// Branch markers emitted per member lane.
    pub branch_emitted: Vec<u64>,
    /// Markers dropped after overrunning their path.
    pub retired: u64,
}

impl FlowStats {
    /// Spine markers spawned in `dir`.
    pub fn spine_spawned(&self, dir: SpineDir) -> u64 {
        match dir {
            SpineDir::Up => self.spine_up_spawned,
            SpineDir::Down => self.spine_down_spawned,
        }
    }
}
