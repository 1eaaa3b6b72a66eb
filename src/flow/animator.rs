//! Frame-driven simulation of markers flowing through a [`NetworkGeometry`].
//!
//! Trunk markers spawn at a steady interval at the first hub and run to the spine junction.
//! Each one splits into an up and a down spine marker there, and spine markers emit one branch
//! marker into every member lane they pass on their side of the junction.

use crate::{
    flow::markers::{
        BranchMarker, FlowStats, MarkerId, MarkerKind, MarkerSprite, SpineMarker, TrunkMarker,
    },
    foundation::color::Rgba8,
    foundation::error::{FlowlineError, FlowlineResult},
    foundation::math::fade_ramp,
    layout::network::{NetworkGeometry, SpineDir},
    layout::polyline::Polyline,
    layout::stage::check_non_negative,
    render::command::RenderCommand,
};

/// Simulation constants. Distances are in diagram pixels, times in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Marker speed along every path.
    pub speed: f64,
    /// Time between trunk spawns.
    pub spawn_interval: f64,
    /// Distance over which a marker fades in after leaving a path start.
    pub fade_in: f64,
    /// Distance before a path end over which a marker fades out.
    pub fade_out: f64,
    /// How far past the junction a trunk marker survives.
    pub trunk_overrun: f64,
    /// How far past its end a spine marker survives.
    pub spine_overrun: f64,
    /// How far past the card centre a branch marker survives.
    pub branch_overrun: f64,
    /// Spine-to-branch-origin distance that triggers an emission.
    pub emit_tolerance: f64,
    /// Upper bound on a single tick's time step.
    pub max_dt: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            speed: 150.0,
            spawn_interval: 0.38,
            fade_in: 22.0,
            fade_out: 28.0,
            trunk_overrun: 30.0,
            spine_overrun: 30.0,
            branch_overrun: 25.0,
            emit_tolerance: 10.0,
            max_dt: 0.05,
        }
    }
}

impl FlowConfig {
    /// Validate that every constant is usable.
    pub fn validate(&self) -> FlowlineResult<()> {
        for (name, v) in [
            ("speed", self.speed),
            ("spawn_interval", self.spawn_interval),
            ("emit_tolerance", self.emit_tolerance),
            ("max_dt", self.max_dt),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(FlowlineError::validation(format!(
                    "flow {name} must be finite and > 0"
                )));
            }
        }
        check_non_negative("flow fade_in", self.fade_in)?;
        check_non_negative("flow fade_out", self.fade_out)?;
        check_non_negative("flow trunk_overrun", self.trunk_overrun)?;
        check_non_negative("flow spine_overrun", self.spine_overrun)?;
        check_non_negative("flow branch_overrun", self.branch_overrun)
    }

    /// Longest distance a marker can move in one tick.
    pub fn max_step(&self) -> f64 {
        self.speed * self.max_dt
    }
}

/// Snapshot of the flow diagram after a tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FlowFrame {
    /// Simulated time since the animator was created.
    pub elapsed: f64,
    /// Every live marker, trunk first, then spine, then branches.
    pub markers: Vec<MarkerSprite>,
    /// Name of the highlighted node, if any.
    pub hovered: Option<String>,
}

const WIRE: Rgba8 = Rgba8::rgba(255, 255, 255, 26);
const CARD_FILL: Rgba8 = Rgba8::rgb(12, 12, 12);
const STROKE_IDLE: Rgba8 = Rgba8::rgba(255, 255, 255, 26);
const STROKE_HOVER: Rgba8 = Rgba8::rgba(255, 255, 255, 56);
const BLOCK: Rgba8 = Rgba8::rgba(255, 255, 255, 230);

impl FlowFrame {
    /// Lower the frame into draw commands: wires, then markers, then cards on top.
    pub fn commands(&self, geometry: &NetworkGeometry) -> Vec<RenderCommand> {
        let mut out = Vec::new();
        let wire = |path: &Polyline| RenderCommand::Wire {
            path: path.to_bez_path(),
            color: WIRE,
            width: 1.5,
            dash: Some((6.0, 9.0)),
        };
        out.push(wire(geometry.trunk()));
        out.push(wire(geometry.spine(SpineDir::Up)));
        out.push(wire(geometry.spine(SpineDir::Down)));
        for lane in 0..geometry.lane_count() {
            if let Some(branch) = geometry.branch(lane) {
                out.push(wire(branch));
            }
        }

        out.extend(self.markers.iter().map(|m| RenderCommand::Block {
            center: m.position,
            size: 7.0,
            color: BLOCK,
            opacity: m.opacity,
        }));

        let hovered = self.hovered.as_deref();
        let cards = geometry
            .chain_cards()
            .map(|(n, r)| (n, r, 22.0))
            .chain(geometry.member_cards().map(|(n, r)| (n, r, 18.0)));
        for (node, rect, radius) in cards {
            let hot = hovered == Some(node.name.as_str());
            out.push(RenderCommand::Card {
                rect,
                radius,
                fill: CARD_FILL,
                stroke: if hot { STROKE_HOVER } else { STROKE_IDLE },
                glow_color: Rgba8::WHITE,
                glow: 0.0,
                title: Some(node.name.clone()),
            });
        }
        out
    }
}

/// Owns every marker of one diagram and advances them on [`FlowAnimator::tick`].
#[derive(Clone, Debug)]
pub struct FlowAnimator {
    geometry: NetworkGeometry,
    cfg: FlowConfig,
    trunk: Vec<TrunkMarker>,
    spine: Vec<SpineMarker>,
    branches: Vec<BranchMarker>,
    spawn_timer: f64,
    elapsed: f64,
    next_id: u64,
    hovered: Option<String>,
    stats: FlowStats,
}

impl FlowAnimator {
    /// New simulation with a single trunk marker at the first hub.
    pub fn new(geometry: NetworkGeometry, cfg: FlowConfig) -> FlowlineResult<Self> {
        cfg.validate()?;
        if cfg.max_step() >= 2.0 * cfg.emit_tolerance {
            tracing::warn!(
                max_step = cfg.max_step(),
                emit_tolerance = cfg.emit_tolerance,
                "flow markers may step over member lanes without emitting"
            );
        }
        let lanes = geometry.lane_count();
        let mut anim = Self {
            geometry,
            cfg,
            trunk: Vec::new(),
            spine: Vec::new(),
            branches: Vec::new(),
            spawn_timer: 0.0,
            elapsed: 0.0,
            next_id: 0,
            hovered: None,
            stats: FlowStats {
                branch_emitted: vec![0; lanes],
                ..FlowStats::default()
            },
        };
        anim.spawn_trunk();
        Ok(anim)
    }

    /// Diagram geometry.
    pub fn geometry(&self) -> &NetworkGeometry {
        &self.geometry
    }

    /// Simulation constants.
    pub fn config(&self) -> &FlowConfig {
        &self.cfg
    }

    /// Live trunk markers in spawn order.
    pub fn trunk(&self) -> &[TrunkMarker] {
        &self.trunk
    }

    /// Live spine markers in spawn order.
    pub fn spine(&self) -> &[SpineMarker] {
        &self.spine
    }

    /// Live branch markers in spawn order.
    pub fn branches(&self) -> &[BranchMarker] {
        &self.branches
    }

    /// Running counters.
    pub fn stats(&self) -> &FlowStats {
        &self.stats
    }

    /// Simulated seconds so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Highlight the node called `name`, or clear the highlight.
    ///
    /// Unknown names clear the highlight; returns whether a node is highlighted afterwards.
    pub fn hover(&mut self, name: Option<&str>) -> bool {
        let spec = self.geometry.spec();
        self.hovered = name
            .filter(|n| spec.chain.iter().chain(&spec.members).any(|node| node.name == *n))
            .map(str::to_string);
        self.hovered.is_some()
    }

    /// Name of the highlighted node.
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Advance the simulation by `dt` seconds (clamped to `[0, max_dt]`).
    pub fn tick(&mut self, dt: f64) -> FlowFrame {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.cfg.max_dt)
        } else {
            0.0
        };
        self.elapsed += dt;
        let step = self.cfg.speed * dt;

        self.spawn_timer += dt;
        while self.spawn_timer >= self.cfg.spawn_interval {
            self.spawn_timer -= self.cfg.spawn_interval;
            self.spawn_trunk();
        }

        self.advance_trunk(step);
        self.advance_spine(step);
        self.advance_branches(step);
        self.frame()
    }

    /// Resolve every live marker without advancing.
    pub fn frame(&self) -> FlowFrame {
        let g = &self.geometry;
        let sprite = |id, kind, path: &Polyline, dist: f64| MarkerSprite {
            id,
            kind,
            position: path.point_at(dist),
            opacity: fade_ramp(dist, path.length(), self.cfg.fade_in, self.cfg.fade_out),
        };

        let mut markers =
            Vec::with_capacity(self.trunk.len() + self.spine.len() + self.branches.len());
        markers.extend(
            self.trunk
                .iter()
                .map(|m| sprite(m.id, MarkerKind::Trunk, g.trunk(), m.dist)),
        );
        markers.extend(
            self.spine
                .iter()
                .map(|m| sprite(m.id, MarkerKind::Spine(m.dir), g.spine(m.dir), m.dist)),
        );
        markers.extend(self.branches.iter().filter_map(|m| {
            g.branch(m.lane)
                .map(|path| sprite(m.id, MarkerKind::Branch(m.lane), path, m.dist))
        }));

        FlowFrame {
            elapsed: self.elapsed,
            markers,
            hovered: self.hovered.clone(),
        }
    }

    fn alloc_id(&mut self) -> MarkerId {
        self.next_id += 1;
        MarkerId(self.next_id)
    }

    fn spawn_trunk(&mut self) {
        let id = self.alloc_id();
        self.trunk.push(TrunkMarker {
            id,
            dist: 0.0,
            spawned_spine: false,
        });
        self.stats.trunk_spawned += 1;
        tracing::trace!(id = id.0, "spawn trunk marker");
    }

    fn spawn_spine_pair(&mut self) {
        let lanes = self.geometry.lane_count();
        for dir in [SpineDir::Up, SpineDir::Down] {
            let id = self.alloc_id();
            self.spine.push(SpineMarker::new(id, dir, lanes));
            match dir {
                SpineDir::Up => self.stats.spine_up_spawned += 1,
                SpineDir::Down => self.stats.spine_down_spawned += 1,
            }
        }
    }

    fn advance_trunk(&mut self, step: f64) {
        let total = self.geometry.trunk().length();
        let limit = total + self.cfg.trunk_overrun;
        for mut m in std::mem::take(&mut self.trunk) {
            let next = m.dist + step;
            if !m.spawned_spine && next >= total {
                m.spawned_spine = true;
                self.spawn_spine_pair();
            }
            if next <= limit {
                m.dist = next;
                self.trunk.push(m);
            } else {
                self.stats.retired += 1;
            }
        }
    }

    fn advance_spine(&mut self, step: f64) {
        let lanes = self.geometry.lane_count();
        for mut s in std::mem::take(&mut self.spine) {
            let path = self.geometry.spine(s.dir);
            let next = s.dist + step;
            let p = path.point_at(next);
            let limit = path.length() + self.cfg.spine_overrun;

            for lane in 0..lanes {
                if s.emitted[lane] || self.geometry.lane_dir(lane) != Some(s.dir) {
                    continue;
                }
                let Some(origin) = self.geometry.branch_origin(lane) else {
                    continue;
                };
                if (p - origin).hypot() < self.cfg.emit_tolerance {
                    s.emitted[lane] = true;
                    let id = self.alloc_id();
                    self.branches.push(BranchMarker { id, lane, dist: 0.0 });
                    self.stats.branch_emitted[lane] += 1;
                    tracing::trace!(id = id.0, lane, "emit branch marker");
                }
            }

            if next <= limit {
                s.dist = next;
                self.spine.push(s);
            } else {
                self.stats.retired += 1;
            }
        }
    }

    fn advance_branches(&mut self, step: f64) {
        for mut b in std::mem::take(&mut self.branches) {
            let Some(path) = self.geometry.branch(b.lane) else {
                self.stats.retired += 1;
                continue;
            };
            let next = b.dist + step;
            if next <= path.length() + self.cfg.branch_overrun {
                b.dist = next;
                self.branches.push(b);
            } else {
                self.stats.retired += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flow/animator.rs"]
mod tests;
