use crate::foundation::core::{BezPath, Line, Point};
use crate::foundation::error::{FlowlineError, FlowlineResult};

/// Ordered waypoints joined by straight segments, parameterized by arc length.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    segments: Vec<(Line, f64)>,
    length: f64,
}

impl Polyline {
    /// Build from at least two finite points. Zero-length segments are allowed.
    pub fn new(points: &[Point]) -> FlowlineResult<Self> {
        if points.len() < 2 {
            return Err(FlowlineError::validation(
                "polyline needs at least two points",
            ));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(FlowlineError::validation("polyline points must be finite"));
        }

        let mut segments = Vec::with_capacity(points.len() - 1);
        let mut length = 0.0;
        for pair in points.windows(2) {
            let line = Line::new(pair[0], pair[1]);
            let len = (pair[1] - pair[0]).hypot();
            segments.push((line, len));
            length += len;
        }
        Ok(Self { segments, length })
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// First waypoint.
    pub fn start(&self) -> Point {
        self.segments[0].0.p0
    }

    /// Last waypoint.
    pub fn end(&self) -> Point {
        self.segments[self.segments.len() - 1].0.p1
    }

    /// Waypoints in order.
    pub fn points(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.segments.len() + 1);
        out.push(self.start());
        out.extend(self.segments.iter().map(|(line, _)| line.p1));
        out
    }

    /// Point reached after travelling `distance` from the start, clamped to the path.
    pub fn point_at(&self, distance: f64) -> Point {
        let mut rem = distance.clamp(0.0, self.length);
        for (line, len) in &self.segments {
            if rem <= len + 1e-3 {
                let t = if *len > 0.0 { (rem / len).min(1.0) } else { 0.0 };
                return line.p0.lerp(line.p1, t);
            }
            rem -= len;
        }
        self.end()
    }

    /// The path as a Bézier path of line segments.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        for (line, _) in &self.segments {
            path.line_to(line.p1);
        }
        path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/polyline.rs"]
mod tests;
