//! Seekable segment timeline.
//!
//! A [`Timeline`] is an immutable list of [`Segment`]s, each binding a time offset to a change
//! of one actor's visual channels. Sampling is pure: the state of any actor at any time is a
//! function of the segments and the geometry passed in, so seeking backwards is as cheap as
//! playing forwards.

use crate::{
    animation::ease::Ease,
    foundation::color::Rgba8,
    foundation::core::Point,
    foundation::error::{FlowlineError, FlowlineResult},
    foundation::math::lerp,
    layout::stage::{Lane, StageGeometry},
};

/// Something the timeline animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Actor {
    /// The primary indicator riding the spine.
    Indicator,
    /// Transient marker flowing from a lane into a stage marker.
    Traveler(Lane),
    /// A step card.
    Card {
        /// Stage index.
        stage: usize,
        /// Side of the stage.
        lane: Lane,
    },
}

/// Symbolic position resolved against a [`StageGeometry`] at sample time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Anchor {
    /// Centre of a stage marker.
    Marker(usize),
    /// Start point of a traveler heading into a stage marker.
    Lane {
        /// Stage index.
        stage: usize,
        /// Side the traveler comes from.
        lane: Lane,
    },
}

impl Anchor {
    /// Resolve to a concrete point, or `None` if the geometry cannot place it.
    pub fn resolve(self, geometry: &dyn StageGeometry) -> Option<Point> {
        match self {
            Anchor::Marker(stage) => geometry.marker(stage),
            Anchor::Lane { stage, lane } => geometry.lane_origin(stage, lane),
        }
    }
}

/// Channel targets carried by a segment; `None` leaves a channel untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Props {
    /// Target opacity.
    pub opacity: Option<f64>,
    /// Target scale.
    pub scale: Option<f64>,
    /// Target color.
    pub color: Option<Rgba8>,
    /// Target position.
    pub at: Option<Anchor>,
    /// Target glow level (cards).
    pub glow: Option<f64>,
    /// Target flash level (cards).
    pub flash: Option<f64>,
}

impl Props {
    /// Empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the opacity target.
    pub fn opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    /// Set the scale target.
    pub fn scale(mut self, v: f64) -> Self {
        self.scale = Some(v);
        self
    }

    /// Set the color target.
    pub fn color(mut self, c: Rgba8) -> Self {
        self.color = Some(c);
        self
    }

    /// Set the position target.
    pub fn at(mut self, anchor: Anchor) -> Self {
        self.at = Some(anchor);
        self
    }

    /// Set the glow target.
    pub fn glow(mut self, v: f64) -> Self {
        self.glow = Some(v);
        self
    }

    /// Set the flash target.
    pub fn flash(mut self, v: f64) -> Self {
        self.flash = Some(v);
        self
    }

    fn validate(&self) -> FlowlineResult<()> {
        for (name, v) in [
            ("opacity", self.opacity),
            ("scale", self.scale),
            ("glow", self.glow),
            ("flash", self.flash),
        ] {
            if let Some(v) = v
                && !v.is_finite()
            {
                return Err(FlowlineError::timeline(format!(
                    "segment {name} target must be finite"
                )));
            }
        }
        Ok(())
    }
}

/// One scheduled effect.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Offset from the start of the timeline, in seconds.
    pub start: f64,
    /// Length in seconds; zero means an instantaneous set.
    pub duration: f64,
    /// Progress curve.
    pub ease: Ease,
    /// Animated actor.
    pub actor: Actor,
    /// Channel targets.
    pub props: Props,
}

impl Segment {
    /// Offset at which the segment completes.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Eased progress in `[0, 1]` at time `t`.
    pub fn progress(&self, t: f64) -> f64 {
        if self.duration <= 0.0 {
            return if t >= self.start { 1.0 } else { 0.0 };
        }
        self.ease.apply((t - self.start) / self.duration)
    }
}

/// Where a new segment is placed relative to what is already on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Placement {
    /// At the current end of the whole timeline.
    End,
    /// After the end of the most recently added segment, plus a gap.
    AfterPrevious(f64),
    /// At the start of the most recently added segment, plus a gap.
    WithPrevious(f64),
}

/// Appends segments and step marks, then freezes them into a [`Timeline`].
#[derive(Clone, Debug, Default)]
pub struct TimelineBuilder {
    segments: Vec<Segment>,
    end: f64,
    previous: Option<(f64, f64)>,
    step_offsets: Vec<f64>,
    cards: Vec<(usize, Lane)>,
    repeat_delay: f64,
}

impl TimelineBuilder {
    /// New builder for a timeline that pauses `repeat_delay` seconds between loops.
    pub fn new(repeat_delay: f64) -> Self {
        Self {
            repeat_delay,
            ..Self::default()
        }
    }

    /// Current end of the timeline.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Record the current end as the offset at which the next step becomes current.
    pub fn mark(&mut self) -> &mut Self {
        self.step_offsets.push(self.end);
        self
    }

    /// Declare a card so it shows up in sampled frames even before it is animated.
    pub fn register_card(&mut self, stage: usize, lane: Lane) -> &mut Self {
        if !self.cards.contains(&(stage, lane)) {
            self.cards.push((stage, lane));
        }
        self
    }

    /// Instantaneously apply `props` to `actor`.
    pub fn set(
        &mut self,
        actor: Actor,
        props: Props,
        placement: Placement,
    ) -> FlowlineResult<&mut Self> {
        self.to(actor, props, 0.0, Ease::Linear, placement)
    }

    /// Tween `actor` towards `props` over `duration` seconds.
    pub fn to(
        &mut self,
        actor: Actor,
        props: Props,
        duration: f64,
        ease: Ease,
        placement: Placement,
    ) -> FlowlineResult<&mut Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(FlowlineError::timeline(
                "segment duration must be finite and >= 0",
            ));
        }
        props.validate()?;
        let start = self.resolve(placement)?;
        self.push(Segment {
            start,
            duration,
            ease,
            actor,
            props,
        });
        Ok(self)
    }

    /// Append an empty segment that only extends the timeline.
    pub fn wait(&mut self, duration: f64) -> FlowlineResult<&mut Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(FlowlineError::timeline(
                "wait duration must be finite and >= 0",
            ));
        }
        let start = self.end;
        self.previous = Some((start, start + duration));
        self.end = self.end.max(start + duration);
        Ok(self)
    }

    fn resolve(&self, placement: Placement) -> FlowlineResult<f64> {
        let start = match placement {
            Placement::End => self.end,
            Placement::AfterPrevious(gap) => self.previous.map_or(self.end, |(_, e)| e) + gap,
            Placement::WithPrevious(gap) => self.previous.map_or(0.0, |(s, _)| s) + gap,
        };
        if !start.is_finite() {
            return Err(FlowlineError::timeline("segment placement must be finite"));
        }
        Ok(start.max(0.0))
    }

    fn push(&mut self, seg: Segment) {
        self.previous = Some((seg.start, seg.end()));
        self.end = self.end.max(seg.end());
        self.segments.push(seg);
    }

    /// Freeze the builder.
    pub fn build(self) -> FlowlineResult<Timeline> {
        if self.step_offsets.is_empty() {
            return Err(FlowlineError::timeline("timeline has no step marks"));
        }
        if !self.repeat_delay.is_finite() || self.repeat_delay < 0.0 {
            return Err(FlowlineError::timeline(
                "repeat_delay must be finite and >= 0",
            ));
        }
        let mut segments = self.segments;
        // Stable: equal starts keep insertion order, so the later segment wins.
        segments.sort_by(|a, b| a.start.total_cmp(&b.start));
        Ok(Timeline {
            segments,
            step_offsets: self.step_offsets,
            cards: self.cards,
            duration: self.end,
            repeat_delay: self.repeat_delay,
        })
    }
}

/// Evaluated channels of one actor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ActorState {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Current color.
    pub color: Rgba8,
    /// Resolved position.
    pub position: Point,
    /// Card glow level.
    pub glow: f64,
    /// Card flash level.
    pub flash: f64,
}

impl ActorState {
    /// Channel values before any segment applies.
    ///
    /// Markers start hidden and collapsed; cards start idle and fully visible.
    pub fn initial(actor: Actor) -> Self {
        let (opacity, scale) = match actor {
            Actor::Indicator | Actor::Traveler(_) => (0.0, 0.0),
            Actor::Card { .. } => (1.0, 1.0),
        };
        Self {
            opacity,
            scale,
            color: Rgba8::WHITE,
            position: Point::ORIGIN,
            glow: 0.0,
            flash: 0.0,
        }
    }
}

/// Where in a loop a playhead sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Phase {
    /// Working through stage `i`.
    Stage(usize),
    /// Past the final step mark: final-card flash and indicator shrink.
    Terminal,
    /// Pause between the end of one loop and the start of the next.
    Interlude,
}

/// Immutable, seekable choreography.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Timeline {
    segments: Vec<Segment>,
    step_offsets: Vec<f64>,
    cards: Vec<(usize, Lane)>,
    duration: f64,
    repeat_delay: f64,
}

impl Timeline {
    /// Length of one pass, excluding the repeat delay.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Pause between loops.
    pub fn repeat_delay(&self) -> f64 {
        self.repeat_delay
    }

    /// Length of one full loop including the repeat delay.
    pub fn cycle(&self) -> f64 {
        self.duration + self.repeat_delay
    }

    /// Offsets at which each step becomes current; one non-decreasing entry per step.
    pub fn step_offsets(&self) -> &[f64] {
        &self.step_offsets
    }

    /// Number of steps.
    pub fn step_count(&self) -> usize {
        self.step_offsets.len()
    }

    /// All segments in start order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Registered cards in registration order.
    pub fn cards(&self) -> &[(usize, Lane)] {
        &self.cards
    }

    /// Index of the greatest step offset at or before `t`; ties resolve to the later step.
    pub fn current_step(&self, t: f64) -> usize {
        let mut idx = 0;
        for (i, &offset) in self.step_offsets.iter().enumerate() {
            if t >= offset {
                idx = i;
            }
        }
        idx
    }

    /// Phase of a loop-local time `t`.
    pub fn phase(&self, t: f64) -> Phase {
        if t >= self.duration {
            return Phase::Interlude;
        }
        let current = self.current_step(t);
        let last = self.step_offsets.len().saturating_sub(1);
        if current == last && t >= self.step_offsets[last] {
            Phase::Terminal
        } else {
            Phase::Stage(current)
        }
    }

    /// Evaluate every channel of `actor` at loop-local time `t`.
    ///
    /// Anchors the geometry cannot resolve hold the position reached by the previous segment.
    pub fn sample(&self, actor: Actor, t: f64, geometry: &dyn StageGeometry) -> ActorState {
        self.sample_with_fallback(actor, t, geometry, None)
    }

    /// Like [`Timeline::sample`], but unresolvable anchors fall back to `last_known`.
    ///
    /// Hosts pass the position the actor was last drawn at, so a marker that stops being
    /// measurable leaves the actor where it was instead of snapping to an earlier anchor.
    pub fn sample_with_fallback(
        &self,
        actor: Actor,
        t: f64,
        geometry: &dyn StageGeometry,
        last_known: Option<Point>,
    ) -> ActorState {
        let init = ActorState::initial(actor);
        ActorState {
            opacity: self.channel(actor, t, init.opacity, |p| p.opacity.map(Some), lerp),
            scale: self.channel(actor, t, init.scale, |p| p.scale.map(Some), lerp),
            color: self.channel(actor, t, init.color, |p| p.color.map(Some), Rgba8::lerp),
            position: self
                .position(actor, t, geometry, last_known)
                .unwrap_or(init.position),
            glow: self.channel(actor, t, init.glow, |p| p.glow.map(Some), lerp),
            flash: self.channel(actor, t, init.flash, |p| p.flash.map(Some), lerp),
        }
    }

    /// Position of `actor` at `t`, or `None` while nothing about it can be placed.
    pub fn position(
        &self,
        actor: Actor,
        t: f64,
        geometry: &dyn StageGeometry,
        last_known: Option<Point>,
    ) -> Option<Point> {
        self.channel(
            actor,
            t,
            last_known,
            |p| p.at.map(|a| a.resolve(geometry).or(last_known).map(Some)),
            |a: Option<Point>, b: Option<Point>, k| match (a, b) {
                (Some(a), Some(b)) => Some(a.lerp(b, k)),
                (a, b) => b.or(a),
            },
        )
    }

    // Applies segments touching one channel in start order. Each segment interpolates from the
    // channel value at its own start (as left by the previous segment) to its target. `pick`
    // yields `Some(None)` for a target that cannot be resolved: the channel holds its value.
    fn channel<T, P, L>(&self, actor: Actor, t: f64, initial: T, pick: P, mix: L) -> T
    where
        T: Copy,
        P: Fn(&Props) -> Option<Option<T>>,
        L: Fn(T, T, f64) -> T,
    {
        let mut active: Option<(&Segment, T, T)> = None;
        for seg in &self.segments {
            if seg.start > t {
                break;
            }
            if seg.actor != actor {
                continue;
            }
            let Some(target) = pick(&seg.props) else {
                continue;
            };
            let from = match active {
                Some((prev, from, to)) => mix(from, to, prev.progress(seg.start)),
                None => initial,
            };
            active = Some((seg, from, target.unwrap_or(from)));
        }
        match active {
            Some((seg, from, to)) => mix(from, to, seg.progress(t)),
            None => initial,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
