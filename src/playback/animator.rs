//! Caller-driven playback of a step [`Timeline`].
//!
//! The animator owns the playhead and the two state machines (playback and control mode). It
//! never reads a clock: hosts call [`StepAnimator::tick`] with the elapsed time and the geometry
//! that is current for this frame.

use smallvec::SmallVec;

use crate::{
    animation::timeline::{Actor, ActorState, Phase, Timeline},
    foundation::color::Rgba8,
    foundation::core::{Point, Rect, Size},
    layout::stage::{Lane, StageGeometry},
    playback::input::{Command, KeyChord, KeyPress},
    render::command::RenderCommand,
};

// Playheads this close to the loop end count as having reached it.
const WRAP_EPSILON: f64 = 1e-9;

/// Whether the playhead advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum PlaybackState {
    /// Never started, or reset.
    #[default]
    Idle,
    /// Advancing on every tick.
    Playing,
    /// Holding the playhead.
    Paused,
}

/// Who drives the playhead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum ControlMode {
    /// Loops on its own while visible.
    #[default]
    Automatic,
    /// Presentation mode: the playhead only moves on explicit seeks.
    Manual,
}

/// A round marker as it should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MarkerVisual {
    /// Centre.
    pub position: Point,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Fill color.
    pub color: Rgba8,
}

impl From<ActorState> for MarkerVisual {
    fn from(s: ActorState) -> Self {
        Self {
            position: s.position,
            opacity: s.opacity.clamp(0.0, 1.0),
            scale: s.scale.max(0.0),
            color: s.color,
        }
    }
}

/// Highlight state of one step card.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CardVisual {
    /// Stage index.
    pub stage: usize,
    /// Side of the stage.
    pub lane: Lane,
    /// Where the card's traveler starts, if the geometry can place it.
    pub anchor: Option<Point>,
    /// Centre of the card, if the geometry can place it.
    pub centre: Option<Point>,
    /// Glow level in `[0, 1]`.
    pub glow: f64,
    /// Final flash level in `[0, 1]`.
    pub flash: f64,
    /// Color of the most recent highlight.
    pub accent: Rgba8,
}

/// Everything a host needs to draw one step-timeline frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StepFrame {
    /// Loop-local playhead in seconds.
    pub time: f64,
    /// Completed loops.
    pub iteration: u64,
    /// Index of the current step.
    pub current_step: usize,
    /// Where in the loop the playhead is.
    pub phase: Phase,
    /// Playback state after this tick.
    pub state: PlaybackState,
    /// Control mode after this tick.
    pub mode: ControlMode,
    /// Primary indicator.
    pub indicator: MarkerVisual,
    /// Transient travelers, one per lane.
    pub travelers: SmallVec<[(Lane, MarkerVisual); 2]>,
    /// Every registered card.
    pub cards: Vec<CardVisual>,
}

const CARD_SIZE: Size = Size::new(132.0, 44.0);
const CARD_FILL: Rgba8 = Rgba8::rgb(12, 12, 12);
const CARD_STROKE: Rgba8 = Rgba8::rgba(255, 255, 255, 20);
const FLASH_STROKE: Rgba8 = Rgba8::rgba(255, 255, 255, 140);

impl StepFrame {
    /// Lower the frame into draw commands: cards first, then travelers, then the indicator.
    pub fn commands(&self) -> Vec<RenderCommand> {
        let mut out = Vec::with_capacity(self.cards.len() + self.travelers.len() + 1);
        for card in &self.cards {
            let Some(centre) = card.centre else {
                continue;
            };
            let rect = Rect::from_center_size(centre, CARD_SIZE);
            let stroke = CARD_STROKE.lerp(card.accent, card.glow.clamp(0.0, 1.0));
            let stroke = stroke.lerp(FLASH_STROKE, card.flash.clamp(0.0, 1.0));
            let (glow_color, glow) = if card.flash > card.glow {
                (Rgba8::WHITE, card.flash)
            } else {
                (card.accent, card.glow)
            };
            out.push(RenderCommand::Card {
                rect,
                radius: 14.0,
                fill: CARD_FILL,
                stroke,
                glow_color,
                glow: glow.clamp(0.0, 1.0),
                title: None,
            });
        }
        for (_, t) in &self.travelers {
            out.push(marker_command(t, 5.0));
        }
        out.push(marker_command(&self.indicator, 7.0));
        out
    }
}

fn marker_command(m: &MarkerVisual, radius: f64) -> RenderCommand {
    RenderCommand::Dot {
        center: m.position,
        radius: radius * m.scale,
        color: m.color,
        opacity: m.opacity,
    }
}

/// Plays a [`Timeline`] in response to host commands and ticks.
#[derive(Clone, Debug)]
pub struct StepAnimator {
    timeline: Timeline,
    chord: KeyChord,
    state: PlaybackState,
    mode: ControlMode,
    playhead: f64,
    iteration: u64,
    in_view: bool,
    // Last drawn positions of the indicator and the upper and lower travelers.
    last_known: [Option<Point>; 3],
}

impl StepAnimator {
    /// Idle animator in automatic mode, parked at the start of `timeline`.
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            chord: KeyChord::default(),
            state: PlaybackState::Idle,
            mode: ControlMode::Automatic,
            playhead: 0.0,
            iteration: 0,
            in_view: false,
            last_known: [None; 3],
        }
    }

    /// Replace the presentation-mode key chord.
    pub fn with_chord(mut self, chord: KeyChord) -> Self {
        self.chord = chord;
        self
    }

    /// The timeline being played.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current control mode.
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Loop-local playhead in seconds.
    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    /// Completed loops.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Whether the host last reported the region as visible.
    pub fn in_view(&self) -> bool {
        self.in_view
    }

    /// Step whose offset the playhead has most recently passed.
    pub fn current_step(&self) -> usize {
        self.timeline.current_step(self.playhead)
    }

    /// Apply a host command.
    pub fn dispatch(&mut self, cmd: Command) {
        match cmd {
            Command::ViewportEnter => {
                self.in_view = true;
                if self.mode == ControlMode::Automatic {
                    self.set_state(PlaybackState::Playing);
                }
            }
            Command::ViewportLeave => {
                self.in_view = false;
                if self.state == PlaybackState::Playing {
                    self.set_state(PlaybackState::Paused);
                }
            }
            Command::TogglePresentation => match self.mode {
                ControlMode::Automatic => {
                    self.set_mode(ControlMode::Manual);
                    self.set_state(PlaybackState::Paused);
                }
                ControlMode::Manual => {
                    self.set_mode(ControlMode::Automatic);
                    self.set_state(if self.in_view {
                        PlaybackState::Playing
                    } else {
                        PlaybackState::Paused
                    });
                }
            },
            Command::StepForward => self.seek(self.current_step() as isize + 1),
            Command::StepBackward => self.seek(self.current_step() as isize - 1),
            Command::JumpTo(i) => self.seek(i),
            Command::TogglePlay => match (self.mode, self.state) {
                (ControlMode::Manual, _) => {
                    self.set_mode(ControlMode::Automatic);
                    self.set_state(PlaybackState::Playing);
                }
                (ControlMode::Automatic, PlaybackState::Playing) => {
                    self.set_state(PlaybackState::Paused)
                }
                (ControlMode::Automatic, _) => self.set_state(PlaybackState::Playing),
            },
            Command::Reset => {
                self.set_mode(ControlMode::Automatic);
                self.set_state(PlaybackState::Idle);
                self.playhead = 0.0;
                self.iteration = 0;
            }
        }
    }

    /// Feed a key press; returns whether it was handled.
    pub fn key(&mut self, press: KeyPress) -> bool {
        if self.chord.matches(press) {
            self.dispatch(Command::TogglePresentation);
            true
        } else {
            false
        }
    }

    /// Advance by `dt` seconds (if playing) and evaluate the frame.
    ///
    /// Negative or non-finite `dt` values are treated as zero.
    pub fn tick(&mut self, dt: f64, geometry: &dyn StageGeometry) -> StepFrame {
        if self.state == PlaybackState::Playing && dt.is_finite() && dt > 0.0 {
            self.advance(dt);
        }
        self.frame(geometry)
    }

    /// Evaluate the frame at the current playhead without advancing.
    ///
    /// Markers whose anchor the geometry cannot resolve stay where they were last drawn.
    pub fn frame(&mut self, geometry: &dyn StageGeometry) -> StepFrame {
        let t = self.playhead;
        let indicator = self.sample_marker(Actor::Indicator, t, geometry);
        let travelers = Lane::ALL
            .into_iter()
            .map(|lane| (lane, self.sample_marker(Actor::Traveler(lane), t, geometry)))
            .collect();

        let tl = &self.timeline;
        let cards = tl
            .cards()
            .iter()
            .map(|&(stage, lane)| {
                let s = tl.sample(Actor::Card { stage, lane }, t, geometry);
                CardVisual {
                    stage,
                    lane,
                    anchor: geometry.lane_origin(stage, lane),
                    centre: geometry.card_centre(stage, lane, CARD_SIZE),
                    glow: s.glow.clamp(0.0, 1.0),
                    flash: s.flash.clamp(0.0, 1.0),
                    accent: s.color,
                }
            })
            .collect();
        StepFrame {
            time: t,
            iteration: self.iteration,
            current_step: tl.current_step(t),
            phase: tl.phase(t),
            state: self.state,
            mode: self.mode,
            indicator,
            travelers,
            cards,
        }
    }

    fn sample_marker(
        &mut self,
        actor: Actor,
        t: f64,
        geometry: &dyn StageGeometry,
    ) -> MarkerVisual {
        let slot = match actor {
            Actor::Traveler(Lane::Upper) => 1,
            Actor::Traveler(Lane::Lower) => 2,
            _ => 0,
        };
        let last = self.last_known[slot];
        if let Some(p) = self.timeline.position(actor, t, geometry, last) {
            self.last_known[slot] = Some(p);
        }
        self.timeline
            .sample_with_fallback(actor, t, geometry, last)
            .into()
    }

    fn advance(&mut self, dt: f64) {
        let cycle = self.timeline.cycle();
        if cycle <= 0.0 {
            return;
        }
        let mut t = self.playhead + dt;
        if t + WRAP_EPSILON >= cycle {
            let loops = ((t + WRAP_EPSILON) / cycle).floor();
            t = (t - loops * cycle).max(0.0);
            self.iteration += loops as u64;
            tracing::trace!(iteration = self.iteration, "step timeline wrapped");
        }
        self.playhead = t;
    }

    fn seek(&mut self, step: isize) {
        let last = self.timeline.step_count().saturating_sub(1) as isize;
        let idx = step.clamp(0, last) as usize;
        self.playhead = self.timeline.step_offsets()[idx];
        self.set_mode(ControlMode::Manual);
        self.set_state(PlaybackState::Paused);
        tracing::debug!(step = idx, playhead = self.playhead, "seek");
    }

    fn set_state(&mut self, next: PlaybackState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "playback state");
            self.state = next;
        }
    }

    fn set_mode(&mut self, next: ControlMode) {
        if self.mode != next {
            tracing::debug!(from = ?self.mode, to = ?next, "control mode");
            self.mode = next;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/animator.rs"]
mod tests;
