//! Turns a [`Process`] into a looping [`Timeline`].
//!
//! Per stage: mark the step offset, highlight each card and fly a traveler from the card's lane
//! into the stage marker (pulsing the indicator on arrival), pause briefly, then move the
//! indicator to the next marker. The last stage instead flashes its final card, shrinks the
//! indicator away, and snaps it back to stage 0 for the next loop.

use crate::{
    animation::ease::Ease,
    animation::timeline::{Actor, Anchor, Placement, Props, Timeline, TimelineBuilder},
    foundation::color::Rgba8,
    foundation::error::{FlowlineError, FlowlineResult},
    layout::stage::Lane,
    process::model::{Cue, Process},
};

/// Timing of the generated choreography, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChoreoConfig {
    /// Card glow ramp-up.
    pub glow_in: f64,
    /// Hold between glow ramp-up and decay.
    pub glow_hold: f64,
    /// Card glow decay.
    pub glow_out: f64,
    /// Traveler flight from lane origin into the marker.
    pub traveler: f64,
    /// Traveler fade-out.
    pub traveler_fade: f64,
    /// Delay of the traveler fade after the indicator pulse settles.
    pub traveler_fade_delay: f64,
    /// Indicator pulse growth.
    pub pulse_in: f64,
    /// Indicator pulse settle.
    pub pulse_out: f64,
    /// Peak indicator scale during a pulse.
    pub pulse_scale: f64,
    /// Pause before moving to the next stage.
    pub gap: f64,
    /// Indicator move between stage markers.
    pub move_duration: f64,
    /// Final card flash ramp-up.
    pub flash_in: f64,
    /// Indicator shrink at the end of a loop.
    pub shrink: f64,
    /// Delay of the shrink after the flash starts.
    pub shrink_delay: f64,
    /// Hold before the final flash decays.
    pub flash_hold: f64,
    /// Final flash decay.
    pub flash_out: f64,
    /// Pause between loops.
    pub repeat_delay: f64,
}

impl Default for ChoreoConfig {
    fn default() -> Self {
        Self {
            glow_in: 0.28,
            glow_hold: 0.35,
            glow_out: 0.55,
            traveler: 0.7,
            traveler_fade: 0.18,
            traveler_fade_delay: 0.05,
            pulse_in: 0.16,
            pulse_out: 0.28,
            pulse_scale: 1.35,
            gap: 0.18,
            move_duration: 0.95,
            flash_in: 0.5,
            shrink: 0.3,
            shrink_delay: 0.1,
            flash_hold: 0.4,
            flash_out: 1.2,
            repeat_delay: 1.2,
        }
    }
}

impl ChoreoConfig {
    /// Every timing must be finite and non-negative; the pulse scale must be positive.
    pub fn validate(&self) -> FlowlineResult<()> {
        for (name, v) in [
            ("glow_in", self.glow_in),
            ("glow_hold", self.glow_hold),
            ("glow_out", self.glow_out),
            ("traveler", self.traveler),
            ("traveler_fade", self.traveler_fade),
            ("traveler_fade_delay", self.traveler_fade_delay),
            ("pulse_in", self.pulse_in),
            ("pulse_out", self.pulse_out),
            ("gap", self.gap),
            ("move_duration", self.move_duration),
            ("flash_in", self.flash_in),
            ("shrink", self.shrink),
            ("shrink_delay", self.shrink_delay),
            ("flash_hold", self.flash_hold),
            ("flash_out", self.flash_out),
            ("repeat_delay", self.repeat_delay),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(FlowlineError::validation(format!(
                    "choreography {name} must be finite and >= 0"
                )));
            }
        }
        if !self.pulse_scale.is_finite() || self.pulse_scale <= 0.0 {
            return Err(FlowlineError::validation(
                "choreography pulse_scale must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Build the looping timeline for `process`.
#[tracing::instrument(skip(process, cfg), fields(stages = process.len()))]
pub fn build(process: &Process, cfg: &ChoreoConfig) -> FlowlineResult<Timeline> {
    process.validate()?;
    cfg.validate()?;

    let mut tl = TimelineBuilder::new(cfg.repeat_delay);
    for (i, stage) in process.stages.iter().enumerate() {
        for lane in stage.lanes() {
            tl.register_card(i, lane);
        }
    }

    let first = &process.stages[0];
    tl.set(
        Actor::Indicator,
        Props::new()
            .opacity(1.0)
            .scale(1.0)
            .color(first.accent)
            .at(Anchor::Marker(0)),
        Placement::End,
    )?;

    let last = process.stages.len() - 1;
    for (i, stage) in process.stages.iter().enumerate() {
        tl.mark();
        if i == last {
            break;
        }

        let lanes = stage.cue_order();
        match stage.cue {
            Cue::Together => {
                for &lane in &lanes {
                    glow_card(&mut tl, cfg, i, lane, stage.accent)?;
                }
                for &lane in &lanes {
                    spawn_traveler(&mut tl, cfg, i, lane, stage.accent)?;
                }
            }
            Cue::ClientFirst | Cue::StudioFirst => {
                for &lane in &lanes {
                    glow_card(&mut tl, cfg, i, lane, stage.accent)?;
                    spawn_traveler(&mut tl, cfg, i, lane, stage.accent)?;
                }
            }
        }

        tl.wait(cfg.gap)?;
        tl.to(
            Actor::Indicator,
            Props::new().at(Anchor::Marker(i + 1)),
            cfg.move_duration,
            Ease::InOutCubic,
            Placement::End,
        )?;
    }

    finale(&mut tl, cfg, process, last)?;

    let timeline = tl.build()?;
    tracing::debug!(
        duration = timeline.duration(),
        segments = timeline.segments().len(),
        "built step timeline"
    );
    Ok(timeline)
}

fn glow_card(
    tl: &mut TimelineBuilder,
    cfg: &ChoreoConfig,
    stage: usize,
    lane: Lane,
    color: Rgba8,
) -> FlowlineResult<()> {
    let card = Actor::Card { stage, lane };
    tl.to(
        card,
        Props::new().glow(1.0).color(color),
        cfg.glow_in,
        Ease::OutCubic,
        Placement::AfterPrevious(0.0),
    )?
    .to(
        card,
        Props::new().glow(0.0),
        cfg.glow_out,
        Ease::OutCubic,
        Placement::AfterPrevious(cfg.glow_hold),
    )?;
    Ok(())
}

fn spawn_traveler(
    tl: &mut TimelineBuilder,
    cfg: &ChoreoConfig,
    stage: usize,
    lane: Lane,
    color: Rgba8,
) -> FlowlineResult<()> {
    let traveler = Actor::Traveler(lane);
    tl.set(
        traveler,
        Props::new()
            .opacity(1.0)
            .scale(0.7)
            .color(color)
            .at(Anchor::Lane { stage, lane }),
        Placement::End,
    )?
    .to(
        traveler,
        Props::new().at(Anchor::Marker(stage)).scale(1.0),
        cfg.traveler,
        Ease::OutCubic,
        Placement::End,
    )?
    .to(
        Actor::Indicator,
        Props::new()
            .opacity(1.0)
            .scale(cfg.pulse_scale)
            .color(color),
        cfg.pulse_in,
        Ease::OutCubic,
        Placement::WithPrevious(0.0),
    )?
    .to(
        Actor::Indicator,
        Props::new().scale(1.0),
        cfg.pulse_out,
        Ease::OutCubic,
        Placement::AfterPrevious(0.0),
    )?
    .to(
        traveler,
        Props::new().opacity(0.0).scale(0.92),
        cfg.traveler_fade,
        Ease::OutQuad,
        Placement::WithPrevious(cfg.traveler_fade_delay),
    )?;
    Ok(())
}

fn finale(
    tl: &mut TimelineBuilder,
    cfg: &ChoreoConfig,
    process: &Process,
    last: usize,
) -> FlowlineResult<()> {
    let stage = &process.stages[last];
    // Validation guarantees at least one occupied lane; prefer the studio card.
    let lane = stage.lanes().last().unwrap_or(Lane::Lower);
    let card = Actor::Card { stage: last, lane };

    tl.to(
        card,
        Props::new().flash(1.0),
        cfg.flash_in,
        Ease::OutCubic,
        Placement::AfterPrevious(0.0),
    )?
    .to(
        Actor::Indicator,
        Props::new().scale(0.0).opacity(0.0),
        cfg.shrink,
        Ease::InCubic,
        Placement::WithPrevious(cfg.shrink_delay),
    )?
    .to(
        card,
        Props::new().flash(0.0),
        cfg.flash_out,
        Ease::OutCubic,
        Placement::AfterPrevious(cfg.flash_hold),
    )?
    .set(
        Actor::Indicator,
        Props::new().opacity(0.0).scale(0.0).at(Anchor::Marker(0)),
        Placement::AfterPrevious(0.0),
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/process/choreography.rs"]
mod tests;
