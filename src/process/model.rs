//! Steps, stages, and processes that the step timeline is built from.

use crate::{
    foundation::color::Rgba8,
    foundation::error::{FlowlineError, FlowlineResult},
    layout::stage::Lane,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Who owns a step.
pub enum Role {
    /// Client-facing step.
    Client,
    /// Studio-facing step.
    Studio,
}

impl Role {
    /// Lane a step with this role is drawn on.
    pub fn lane(self) -> Lane {
        match self {
            Role::Client => Lane::Upper,
            Role::Studio => Lane::Lower,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A single process step card.
pub struct Step {
    /// Display number, e.g. `"03"`.
    pub num: String,
    /// Owner of the step.
    pub role: Role,
    /// Card title.
    pub title: String,
    /// Card body.
    #[serde(default)]
    pub desc: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Highlight order for the cards of a stage.
pub enum Cue {
    /// Client card first; each card spawns its traveler before the next glows.
    #[default]
    ClientFirst,
    /// Studio card first.
    StudioFirst,
    /// Both cards glow, then both travelers spawn.
    Together,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One stop on the timeline with up to two cards.
pub struct Stage {
    /// Client card above the spine.
    #[serde(default)]
    pub client: Option<Step>,
    /// Studio card below the spine.
    #[serde(default)]
    pub studio: Option<Step>,
    /// Indicator and glow color while this stage is current.
    pub accent: Rgba8,
    /// Label shown in presentation controls.
    pub label: String,
    /// Highlight order.
    #[serde(default)]
    pub cue: Cue,
}

impl Stage {
    /// Step on `lane`, if any.
    pub fn step(&self, lane: Lane) -> Option<&Step> {
        match lane {
            Lane::Upper => self.client.as_ref(),
            Lane::Lower => self.studio.as_ref(),
        }
    }

    /// Occupied lanes in the order the cue highlights them.
    pub fn cue_order(&self) -> Vec<Lane> {
        let order = match self.cue {
            Cue::StudioFirst => [Lane::Lower, Lane::Upper],
            Cue::ClientFirst | Cue::Together => [Lane::Upper, Lane::Lower],
        };
        order
            .into_iter()
            .filter(|lane| self.step(*lane).is_some())
            .collect()
    }

    /// Occupied lanes in display order.
    pub fn lanes(&self) -> impl Iterator<Item = Lane> + '_ {
        Lane::ALL.into_iter().filter(|lane| self.step(*lane).is_some())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Ordered list of stages driving the step timeline.
pub struct Process {
    /// Stages in playback order.
    pub stages: Vec<Stage>,
}

impl Process {
    /// Validate structural requirements.
    pub fn validate(&self) -> FlowlineResult<()> {
        if self.stages.is_empty() {
            return Err(FlowlineError::validation("process must have at least one stage"));
        }
        for (i, stage) in self.stages.iter().enumerate() {
            if stage.client.is_none() && stage.studio.is_none() {
                return Err(FlowlineError::validation(format!(
                    "stage {i} has neither a client nor a studio step"
                )));
            }
            if stage.label.trim().is_empty() {
                return Err(FlowlineError::validation(format!(
                    "stage {i} label must be non-empty"
                )));
            }
            for lane in stage.lanes() {
                if let Some(step) = stage.step(lane)
                    && step.role.lane() != lane
                {
                    return Err(FlowlineError::validation(format!(
                        "stage {i} step '{}' has role {:?} on the wrong side",
                        step.title, step.role
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the process has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Steps flattened into single-column order: `(stage, step)` with client before studio.
    pub fn flatten(&self) -> Vec<(usize, &Step)> {
        self.stages
            .iter()
            .enumerate()
            .flat_map(|(i, stage)| stage.lanes().filter_map(move |l| stage.step(l).map(|s| (i, s))))
            .collect()
    }

    /// Presentation label of each stage.
    pub fn labels(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.label.as_str()).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/process/model.rs"]
mod tests;
