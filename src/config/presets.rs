//! Built-in scenes used when no configuration file is given.

use crate::{
    foundation::color::Rgba8,
    layout::network::{NetworkSpec, Node},
    process::model::{Cue, Process, Role, Step, Stage},
};

const CLIENT_BLUE: Rgba8 = Rgba8::rgb(0x60, 0xa5, 0xfa);
const ALERT_RED: Rgba8 = Rgba8::rgb(0xf8, 0x71, 0x71);
const SOFT_WHITE: Rgba8 = Rgba8::rgba(255, 255, 255, 204);

fn step(num: &str, role: Role, title: &str, desc: &str) -> Step {
    Step {
        num: num.to_string(),
        role,
        title: title.to_string(),
        desc: desc.to_string(),
    }
}

fn stage(
    client: Option<Step>,
    studio: Option<Step>,
    accent: Rgba8,
    label: &str,
    cue: Cue,
) -> Stage {
    Stage {
        client,
        studio,
        accent,
        label: label.to_string(),
        cue,
    }
}

/// Seven-stage client/studio production process.
pub fn studio_process() -> Process {
    use Role::{Client, Studio};
    Process {
        stages: vec![
            stage(
                Some(step("01", Client, "Clarity Call", "Single session to lock objections, narrative and outcome.")),
                Some(step("01", Studio, "Strategy Return", "Locked plan within 48h.")),
                CLIENT_BLUE,
                "01 Clarity Call",
                Cue::ClientFirst,
            ),
            stage(
                Some(step("02", Client, "Marketing Alignment", "Quick yes/no on script, positioning and tone.")),
                Some(step("02", Studio, "Storyboard & Direction", "Full scene direction and stills.")),
                CLIENT_BLUE,
                "02 Marketing Alignment",
                Cue::ClientFirst,
            ),
            stage(
                Some(step("03", Client, "Design Collaboration", "One focused pass on frames and pacing.")),
                Some(step("03", Studio, "Design Frames", "Static frames reviewed scene by scene.")),
                CLIENT_BLUE,
                "03 Design Collaboration",
                Cue::StudioFirst,
            ),
            stage(
                None,
                Some(step("04", Studio, "Motion Build", "Animation with timing tuned for comprehension.")),
                CLIENT_BLUE,
                "04 Motion Build",
                Cue::ClientFirst,
            ),
            stage(
                None,
                Some(step("05", Studio, "Sound & SFX", "Audio layer and polish.")),
                ALERT_RED,
                "05 Sound & SFX",
                Cue::ClientFirst,
            ),
            stage(
                Some(step("05", Client, "QC with You", "One final review; assets drop the same day.")),
                Some(step("06", Studio, "QA Pass", "Internal check of pacing, clarity and brand.")),
                SOFT_WHITE,
                "06 QC with You",
                Cue::Together,
            ),
            stage(
                None,
                Some(step("07", Studio, "Final Handoff", "Hero, cutdowns and sources.")),
                Rgba8::WHITE,
                "07 Final Handoff",
                Cue::ClientFirst,
            ),
        ],
    }
}

/// Studio hub with creative lead and ops feeding a four-person team.
pub fn studio_team() -> NetworkSpec {
    NetworkSpec {
        chain: vec![
            Node::new("Studio", "Studio", ""),
            Node::new("Creative Lead", "Direction", "S"),
            Node::new("Ops", "Delivery", "OP"),
        ],
        members: vec![
            Node::new("Design Lead", "Visual Systems", "DL"),
            Node::new("Storyboard", "Story + Structure", "SB"),
            Node::new("Motion Lead", "Animation", "ML"),
            Node::new("Sound Lead", "Sound + Polish", "SL"),
        ],
        card: crate::foundation::core::Size::new(130.0, 130.0),
        vgap: 22.0,
        hgap: 90.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/presets.rs"]
mod tests;
