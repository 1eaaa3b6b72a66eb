use super::*;
use crate::animation::timeline::Phase;
use crate::config::presets::studio_process;
use crate::layout::stage::{BranchingLayout, StageGeometry};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn preset_timeline() -> Timeline {
    build(&studio_process(), &ChoreoConfig::default()).unwrap()
}

#[test]
fn one_offset_per_stage_in_order() {
    let tl = preset_timeline();
    assert_eq!(tl.step_count(), 7);
    assert!(tl.step_offsets().windows(2).all(|w| w[0] <= w[1]));

    let expected = [0.0, 4.58, 9.16, 13.74, 16.75, 19.76, 24.65];
    for (got, want) in tl.step_offsets().iter().zip(expected) {
        assert!(close(*got, want), "offset {got} != {want}");
    }
    assert!(close(tl.duration(), 26.65));
    assert!(close(tl.cycle(), 27.85));
}

#[test]
fn indicator_rests_on_each_marker_at_its_offset() {
    let tl = preset_timeline();
    let geom = BranchingLayout::new(7);
    for (i, &offset) in tl.step_offsets().iter().enumerate() {
        let s = tl.sample(Actor::Indicator, offset, &geom);
        let m = geom.marker(i).unwrap();
        assert!(close(s.position.x, m.x) && close(s.position.y, m.y), "stage {i}");
    }
}

#[test]
fn terminal_sequence_flashes_final_card_and_resets_indicator() {
    let tl = preset_timeline();
    let geom = BranchingLayout::new(7);
    let last = tl.step_offsets()[6];

    assert_eq!(tl.phase(last), Phase::Terminal);
    let flash = tl.sample(
        Actor::Card {
            stage: 6,
            lane: Lane::Lower,
        },
        last + 0.5,
        &geom,
    );
    assert!(close(flash.flash, 1.0));

    let end = tl.sample(Actor::Indicator, tl.duration(), &geom);
    assert!(close(end.opacity, 0.0));
    assert!(close(end.scale, 0.0));
    let home = geom.marker(0).unwrap();
    assert!(close(end.position.x, home.x) && close(end.position.y, home.y));
    assert_eq!(tl.phase(tl.duration() + 0.1), Phase::Interlude);
}

#[test]
fn indicator_pulses_when_a_traveler_arrives() {
    let tl = preset_timeline();
    let geom = BranchingLayout::new(7);
    // First traveler leaves its lane at 1.18; the pulse peaks 0.16 later.
    let peak = tl.sample(Actor::Indicator, 1.34, &geom);
    assert!(close(peak.scale, 1.35));
    let settled = tl.sample(Actor::Indicator, 1.62, &geom);
    assert!(close(settled.scale, 1.0));

    let launch = tl
        .segments()
        .iter()
        .find(|s| s.actor == Actor::Traveler(Lane::Upper))
        .unwrap();
    assert!(close(launch.start, 1.18));
    let start = tl.sample(Actor::Traveler(Lane::Upper), launch.start, &geom);
    let origin = geom.lane_origin(0, Lane::Upper).unwrap();
    assert!(close(start.position.x, origin.x) && close(start.position.y, origin.y));
    assert!(close(start.scale, 0.7));
    let gone = tl.sample(Actor::Traveler(Lane::Upper), 1.6, &geom);
    assert!(close(gone.opacity, 0.0));
}

#[test]
fn together_cue_glows_both_cards_before_any_traveler() {
    let tl = preset_timeline();
    let stage5 = tl.step_offsets()[5];
    let next = tl.step_offsets()[6];
    let in_stage = |seg: &&crate::animation::timeline::Segment| {
        seg.start >= stage5 && seg.start < next
    };
    let last_glow = tl
        .segments()
        .iter()
        .filter(in_stage)
        .filter(|s| matches!(s.actor, Actor::Card { .. }) && s.props.glow == Some(1.0))
        .map(|s| s.start)
        .fold(f64::MIN, f64::max);
    let first_traveler = tl
        .segments()
        .iter()
        .filter(in_stage)
        .filter(|s| matches!(s.actor, Actor::Traveler(_)))
        .map(|s| s.start)
        .fold(f64::MAX, f64::min);
    assert!(last_glow < first_traveler);
}

#[test]
fn studio_first_cue_lights_the_studio_card_first() {
    let tl = preset_timeline();
    let stage2 = tl.step_offsets()[2];
    let first_glow = tl
        .segments()
        .iter()
        .find(|s| s.start >= stage2 && matches!(s.actor, Actor::Card { .. }))
        .unwrap();
    assert_eq!(
        first_glow.actor,
        Actor::Card {
            stage: 2,
            lane: Lane::Lower
        }
    );
}

#[test]
fn every_card_is_registered() {
    let tl = preset_timeline();
    assert_eq!(tl.cards().len(), studio_process().flatten().len());
}

#[test]
fn single_stage_process_only_flashes() {
    let mut p = studio_process();
    p.stages.truncate(1);
    let tl = build(&p, &ChoreoConfig::default()).unwrap();
    assert_eq!(tl.step_offsets(), &[0.0]);
    assert!(
        tl.segments()
            .iter()
            .all(|s| !matches!(s.actor, Actor::Traveler(_)))
    );
}

#[test]
fn config_validation_and_defaults() {
    let cfg = ChoreoConfig {
        gap: -1.0,
        ..ChoreoConfig::default()
    };
    assert!(cfg.validate().is_err());
    assert!(build(&studio_process(), &cfg).is_err());

    let partial: ChoreoConfig =
        serde_json::from_value(serde_json::json!({ "repeat_delay": 2.0 })).unwrap();
    assert_eq!(partial.repeat_delay, 2.0);
    assert_eq!(partial.move_duration, 0.95);

    let empty = Process { stages: vec![] };
    assert!(build(&empty, &ChoreoConfig::default()).is_err());
}
