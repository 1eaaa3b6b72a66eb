use std::collections::{BTreeMap, BTreeSet};

use super::*;
use crate::config::presets::studio_team;

const DT: f64 = 0.05;

fn animator() -> FlowAnimator {
    let geometry = NetworkGeometry::from_spec(studio_team()).unwrap();
    FlowAnimator::new(geometry, FlowConfig::default()).unwrap()
}

#[test]
fn starts_with_one_trunk_marker() {
    let a = animator();
    assert_eq!(a.trunk().len(), 1);
    assert_eq!(a.trunk()[0].id, MarkerId(1));
    assert_eq!(a.trunk()[0].dist, 0.0);
    assert!(a.spine().is_empty());
    assert!(a.branches().is_empty());
    assert_eq!(a.stats().trunk_spawned, 1);

    let f = a.frame();
    assert_eq!(f.markers.len(), 1);
    assert_eq!(f.markers[0].opacity, 0.0);
    assert_eq!(f.markers[0].position, a.geometry().trunk().start());
}

#[test]
fn time_steps_are_clamped() {
    let mut a = animator();
    a.tick(1.0);
    assert_eq!(a.trunk()[0].dist, 7.5);
    a.tick(-1.0);
    a.tick(f64::NAN);
    assert_eq!(a.trunk()[0].dist, 7.5);
    assert!((a.elapsed() - 0.05).abs() < 1e-12);
}

#[test]
fn spawns_on_the_interval() {
    let mut a = animator();
    for _ in 0..7 {
        a.tick(DT);
    }
    assert_eq!(a.trunk().len(), 1);
    a.tick(DT);
    assert_eq!(a.trunk().len(), 2);
    assert_eq!(a.trunk()[1].dist, 7.5);
}

#[test]
fn trunk_markers_advance_monotonically_and_retire_once() {
    let mut a = animator();
    let limit = a.geometry().trunk().length() + a.config().trunk_overrun;
    let mut last = BTreeMap::<MarkerId, f64>::new();
    let mut retired = BTreeSet::<MarkerId>::new();

    for _ in 0..2000 {
        a.tick(DT);
        let live = a
            .trunk()
            .iter()
            .map(|m| (m.id, m.dist))
            .collect::<BTreeMap<_, _>>();
        for (id, dist) in &live {
            assert!(!retired.contains(id), "marker {id:?} came back");
            assert!(*dist <= limit);
            if let Some(prev) = last.get(id) {
                assert!(dist > prev);
            }
        }
        for (id, prev) in &last {
            if !live.contains_key(id) {
                assert!(prev + 7.5 > limit, "marker {id:?} retired early at {prev}");
                retired.insert(*id);
            }
        }
        last = live;
    }
    assert!(!retired.is_empty());
}

#[test]
fn each_trunk_marker_spawns_one_spine_pair() {
    let mut a = animator();
    // 485 px at 7.5 px per tick: the first marker reaches the junction on tick 65.
    for _ in 0..64 {
        a.tick(DT);
    }
    assert!(a.spine().is_empty());
    a.tick(DT);
    assert_eq!(a.spine().len(), 2);
    assert!(a.trunk()[0].spawned_spine);
    for _ in 0..3 {
        a.tick(DT);
    }
    assert_eq!(a.stats().spine_spawned(SpineDir::Up), 1);
    assert_eq!(a.stats().spine_spawned(SpineDir::Down), 1);

    for _ in 0..1000 {
        a.tick(DT);
    }
    let s = a.stats();
    assert_eq!(s.spine_up_spawned, s.spine_down_spawned);
    let live_spawned = a.trunk().iter().filter(|m| m.spawned_spine).count() as u64;
    assert!(s.spine_up_spawned >= live_spawned);
    assert!(s.spine_up_spawned <= s.trunk_spawned);
}

#[test]
fn branch_emissions_never_exceed_spine_traversals() {
    let mut a = animator();
    for _ in 0..3000 {
        a.tick(DT);
        let s = a.stats();
        for lane in 0..a.geometry().lane_count() {
            let dir = a.geometry().lane_dir(lane).unwrap();
            assert!(s.branch_emitted[lane] <= s.spine_spawned(dir));
        }
        for spine in a.spine() {
            for (lane, &done) in spine.emitted.iter().enumerate() {
                if done {
                    assert_eq!(a.geometry().lane_dir(lane), Some(spine.dir));
                }
            }
        }
    }
    // Every lane is served, including the outer ones at the spine ends.
    assert!(a.stats().branch_emitted.iter().all(|&n| n > 0));
}

#[test]
fn opacity_follows_the_fade_ramp() {
    let mut a = animator();
    let f = a.tick(DT);
    assert!((f.markers[0].opacity - 7.5 / 22.0).abs() < 1e-12);
    for _ in 0..10 {
        a.tick(DT);
    }
    let f = a.frame();
    let first = f.markers.iter().find(|m| m.id == MarkerId(1)).unwrap();
    assert_eq!(first.opacity, 1.0);
    assert!(f.markers.iter().all(|m| (0.0..=1.0).contains(&m.opacity)));
}

#[test]
fn hover_only_accepts_known_nodes() {
    let mut a = animator();
    assert!(a.hover(Some("Ops")));
    assert_eq!(a.hovered(), Some("Ops"));
    assert_eq!(a.tick(DT).hovered.as_deref(), Some("Ops"));
    assert!(!a.hover(Some("Nobody")));
    assert_eq!(a.hovered(), None);
    assert!(a.hover(Some("Sound Lead")));
    assert!(!a.hover(None));
}

#[test]
fn commands_draw_wires_markers_and_cards() {
    let mut a = animator();
    a.hover(Some("Design Lead"));
    for _ in 0..100 {
        a.tick(DT);
    }
    let f = a.frame();
    let cmds = f.commands(a.geometry());
    let lanes = a.geometry().lane_count();
    assert_eq!(cmds.len(), 3 + lanes + f.markers.len() + 3 + lanes);
    assert!(matches!(cmds[0], RenderCommand::Wire { .. }));
    let hot = cmds
        .iter()
        .filter(|c| matches!(c, RenderCommand::Card { stroke, .. } if *stroke == STROKE_HOVER))
        .count();
    assert_eq!(hot, 1);
}

#[test]
fn config_validation() {
    let geometry = NetworkGeometry::from_spec(studio_team()).unwrap();
    let cfg = FlowConfig {
        speed: 0.0,
        ..FlowConfig::default()
    };
    assert!(FlowAnimator::new(geometry, cfg).is_err());
    assert!(
        FlowConfig {
            fade_out: -1.0,
            ..FlowConfig::default()
        }
        .validate()
        .is_err()
    );
    let partial: FlowConfig = serde_json::from_value(serde_json::json!({ "speed": 90.0 })).unwrap();
    assert_eq!(partial.speed, 90.0);
    assert_eq!(partial.spawn_interval, 0.38);
    assert_eq!(FlowConfig::default().max_step(), 7.5);
}
