use super::*;
use crate::config::presets::studio_process;
use crate::foundation::core::Vec2;
use crate::layout::stage::{BranchingLayout, ColumnLayout, MeasuredGeometry, ResponsiveLayout};
use crate::process::choreography::{ChoreoConfig, build};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn animator() -> StepAnimator {
    StepAnimator::new(build(&studio_process(), &ChoreoConfig::default()).unwrap())
}

fn geom() -> BranchingLayout {
    BranchingLayout::new(7)
}

#[test]
fn stays_idle_until_visible() {
    let mut a = animator();
    let f = a.tick(1.0, &geom());
    assert_eq!(f.state, PlaybackState::Idle);
    assert_eq!(a.playhead(), 0.0);

    a.dispatch(Command::ViewportEnter);
    assert_eq!(a.state(), PlaybackState::Playing);
    assert!(a.in_view());
    a.tick(1.0, &geom());
    assert!(close(a.playhead(), 1.0));
}

#[test]
fn leaving_the_viewport_pauses_and_reentry_resumes() {
    let mut a = animator();
    a.dispatch(Command::ViewportEnter);
    a.tick(5.0, &geom());
    let step = a.current_step();
    assert_eq!(step, 1);

    a.dispatch(Command::ViewportLeave);
    assert_eq!(a.state(), PlaybackState::Paused);
    a.tick(3.0, &geom());
    assert_eq!(a.current_step(), step);
    assert!(close(a.playhead(), 5.0));

    a.dispatch(Command::ViewportEnter);
    assert_eq!(a.state(), PlaybackState::Playing);
    a.tick(0.5, &geom());
    assert!(close(a.playhead(), 5.5));
}

#[test]
fn seeks_clamp_and_force_manual_pause() {
    let mut a = animator();
    a.dispatch(Command::ViewportEnter);
    a.dispatch(Command::JumpTo(3));
    assert_eq!(a.current_step(), 3);
    assert_eq!(a.mode(), ControlMode::Manual);
    assert_eq!(a.state(), PlaybackState::Paused);

    let f = a.tick(2.0, &geom());
    assert_eq!(f.current_step, 3);
    let m = geom().marker(3).unwrap();
    assert!(close(f.indicator.position.x, m.x) && close(f.indicator.position.y, m.y));

    a.dispatch(Command::JumpTo(99));
    assert_eq!(a.current_step(), 6);
    a.dispatch(Command::StepForward);
    assert_eq!(a.current_step(), 6);
    a.dispatch(Command::JumpTo(-4));
    assert_eq!(a.current_step(), 0);
    a.dispatch(Command::StepBackward);
    assert_eq!(a.current_step(), 0);
    a.dispatch(Command::StepForward);
    a.dispatch(Command::StepForward);
    assert_eq!(a.current_step(), 2);
    assert_eq!(a.playhead(), a.timeline().step_offsets()[2]);
}

#[test]
fn manual_mode_ignores_viewport_reentry() {
    let mut a = animator();
    a.dispatch(Command::ViewportEnter);
    a.dispatch(Command::TogglePresentation);
    assert_eq!(a.mode(), ControlMode::Manual);
    assert_eq!(a.state(), PlaybackState::Paused);

    a.dispatch(Command::ViewportLeave);
    a.dispatch(Command::ViewportEnter);
    assert_eq!(a.state(), PlaybackState::Paused);

    a.dispatch(Command::TogglePresentation);
    assert_eq!(a.mode(), ControlMode::Automatic);
    assert_eq!(a.state(), PlaybackState::Playing);
}

#[test]
fn leaving_manual_mode_out_of_view_stays_paused() {
    let mut a = animator();
    a.dispatch(Command::TogglePresentation);
    a.dispatch(Command::TogglePresentation);
    assert_eq!(a.mode(), ControlMode::Automatic);
    assert_eq!(a.state(), PlaybackState::Paused);
}

#[test]
fn toggle_play_pauses_and_leaves_manual_mode() {
    let mut a = animator();
    a.dispatch(Command::ViewportEnter);
    a.dispatch(Command::TogglePlay);
    assert_eq!(a.state(), PlaybackState::Paused);
    a.dispatch(Command::TogglePlay);
    assert_eq!(a.state(), PlaybackState::Playing);

    a.dispatch(Command::JumpTo(2));
    a.dispatch(Command::TogglePlay);
    assert_eq!(a.mode(), ControlMode::Automatic);
    assert_eq!(a.state(), PlaybackState::Playing);
    a.tick(0.1, &geom());
    assert!(a.playhead() > a.timeline().step_offsets()[2]);
}

#[test]
fn presentation_chord_toggles_manual_mode() {
    let mut a = animator();
    assert!(!a.key(KeyPress::plain('p')));
    assert_eq!(a.mode(), ControlMode::Automatic);
    assert!(a.key(KeyPress::shifted('P')));
    assert_eq!(a.mode(), ControlMode::Manual);

    let mut custom = animator().with_chord(KeyChord {
        key: 'k',
        shift: false,
        ctrl: true,
        alt: false,
    });
    assert!(!custom.key(KeyPress::shifted('P')));
    assert!(custom.key(KeyPress {
        ctrl: true,
        ..KeyPress::plain('k')
    }));
}

#[test]
fn seven_stage_loop_reaches_terminal_and_wraps() {
    let mut a = animator();
    let g = geom();
    a.dispatch(Command::ViewportEnter);

    let last = a.timeline().step_offsets()[6];
    let f = a.tick(last, &g);
    assert_eq!(f.current_step, 6);
    assert_eq!(f.phase, Phase::Terminal);

    let f = a.tick(0.5, &g);
    let final_card = f
        .cards
        .iter()
        .find(|c| c.stage == 6 && c.lane == Lane::Lower)
        .unwrap();
    assert!(close(final_card.flash, 1.0));

    let remaining = a.timeline().cycle() - a.playhead();
    let f = a.tick(remaining, &g);
    assert_eq!(f.current_step, 0);
    assert_eq!(f.iteration, 1);
    assert!(f.time < 1e-6);
    let home = g.marker(0).unwrap();
    assert!(close(f.indicator.position.x, home.x));
}

#[test]
fn long_ticks_wrap_multiple_loops() {
    let mut a = animator();
    a.dispatch(Command::ViewportEnter);
    let cycle = a.timeline().cycle();
    a.tick(cycle * 2.0 + 1.0, &geom());
    assert_eq!(a.iteration(), 2);
    assert!(close(a.playhead(), 1.0));
}

#[test]
fn bad_deltas_are_ignored() {
    let mut a = animator();
    a.dispatch(Command::ViewportEnter);
    a.tick(-1.0, &geom());
    a.tick(f64::NAN, &geom());
    a.tick(f64::INFINITY, &geom());
    assert_eq!(a.playhead(), 0.0);
}

#[test]
fn reset_returns_to_idle_at_start() {
    let mut a = animator();
    a.dispatch(Command::ViewportEnter);
    a.tick(a.timeline().cycle() + 2.0, &geom());
    a.dispatch(Command::JumpTo(4));
    a.dispatch(Command::Reset);
    assert_eq!(a.state(), PlaybackState::Idle);
    assert_eq!(a.mode(), ControlMode::Automatic);
    assert_eq!(a.playhead(), 0.0);
    assert_eq!(a.iteration(), 0);
    assert_eq!(a.current_step(), 0);
}

#[test]
fn switching_layouts_keeps_the_playhead() {
    let mut a = animator();
    let layout = ResponsiveLayout::default().with_stages(7);
    a.dispatch(Command::JumpTo(2));

    let wide = a.tick(0.0, layout.for_width(1440.0));
    let narrow = a.tick(0.0, layout.for_width(600.0));
    assert_eq!(wide.current_step, narrow.current_step);
    assert_eq!(wide.time, narrow.time);

    let m = ColumnLayout::new(7).marker(2).unwrap();
    assert!(close(narrow.indicator.position.x, m.x) && close(narrow.indicator.position.y, m.y));
}

#[test]
fn unmounted_markers_do_not_disturb_playback() {
    let mut a = animator();
    let g = MeasuredGeometry {
        markers: vec![None; 7],
        lane_offset: Vec2::new(0.0, 66.0),
    };
    a.dispatch(Command::ViewportEnter);
    let f = a.tick(5.0, &g);
    assert_eq!(f.current_step, 1);
    assert!(f.cards.iter().all(|c| c.anchor.is_none()));
    // Cards without an anchor are skipped; travelers and the indicator still emit.
    assert_eq!(f.commands().len(), 3);
}

#[test]
fn commands_draw_cards_under_markers() {
    let mut a = animator();
    a.dispatch(Command::ViewportEnter);
    let f = a.tick(1.3, &geom());
    let cmds = f.commands();
    assert_eq!(cmds.len(), f.cards.len() + 3);
    assert!(matches!(cmds[0], RenderCommand::Card { .. }));
    match cmds.last().unwrap() {
        RenderCommand::Dot { radius, .. } => assert!(*radius > 7.0),
        other => panic!("expected indicator dot, got {other:?}"),
    }
}

#[test]
fn indicator_holds_its_last_drawn_position_when_markers_unmount() {
    let mut a = animator();
    let mounted = geom();
    let mut g = MeasuredGeometry {
        markers: (0..7).map(|i| mounted.marker(i)).collect(),
        lane_offset: Vec2::new(0.0, 66.0),
    };
    a.dispatch(Command::JumpTo(2));
    let before = a.tick(0.0, &g).indicator.position;
    let m = mounted.marker(2).unwrap();
    assert!(close(before.x, m.x) && close(before.y, m.y));

    g.markers[2] = None;
    let held = a.tick(0.0, &g).indicator.position;
    assert!(close(held.x, before.x) && close(held.y, before.y));

    g.markers = vec![None; 7];
    let held = a.tick(0.0, &g).indicator.position;
    assert!(close(held.x, before.x) && close(held.y, before.y));

    // Remounting picks the live marker up again.
    g.markers = (0..7).map(|i| mounted.marker(i)).collect();
    let back = a.tick(0.0, &g).indicator.position;
    assert!(close(back.x, m.x) && close(back.y, m.y));
}

#[test]
fn column_cards_sit_on_either_side_of_the_spine() {
    let mut a = animator();
    let column = ColumnLayout::new(7);
    let spine = column.marker(0).unwrap().x;
    a.dispatch(Command::ViewportEnter);
    let f = a.tick(1.3, &column);
    let mut seen = 0;
    for card in f.cards.iter().filter(|c| c.centre.is_some()) {
        let c = card.centre.unwrap();
        let rect = Rect::from_center_size(c, CARD_SIZE);
        match card.lane {
            Lane::Upper => assert!(rect.x1 < spine, "client card crosses the spine: {rect:?}"),
            Lane::Lower => assert!(rect.x0 > spine, "studio card crosses the spine: {rect:?}"),
        }
        seen += 1;
    }
    assert!(seen > 0);
}
