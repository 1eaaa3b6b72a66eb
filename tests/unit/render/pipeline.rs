use super::*;
use crate::config::presets::{studio_process, studio_team};
use crate::encode::sink::InMemorySink;
use crate::flow::animator::FlowConfig;
use crate::foundation::core::Point;
use crate::layout::network::NetworkGeometry;
use crate::layout::stage::BranchingLayout;
use crate::playback::input::Command;
use crate::process::choreography::{ChoreoConfig, build};

fn dot(x: f64) -> Vec<RenderCommand> {
    vec![RenderCommand::Dot {
        center: Point::new(x, 8.0),
        radius: 3.0,
        color: Rgba8::WHITE,
        opacity: 1.0,
    }]
}

fn target() -> RenderTarget {
    RenderTarget {
        canvas: Canvas::new(16, 16).unwrap(),
        background: Rgba8::BLACK,
        fps: Fps::new(10, 1).unwrap(),
    }
}

#[test]
fn step_sampling_advances_one_frame_per_sample() {
    let tl = build(&studio_process(), &ChoreoConfig::default()).unwrap();
    let mut a = StepAnimator::new(tl);
    a.dispatch(Command::ViewportEnter);
    let frames = simulate_steps(&mut a, &BranchingLayout::new(7), Fps::new(10, 1).unwrap(), 11);
    assert_eq!(frames.len(), 11);
    assert_eq!(frames[0].time, 0.0);
    assert!((frames[10].time - 1.0).abs() < 1e-9);
    assert!(frames.windows(2).all(|w| w[1].time > w[0].time));
}

#[test]
fn flow_sampling_substeps_long_frames() {
    let geometry = NetworkGeometry::from_spec(studio_team()).unwrap();
    let mut a = FlowAnimator::new(geometry, FlowConfig::default()).unwrap();
    let frames = simulate_flow(&mut a, Fps::new(10, 1).unwrap(), 3);
    assert_eq!(frames.len(), 3);
    assert!((frames[2].elapsed - 0.2).abs() < 1e-9);
    assert!((a.trunk()[0].dist - 30.0).abs() < 1e-9);
}

#[test]
fn settling_flow_matches_the_last_sampled_frame() {
    let fps = Fps::new(10, 1).unwrap();
    let geometry = NetworkGeometry::from_spec(studio_team()).unwrap();
    let mut sampled = FlowAnimator::new(geometry.clone(), FlowConfig::default()).unwrap();
    let mut settled = FlowAnimator::new(geometry, FlowConfig::default()).unwrap();

    let frames = simulate_flow(&mut sampled, fps, 25);
    let last = settle_flow(&mut settled, fps, 25);
    assert_eq!(frames.last(), Some(&last));
    assert!((last.elapsed - 2.4).abs() < 1e-9);
    assert_eq!(settle_flow(&mut settled, fps, 1), settled.frame());
}

#[test]
fn frames_arrive_in_order_and_repeats_are_elided() {
    let scenes = vec![dot(4.0), dot(4.0), dot(12.0), dot(12.0), dot(12.0)];
    let mut sink = InMemorySink::new();
    let threading = RenderThreading {
        chunk_size: 2,
        ..RenderThreading::default()
    };
    let stats = render_frames(
        &scenes,
        target(),
        &SvgRasterizer::without_fonts(),
        &mut sink,
        &threading,
    )
    .unwrap();

    assert_eq!(stats.frames_total, 5);
    assert_eq!(stats.frames_rendered, 2);
    assert_eq!(stats.frames_elided, 3);
    assert!(sink.is_finished());
    let frames = sink.frames();
    let idx: Vec<u64> = frames.iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3, 4]);
    assert_eq!(frames[0].1.pixel(4, 8), Some([255, 255, 255, 255]));
    assert_eq!(frames[2].1.pixel(4, 8), Some([0, 0, 0, 255]));
    assert_eq!(frames[4].1, frames[2].1);
}

#[test]
fn sequential_and_parallel_renders_match() {
    let scenes: Vec<_> = (0..6).map(|i| dot(2.0 + 2.0 * i as f64)).collect();
    let raster = SvgRasterizer::without_fonts();

    let mut seq = InMemorySink::new();
    let seq_stats = render_frames(
        &scenes,
        target(),
        &raster,
        &mut seq,
        &RenderThreading {
            parallel: false,
            static_frame_elision: false,
            ..RenderThreading::default()
        },
    )
    .unwrap();
    let mut par = InMemorySink::new();
    render_frames(
        &scenes,
        target(),
        &raster,
        &mut par,
        &RenderThreading {
            threads: Some(2),
            chunk_size: 4,
            ..RenderThreading::default()
        },
    )
    .unwrap();

    assert_eq!(seq_stats.frames_rendered, 6);
    assert_eq!(seq.frames(), par.frames());
}

#[test]
fn rejects_empty_input_and_zero_threads() {
    let raster = SvgRasterizer::without_fonts();
    let mut sink = InMemorySink::new();
    assert!(render_frames(&[], target(), &raster, &mut sink, &RenderThreading::default()).is_err());

    let bad = RenderThreading {
        threads: Some(0),
        ..RenderThreading::default()
    };
    assert!(render_frames(&[dot(1.0)], target(), &raster, &mut sink, &bad).is_err());
}
