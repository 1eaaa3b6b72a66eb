//! Flowline is a deterministic choreography engine for two kinds of explanatory motion graphics:
//!
//! - A looping step timeline, where an indicator walks a process stage by stage, each stage's
//!   cards glow, and travelers fly from the cards into the stage marker.
//! - A continuous flow diagram, where markers run down a trunk, split along a spine, and branch
//!   into member cards.
//!
//! Both animators are caller-driven: hosts feed elapsed time and geometry, and read back plain
//! frame snapshots. The [`render`] and [`encode`] modules turn those snapshots into SVG, PNG, or
//! MP4 previews.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Easing curves and the segment timeline.
pub mod animation;
/// Scene configuration and built-in presets.
pub mod config;
/// Preview frame sinks.
pub mod encode;
/// Network flow simulation.
pub mod flow;
/// Shared primitives.
pub mod foundation;
/// Stage layouts and network geometry.
pub mod layout;
/// Step timeline playback.
pub mod playback;
/// Process model and choreography.
pub mod process;
/// Draw commands, rasterization, and the render pipeline.
pub mod render;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{BezPath, Canvas, Fps, FrameIndex, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{FlowlineError, FlowlineResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::timeline::{
    Actor, ActorState, Anchor, Phase, Placement, Props, Timeline, TimelineBuilder,
};
pub use crate::config::scene::SceneConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::flow::animator::{FlowAnimator, FlowConfig, FlowFrame};
pub use crate::flow::markers::{FlowStats, MarkerId, MarkerKind, MarkerSprite};
pub use crate::layout::network::{NetworkGeometry, NetworkSpec, Node, SpineDir};
pub use crate::layout::polyline::Polyline;
pub use crate::layout::stage::{
    BranchingLayout, ColumnLayout, Lane, MeasuredGeometry, ResponsiveLayout, StageGeometry,
};
pub use crate::playback::animator::{
    CardVisual, ControlMode, MarkerVisual, PlaybackState, StepAnimator, StepFrame,
};
pub use crate::playback::input::{Command, KeyChord, KeyPress};
pub use crate::process::choreography::ChoreoConfig;
pub use crate::process::model::{Cue, Process, Role, Stage, Step};
pub use crate::render::command::RenderCommand;
pub use crate::render::pipeline::{
    RenderStats, RenderTarget, RenderThreading, render_frames, settle_flow, simulate_flow,
    simulate_steps,
};
pub use crate::render::raster::{FrameRGBA, SvgRasterizer};
pub use crate::render::svg::to_svg;
