//! Fixed-clock sampling of the animators and batch rasterization of the sampled frames.
//!
//! Simulation stays single-threaded and deterministic. Only the conversion of already-lowered
//! frames into pixels fans out across a `rayon` pool, chunk by chunk, and frames reach the sink
//! in index order.

use rayon::prelude::*;

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    flow::animator::{FlowAnimator, FlowFrame},
    foundation::color::Rgba8,
    foundation::core::{Canvas, Fps, FrameIndex},
    foundation::error::{FlowlineError, FlowlineResult},
    layout::stage::StageGeometry,
    playback::animator::{StepAnimator, StepFrame},
    render::command::RenderCommand,
    render::raster::{FrameRGBA, SvgRasterizer},
    render::svg::to_svg,
};

/// Sample `frames` step frames one frame duration apart, starting at the current playhead.
pub fn simulate_steps(
    animator: &mut StepAnimator,
    geometry: &dyn StageGeometry,
    fps: Fps,
    frames: u64,
) -> Vec<StepFrame> {
    let dt = fps.frame_duration_secs();
    let mut out = Vec::with_capacity(frames.min(4096) as usize);
    for i in 0..frames {
        out.push(if i == 0 {
            animator.frame(geometry)
        } else {
            animator.tick(dt, geometry)
        });
    }
    out
}

/// Sample `frames` flow frames one frame duration apart.
///
/// Frame durations longer than the animator's `max_dt` are split into equal substeps so that no
/// simulated time is lost to clamping.
pub fn simulate_flow(animator: &mut FlowAnimator, fps: Fps, frames: u64) -> Vec<FlowFrame> {
    let (substeps, sub_dt) = flow_substeps(animator, fps);
    let mut out = Vec::with_capacity(frames.min(4096) as usize);
    for i in 0..frames {
        out.push(if i == 0 {
            animator.frame()
        } else {
            step_flow(animator, substeps, sub_dt)
        });
    }
    out
}

/// Advance the flow simulation exactly as [`simulate_flow`] would and return only frame
/// `frames - 1`.
pub fn settle_flow(animator: &mut FlowAnimator, fps: Fps, frames: u64) -> FlowFrame {
    let (substeps, sub_dt) = flow_substeps(animator, fps);
    let mut last = animator.frame();
    for _ in 1..frames {
        last = step_flow(animator, substeps, sub_dt);
    }
    last
}

fn flow_substeps(animator: &FlowAnimator, fps: Fps) -> (u32, f64) {
    let dt = fps.frame_duration_secs();
    let substeps = (dt / animator.config().max_dt).ceil().max(1.0) as u32;
    (substeps, dt / f64::from(substeps))
}

fn step_flow(animator: &mut FlowAnimator, substeps: u32, sub_dt: f64) -> FlowFrame {
    for _ in 1..substeps {
        animator.tick(sub_dt);
    }
    animator.tick(sub_dt)
}

#[derive(Clone, Debug)]
/// Threading and chunking controls for [`render_frames`].
pub struct RenderThreading {
    /// Rasterize chunks on a `rayon` pool when `true`.
    pub parallel: bool,
    /// Frames per scheduled chunk.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Reuse the previous raster when a frame lowers to the same document.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 64,
            threads: None,
            static_frame_elision: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Counters reported by [`render_frames`].
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames that went through the rasterizer.
    pub frames_rendered: u64,
    /// Frames reused from the previous raster.
    pub frames_elided: u64,
}

/// Output surface shared by every frame of a render.
#[derive(Clone, Copy, Debug)]
pub struct RenderTarget {
    /// Frame size.
    pub canvas: Canvas,
    /// Solid fill behind every frame.
    pub background: Rgba8,
    /// Rate recorded in the sink configuration.
    pub fps: Fps,
}

/// Rasterize each scene and push the frames, in order, to `sink`.
#[tracing::instrument(skip_all, fields(frames = scenes.len(), parallel = threading.parallel))]
pub fn render_frames(
    scenes: &[Vec<RenderCommand>],
    target: RenderTarget,
    rasterizer: &SvgRasterizer,
    sink: &mut dyn FrameSink,
    threading: &RenderThreading,
) -> FlowlineResult<RenderStats> {
    if scenes.is_empty() {
        return Err(FlowlineError::validation("render needs at least one frame"));
    }
    target.canvas.validate()?;

    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let chunk_size = threading.chunk_size.max(1);

    sink.begin(SinkConfig {
        width: target.canvas.width,
        height: target.canvas.height,
        fps: target.fps,
    })?;

    let mut stats = RenderStats::default();
    let mut previous: Option<(String, FrameRGBA)> = None;
    for (chunk_idx, chunk) in scenes.chunks(chunk_size).enumerate() {
        let docs: Vec<String> = chunk
            .iter()
            .map(|cmds| to_svg(cmds, target.canvas, target.background))
            .collect();

        // Index into `docs` of the raster each frame shows.
        let mut source = Vec::with_capacity(docs.len());
        let mut unique = Vec::<usize>::new();
        for (i, doc) in docs.iter().enumerate() {
            let repeat_of = if !threading.static_frame_elision {
                None
            } else if i > 0 && docs[i - 1] == *doc {
                Some(source[i - 1])
            } else if i == 0 && previous.as_ref().is_some_and(|(d, _)| d == doc) {
                Some(usize::MAX)
            } else {
                None
            };
            match repeat_of {
                Some(src) => source.push(src),
                None => {
                    source.push(i);
                    unique.push(i);
                }
            }
        }

        let rasterize = |i: &usize| rasterizer.rasterize(&docs[*i]).map(|f| (*i, f));
        let rendered: Vec<(usize, FrameRGBA)> = match &pool {
            Some(pool) => pool.install(|| {
                unique
                    .par_iter()
                    .map(rasterize)
                    .collect::<FlowlineResult<Vec<_>>>()
            })?,
            None => unique
                .iter()
                .map(rasterize)
                .collect::<FlowlineResult<Vec<_>>>()?,
        };
        stats.frames_rendered += rendered.len() as u64;

        let mut slots: Vec<Option<FrameRGBA>> = vec![None; docs.len()];
        for (i, frame) in rendered {
            slots[i] = Some(frame);
        }

        let base = (chunk_idx * chunk_size) as u64;
        for (i, &src) in source.iter().enumerate() {
            let frame = if src == usize::MAX {
                previous.as_ref().map(|(_, f)| f)
            } else {
                slots[src].as_ref()
            }
            .ok_or_else(|| FlowlineError::render("missing rasterized frame"))?;
            if src != i {
                stats.frames_elided += 1;
            }
            sink.push_frame(FrameIndex(base + i as u64), frame)?;
            stats.frames_total += 1;
        }

        let last = docs.len() - 1;
        let last_frame = match source[last] {
            usize::MAX => previous.take().map(|(_, f)| f),
            src => slots[src].take(),
        };
        previous = last_frame.map(|f| (docs[last].clone(), f));
        tracing::trace!(chunk = chunk_idx, frames = docs.len(), "rendered chunk");
    }

    sink.end()?;
    tracing::debug!(?stats, "render finished");
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> FlowlineResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(FlowlineError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FlowlineError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
