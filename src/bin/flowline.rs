use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use flowline::{
    Canvas, Command as PlaybackCommand, FfmpegSink, FfmpegSinkOpts, FlowAnimator, Fps,
    FrameSink, PngSequenceSink, RenderCommand, RenderTarget, RenderThreading, SceneConfig,
    StageGeometry, StepAnimator, SvgRasterizer, render_frames, settle_flow, simulate_flow,
    simulate_steps, to_svg,
};

#[derive(Parser, Debug)]
#[command(name = "flowline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the step offsets of the configured process.
    Offsets(OffsetsArgs),
    /// Write a single preview frame as SVG or PNG.
    Frame(FrameArgs),
    /// Write a preview as a PNG sequence or an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Scene {
    /// Step timeline.
    Steps,
    /// Team flow diagram.
    Team,
}

#[derive(Parser, Debug)]
struct OffsetsArgs {
    /// Scene JSON; defaults to the built-in studio presets.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Scene to draw.
    #[arg(long, value_enum, default_value_t = Scene::Steps)]
    scene: Scene,

    /// Simulated time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output path; the extension selects SVG or PNG.
    #[arg(long)]
    out: PathBuf,

    /// Viewport width used to pick the step layout.
    #[arg(long)]
    width: Option<u32>,

    /// Scene JSON; defaults to the built-in studio presets.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene to draw.
    #[arg(long, value_enum, default_value_t = Scene::Steps)]
    scene: Scene,

    /// Length of the preview in seconds.
    #[arg(long)]
    seconds: f64,

    /// Frame rate; defaults to the scene's.
    #[arg(long)]
    fps: Option<u32>,

    /// Output directory for PNG frames, or a `.mp4` path.
    #[arg(long)]
    out: PathBuf,

    /// Viewport width used to pick the step layout.
    #[arg(long)]
    width: Option<u32>,

    /// Scene JSON; defaults to the built-in studio presets.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per rasterization chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Rasterize on the calling thread only.
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Offsets(args) => cmd_offsets(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(p) => SceneConfig::from_path(p)
            .with_context(|| format!("load scene config '{}'", p.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn cmd_offsets(args: OffsetsArgs) -> anyhow::Result<()> {
    let cfg = load_scene(args.config.as_deref())?;
    let tl = cfg.timeline()?;
    for (i, (offset, label)) in tl
        .step_offsets()
        .iter()
        .zip(cfg.process.labels())
        .enumerate()
    {
        println!("{i}\t{offset:.3}\t{label}");
    }
    println!("duration\t{:.3}", tl.duration());
    println!("cycle\t{:.3}", tl.cycle());
    Ok(())
}

/// Rendered frames plus the surface they were laid out for.
struct Preview {
    scenes: Vec<Vec<RenderCommand>>,
    canvas: Canvas,
}

fn simulate(
    cfg: &SceneConfig,
    scene: Scene,
    width: Option<u32>,
    fps: Fps,
    frames: u64,
) -> anyhow::Result<Preview> {
    match scene {
        Scene::Steps => {
            let width = width.unwrap_or(cfg.canvas.width);
            let geometry = cfg.layout.for_width(f64::from(width));
            let canvas = step_canvas(cfg.canvas, width, geometry);
            let mut animator = StepAnimator::new(cfg.timeline()?).with_chord(cfg.chord);
            animator.dispatch(PlaybackCommand::ViewportEnter);
            let scenes = simulate_steps(&mut animator, geometry, fps, frames)
                .iter()
                .map(|f| f.commands())
                .collect();
            Ok(Preview { scenes, canvas })
        }
        Scene::Team => {
            let geometry = cfg.network()?;
            let size = geometry.size();
            let canvas = Canvas::new(even(size.width.ceil()), even(size.height.ceil()))?;
            let mut animator = FlowAnimator::new(geometry, cfg.flow)?;
            let scenes = simulate_flow(&mut animator, fps, frames)
                .iter()
                .map(|f| f.commands(animator.geometry()))
                .collect();
            Ok(Preview { scenes, canvas })
        }
    }
}

/// The single frame at `time` seconds. Steps are evaluated directly; flow is simulated on the
/// scene's clock but only the final frame is lowered.
fn still(
    cfg: &SceneConfig,
    scene: Scene,
    width: Option<u32>,
    time: f64,
) -> anyhow::Result<(Vec<RenderCommand>, Canvas)> {
    match scene {
        Scene::Steps => {
            let width = width.unwrap_or(cfg.canvas.width);
            let geometry = cfg.layout.for_width(f64::from(width));
            let canvas = step_canvas(cfg.canvas, width, geometry);
            let mut animator = StepAnimator::new(cfg.timeline()?).with_chord(cfg.chord);
            animator.dispatch(PlaybackCommand::ViewportEnter);
            Ok((animator.tick(time, geometry).commands(), canvas))
        }
        Scene::Team => {
            let geometry = cfg.network()?;
            let size = geometry.size();
            let canvas = Canvas::new(even(size.width.ceil()), even(size.height.ceil()))?;
            let mut animator = FlowAnimator::new(geometry, cfg.flow)?;
            let frames = cfg.fps.secs_to_frames_floor(time) + 1;
            let last = settle_flow(&mut animator, cfg.fps, frames);
            Ok((last.commands(animator.geometry()), canvas))
        }
    }
}

// Tall enough for every marker of a narrow layout, at the requested width.
fn step_canvas(base: Canvas, width: u32, geometry: &dyn StageGeometry) -> Canvas {
    let bottom = (0..geometry.stage_count())
        .filter_map(|i| geometry.marker(i))
        .map(|p| p.y + 120.0)
        .fold(f64::from(base.height), f64::max);
    Canvas {
        width: even(f64::from(width)),
        height: even(bottom.ceil()),
    }
}

fn even(v: f64) -> u32 {
    let v = v.max(2.0) as u32;
    v + v % 2
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_scene(args.config.as_deref())?;
    anyhow::ensure!(
        args.time.is_finite() && args.time >= 0.0,
        "--time must be a non-negative number of seconds"
    );
    let (commands, canvas) = still(&cfg, args.scene, args.width, args.time)?;
    let svg = to_svg(&commands, canvas, cfg.background);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    match extension(&args.out).as_deref() {
        Some("svg") => std::fs::write(&args.out, svg)
            .with_context(|| format!("write svg '{}'", args.out.display()))?,
        Some("png") => {
            let frame = SvgRasterizer::new().rasterize(&svg)?;
            flowline::encode::png::write_png(&args.out, &frame)?;
        }
        _ => anyhow::bail!("--out must end in .svg or .png"),
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_scene(args.config.as_deref())?;
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds > 0.0,
        "--seconds must be positive"
    );
    let fps = match args.fps {
        Some(n) => Fps::new(n, 1)?,
        None => cfg.fps,
    };
    let frames = fps.secs_to_frames_floor(args.seconds).max(1);
    let preview = simulate(&cfg, args.scene, args.width, fps, frames)?;

    let mut sink: Box<dyn FrameSink> = if extension(&args.out).as_deref() == Some("mp4") {
        Box::new(FfmpegSink::new(FfmpegSinkOpts {
            background: cfg.background,
            ..FfmpegSinkOpts::new(&args.out)
        }))
    } else {
        Box::new(PngSequenceSink::new(&args.out))
    };

    let threading = RenderThreading {
        parallel: !args.sequential,
        chunk_size: args.chunk_size,
        threads: args.threads,
        ..RenderThreading::default()
    };
    let target = RenderTarget {
        canvas: preview.canvas,
        background: cfg.background,
        fps,
    };
    let stats = render_frames(
        &preview.scenes,
        target,
        &SvgRasterizer::new(),
        sink.as_mut(),
        &threading,
    )?;

    eprintln!(
        "wrote {} ({} frames, {} rasterized)",
        args.out.display(),
        stats.frames_total,
        stats.frames_rendered
    );
    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
