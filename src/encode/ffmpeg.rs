//! MP4 preview output through the system `ffmpeg` binary.

use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::color::Rgba8;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{FlowlineError, FlowlineResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::raster::FrameRGBA;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Color translucent pixels are flattened over.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    /// Options writing to `out_path` over black, overwriting existing files.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::BLACK,
        }
    }
}

/// Streams raw frames into a spawned `ffmpeg` process (h264, yuv420p, no audio).
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    order: FrameOrder,
}

impl FfmpegSink {
    /// Sink that spawns `ffmpeg` on `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            order: FrameOrder::default(),
        }
    }
}

/// Command-line arguments for encoding `cfg`-shaped rawvideo from stdin into `out_path`.
pub fn ffmpeg_args(cfg: &SinkConfig, out_path: &Path, overwrite: bool) -> Vec<String> {
    let mut args: Vec<String> = vec![if overwrite { "-y" } else { "-n" }.into()];
    args.extend(
        [
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .map(String::from),
    );
    args.push(format!("{}x{}", cfg.width, cfg.height));
    // Rational input rate must precede `-i`.
    args.push("-r".into());
    args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den));
    args.extend(
        [
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(String::from),
    );
    args.push(out_path.display().to_string());
    args
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> FlowlineResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(FlowlineError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(FlowlineError::validation(
                "ffmpeg sink width/height must be even for yuv420p output",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(FlowlineError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(FlowlineError::render(
                "ffmpeg is required for MP4 output, but was not found on PATH",
            ));
        }

        let args = ffmpeg_args(&cfg, &self.opts.out_path, self.opts.overwrite);
        tracing::debug!(?args, "spawning ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FlowlineError::render(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| FlowlineError::render("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| FlowlineError::render("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.order.reset();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FlowlineResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| FlowlineError::render("ffmpeg sink not started"))?;
        self.order.accept(idx, &cfg, frame)?;

        flatten_over_background(&mut self.scratch, frame, self.opts.background)?;

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| FlowlineError::render("ffmpeg sink is already finalized"))?;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| FlowlineError::render(format!("failed to write frame to ffmpeg: {e}")))
    }

    fn end(&mut self) -> FlowlineResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| FlowlineError::render("ffmpeg sink not started"))?;
        let status = child
            .wait()
            .map_err(|e| FlowlineError::render(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| FlowlineError::render("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| FlowlineError::render(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            return Err(FlowlineError::render(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        tracing::info!(path = %self.opts.out_path.display(), "wrote mp4");
        Ok(())
    }
}

/// Composite `frame` over an opaque `background` into `dst` as opaque RGBA8.
///
/// Straight-alpha frames are premultiplied on the fly; the background's own alpha is ignored.
pub(crate) fn flatten_over_background(
    dst: &mut [u8],
    frame: &FrameRGBA,
    background: Rgba8,
) -> FlowlineResult<()> {
    if dst.len() != frame.data.len() || !dst.len().is_multiple_of(4) {
        return Err(FlowlineError::validation(
            "flatten expects equal-length rgba8 buffers",
        ));
    }
    let bg = [
        u16::from(background.r),
        u16::from(background.g),
        u16::from(background.b),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(frame.data.chunks_exact(4)) {
        let a = u16::from(s[3]);
        for c in 0..3 {
            let src = if frame.premultiplied {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (src + mul_div255_u16(bg[c], 255 - a)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> FlowlineResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Whether `ffmpeg -version` runs successfully from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
