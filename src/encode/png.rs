//! Numbered PNG frame output.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{FlowlineError, FlowlineResult};
use crate::render::raster::FrameRGBA;

/// Writes every frame as `frame_NNNNN.png` into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    order: FrameOrder,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing into `dir`, created on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            order: FrameOrder::default(),
            written: 0,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Frames written since the last `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// File path used for frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", idx.0))
    }
}

/// Encode `frame` as a straight-alpha PNG at `path`.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> FlowlineResult<()> {
    image::save_buffer_with_format(
        path,
        &frame.to_straight(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> FlowlineResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.order.reset();
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FlowlineResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| FlowlineError::render("png sink not started"))?;
        self.order.accept(idx, &cfg, frame)?;
        write_png(&self.frame_path(idx), frame)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> FlowlineResult<()> {
        self.cfg = None;
        tracing::info!(dir = %self.dir.display(), frames = self.written, "wrote png sequence");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
