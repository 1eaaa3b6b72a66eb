use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{FlowlineError, FlowlineResult};
use crate::render::raster::FrameRGBA;

/// Stream parameters handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Sampling rate of the simulation.
    pub fps: Fps,
}

/// Consumer of rasterized preview frames.
///
/// `push_frame` is called with strictly increasing indices between one `begin` and one `end`.
pub trait FrameSink: Send {
    /// Called once before any frame.
    fn begin(&mut self, cfg: SinkConfig) -> FlowlineResult<()>;
    /// Consume one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FlowlineResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> FlowlineResult<()>;
}

/// Checks the ordering contract on behalf of a sink.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FrameOrder {
    last: Option<FrameIndex>,
}

impl FrameOrder {
    pub(crate) fn reset(&mut self) {
        self.last = None;
    }

    pub(crate) fn accept(&mut self, idx: FrameIndex, cfg: &SinkConfig, frame: &FrameRGBA) -> FlowlineResult<()> {
        if let Some(last) = self.last
            && idx <= last
        {
            return Err(FlowlineError::render(format!(
                "frame {} pushed after frame {}",
                idx.0, last.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(FlowlineError::render(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last = Some(idx);
        Ok(())
    }
}

/// Keeps every frame in memory; used by tests and tooling.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    order: FrameOrder,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FlowlineResult<()> {
        self.cfg = Some(cfg);
        self.order.reset();
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FlowlineResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| FlowlineError::render("in-memory sink not started"))?;
        self.order.accept(idx, &cfg, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FlowlineResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
