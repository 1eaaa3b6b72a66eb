use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    animation::timeline::Timeline,
    config::presets,
    flow::animator::FlowConfig,
    foundation::color::Rgba8,
    foundation::core::{Canvas, Fps},
    foundation::error::{FlowlineError, FlowlineResult},
    layout::network::{NetworkGeometry, NetworkSpec},
    layout::stage::ResponsiveLayout,
    playback::input::KeyChord,
    process::choreography::{self, ChoreoConfig},
    process::model::Process,
};

/// JSON-facing description of everything the binary can simulate and preview.
///
/// Every field is optional in the file; missing scenes fall back to the built-in presets.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Step timeline content.
    pub process: Process,
    /// Flow diagram layout.
    pub team: NetworkSpec,
    /// Step choreography timing.
    pub choreo: ChoreoConfig,
    /// Flow simulation constants.
    pub flow: FlowConfig,
    /// Stage marker placement for wide and narrow viewports.
    pub layout: ResponsiveLayout,
    /// Presentation mode toggle.
    pub chord: KeyChord,
    /// Preview canvas for the step scene.
    pub canvas: Canvas,
    /// Preview frame rate.
    pub fps: Fps,
    /// Preview background.
    pub background: Rgba8,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let process = presets::studio_process();
        let layout = ResponsiveLayout::default().with_stages(process.len());
        Self {
            process,
            team: presets::studio_team(),
            choreo: ChoreoConfig::default(),
            flow: FlowConfig::default(),
            layout,
            chord: KeyChord::default(),
            canvas: Canvas::default(),
            fps: Fps::default(),
            background: Rgba8::rgb(5, 5, 5),
        }
    }
}

impl SceneConfig {
    /// Parse a scene from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> FlowlineResult<Self> {
        let mut cfg: SceneConfig = serde_json::from_reader(r)
            .map_err(|e| FlowlineError::serde(format!("parse scene JSON: {e}")))?;
        cfg.fit_layout();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a scene from a JSON file on disk.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> FlowlineResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FlowlineError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        let cfg = Self::from_reader(BufReader::new(f))?;
        tracing::debug!(
            stages = cfg.process.len(),
            members = cfg.team.members.len(),
            "loaded scene"
        );
        Ok(cfg)
    }

    /// Validate every section.
    pub fn validate(&self) -> FlowlineResult<()> {
        self.process.validate()?;
        self.team.validate()?;
        self.choreo.validate()?;
        self.flow.validate()?;
        self.layout.validate()?;
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        Ok(())
    }

    /// Build the step timeline for the configured process.
    pub fn timeline(&self) -> FlowlineResult<Timeline> {
        choreography::build(&self.process, &self.choreo)
    }

    /// Resolve the flow diagram geometry.
    pub fn network(&self) -> FlowlineResult<NetworkGeometry> {
        NetworkGeometry::from_spec(self.team.clone())
    }

    // Layout stage counts always follow the process; files never need to repeat them.
    fn fit_layout(&mut self) {
        self.layout = self.layout.with_stages(self.process.len());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/scene.rs"]
mod tests;
