use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::fetch::ArchiveSource;
use crate::foundation::core::SurfaceSize;
use crate::foundation::error::{SketchError, SketchResult};

/// Runtime configuration, usually read from a JSON file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub width: u32,
    pub height: u32,
    /// Target frame rate of the scheduler in Hz.
    pub frame_rate: f64,
    /// TTF/OTF used by `text` and `textSize`.
    pub font: Option<PathBuf>,
    /// Master volume in `[0, 1]`.
    pub volume: f32,
    /// Directory backing the local archive cache.
    pub cache_dir: Option<PathBuf>,
    /// JSON file persisting script local data.
    pub storage_path: Option<PathBuf>,
    pub archives: Vec<ArchiveSource>,
    pub startup_project: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            frame_rate: 60.0,
            font: None,
            volume: 1.0,
            cache_dir: None,
            storage_path: None,
            archives: Vec::new(),
            startup_project: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> SketchResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| SketchError::serde(format!("invalid session config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a config file. Relative paths inside it are resolved against the
    /// file's directory.
    pub fn from_path(path: &Path) -> SketchResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        if let Some(base) = path.parent() {
            cfg.rebase(base);
        }
        Ok(cfg)
    }

    fn rebase(&mut self, base: &Path) {
        for p in [&mut self.font, &mut self.cache_dir, &mut self.storage_path]
            .into_iter()
            .flatten()
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        for src in &mut self.archives {
            if !src.is_remote() && Path::new(&src.location).is_relative() {
                src.location = base.join(&src.location).to_string_lossy().into_owned();
            }
        }
    }

    pub fn surface_size(&self) -> SketchResult<SurfaceSize> {
        SurfaceSize::new(self.width, self.height)
    }

    pub fn validate(&self) -> SketchResult<()> {
        self.surface_size()?;
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(SketchError::validation(
                "frame_rate must be finite and > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(SketchError::validation("volume must be in [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
