pub mod config;
pub mod convert;
pub mod info;
pub mod locate;
pub mod planes;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use camits_core::capture::Capture;
use camits_core::io::capture_file::{load_camera_properties, load_capture};
use camits_core::pipeline::config::ProcessingConfig;
use camits_core::props::CameraProperties;
use clap::Args;

/// Load the processing config, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<ProcessingConfig> {
    let Some(path) = path else {
        return Ok(ProcessingConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).context("Invalid processing config")
}

/// A capture on disk: JSON sidecar, pixel buffer and optional camera
/// properties.
#[derive(Args)]
pub struct CaptureInput {
    /// Capture sidecar (JSON)
    pub capture: PathBuf,

    /// Binary pixel buffer of the capture
    pub data: PathBuf,

    /// Camera properties (JSON); required for Bayer raw captures
    #[arg(long)]
    pub props: Option<PathBuf>,
}

impl CaptureInput {
    pub fn load(&self) -> Result<(Capture, Option<CameraProperties>)> {
        let cap = load_capture(&self.capture, &self.data)
            .with_context(|| format!("Failed to load capture {}", self.capture.display()))?;
        let props = self
            .props
            .as_deref()
            .map(load_camera_properties)
            .transpose()
            .context("Failed to load camera properties")?;
        Ok((cap, props))
    }
}
