//! Captures and camera properties stored on disk: a JSON sidecar with the
//! geometry, format and metadata, plus a binary file holding the pixel
//! buffer.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capture::{Capture, CaptureFormat, CaptureMetadata, YuvLayout};
use crate::error::Result;
use crate::props::CameraProperties;

/// JSON description of a capture buffer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureSidecar {
    pub width: usize,
    pub height: usize,
    /// Format tag: `raw`, `raw10`, `raw12`, `rawStats`, `yuv` or `jpeg`.
    pub format: String,
    /// Chroma layout for `yuv` buffers; defaults to the capture layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default)]
    pub metadata: CaptureMetadata,
}

impl CaptureSidecar {
    pub fn capture_format(&self) -> Result<CaptureFormat> {
        let format: CaptureFormat = self.format.parse()?;
        match (format, &self.layout) {
            (CaptureFormat::Yuv420(_), Some(layout)) => {
                Ok(CaptureFormat::Yuv420(layout.parse::<YuvLayout>()?))
            }
            (format, _) => Ok(format),
        }
    }
}

/// Read a capture sidecar without its pixel data.
pub fn load_capture_sidecar(json_path: &Path) -> Result<CaptureSidecar> {
    Ok(serde_json::from_str(&fs::read_to_string(json_path)?)?)
}

/// Load a capture from its JSON sidecar and binary pixel buffer.
pub fn load_capture(json_path: &Path, data_path: &Path) -> Result<Capture> {
    let sidecar = load_capture_sidecar(json_path)?;
    let format = sidecar.capture_format()?;
    let data = fs::read(data_path)?;
    tracing::debug!(
        %format,
        width = sidecar.width,
        height = sidecar.height,
        bytes = data.len(),
        "Loaded capture"
    );
    Capture::new(sidecar.width, sidecar.height, format, data, sidecar.metadata)
}

/// Load static camera properties from JSON keyed by the vendor schema.
pub fn load_camera_properties(json_path: &Path) -> Result<CameraProperties> {
    Ok(serde_json::from_str(&fs::read_to_string(json_path)?)?)
}
