use serde::{Deserialize, Serialize};

use crate::error::{CamItsError, Result};
use crate::raw::cfa::CfaArrangement;

pub const KEY_WHITE_LEVEL: &str = "android.sensor.info.whiteLevel";
pub const KEY_BLACK_LEVEL_PATTERN: &str = "android.sensor.blackLevelPattern";
pub const KEY_CFA_ARRANGEMENT: &str = "android.sensor.info.colorFilterArrangement";
pub const KEY_PHYSICAL_SIZE: &str = "android.sensor.info.physicalSize";

/// Sensor rectangle; `left`/`top` are inclusive, `right`/`bottom` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl SensorRect {
    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelArraySize {
    pub width: usize,
    pub height: usize,
}

/// Physical sensor dimensions in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width: f32,
    pub height: f32,
}

/// Static per-device properties, supplied once per session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraProperties {
    #[serde(
        rename = "android.sensor.info.whiteLevel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub white_level: Option<u32>,

    #[serde(
        rename = "android.sensor.blackLevelPattern",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub black_level_pattern: Option<[u32; 4]>,

    #[serde(
        rename = "android.sensor.info.colorFilterArrangement",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub color_filter_arrangement: Option<u8>,

    #[serde(
        rename = "android.sensor.info.activeArraySize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub active_array_size: Option<SensorRect>,

    #[serde(
        rename = "android.sensor.info.pixelArraySize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pixel_array_size: Option<PixelArraySize>,

    #[serde(
        rename = "android.sensor.info.physicalSize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub physical_size: Option<PhysicalSize>,
}

impl CameraProperties {
    pub fn white_level(&self) -> Result<f32> {
        self.white_level
            .map(|w| w as f32)
            .ok_or(CamItsError::MissingMetadata(KEY_WHITE_LEVEL))
    }

    /// Black levels in the sensor's physical 2x2 order.
    pub fn black_levels(&self) -> Result<[f32; 4]> {
        self.black_level_pattern
            .map(|b| b.map(|v| v as f32))
            .ok_or(CamItsError::MissingMetadata(KEY_BLACK_LEVEL_PATTERN))
    }

    pub fn cfa_arrangement(&self) -> Result<CfaArrangement> {
        let code = self
            .color_filter_arrangement
            .ok_or(CamItsError::MissingMetadata(KEY_CFA_ARRANGEMENT))?;
        CfaArrangement::from_code(code)
    }

    pub fn physical_size(&self) -> Result<PhysicalSize> {
        self.physical_size
            .ok_or(CamItsError::MissingMetadata(KEY_PHYSICAL_SIZE))
    }

    /// Active-array crop window, when both the pixel array and the active
    /// array are reported. Rejects rectangles that do not fit.
    pub fn active_crop(&self) -> Result<Option<(PixelArraySize, SensorRect)>> {
        let (Some(full), Some(active)) = (self.pixel_array_size, self.active_array_size) else {
            return Ok(None);
        };
        if active.right < active.left || active.bottom < active.top {
            return Err(CamItsError::InvalidActiveArray(format!(
                "inverted rectangle {active:?}"
            )));
        }
        if active.width() > full.width
            || active.height() > full.height
            || active.left > full.width - active.width()
            || active.top > full.height - active.height()
        {
            return Err(CamItsError::InvalidActiveArray(format!(
                "{active:?} exceeds pixel array {}x{}",
                full.width, full.height
            )));
        }
        Ok(Some((full, active)))
    }
}
