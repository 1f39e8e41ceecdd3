use crate::capture::CaptureMetadata;
use crate::error::{CamItsError, Result};
use crate::props::CameraProperties;

/// Optics needed to predict the chart's size on the sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneGeometry {
    pub focal_length_mm: f64,
    /// Height of one pixel of the analysed image, in mm.
    pub pixel_pitch_mm: f64,
}

impl SceneGeometry {
    pub fn new(focal_length_mm: f64, pixel_pitch_mm: f64) -> Result<Self> {
        for (name, v) in [("focal length", focal_length_mm), ("pixel pitch", pixel_pitch_mm)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(CamItsError::InvalidMetadata(format!(
                    "{name} must be positive, got {v}"
                )));
            }
        }
        Ok(Self {
            focal_length_mm,
            pixel_pitch_mm,
        })
    }

    /// Geometry of a scene of `scene_rows` rows: the pitch spreads the
    /// sensor's physical height evenly over those rows.
    pub fn from_capture(
        metadata: &CaptureMetadata,
        props: &CameraProperties,
        scene_rows: usize,
    ) -> Result<Self> {
        let focal = metadata.focal_length_mm()? as f64;
        let physical = props.physical_size()?;
        Self::new(focal, physical.height as f64 / scene_rows as f64)
    }

    /// Expected chart height in pixels.
    pub fn chart_height_px(&self, chart_height_cm: f64, chart_distance_cm: f64) -> f64 {
        chart_height_cm * self.focal_length_mm / (chart_distance_cm * self.pixel_pitch_mm)
    }
}

/// Ratio of template height to expected chart height in the scene.
///
/// Scaling the scene by this factor makes the chart the size of the
/// template; the locator sweeps around it.
pub fn chart_scale_factor(
    template_height_px: usize,
    chart_height_cm: f64,
    focal_length_mm: f64,
    chart_distance_cm: f64,
    pixel_pitch_mm: f64,
) -> f64 {
    let chart_pixel_h = chart_height_cm * focal_length_mm / (chart_distance_cm * pixel_pitch_mm);
    template_height_px as f64 / chart_pixel_h
}
