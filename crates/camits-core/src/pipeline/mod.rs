pub mod config;

use crate::capture::{Capture, CaptureFormat};
use crate::chart::{Chart, LocatedChart, SceneGeometry};
use crate::color::convert_capture_to_rgb_image;
use crate::error::Result;
use crate::frame::Image;
use crate::planes::{convert_capture_to_planes, Planes};
use crate::props::CameraProperties;

use self::config::YuvConversion;

/// The image the chart is searched in: the luma plane of YUV captures, the
/// reconstructed RGB image otherwise.
pub fn scene_from_capture(
    cap: &Capture,
    props: Option<&CameraProperties>,
    yuv: &YuvConversion,
) -> Result<Image> {
    if let CaptureFormat::Yuv420(_) = cap.format {
        if let Planes::Yuv { y, .. } = convert_capture_to_planes(cap, props)? {
            return Ok(Image::from_plane(y));
        }
    }
    convert_capture_to_rgb_image(cap, props, yuv)
}

/// Locate the chart in a capture, deriving the expected chart size from the
/// capture's focal length and the sensor's physical height.
pub fn locate_chart_in_capture(
    cap: &Capture,
    props: &CameraProperties,
    chart: &Chart,
    yuv: &YuvConversion,
) -> Result<LocatedChart> {
    let scene = scene_from_capture(cap, Some(props), yuv)?;
    let geometry = SceneGeometry::from_capture(&cap.metadata, props, scene.height())?;
    tracing::info!(
        focal_length_mm = geometry.focal_length_mm,
        pixel_pitch_um = geometry.pixel_pitch_mm * 1e3,
        template_height = chart.template.height_px(),
        "Locating chart in capture"
    );
    chart.locate(&scene, &geometry)
}
