use crate::capture::{Capture, CaptureFormat};
use crate::error::{CamItsError, Result};
use crate::frame::Image;
use crate::io::image_io::decompress_jpeg_to_rgb_image;
use crate::pipeline::config::YuvConversion;
use crate::planes::{bayer_quadrants, split_yuv420};
use crate::props::CameraProperties;
use crate::raw::decode_raw16;

use super::{convert_raw_to_rgb_image, convert_yuv420_planar_to_rgb_image};

/// Convert any supported capture to an RGB image in [0, 1].
///
/// Bayer captures need `props`; rawStats captures are statistics, not
/// images, and are rejected.
pub fn convert_capture_to_rgb_image(
    cap: &Capture,
    props: Option<&CameraProperties>,
    yuv: &YuvConversion,
) -> Result<Image> {
    tracing::debug!(
        format = %cap.format,
        width = cap.width,
        height = cap.height,
        "Converting capture to RGB"
    );
    match cap.format {
        CaptureFormat::Raw | CaptureFormat::Raw10 | CaptureFormat::Raw12 => {
            let props = props.ok_or(CamItsError::MissingMetadata("camera properties"))?;
            let raw = decode_raw16(cap)?;
            let [r, gr, gb, b] = bayer_quadrants(&raw, props)?;
            convert_raw_to_rgb_image(&r, &gr, &gb, &b, props, &cap.metadata)
        }
        CaptureFormat::Yuv420(layout) => {
            let planes = split_yuv420(&cap.data, cap.width, cap.height, layout)?;
            convert_yuv420_planar_to_rgb_image(
                &planes.y,
                &planes.u,
                &planes.v,
                cap.width,
                cap.height,
                yuv,
            )
        }
        CaptureFormat::Jpeg => decompress_jpeg_to_rgb_image(&cap.data),
        CaptureFormat::RawStats => Err(CamItsError::UnsupportedFormat(
            "rawStats captures cannot be converted to RGB".into(),
        )),
    }
}
