use byteorder::{ByteOrder, LittleEndian};
use ndarray::Array3;

use crate::capture::{Capture, CaptureFormat};
use crate::consts::BAYER_CHANNEL_COUNT;
use crate::error::{CamItsError, Result};

/// Split a rawStats capture into its mean and variance images.
///
/// The buffer holds two stacked little-endian f32 planes of shape
/// `(height, width, 4)`: first the per-cell means, then the variances. Values
/// are in raw sensor units (not normalized).
pub fn unpack_rawstats_capture(cap: &Capture) -> Result<(Array3<f32>, Array3<f32>)> {
    if cap.format != CaptureFormat::RawStats {
        return Err(CamItsError::UnsupportedFormat(format!(
            "expected a rawStats capture, got {}",
            cap.format
        )));
    }
    let (h, w) = (cap.height, cap.width);
    let plane_len = h * w * BAYER_CHANNEL_COUNT;
    let bytes = cap.require_bytes(2 * plane_len * 4)?;

    let mut values = vec![0.0f32; 2 * plane_len];
    LittleEndian::read_f32_into(bytes, &mut values);
    let variance = values.split_off(plane_len);

    let shape = (h, w, BAYER_CHANNEL_COUNT);
    let mean = Array3::from_shape_vec(shape, values)
        .map_err(|_| CamItsError::InvalidDimensions { width: w, height: h })?;
    let variance = Array3::from_shape_vec(shape, variance)
        .map_err(|_| CamItsError::InvalidDimensions { width: w, height: h })?;
    Ok((mean, variance))
}
