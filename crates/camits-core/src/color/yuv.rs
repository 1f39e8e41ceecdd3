use ndarray::{Array3, Axis};
use rayon::prelude::*;

use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{CamItsError, Result};
use crate::frame::Image;
use crate::pipeline::config::YuvConversion;

/// Convert 8-bit YUV 4:2:0 planes to an RGB image in [0, 1].
///
/// `y` is `width x height`; `u` and `v` are half x half and are upsampled by
/// pixel replication. Offsets are subtracted in 8-bit arithmetic: luma stays
/// unsigned, chroma wraps and is read back as a signed byte, so with the
/// default offsets U and V span [-128, 127]. The conversion matrix is then
/// applied and the result clipped to [0, 255] and truncated to 8 bits
/// before normalization, so outputs are exact multiples of 1/255.
pub fn convert_yuv420_planar_to_rgb_image(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    width: usize,
    height: usize,
    conversion: &YuvConversion,
) -> Result<Image> {
    if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
        return Err(CamItsError::InvalidDimensions { width, height });
    }
    let chroma_width = width / 2;
    let chroma_len = chroma_width * (height / 2);
    if y.len() < width * height {
        return Err(CamItsError::BufferTooSmall {
            needed: width * height,
            got: y.len(),
        });
    }
    for plane in [u, v] {
        if plane.len() < chroma_len {
            return Err(CamItsError::BufferTooSmall {
                needed: chroma_len,
                got: plane.len(),
            });
        }
    }

    let [oy, ou, ov] = conversion.offsets.map(wrap_offset);
    let m = conversion.matrix;
    let convert_row = |row: usize, mut out: ndarray::ArrayViewMut2<f32>| {
        let luma = &y[row * width..(row + 1) * width];
        let chroma_row = (row / 2) * chroma_width;
        for (col, mut px) in out.outer_iter_mut().enumerate() {
            let c = chroma_row + col / 2;
            let yuv = [
                luma[col].wrapping_sub(oy) as f32,
                u[c].wrapping_sub(ou) as i8 as f32,
                v[c].wrapping_sub(ov) as i8 as f32,
            ];
            for (ch, dst) in px.iter_mut().enumerate() {
                let rgb = m[ch][0] * yuv[0] + m[ch][1] * yuv[1] + m[ch][2] * yuv[2];
                *dst = (rgb.clamp(0.0, 255.0) as u8) as f32 / 255.0;
            }
        }
    };

    let mut data = Array3::<f32>::zeros((height, width, COLOR_CHANNEL_COUNT));
    if width * height >= PARALLEL_PIXEL_THRESHOLD {
        data.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, out)| convert_row(row, out));
    } else {
        data.axis_iter_mut(Axis(0))
            .enumerate()
            .for_each(|(row, out)| convert_row(row, out));
    }
    Ok(Image { data })
}

fn wrap_offset(offset: f32) -> u8 {
    (offset.round() as i32).rem_euclid(256) as u8
}
