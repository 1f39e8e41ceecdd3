use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{CamItsError, Result};
use crate::frame::Image;

/// Mean gradient magnitude of an image's luma.
///
/// RGB images are reduced with BT.601 weights; single-channel images are
/// used directly. See [`plane_sharpness`].
pub fn image_sharpness(img: &Image) -> Result<f64> {
    plane_sharpness(&img.luma())
}

/// Mean of `sqrt(gx^2 + gy^2)` over a plane.
///
/// Gradients use central differences inside the plane and one-sided
/// differences on its first and last row and column. Both dimensions must
/// be at least 2.
pub fn plane_sharpness(plane: &Array2<f32>) -> Result<f64> {
    let (h, w) = plane.dim();
    if h < 2 || w < 2 {
        return Err(CamItsError::InvalidDimensions {
            width: w,
            height: h,
        });
    }

    let row_sum = |row: usize| -> f64 {
        let (up, down, span_y) = neighbours(row, h);
        (0..w)
            .map(|col| {
                let (left, right, span_x) = neighbours(col, w);
                let gx = (plane[[row, right]] as f64 - plane[[row, left]] as f64) / span_x;
                let gy = (plane[[down, col]] as f64 - plane[[up, col]] as f64) / span_y;
                (gx * gx + gy * gy).sqrt()
            })
            .sum()
    };

    let total: f64 = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(row_sum).sum()
    } else {
        (0..h).map(row_sum).sum()
    };
    Ok(total / (h * w) as f64)
}

/// Sample positions and spacing of the finite difference at `i`.
#[inline]
fn neighbours(i: usize, len: usize) -> (usize, usize, f64) {
    if i == 0 {
        (0, 1, 1.0)
    } else if i == len - 1 {
        (len - 2, len - 1, 1.0)
    } else {
        (i - 1, i + 1, 2.0)
    }
}
