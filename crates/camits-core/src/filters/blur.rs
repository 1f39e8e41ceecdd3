use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{CamItsError, Result};

/// Normalized `kx x ky` box filter with replicated borders.
///
/// The window for output pixel `i` covers `i - k/2 ..= i - k/2 + k - 1`, so
/// even sizes lean one sample toward the origin. Kernels of size 0 and
/// empty planes are rejected.
pub fn box_blur(data: &Array2<f32>, kx: usize, ky: usize) -> Result<Array2<f32>> {
    if kx == 0 || ky == 0 {
        return Err(CamItsError::InvalidDimensions {
            width: kx,
            height: ky,
        });
    }
    if data.is_empty() {
        let (height, width) = data.dim();
        return Err(CamItsError::InvalidDimensions { width, height });
    }
    let row_pass = blur_lanes(data, kx, Axis(1));
    Ok(blur_lanes(&row_pass, ky, Axis(0)))
}

/// Run a 1D box filter along `axis` of every lane.
fn blur_lanes(data: &Array2<f32>, k: usize, axis: Axis) -> Array2<f32> {
    if k == 1 {
        return data.clone();
    }
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));
    let zip = Zip::from(result.lanes_mut(axis)).and(data.lanes(axis));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(|dst, src| blur_line(src, k, dst));
    } else {
        zip.for_each(|dst, src| blur_line(src, k, dst));
    }
    result
}

fn blur_line(src: ArrayView1<f32>, k: usize, mut dst: ArrayViewMut1<f32>) {
    let n = src.len() as isize;
    let before = (k / 2) as isize;
    let k_len = k as isize;
    let sample = |i: isize| src[i.clamp(0, n - 1) as usize] as f64;

    // Running sum over the window, borders replicated.
    let mut sum: f64 = (0..k_len).map(|j| sample(j - before)).sum();
    for (i, out) in dst.iter_mut().enumerate() {
        *out = (sum / k as f64) as f32;
        let leaving = i as isize - before;
        sum += sample(leaving + k_len) - sample(leaving);
    }
}
