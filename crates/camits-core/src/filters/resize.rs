use ndarray::{s, Array2, Array3, Axis, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{CamItsError, Result};
use crate::frame::Image;

/// Shrink an image by an integer factor, averaging each `factor x factor`
/// block per channel. Rows and columns past the last whole block are dropped.
pub fn downscale(img: &Image, factor: usize) -> Result<Image> {
    let (h, w, c) = img.data.dim();
    let (oh, ow) = (h / factor.max(1), w / factor.max(1));
    if factor == 0 || oh == 0 || ow == 0 {
        return Err(CamItsError::InvalidDimensions {
            width: ow,
            height: oh,
        });
    }
    if factor == 1 {
        return Ok(img.clone());
    }

    let area = (factor * factor) as f32;
    let mut data = Array3::<f32>::zeros((oh, ow, c));
    for ((row, col, ch), out) in data.indexed_iter_mut() {
        let block = img.data.slice(s![
            row * factor..(row + 1) * factor,
            col * factor..(col + 1) * factor,
            ch
        ]);
        *out = block.sum() / area;
    }
    Ok(Image { data })
}

/// Source pixels and their coverage for each output pixel along one axis.
fn area_weights(in_len: usize, out_len: usize) -> Vec<Vec<(usize, f64)>> {
    let ratio = in_len as f64 / out_len as f64;
    (0..out_len)
        .map(|o| {
            let start = o as f64 * ratio;
            let end = start + ratio;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(in_len);
            (first..last)
                .filter_map(|i| {
                    let cover = end.min(i as f64 + 1.0) - start.max(i as f64);
                    (cover > 1e-12).then_some((i, cover / ratio))
                })
                .collect()
        })
        .collect()
}

/// Resample a plane by `scale` using pixel-area averaging.
///
/// The output is `(trunc(h * scale), trunc(w * scale))`. Each output pixel
/// is the coverage-weighted mean of the source pixels under its footprint,
/// which preserves a plane's mean and keeps downscaled edges free of
/// aliasing.
pub fn scale_area(plane: &Array2<f32>, scale: f64) -> Result<Array2<f32>> {
    let (h, w) = plane.dim();
    let oh = (h as f64 * scale) as usize;
    let ow = (w as f64 * scale) as usize;
    if !scale.is_finite() || oh == 0 || ow == 0 {
        return Err(CamItsError::InvalidDimensions {
            width: ow,
            height: oh,
        });
    }
    if (oh, ow) == (h, w) {
        return Ok(plane.clone());
    }

    let col_weights = area_weights(w, ow);
    let row_weights = area_weights(h, oh);

    let mut horizontal = Array2::<f32>::zeros((h, ow));
    let zip = Zip::from(horizontal.rows_mut()).and(plane.rows());
    let resample_row = |mut dst: ndarray::ArrayViewMut1<f32>, src: ndarray::ArrayView1<f32>| {
        for (out, taps) in dst.iter_mut().zip(&col_weights) {
            *out = taps.iter().map(|&(i, wt)| src[i] as f64 * wt).sum::<f64>() as f32;
        }
    };
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(resample_row);
    } else {
        zip.for_each(resample_row);
    }

    let mut result = Array2::<f32>::zeros((oh, ow));
    for (mut dst, taps) in result.axis_iter_mut(Axis(0)).zip(&row_weights) {
        for &(i, wt) in taps {
            dst.scaled_add(wt as f32, &horizontal.row(i));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_weights_sum_to_one() {
        for (n, m) in [(10, 3), (7, 7), (3, 10), (96, 31)] {
            for taps in area_weights(n, m) {
                let total: f64 = taps.iter().map(|&(_, w)| w).sum();
                assert!((total - 1.0).abs() < 1e-9, "{n} -> {m}: {total}");
            }
        }
    }

    #[test]
    fn test_area_weights_fractional_overlap() {
        // 3 -> 2: each output covers 1.5 inputs.
        let weights = area_weights(3, 2);
        assert_eq!(weights[0].len(), 2);
        assert_eq!(weights[0][0].0, 0);
        assert!((weights[0][0].1 - 2.0 / 3.0).abs() < 1e-12);
        assert!((weights[0][1].1 - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(weights[1][1].0, 2);
    }
}
