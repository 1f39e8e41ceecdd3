use ndarray::{Array, Dimension};
use num_traits::Float;

use crate::frame::Image;

/// Stretch values linearly so the minimum maps to 0 and the maximum to 1.
///
/// A constant input has no range; the division then yields NaN everywhere,
/// which callers can detect.
pub fn normalize<T: Float, D: Dimension>(data: &Array<T, D>) -> Array<T, D> {
    let (min, max) = data
        .iter()
        .fold((T::infinity(), T::neg_infinity()), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    data.mapv(|v| (v - min) / range)
}

/// [`normalize`] over all channels of an image at once.
pub fn normalize_image(img: &Image) -> Image {
    Image {
        data: normalize(&img.data),
    }
}
