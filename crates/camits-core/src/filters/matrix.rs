use ndarray::{Array3, Axis, Zip};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{CamItsError, Result};
use crate::frame::Image;

/// Multiply every RGB pixel by a 3x3 matrix: `out = M * p`. No clipping.
pub fn apply_matrix(img: &Image, mat: &[[f32; 3]; 3]) -> Result<Image> {
    if img.channels() != COLOR_CHANNEL_COUNT {
        return Err(CamItsError::InvalidChannels {
            expected: "3",
            got: img.channels(),
        });
    }
    let mut data = Array3::<f32>::zeros(img.data.raw_dim());
    Zip::from(data.lanes_mut(Axis(2)))
        .and(img.data.lanes(Axis(2)))
        .for_each(|mut out, px| {
            for (c, dst) in out.iter_mut().enumerate() {
                let row = mat[c];
                *dst = row[0] * px[0] + row[1] * px[1] + row[2] * px[2];
            }
        });
    Ok(Image { data })
}
