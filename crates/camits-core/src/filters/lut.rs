use num_traits::ToPrimitive;

use crate::consts::MAX_LUT_SIZE;
use crate::error::{CamItsError, Result};
use crate::frame::Image;
use crate::pipeline::config::GammaConfig;

fn check_lut_size(size: usize) -> Result<()> {
    if !size.is_power_of_two() || size > MAX_LUT_SIZE {
        return Err(CamItsError::InvalidLutSize { size });
    }
    Ok(())
}

/// Map every sample through a 1D lookup table.
///
/// `lut` holds `N` entries on the `[0, N-1]` scale, with `N` a power of two
/// no larger than 65536. A sample `p` selects `lut[trunc(p * (N-1))]` and the
/// entry is scaled back by `1 / (N-1)`. Indices outside the table are
/// clamped to its ends. A single-entry table maps everything to `lut[0]`.
pub fn apply_lut(img: &Image, lut: &[f32]) -> Result<Image> {
    check_lut_size(lut.len())?;
    let last = lut.len() - 1;
    let max = last as f32;
    let denom = max.max(1.0);
    let data = img.data.mapv(|p| {
        let idx = match (p * max).to_usize() {
            Some(i) => i.min(last),
            None if p > 0.0 => last,
            None => 0,
        };
        lut[idx] / denom
    });
    Ok(Image { data })
}

/// Encoding gamma table: `floor((N-1) * (i/(N-1))^(1/gamma) + 0.5)`.
pub fn gamma_lut(config: &GammaConfig) -> Result<Vec<f32>> {
    power_lut(config.lut_size, 1.0 / config.gamma)
}

/// Decoding table, the inverse of [`gamma_lut`]: exponent `gamma`.
pub fn inverse_gamma_lut(config: &GammaConfig) -> Result<Vec<f32>> {
    power_lut(config.lut_size, config.gamma)
}

fn power_lut(size: usize, exponent: f32) -> Result<Vec<f32>> {
    check_lut_size(size)?;
    let max = (size - 1).max(1) as f64;
    let exponent = exponent as f64;
    Ok((0..size)
        .map(|i| (max * (i as f64 / max).powf(exponent) + 0.5).floor() as f32)
        .collect())
}
