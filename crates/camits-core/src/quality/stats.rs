use crate::error::{CamItsError, Result};
use crate::frame::Image;

fn channel_values(img: &Image, ch: usize) -> impl Iterator<Item = f64> + '_ {
    img.channel(ch).into_iter().map(|&v| v as f64)
}

/// Per-channel mean, accumulated in f64.
pub fn image_means(img: &Image) -> Vec<f64> {
    let n = (img.width() * img.height()) as f64;
    (0..img.channels())
        .map(|ch| channel_values(img, ch).sum::<f64>() / n)
        .collect()
}

/// Per-channel population variance, accumulated in f64.
pub fn image_variances(img: &Image) -> Vec<f64> {
    let n = (img.width() * img.height()) as f64;
    image_means(img)
        .into_iter()
        .enumerate()
        .map(|(ch, mean)| channel_values(img, ch).map(|v| (v - mean).powi(2)).sum::<f64>() / n)
        .collect()
}

/// Per-channel signal-to-noise ratio in dB: `20 * log10(mean / std)`.
///
/// Follows IEEE semantics: a flat channel gives `+inf`, a black flat channel
/// `NaN`. Use [`image_snrs_checked`] to reject those instead.
pub fn image_snrs(img: &Image) -> Vec<f64> {
    image_means(img)
        .into_iter()
        .zip(image_variances(img))
        .map(|(mean, var)| 20.0 * (mean / var.sqrt()).log10())
        .collect()
}

/// [`image_snrs`] that fails on zero variance or any non-finite result.
pub fn image_snrs_checked(img: &Image) -> Result<Vec<f64>> {
    let variances = image_variances(img);
    if let Some(ch) = variances.iter().position(|&v| v == 0.0) {
        return Err(CamItsError::DegenerateStatistics(format!(
            "channel {ch} has zero variance"
        )));
    }
    let snrs = image_snrs(img);
    if let Some(ch) = snrs.iter().position(|v| !v.is_finite()) {
        return Err(CamItsError::DegenerateStatistics(format!(
            "channel {ch} SNR is {}",
            snrs[ch]
        )));
    }
    Ok(snrs)
}
