use crate::error::{CamItsError, Result};

/// Scales `start, start + step, ...` strictly below `stop`.
///
/// The count is `ceil((stop - start) / step)` and each value is computed as
/// `start + i * step` rather than accumulated, so sweeps do not drift.
pub fn scale_sweep(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    let valid = start.is_finite()
        && stop.is_finite()
        && step.is_finite()
        && start > 0.0
        && step > 0.0
        && stop > start;
    if !valid {
        return Err(CamItsError::InvalidScaleRange { start, stop, step });
    }
    let count = ((stop - start) / step).ceil() as usize;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}
