use std::sync::Arc;

use ndarray::{s, Array2, Axis, Zip};
use num_complex::Complex;
use rustfft::{Fft, FftDirection, FftPlanner};

use crate::consts::CORRELATION_VARIANCE_EPSILON;
use crate::error::{CamItsError, Result};
use crate::pipeline::config::CorrelationMetric;

/// Best placement of a template inside a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemplateMatch {
    pub score: f64,
    /// Top-left corner of the template in scene coordinates.
    pub x: usize,
    pub y: usize,
}

/// Score every placement of `template` fully inside `scene`.
///
/// The result has shape `(H - th + 1, W - tw + 1)`; entry `(y, x)` scores
/// the template with its top-left corner at `(x, y)`. The correlation sum
/// `sum(I * (T - mean(T)))` is computed with FFTs over the scene size;
/// window sums for the normalized metric come from integral images.
pub fn correlation_map(
    scene: &Array2<f32>,
    template: &Array2<f32>,
    metric: CorrelationMetric,
) -> Result<Array2<f64>> {
    let (h, w) = scene.dim();
    let (th, tw) = template.dim();
    if th == 0 || tw == 0 {
        return Err(CamItsError::InvalidDimensions {
            width: tw,
            height: th,
        });
    }
    if th > h || tw > w {
        return Err(CamItsError::TemplateTooLarge {
            template_width: tw,
            template_height: th,
            scene_width: w,
            scene_height: h,
        });
    }

    let n = (th * tw) as f64;
    let t_mean = template.iter().map(|&v| v as f64).sum::<f64>() / n;
    let t_energy: f64 = template.iter().map(|&v| (v as f64 - t_mean).powi(2)).sum();

    let mut planner = FftPlanner::new();
    let mut spectrum = scene.mapv(|v| Complex::new(v as f64, 0.0));
    fft2d(&mut spectrum, &mut planner, FftDirection::Forward);

    let mut kernel = Array2::<Complex<f64>>::zeros((h, w));
    kernel
        .slice_mut(s![..th, ..tw])
        .zip_mut_with(template, |k, &t| *k = Complex::new(t as f64 - t_mean, 0.0));
    fft2d(&mut kernel, &mut planner, FftDirection::Forward);

    // Cross-correlation theorem; placements inside the scene never wrap.
    Zip::from(&mut spectrum)
        .and(&kernel)
        .for_each(|s, k| *s *= k.conj());
    fft2d(&mut spectrum, &mut planner, FftDirection::Inverse);

    let scale = (h * w) as f64;
    let valid = spectrum.slice(s![..=h - th, ..=w - tw]);
    let raw = valid.mapv(|c| c.re / scale);

    Ok(match metric {
        CorrelationMetric::Ccoeff => raw,
        CorrelationMetric::CcoeffNormed => {
            let sums = WindowSums::new(scene);
            let flat_template = t_energy / n < CORRELATION_VARIANCE_EPSILON;
            let mut scores = raw;
            scores.indexed_iter_mut().for_each(|((y, x), v)| {
                let (s1, s2) = sums.window(y, x, th, tw);
                let energy = (s2 - s1 * s1 / n).max(0.0);
                *v = if flat_template || energy / n < CORRELATION_VARIANCE_EPSILON {
                    0.0
                } else {
                    (*v / (energy * t_energy).sqrt()).clamp(-1.0, 1.0)
                };
            });
            scores
        }
    })
}

/// Highest-scoring placement; the first in row-major order wins ties.
pub fn match_template(
    scene: &Array2<f32>,
    template: &Array2<f32>,
    metric: CorrelationMetric,
) -> Result<TemplateMatch> {
    let map = correlation_map(scene, template, metric)?;
    let mut best = TemplateMatch {
        score: f64::NEG_INFINITY,
        x: 0,
        y: 0,
    };
    for ((y, x), &score) in map.indexed_iter() {
        if score > best.score {
            best = TemplateMatch { score, x, y };
        }
    }
    Ok(best)
}

/// Summed-area tables of values and squared values.
struct WindowSums {
    sum: Array2<f64>,
    sum_sq: Array2<f64>,
}

impl WindowSums {
    fn new(data: &Array2<f32>) -> Self {
        let (h, w) = data.dim();
        let mut sum = Array2::<f64>::zeros((h + 1, w + 1));
        let mut sum_sq = Array2::<f64>::zeros((h + 1, w + 1));
        for row in 0..h {
            let (mut acc, mut acc_sq) = (0.0f64, 0.0f64);
            for col in 0..w {
                let v = data[[row, col]] as f64;
                acc += v;
                acc_sq += v * v;
                sum[[row + 1, col + 1]] = sum[[row, col + 1]] + acc;
                sum_sq[[row + 1, col + 1]] = sum_sq[[row, col + 1]] + acc_sq;
            }
        }
        Self { sum, sum_sq }
    }

    /// `(sum, sum of squares)` over the `th x tw` window at `(y, x)`.
    fn window(&self, y: usize, x: usize, th: usize, tw: usize) -> (f64, f64) {
        let area = |t: &Array2<f64>| {
            t[[y + th, x + tw]] - t[[y, x + tw]] - t[[y + th, x]] + t[[y, x]]
        };
        (area(&self.sum), area(&self.sum_sq))
    }
}

/// Unnormalized 2D FFT in place: rows, then columns.
fn fft2d(data: &mut Array2<Complex<f64>>, planner: &mut FftPlanner<f64>, direction: FftDirection) {
    let (h, w) = data.dim();
    let row_fft = planner.plan_fft(w, direction);
    fft_lanes(data, &row_fft, Axis(1));
    let col_fft = planner.plan_fft(h, direction);
    fft_lanes(data, &col_fft, Axis(0));
}

fn fft_lanes(data: &mut Array2<Complex<f64>>, fft: &Arc<dyn Fft<f64>>, axis: Axis) {
    let mut buffer = vec![Complex::new(0.0, 0.0); data.len_of(axis)];
    let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
    for mut lane in data.lanes_mut(axis) {
        buffer
            .iter_mut()
            .zip(lane.iter())
            .for_each(|(b, &v)| *b = v);
        fft.process_with_scratch(&mut buffer, &mut scratch);
        lane.iter_mut().zip(&buffer).for_each(|(v, &b)| *v = b);
    }
}
