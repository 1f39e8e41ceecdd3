use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::consts::{SWEEP_BYTES_PER_PIXEL, SWEEP_MEMORY_BUDGET_BYTES};
use crate::error::{CamItsError, Result};
use crate::filters::resize::scale_area;
use crate::frame::Image;
use crate::pipeline::config::{ChartConfig, CorrelationMetric};

use super::correlate::match_template;
use super::sweep::scale_sweep;
use super::LocatedChart;

/// Winning scale of a sweep and the chart's box in scene pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartMatch {
    /// `(x, y)` of the chart's top-left corner.
    pub top_left: (usize, usize),
    /// `(x, y)` one past the chart's bottom-right corner.
    pub bottom_right: (usize, usize),
    pub scale: f64,
    pub score: f64,
}

#[derive(Clone, Copy, Debug)]
struct SweepScore {
    scale: f64,
    score: f64,
    x: usize,
    y: usize,
}

/// Reduce a scene to a single 0–255 plane.
///
/// Scenes whose maximum is at most 1 are treated as normalized and
/// quantized to 8 bits by truncation; RGB is then reduced with BT.601
/// weights and rounded like an 8-bit conversion. Other scenes keep their
/// values.
pub fn scene_to_gray(scene: &Image) -> Array2<f32> {
    let max = scene.data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max > 1.0 {
        return scene.luma();
    }
    let quantized = Image {
        data: scene.data.mapv(|v| (v * 255.0) as u8 as f32),
    };
    let gray = quantized.luma();
    if scene.channels() == 1 {
        gray
    } else {
        gray.mapv(f32::round)
    }
}

/// Sweep the scene over `scale_sweep(start, stop, step)` and return the
/// box of the best template match.
///
/// The sweep is rejected with `ChartNotFound` when it has no clear winner:
/// the best score is not positive, or twice the worst scale's score exceeds
/// it. Scales that shrink the scene below the template are skipped.
pub fn find_chart(
    scene: &Image,
    template: &Array2<f32>,
    start: f64,
    stop: f64,
    step: f64,
    metric: CorrelationMetric,
) -> Result<ChartMatch> {
    find_chart_with_progress(scene, template, start, stop, step, metric, |_| {})
}

/// [`find_chart`] reporting the number of finished scales after each one.
pub fn find_chart_with_progress(
    scene: &Image,
    template: &Array2<f32>,
    start: f64,
    stop: f64,
    step: f64,
    metric: CorrelationMetric,
    on_progress: impl Fn(usize) + Sync + Send,
) -> Result<ChartMatch> {
    let scales = scale_sweep(start, stop, step)?;
    let gray = scene_to_gray(scene);
    let (h, w) = gray.dim();
    let (th, tw) = template.dim();
    info!(scales = scales.len(), start, stop, step, %metric, "Finding chart in scene");

    let batch = sweep_batch_len(&scales, h, w);
    debug!(batch, "Concurrent scales per batch");
    let done = AtomicUsize::new(0);
    let mut results: Vec<Result<Option<SweepScore>>> = Vec::with_capacity(scales.len());
    for chunk in scales.chunks(batch) {
        results.par_extend(chunk.par_iter().map(|&scale| {
            let outcome = score_scale(&gray, template, scale, metric);
            on_progress(done.fetch_add(1, Ordering::Relaxed) + 1);
            outcome
        }));
    }

    let mut scores = Vec::with_capacity(results.len());
    for result in results {
        if let Some(s) = result? {
            scores.push(s);
        }
    }
    if scores.is_empty() {
        return Err(CamItsError::TemplateTooLarge {
            template_width: tw,
            template_height: th,
            scene_width: w,
            scene_height: h,
        });
    }

    let min_score = scores.iter().map(|s| s.score).fold(f64::INFINITY, f64::min);
    let mut best = scores[0];
    for s in &scores[1..] {
        if s.score > best.score {
            best = *s;
        }
    }
    let max_score = best.score;
    if !(max_score.is_finite() && max_score > 0.0) || 2.0 * min_score > max_score {
        return Err(CamItsError::ChartNotFound {
            min_score,
            max_score,
        });
    }

    let at_edge = [scores[0].scale, scores[scores.len() - 1].scale].contains(&best.scale);
    if at_edge && scores.len() > 1 {
        warn!(scale = best.scale, "Best chart scale is at the edge of the sweep");
    }
    info!(scale = best.scale, score = best.score, "Optimum chart scale");

    let unscale = |v: usize| (v as f64 / best.scale) as usize;
    Ok(ChartMatch {
        top_left: (unscale(best.x), unscale(best.y)),
        bottom_right: (unscale(best.x + tw), unscale(best.y + th)),
        scale: best.scale,
        score: best.score,
    })
}

/// How many scales may be correlated at once without exceeding
/// `SWEEP_MEMORY_BUDGET_BYTES`, sized by the largest scale in the sweep.
fn sweep_batch_len(scales: &[f64], h: usize, w: usize) -> usize {
    let largest = scales.iter().copied().fold(0.0f64, f64::max);
    let pixels = (h as f64 * largest) * (w as f64 * largest);
    let per_scale = (pixels * SWEEP_BYTES_PER_PIXEL as f64).max(1.0);
    let fit = (SWEEP_MEMORY_BUDGET_BYTES as f64 / per_scale) as usize;
    fit.clamp(1, scales.len().max(1))
}

fn score_scale(
    gray: &Array2<f32>,
    template: &Array2<f32>,
    scale: f64,
    metric: CorrelationMetric,
) -> Result<Option<SweepScore>> {
    let (h, w) = gray.dim();
    let (th, tw) = template.dim();
    let (sh, sw) = ((h as f64 * scale) as usize, (w as f64 * scale) as usize);
    if sh < th || sw < tw {
        debug!(scale, scaled = ?(sw, sh), "Scaled scene smaller than template, skipping");
        return Ok(None);
    }
    let scaled = scale_area(gray, scale)?;
    let m = match_template(&scaled, template, metric)?;
    debug!(scale, score = m.score, x = m.x, y = m.y, "Swept scale");
    Ok(Some(SweepScore {
        scale,
        score: m.score,
        x: m.x,
        y: m.y,
    }))
}

/// Locate the chart and express its box as fractions of the scene size.
///
/// The sweep bounds in `config` are multiples of `scale_factor`, the
/// geometric template-to-scene ratio.
pub fn find_chart_bbox(
    scene: &Image,
    template: &Array2<f32>,
    scale_factor: f64,
    config: &ChartConfig,
) -> Result<LocatedChart> {
    find_chart_bbox_with_progress(scene, template, scale_factor, config, |_| {})
}

/// [`find_chart_bbox`] with a per-scale progress callback.
pub fn find_chart_bbox_with_progress(
    scene: &Image,
    template: &Array2<f32>,
    scale_factor: f64,
    config: &ChartConfig,
    on_progress: impl Fn(usize) + Sync + Send,
) -> Result<LocatedChart> {
    let found = find_chart_with_progress(
        scene,
        template,
        config.scale_start * scale_factor,
        config.scale_stop * scale_factor,
        config.scale_step * scale_factor,
        config.metric,
        on_progress,
    )?;
    let (w, h) = (scene.width() as f64, scene.height() as f64);
    let (x0, y0) = found.top_left;
    let (x1, y1) = found.bottom_right;
    Ok(LocatedChart {
        xnorm: x0 as f64 / w,
        ynorm: y0 as f64 / h,
        wnorm: (x1 - x0) as f64 / w,
        hnorm: (y1 - y0) as f64 / h,
        scale: found.scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_scenes_sweep_all_scales_at_once() {
        let scales = scale_sweep(0.65, 1.35, 0.05).unwrap();
        assert_eq!(sweep_batch_len(&scales, 480, 640), scales.len());
    }

    #[test]
    fn test_large_scenes_bound_concurrent_scales() {
        let scales = scale_sweep(0.65, 1.35, 0.05).unwrap();
        // 4000x3000 at the top scale needs about 1.14 GB of correlation buffers.
        assert_eq!(sweep_batch_len(&scales, 3000, 4000), 1);
        // A quarter of that area fits three scales at a time.
        assert_eq!(sweep_batch_len(&scales, 1500, 2000), 3);
        assert_eq!(sweep_batch_len(&[], 10, 10), 1);
    }
}
