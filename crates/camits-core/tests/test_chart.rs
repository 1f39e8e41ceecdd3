mod common;

use approx::assert_abs_diff_eq;
use camits_core::capture::{Capture, CaptureFormat, CaptureMetadata, YuvLayout};
use camits_core::chart::correlate::{correlation_map, match_template};
use camits_core::chart::locate::scene_to_gray;
use camits_core::chart::sweep::scale_sweep;
use camits_core::chart::{
    chart_scale_factor, find_chart, find_chart_bbox, Chart, LocatedChart, SceneGeometry,
};
use camits_core::error::CamItsError;
use camits_core::frame::Image;
use camits_core::pipeline::config::{ChartConfig, CorrelationMetric, LocatePolicy, YuvConversion};
use camits_core::pipeline::locate_chart_in_capture;
use camits_core::props::{CameraProperties, PhysicalSize};
use common::*;
use ndarray::Array2;

const SCENE_W: usize = 120;
const SCENE_H: usize = 96;

fn template() -> Array2<f32> {
    block_template(16, 2, 7)
}

/// Gray scene with the template drawn at twice its size at (30, 20).
fn chart_scene() -> Array2<f32> {
    embed(&upscale_nearest(&template(), 2), SCENE_H, SCENE_W, 30, 20, 128.0)
}

/// Sweep bounds and geometry chosen so the template-to-scene scale is 0.5:
/// a 32 cm chart at 4 cm, 1 mm focal length and 0.25 mm pixels spans 32 px.
fn chart_config() -> ChartConfig {
    ChartConfig {
        height_cm: 32.0,
        distance_cm: 4.0,
        ..Default::default()
    }
}

fn geometry() -> SceneGeometry {
    SceneGeometry::new(1.0, 0.25).unwrap()
}

fn assert_chart_box(located: &LocatedChart) {
    assert_abs_diff_eq!(located.xnorm, 30.0 / 120.0, epsilon = 1e-9);
    assert_abs_diff_eq!(located.ynorm, 20.0 / 96.0, epsilon = 1e-9);
    assert_abs_diff_eq!(located.wnorm, 32.0 / 120.0, epsilon = 1e-9);
    assert_abs_diff_eq!(located.hnorm, 32.0 / 96.0, epsilon = 1e-9);
    assert_abs_diff_eq!(located.scale, 0.5, epsilon = 1e-12);
}

// ---------------------------------------------------------------------------
// Scale sweep
// ---------------------------------------------------------------------------

#[test]
fn test_scale_sweep_excludes_stop() {
    let scales = scale_sweep(0.5, 1.0, 0.25).unwrap();
    assert_eq!(scales, vec![0.5, 0.75]);
}

#[test]
fn test_scale_sweep_count() {
    let scales = scale_sweep(0.65, 1.35, 0.05).unwrap();
    assert_eq!(scales.len(), 14);
    assert_abs_diff_eq!(scales[13], 1.30, epsilon = 1e-12);

    let halved = scale_sweep(0.325, 0.675, 0.025).unwrap();
    assert_eq!(halved.len(), 14);
    assert_eq!(halved[7], 0.5);
}

#[test]
fn test_scale_sweep_partial_last_step() {
    let scales = scale_sweep(1.0, 2.0, 0.3).unwrap();
    assert_eq!(scales.len(), 4);
    assert_abs_diff_eq!(scales[3], 1.9, epsilon = 1e-12);
}

#[test]
fn test_scale_sweep_invalid() {
    for (start, stop, step) in [
        (0.0, 1.0, 0.1),
        (0.5, 0.5, 0.1),
        (1.0, 0.5, 0.1),
        (0.5, 1.0, 0.0),
        (0.5, 1.0, -0.1),
        (0.5, f64::INFINITY, 0.1),
        (f64::NAN, 1.0, 0.1),
    ] {
        assert!(
            matches!(
                scale_sweep(start, stop, step),
                Err(CamItsError::InvalidScaleRange { .. })
            ),
            "{start} {stop} {step}"
        );
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[test]
fn test_chart_scale_factor() {
    // 16.5 cm at 40 cm, 4.2 mm lens, 1.4 µm pixels → ~1237.5 px tall.
    let factor = chart_scale_factor(1000, 16.5, 4.2, 40.0, 0.0014);
    assert_abs_diff_eq!(factor, 1000.0 / 1237.5, epsilon = 1e-9);

    let closer = chart_scale_factor(1000, 16.5, 4.2, 20.0, 0.0014);
    assert_abs_diff_eq!(closer, factor / 2.0, epsilon = 1e-12);
}

#[test]
fn test_scene_geometry() {
    let g = geometry();
    assert_eq!(g.chart_height_px(32.0, 4.0), 32.0);
    assert!(matches!(
        SceneGeometry::new(0.0, 0.1),
        Err(CamItsError::InvalidMetadata(_))
    ));
    assert!(SceneGeometry::new(1.0, f64::NAN).is_err());
}

#[test]
fn test_scene_geometry_from_capture() {
    let metadata = CaptureMetadata {
        focal_length: Some(4.0),
        ..Default::default()
    };
    let props = CameraProperties {
        physical_size: Some(PhysicalSize {
            width: 6.4,
            height: 4.8,
        }),
        ..Default::default()
    };
    let g = SceneGeometry::from_capture(&metadata, &props, 480).unwrap();
    assert_eq!(g.focal_length_mm, 4.0);
    assert_abs_diff_eq!(g.pixel_pitch_mm, 0.01, epsilon = 1e-8);

    assert!(matches!(
        SceneGeometry::from_capture(&CaptureMetadata::default(), &props, 480),
        Err(CamItsError::MissingMetadata(_))
    ));
}

// ---------------------------------------------------------------------------
// Template matching
// ---------------------------------------------------------------------------

#[test]
fn test_match_template_normalized() {
    let scene = embed(&template(), 48, 64, 20, 11, 128.0);
    let m = match_template(&scene, &template(), CorrelationMetric::CcoeffNormed).unwrap();
    assert_eq!((m.x, m.y), (20, 11));
    assert_abs_diff_eq!(m.score, 1.0, epsilon = 1e-6);
}

#[test]
fn test_match_template_ccoeff() {
    let tpl = template();
    let scene = embed(&tpl, 48, 64, 20, 11, 128.0);
    let m = match_template(&scene, &tpl, CorrelationMetric::Ccoeff).unwrap();
    assert_eq!((m.x, m.y), (20, 11));

    // Raw score at the match is the template's energy about its mean.
    let mean = tpl.mean().unwrap() as f64;
    let energy: f64 = tpl.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
    assert_abs_diff_eq!(m.score / energy, 1.0, epsilon = 1e-6);
}

#[test]
fn test_normalized_score_ignores_contrast() {
    let tpl = template();
    let dim = tpl.mapv(|v| 50.0 + v * 0.1);
    let scene = embed(&dim, 40, 40, 5, 9, 60.0);
    let m = match_template(&scene, &tpl, CorrelationMetric::CcoeffNormed).unwrap();
    assert_eq!((m.x, m.y), (5, 9));
    assert_abs_diff_eq!(m.score, 1.0, epsilon = 1e-6);
}

#[test]
fn test_correlation_map_shape_and_flat_windows() {
    let scene = embed(&template(), 48, 64, 20, 11, 128.0);
    let map = correlation_map(&scene, &template(), CorrelationMetric::CcoeffNormed).unwrap();
    assert_eq!(map.dim(), (33, 49));
    // Windows over the flat background have no variance.
    assert_eq!(map[[0, 0]], 0.0);
    assert!(map.iter().all(|&v| (-1.0..=1.0).contains(&v)));
}

#[test]
fn test_match_template_ties_go_to_first() {
    let scene = Array2::from_elem((10, 10), 5.0f32);
    let tpl = template();
    let small = tpl.slice(ndarray::s![..4, ..4]).to_owned();
    let m = match_template(&scene, &small, CorrelationMetric::CcoeffNormed).unwrap();
    assert_eq!((m.x, m.y, m.score), (0, 0, 0.0));
}

#[test]
fn test_match_template_too_large() {
    let scene = Array2::<f32>::zeros((10, 20));
    assert!(matches!(
        match_template(&scene, &template(), CorrelationMetric::Ccoeff),
        Err(CamItsError::TemplateTooLarge {
            template_width: 16,
            scene_height: 10,
            ..
        })
    ));
    assert!(correlation_map(&scene, &Array2::zeros((0, 3)), CorrelationMetric::Ccoeff).is_err());
}

// ---------------------------------------------------------------------------
// Scene reduction
// ---------------------------------------------------------------------------

#[test]
fn test_scene_to_gray_keeps_large_values() {
    let scene = Image::from_plane(Array2::from_elem((2, 2), 300.0));
    assert!(scene_to_gray(&scene).iter().all(|&v| v == 300.0));
}

#[test]
fn test_scene_to_gray_quantizes_normalized_rgb() {
    let r = Array2::from_elem((1, 1), 1.0f32);
    let g = Array2::from_elem((1, 1), 0.5f32);
    let b = Array2::from_elem((1, 1), 0.0f32);
    let scene = Image::from_rgb_planes(&r, &g, &b).unwrap();
    // 255 * 0.299 + 127 * 0.587 = 150.79 → 151.
    assert_eq!(scene_to_gray(&scene)[[0, 0]], 151.0);

    let mono = Image::from_plane(Array2::from_elem((1, 1), 0.5f32));
    assert_eq!(scene_to_gray(&mono)[[0, 0]], 127.0);
}

// ---------------------------------------------------------------------------
// Multiscale locator
// ---------------------------------------------------------------------------

#[test]
fn test_find_chart_recovers_box() {
    let scene = Image::from_plane(chart_scene());
    let found = find_chart(
        &scene,
        &template(),
        0.325,
        0.675,
        0.025,
        CorrelationMetric::CcoeffNormed,
    )
    .unwrap();
    assert_eq!(found.top_left, (30, 20));
    assert_eq!(found.bottom_right, (62, 52));
    assert_eq!(found.scale, 0.5);
    assert!(found.score > 0.99);
}

#[test]
fn test_find_chart_bbox_normalized() {
    let scene = Image::from_plane(chart_scene());
    let located = find_chart_bbox(&scene, &template(), 0.5, &ChartConfig::default()).unwrap();
    assert_chart_box(&located);
}

#[test]
fn test_find_chart_in_normalized_rgb_scene() {
    let plane = chart_scene().mapv(|v| v / 255.0);
    let scene = Image::from_rgb_planes(&plane, &plane, &plane).unwrap();
    let located = find_chart_bbox(&scene, &template(), 0.5, &ChartConfig::default()).unwrap();
    assert_abs_diff_eq!(located.xnorm, 0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(located.scale, 0.5, epsilon = 1e-12);
}

#[test]
fn test_uniform_scene_has_no_chart() {
    let scene = Image::from_plane(Array2::from_elem((SCENE_H, SCENE_W), 128.0));
    assert!(matches!(
        find_chart_bbox(&scene, &template(), 0.5, &ChartConfig::default()),
        Err(CamItsError::ChartNotFound { .. })
    ));
}

#[test]
fn test_ramp_scene_has_no_chart() {
    // Every window of a linear ramp scores the same at every scale.
    let ramp = Array2::from_shape_fn((SCENE_H, SCENE_W), |(r, c)| (10 + 2 * c + 3 * r) as f32);
    let scene = Image::from_plane(ramp);
    assert!(matches!(
        find_chart_bbox(&scene, &template(), 0.5, &ChartConfig::default()),
        Err(CamItsError::ChartNotFound { .. })
    ));
}

#[test]
fn test_scene_smaller_than_template_at_every_scale() {
    let scene = Image::from_plane(Array2::from_elem((20, 20), 128.0));
    assert!(matches!(
        find_chart_bbox(&scene, &template(), 0.5, &ChartConfig::default()),
        Err(CamItsError::TemplateTooLarge { .. })
    ));
}

#[test]
fn test_find_chart_invalid_scale_factor() {
    let scene = Image::from_plane(chart_scene());
    assert!(matches!(
        find_chart_bbox(&scene, &template(), 0.0, &ChartConfig::default()),
        Err(CamItsError::InvalidScaleRange { .. })
    ));
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

#[test]
fn test_chart_scale_factor_from_geometry() {
    let chart = Chart::new(template(), chart_config()).unwrap();
    assert_eq!(chart.scale_factor(&geometry()), 0.5);
    assert_eq!(chart.sweep_len(0.5).unwrap(), 14);
}

#[test]
fn test_chart_locate_and_extract() {
    let chart = Chart::new(template(), chart_config()).unwrap();
    let scene = Image::from_plane(chart_scene());
    let located = chart.locate(&scene, &geometry()).unwrap();
    assert_chart_box(&located);

    let patch = chart.extract_patch(&scene, &located);
    assert_eq!((patch.width(), patch.height()), (32, 32));
    assert_eq!(patch.channel(0), upscale_nearest(&template(), 2));
}

#[test]
fn test_chart_locate_reports_progress() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let chart = Chart::new(template(), chart_config()).unwrap();
    let scene = Image::from_plane(chart_scene());
    let calls = AtomicUsize::new(0);
    let last = AtomicUsize::new(0);
    chart
        .locate_with_progress(&scene, &geometry(), |done| {
            calls.fetch_add(1, Ordering::Relaxed);
            last.fetch_max(done, Ordering::Relaxed);
        })
        .unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), 14);
    assert_eq!(last.load(Ordering::Relaxed), 14);
}

#[test]
fn test_chart_strict_policy_fails() {
    let chart = Chart::new(template(), chart_config()).unwrap();
    let scene = Image::from_plane(Array2::from_elem((SCENE_H, SCENE_W), 128.0));
    assert!(matches!(
        chart.locate(&scene, &geometry()),
        Err(CamItsError::ChartNotFound { .. })
    ));
}

#[test]
fn test_chart_fallback_policy_uses_full_frame() {
    let config = ChartConfig {
        policy: LocatePolicy::FullFrameFallback,
        ..chart_config()
    };
    let chart = Chart::new(template(), config).unwrap();
    let scene = Image::from_plane(Array2::from_elem((SCENE_H, SCENE_W), 128.0));
    let located = chart.locate(&scene, &geometry()).unwrap();
    assert_eq!(located, LocatedChart::full_frame());
    assert_eq!(chart.extract_patch(&scene, &located), scene);
}

#[test]
fn test_chart_fallback_does_not_hide_other_errors() {
    let config = ChartConfig {
        policy: LocatePolicy::FullFrameFallback,
        ..chart_config()
    };
    let chart = Chart::new(template(), config).unwrap();
    let scene = Image::from_plane(Array2::from_elem((20, 20), 128.0));
    assert!(matches!(
        chart.locate(&scene, &geometry()),
        Err(CamItsError::TemplateTooLarge { .. })
    ));
}

#[test]
fn test_chart_rejects_empty_template() {
    assert!(Chart::new(Array2::zeros((0, 0)), ChartConfig::default()).is_err());
}

#[test]
fn test_locate_chart_in_yuv_capture() {
    let mut data: Vec<u8> = chart_scene().iter().map(|&v| v as u8).collect();
    data.extend(std::iter::repeat(128u8).take(SCENE_W * SCENE_H / 2));
    let metadata = CaptureMetadata {
        focal_length: Some(1.0),
        ..Default::default()
    };
    let cap = Capture::new(
        SCENE_W,
        SCENE_H,
        CaptureFormat::Yuv420(YuvLayout::I420),
        data,
        metadata,
    )
    .unwrap();
    // 24 mm over 96 rows gives 0.25 mm pixels.
    let props = CameraProperties {
        physical_size: Some(PhysicalSize {
            width: 30.0,
            height: 24.0,
        }),
        ..Default::default()
    };
    let chart = Chart::new(template(), chart_config()).unwrap();
    let located = locate_chart_in_capture(&cap, &props, &chart, &YuvConversion::default()).unwrap();
    assert_chart_box(&located);
}
