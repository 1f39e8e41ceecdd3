use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use camits_core::chart::{Chart, LocatedChart, SceneGeometry};
use camits_core::frame::Image;
use camits_core::io::capture_file::{load_camera_properties, load_capture};
use camits_core::io::image_io::{load_rgb_image, write_image};
use camits_core::pipeline::config::{ChartConfig, CorrelationMetric, LocatePolicy, ProcessingConfig};
use camits_core::pipeline::scene_from_capture;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary::print_located_chart;

#[derive(Clone, ValueEnum)]
pub enum MetricArg {
    /// Normalized correlation coefficient
    Normed,
    /// Raw zero-mean correlation
    Ccoeff,
}

#[derive(Args)]
pub struct LocateArgs {
    /// Scene: an image file, or a capture sidecar (JSON) when --data is given
    pub scene: PathBuf,

    /// Chart template image
    #[arg(short, long)]
    pub template: PathBuf,

    /// Binary pixel buffer; treats SCENE as a capture sidecar
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Camera properties (JSON); with --data, supplies the pixel pitch
    #[arg(long)]
    pub props: Option<PathBuf>,

    /// Template-to-scene scale factor; overrides the capture geometry
    #[arg(long)]
    pub scale_factor: Option<f64>,

    /// Lens focal length in mm (image scenes)
    #[arg(long)]
    pub focal_length: Option<f64>,

    /// Pixel pitch in micrometres (image scenes)
    #[arg(long)]
    pub pixel_pitch: Option<f64>,

    /// Correlation metric
    #[arg(long, value_enum)]
    pub metric: Option<MetricArg>,

    /// Use the full frame when the chart cannot be found
    #[arg(long)]
    pub fallback: bool,

    /// Write the located chart region to this image file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &LocateArgs, config: &ProcessingConfig) -> Result<()> {
    let chart_config = ChartConfig {
        metric: match args.metric {
            Some(MetricArg::Normed) => CorrelationMetric::CcoeffNormed,
            Some(MetricArg::Ccoeff) => CorrelationMetric::Ccoeff,
            None => config.chart.metric,
        },
        policy: if args.fallback {
            LocatePolicy::FullFrameFallback
        } else {
            config.chart.policy
        },
        ..config.chart.clone()
    };
    let chart = Chart::from_file(&args.template, chart_config)
        .with_context(|| format!("Failed to load template {}", args.template.display()))?;

    let (scene, geometry) = load_scene(args, config)?;
    let geometry = match (args.scale_factor, geometry) {
        (Some(scale_factor), _) => geometry_for_scale(&chart, scale_factor)?,
        (None, Some(geometry)) => geometry,
        (None, None) => bail!(
            "No chart geometry: pass --scale-factor, --focal-length with --pixel-pitch, \
             or a capture with --data and --props"
        ),
    };
    let scale_factor = chart.scale_factor(&geometry);

    let pb = ProgressBar::new(chart.sweep_len(scale_factor)? as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Scale sweep [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let located = chart.locate_with_progress(&scene, &geometry, |done| {
        pb.set_position(done as u64);
    });
    pb.finish_and_clear();
    let located = located?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&located)?);
    } else {
        print_located_chart(&args.scene, &located, scale_factor, &chart.config);
    }

    if let Some(ref path) = args.output {
        write_patch(&chart, &scene, &located, path)?;
    }
    Ok(())
}

fn load_scene(
    args: &LocateArgs,
    config: &ProcessingConfig,
) -> Result<(Image, Option<SceneGeometry>)> {
    if let Some(ref data) = args.data {
        let cap = load_capture(&args.scene, data)?;
        let props = args
            .props
            .as_deref()
            .map(load_camera_properties)
            .transpose()?;
        let scene = scene_from_capture(&cap, props.as_ref(), &config.yuv)?;
        let geometry = match props {
            Some(ref props) => Some(SceneGeometry::from_capture(
                &cap.metadata,
                props,
                scene.height(),
            )?),
            None => None,
        };
        return Ok((scene, geometry));
    }

    let scene = load_rgb_image(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    let geometry = match (args.focal_length, args.pixel_pitch) {
        (Some(focal), Some(pitch_um)) => Some(SceneGeometry::new(focal, pitch_um * 1e-3)?),
        _ => None,
    };
    Ok((scene, geometry))
}

/// Geometry that reproduces an explicit scale factor.
fn geometry_for_scale(chart: &Chart, scale_factor: f64) -> Result<SceneGeometry> {
    let t = &chart.template;
    // scale = h_t * d * pitch / (H * f); fix f = 1 mm and solve for pitch.
    let pitch = scale_factor * t.height_cm / (t.height_px() as f64 * t.distance_cm);
    Ok(SceneGeometry::new(1.0, pitch)?)
}

fn write_patch(chart: &Chart, scene: &Image, located: &LocatedChart, path: &Path) -> Result<()> {
    let patch = chart.extract_patch(scene, located);
    if patch.width() == 0 || patch.height() == 0 {
        bail!("Located chart region is empty");
    }
    write_image(&patch, path, false)?;
    println!("Chart region saved to {}", path.display());
    Ok(())
}
