//! Locating the reference chart in a scene by multiscale template matching.

pub mod correlate;
pub mod geometry;
pub mod locate;
pub mod sweep;

use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CamItsError, Result};
use crate::frame::Image;
use crate::io::image_io::load_chart_template;
use crate::pipeline::config::{ChartConfig, LocatePolicy};

pub use geometry::{chart_scale_factor, SceneGeometry};
pub use locate::{find_chart, find_chart_bbox, find_chart_with_progress, ChartMatch};

/// Chart position as fractions of the scene size, with the sweep scale it
/// was found at.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocatedChart {
    pub xnorm: f64,
    pub ynorm: f64,
    pub wnorm: f64,
    pub hnorm: f64,
    pub scale: f64,
}

impl LocatedChart {
    /// The whole frame at unit scale.
    pub fn full_frame() -> Self {
        Self {
            xnorm: 0.0,
            ynorm: 0.0,
            wnorm: 1.0,
            hnorm: 1.0,
            scale: 1.0,
        }
    }
}

/// Grayscale chart image and the physical setup it is photographed in.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartTemplate {
    /// Template pixels at their native integer scale.
    pub pixels: Array2<f32>,
    pub height_cm: f64,
    pub distance_cm: f64,
}

impl ChartTemplate {
    pub fn height_px(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn width_px(&self) -> usize {
        self.pixels.ncols()
    }
}

/// A chart template bound to its sweep configuration.
#[derive(Clone, Debug)]
pub struct Chart {
    pub template: ChartTemplate,
    pub config: ChartConfig,
}

impl Chart {
    pub fn new(pixels: Array2<f32>, config: ChartConfig) -> Result<Self> {
        if pixels.is_empty() {
            return Err(CamItsError::InvalidDimensions {
                width: pixels.ncols(),
                height: pixels.nrows(),
            });
        }
        Ok(Self {
            template: ChartTemplate {
                pixels,
                height_cm: config.height_cm,
                distance_cm: config.distance_cm,
            },
            config,
        })
    }

    /// Load the template image from disk.
    pub fn from_file(path: &Path, config: ChartConfig) -> Result<Self> {
        Self::new(load_chart_template(path)?, config)
    }

    /// Template-to-scene scale predicted by the optics.
    pub fn scale_factor(&self, geometry: &SceneGeometry) -> f64 {
        chart_scale_factor(
            self.template.height_px(),
            self.template.height_cm,
            geometry.focal_length_mm,
            self.template.distance_cm,
            geometry.pixel_pitch_mm,
        )
    }

    /// Find the chart in `scene`, applying the configured policy when the
    /// sweep is inconclusive.
    pub fn locate(&self, scene: &Image, geometry: &SceneGeometry) -> Result<LocatedChart> {
        self.locate_with_progress(scene, geometry, |_| {})
    }

    /// [`Chart::locate`] with a per-scale progress callback.
    pub fn locate_with_progress(
        &self,
        scene: &Image,
        geometry: &SceneGeometry,
        on_progress: impl Fn(usize) + Sync + Send,
    ) -> Result<LocatedChart> {
        let scale_factor = self.scale_factor(geometry);
        tracing::info!(scale_factor, "Chart/image scale factor");
        let found = locate::find_chart_bbox_with_progress(
            scene,
            &self.template.pixels,
            scale_factor,
            &self.config,
            on_progress,
        );
        match (found, self.config.policy) {
            (
                Err(CamItsError::ChartNotFound {
                    min_score,
                    max_score,
                }),
                LocatePolicy::FullFrameFallback,
            ) => {
                warn!(min_score, max_score, "Chart not found, using the full frame");
                Ok(LocatedChart::full_frame())
            }
            (result, _) => result,
        }
    }

    /// Crop the located chart out of `scene`.
    pub fn extract_patch(&self, scene: &Image, located: &LocatedChart) -> Image {
        scene.patch(located.xnorm, located.ynorm, located.wnorm, located.hnorm)
    }

    /// Number of scales swept for a given scale factor.
    pub fn sweep_len(&self, scale_factor: f64) -> Result<usize> {
        Ok(sweep::scale_sweep(
            self.config.scale_start * scale_factor,
            self.config.scale_stop * scale_factor,
            self.config.scale_step * scale_factor,
        )?
        .len())
    }
}
