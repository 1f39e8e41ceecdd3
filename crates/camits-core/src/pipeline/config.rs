use serde::{Deserialize, Serialize};

use crate::consts::{
    CHART_DISTANCE_CM, CHART_HEIGHT_CM, CHART_SCALE_START, CHART_SCALE_STEP, CHART_SCALE_STOP,
    DEFAULT_GAMMA, DEFAULT_YUV_OFFSETS, DEFAULT_YUV_TO_RGB_CCM, MAX_LUT_SIZE,
};

/// Top-level processing configuration, loadable from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub yuv: YuvConversion,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub gamma: GammaConfig,
}

/// YUV → RGB conversion: `rgb = M · (yuv − offsets)`, 8-bit scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YuvConversion {
    pub matrix: [[f32; 3]; 3],
    pub offsets: [f32; 3],
}

impl Default for YuvConversion {
    fn default() -> Self {
        Self {
            matrix: DEFAULT_YUV_TO_RGB_CCM,
            offsets: DEFAULT_YUV_OFFSETS,
        }
    }
}

/// Gamma curve used to build encode/decode lookup tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GammaConfig {
    pub gamma: f32,
    pub lut_size: usize,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            lut_size: MAX_LUT_SIZE,
        }
    }
}

/// Score used when matching the chart template against a scaled scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationMetric {
    /// Raw correlation with the zero-mean template. Magnitude grows with
    /// scene contrast.
    Ccoeff,
    /// Correlation coefficient in [-1, 1], independent of local contrast.
    #[default]
    CcoeffNormed,
}

impl std::fmt::Display for CorrelationMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ccoeff => write!(f, "CCOEFF"),
            Self::CcoeffNormed => write!(f, "CCOEFF (normalized)"),
        }
    }
}

/// What to do when the scale sweep cannot tell the chart apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocatePolicy {
    /// Fail with `ChartNotFound`.
    #[default]
    Strict,
    /// Log a warning and use the whole frame.
    FullFrameFallback,
}

impl std::fmt::Display for LocatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "Strict"),
            Self::FullFrameFallback => write!(f, "Full-frame fallback"),
        }
    }
}

/// Reference chart geometry and scale sweep parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Physical chart height (cm).
    pub height_cm: f64,
    /// Chart-to-sensor distance assumed at capture time (cm).
    pub distance_cm: f64,
    /// Sweep bounds, as multiples of the geometric scale factor.
    pub scale_start: f64,
    pub scale_stop: f64,
    pub scale_step: f64,
    #[serde(default)]
    pub metric: CorrelationMetric,
    #[serde(default)]
    pub policy: LocatePolicy,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height_cm: CHART_HEIGHT_CM,
            distance_cm: CHART_DISTANCE_CM,
            scale_start: CHART_SCALE_START,
            scale_stop: CHART_SCALE_STOP,
            scale_step: CHART_SCALE_STEP,
            metric: CorrelationMetric::default(),
            policy: LocatePolicy::default(),
        }
    }
}
