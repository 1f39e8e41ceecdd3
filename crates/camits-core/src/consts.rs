/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Largest lookup table accepted by `apply_lut` (16-bit → 16-bit).
pub const MAX_LUT_SIZE: usize = 65_536;

/// Default YUV → RGB matrix (BT.601, full range).
pub const DEFAULT_YUV_TO_RGB_CCM: [[f32; 3]; 3] = [
    [1.000, 0.000, 1.402],
    [1.000, -0.344, -0.714],
    [1.000, 1.772, 0.000],
];

/// Offsets subtracted from Y, U, V before applying the conversion matrix.
pub const DEFAULT_YUV_OFFSETS: [f32; 3] = [0.0, 128.0, 128.0];

/// Default display gamma used for diagnostic image writes.
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Physical height of the ISO 12233 chart in the test rig (cm).
pub const CHART_HEIGHT_CM: f64 = 16.5;

/// Assumed chart-to-sensor distance (cm).
pub const CHART_DISTANCE_CM: f64 = 40.0;

/// Scale sweep bounds, as multiples of the geometric scale factor.
pub const CHART_SCALE_START: f64 = 0.65;
pub const CHART_SCALE_STOP: f64 = 1.35;
pub const CHART_SCALE_STEP: f64 = 0.05;

/// Working memory per scaled-scene pixel while correlating one scale: two
/// complex f64 FFT buffers, two f64 integral images and the f32 scene.
pub const SWEEP_BYTES_PER_PIXEL: usize = 2 * 16 + 2 * 8 + 4;

/// Upper bound on correlation working memory across concurrently swept scales.
pub const SWEEP_MEMORY_BUDGET_BYTES: usize = 1 << 30;

/// Window variance below which a normalized correlation score is forced to 0.
pub const CORRELATION_VARIANCE_EPSILON: f64 = 1e-9;

/// Bytes per packing group and pixels per group for RAW10 / RAW12.
pub const RAW10_GROUP_BYTES: usize = 5;
pub const RAW10_GROUP_PIXELS: usize = 4;
pub const RAW12_GROUP_BYTES: usize = 3;
pub const RAW12_GROUP_PIXELS: usize = 2;

/// Number of channels in an RGB image.
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Number of Bayer quadrants / rawStats channels.
pub const BAYER_CHANNEL_COUNT: usize = 4;
