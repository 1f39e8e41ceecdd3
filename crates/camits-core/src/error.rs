use thiserror::Error;

#[derive(Error, Debug)]
pub enum CamItsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported capture format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid LUT size: {size} (must be a power of two <= 65536)")]
    InvalidLutSize { size: usize },

    #[error("Invalid raw-{bits} buffer width: {width} is not a multiple of {group}")]
    InvalidPackedWidth { bits: u32, width: usize, group: usize },

    #[error("Buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error(
        "Invalid image size metadata: capture is {width}x{height}, pixel array is \
         {full_width}x{full_height}, active array is {active_width}x{active_height}"
    )]
    CropMismatch {
        width: usize,
        height: usize,
        full_width: usize,
        full_height: usize,
        active_width: usize,
        active_height: usize,
    },

    #[error("Invalid active array: {0}")]
    InvalidActiveArray(String),

    #[error("Missing required metadata key: {0}")]
    MissingMetadata(&'static str),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Unsupported color filter arrangement: {0}")]
    UnsupportedCfa(u8),

    #[error("Invalid channel count: expected {expected}, got {got}")]
    InvalidChannels { expected: &'static str, got: usize },

    #[error("Invalid scale range: start={start}, stop={stop}, step={step}")]
    InvalidScaleRange { start: f64, stop: f64, step: f64 },

    #[error(
        "Unable to find chart in scene (min score {min_score:.4}, max score {max_score:.4}); \
         check camera distance and self-reported pixel pitch, focal length and hyperfocal distance"
    )]
    ChartNotFound { min_score: f64, max_score: f64 },

    #[error(
        "Chart template ({template_width}x{template_height}) does not fit in any scaled scene \
         (scene is {scene_width}x{scene_height})"
    )]
    TemplateTooLarge {
        template_width: usize,
        template_height: usize,
        scene_width: usize,
        scene_height: usize,
    },

    #[error("Degenerate statistics: {0}")]
    DegenerateStatistics(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Metadata parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CamItsError>;
