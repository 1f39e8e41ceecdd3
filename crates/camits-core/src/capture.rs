use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CamItsError, Result};

pub const KEY_COLOR_GAINS: &str = "android.colorCorrection.gains";
pub const KEY_COLOR_TRANSFORM: &str = "android.colorCorrection.transform";
pub const KEY_FOCAL_LENGTH: &str = "android.lens.focalLength";
pub const KEY_LENS_STATE: &str = "android.lens.state";

/// Chroma plane arrangement of a YUV 4:2:0 buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YuvLayout {
    /// Y plane, then U plane, then V plane (device capture layout).
    #[default]
    I420,
    /// Y plane, then V plane, then U plane.
    Yv12,
    /// Y plane, then a half-size plane of interleaved V/U samples.
    Nv21,
}

impl fmt::Display for YuvLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I420 => write!(f, "i420"),
            Self::Yv12 => write!(f, "yv12"),
            Self::Nv21 => write!(f, "nv21"),
        }
    }
}

impl FromStr for YuvLayout {
    type Err = CamItsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "i420" => Ok(Self::I420),
            "yv12" | "planar" => Ok(Self::Yv12),
            "nv21" => Ok(Self::Nv21),
            other => Err(CamItsError::UnsupportedFormat(format!(
                "unknown YUV layout '{other}'"
            ))),
        }
    }
}

/// Pixel format of a capture buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureFormat {
    /// Little-endian 16 bits per pixel Bayer data.
    Raw,
    /// MIPI RAW10: 4 pixels in 5 bytes.
    Raw10,
    /// MIPI RAW12: 2 pixels in 3 bytes.
    Raw12,
    /// On-device mean/variance statistics, two stacked `h x w x 4` f32 planes.
    RawStats,
    /// 8-bit YUV 4:2:0.
    Yuv420(YuvLayout),
    /// Compressed JPEG stream.
    Jpeg,
}

impl CaptureFormat {
    pub fn is_bayer(&self) -> bool {
        matches!(self, Self::Raw | Self::Raw10 | Self::Raw12)
    }
}

impl fmt::Display for CaptureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Raw10 => write!(f, "raw10"),
            Self::Raw12 => write!(f, "raw12"),
            Self::RawStats => write!(f, "rawStats"),
            Self::Yuv420(YuvLayout::I420) => write!(f, "yuv"),
            Self::Yuv420(layout) => write!(f, "yuv ({layout})"),
            Self::Jpeg => write!(f, "jpeg"),
        }
    }
}

impl FromStr for CaptureFormat {
    type Err = CamItsError;

    /// Parse the capture layer's format tag.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raw" => Ok(Self::Raw),
            "raw10" => Ok(Self::Raw10),
            "raw12" => Ok(Self::Raw12),
            "rawStats" => Ok(Self::RawStats),
            "yuv" => Ok(Self::Yuv420(YuvLayout::I420)),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(CamItsError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A rational number as reported in capture results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rational {
    pub numerator: i32,
    pub denominator: i32,
}

impl Rational {
    pub fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn to_f32(self) -> f32 {
        self.numerator as f32 / self.denominator as f32
    }
}

/// Per-capture result metadata, keyed by the capture layer's vocabulary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    #[serde(
        rename = "android.colorCorrection.gains",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub color_gains: Option<[f32; 4]>,

    #[serde(
        rename = "android.colorCorrection.transform",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub color_transform: Option<Vec<Rational>>,

    #[serde(
        rename = "android.lens.focalLength",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub focal_length: Option<f32>,

    #[serde(
        rename = "android.lens.state",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub lens_state: Option<u8>,

    #[serde(
        rename = "android.sensor.exposureTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub exposure_time_ns: Option<i64>,

    #[serde(
        rename = "android.sensor.sensitivity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sensitivity: Option<i32>,
}

impl CaptureMetadata {
    /// White balance gains in the sensor's R, G_even, G_odd, B order.
    pub fn gains(&self) -> Result<[f32; 4]> {
        self.color_gains
            .ok_or(CamItsError::MissingMetadata(KEY_COLOR_GAINS))
    }

    /// Color correction transform as a row-major 3x3 float matrix. Entries
    /// with a zero denominator are rejected.
    pub fn ccm(&self) -> Result<[[f32; 3]; 3]> {
        let transform = self
            .color_transform
            .as_ref()
            .ok_or(CamItsError::MissingMetadata(KEY_COLOR_TRANSFORM))?;
        if transform.len() != 9 {
            return Err(CamItsError::InvalidMetadata(format!(
                "{KEY_COLOR_TRANSFORM} has {} entries, expected 9",
                transform.len()
            )));
        }
        let mut ccm = [[0.0f32; 3]; 3];
        for (i, r) in transform.iter().enumerate() {
            if r.denominator == 0 {
                return Err(CamItsError::InvalidMetadata(format!(
                    "{KEY_COLOR_TRANSFORM} entry {i} is {}/0",
                    r.numerator
                )));
            }
            ccm[i / 3][i % 3] = r.to_f32();
        }
        Ok(ccm)
    }

    pub fn focal_length_mm(&self) -> Result<f32> {
        self.focal_length
            .ok_or(CamItsError::MissingMetadata(KEY_FOCAL_LENGTH))
    }
}

/// A single capture as delivered by the capture layer. Never mutated by the
/// pipeline; conversions produce new captures or images.
#[derive(Clone, Debug, PartialEq)]
pub struct Capture {
    pub width: usize,
    pub height: usize,
    pub format: CaptureFormat,
    pub data: Vec<u8>,
    pub metadata: CaptureMetadata,
}

impl Capture {
    pub fn new(
        width: usize,
        height: usize,
        format: CaptureFormat,
        data: Vec<u8>,
        metadata: CaptureMetadata,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CamItsError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
            metadata,
        })
    }

    /// Fail with `BufferTooSmall` unless the buffer holds `needed` bytes.
    pub(crate) fn require_bytes(&self, needed: usize) -> Result<&[u8]> {
        if self.data.len() < needed {
            return Err(CamItsError::BufferTooSmall {
                needed,
                got: self.data.len(),
            });
        }
        Ok(&self.data[..needed])
    }
}
