use ndarray::{s, Array2, Array3, ArrayView2};
use tracing::debug;

use crate::capture::{Capture, CaptureFormat, YuvLayout};
use crate::error::{CamItsError, Result};
use crate::frame::Image;
use crate::io::image_io::decompress_jpeg_to_rgb_image;
use crate::props::CameraProperties;
use crate::raw::decode_raw16;
use crate::raw::stats::unpack_rawstats_capture;

/// Per-channel planes of a capture, in a fixed order per format.
#[derive(Clone, Debug, PartialEq)]
pub enum Planes {
    /// Bayer quadrants in canonical R, Gr, Gb, B order; each is half x half
    /// of the (cropped) sensor resolution.
    Bayer {
        r: Array2<f32>,
        gr: Array2<f32>,
        gb: Array2<f32>,
        b: Array2<f32>,
    },
    /// Full-resolution luma and half x half chroma.
    Yuv {
        y: Array2<f32>,
        u: Array2<f32>,
        v: Array2<f32>,
    },
    /// Full-resolution decoded RGB channels.
    Rgb {
        r: Array2<f32>,
        g: Array2<f32>,
        b: Array2<f32>,
    },
    /// Unnormalized per-cell mean and variance, shape `(h, w, 4)`.
    RawStats {
        mean: Array3<f32>,
        variance: Array3<f32>,
    },
}

impl Planes {
    /// Plane names in output order.
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Self::Bayer { .. } => &["r", "gr", "gb", "b"],
            Self::Yuv { .. } => &["y", "u", "v"],
            Self::Rgb { .. } => &["r", "g", "b"],
            Self::RawStats { .. } => &["mean", "variance"],
        }
    }

    /// Single-channel images of every plane, in output order.
    pub fn to_images(&self) -> Result<Vec<Image>> {
        let planes: Vec<&Array2<f32>> = match self {
            Self::Bayer { r, gr, gb, b } => vec![r, gr, gb, b],
            Self::Yuv { y, u, v } => vec![y, u, v],
            Self::Rgb { r, g, b } => vec![r, g, b],
            Self::RawStats { .. } => {
                return Err(CamItsError::UnsupportedFormat(
                    "rawStats planes are 4-channel statistics, not images".into(),
                ))
            }
        };
        Ok(planes
            .into_iter()
            .map(|p| Image::from_plane(p.clone()))
            .collect())
    }
}

/// 8-bit Y, U, V sample planes split out of a YUV 4:2:0 buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct YuvBytes {
    pub y: Vec<u8>,
    pub u: Vec<u8>,
    pub v: Vec<u8>,
}

/// Split a YUV 4:2:0 buffer according to its layout.
pub fn split_yuv420(
    data: &[u8],
    width: usize,
    height: usize,
    layout: YuvLayout,
) -> Result<YuvBytes> {
    if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
        return Err(CamItsError::InvalidDimensions { width, height });
    }
    let luma = width * height;
    let chroma = luma / 4;
    let needed = luma + 2 * chroma;
    if data.len() < needed {
        return Err(CamItsError::BufferTooSmall {
            needed,
            got: data.len(),
        });
    }

    let y = data[..luma].to_vec();
    let first = &data[luma..luma + chroma];
    let second = &data[luma + chroma..needed];
    let (u, v) = match layout {
        YuvLayout::I420 => (first.to_vec(), second.to_vec()),
        YuvLayout::Yv12 => (second.to_vec(), first.to_vec()),
        YuvLayout::Nv21 => {
            let vu = &data[luma..needed];
            let v = vu.iter().step_by(2).copied().collect();
            let u = vu.iter().skip(1).step_by(2).copied().collect();
            (u, v)
        }
    };
    Ok(YuvBytes { y, u, v })
}

pub(crate) fn bytes_to_plane(bytes: &[u8], height: usize, width: usize) -> Result<Array2<f32>> {
    Array2::from_shape_vec((height, width), bytes.iter().map(|&b| b as f32 / 255.0).collect())
        .map_err(|_| CamItsError::InvalidDimensions { width, height })
}

/// Decompose a capture into per-channel planes with values in [0, 1].
///
/// - YUV: Y full resolution, U and V half x half.
/// - JPEG: decoded R, G, B full resolution.
/// - Bayer raw (packed or not): R, Gr, Gb, B regardless of the physical
///   arrangement, after cropping to the active array when the capture covers
///   the full pixel array.
/// - rawStats: mean and variance statistics images.
///
/// `props` is required for Bayer captures.
pub fn convert_capture_to_planes(
    cap: &Capture,
    props: Option<&CameraProperties>,
) -> Result<Planes> {
    debug!(format = %cap.format, width = cap.width, height = cap.height, "Separating planes");
    match cap.format {
        CaptureFormat::Raw | CaptureFormat::Raw10 | CaptureFormat::Raw12 => {
            let props = props.ok_or(CamItsError::MissingMetadata("camera properties"))?;
            let raw = decode_raw16(cap)?;
            let [r, gr, gb, b] = bayer_quadrants(&raw, props)?;
            Ok(Planes::Bayer { r, gr, gb, b })
        }
        CaptureFormat::RawStats => {
            let (mean, variance) = unpack_rawstats_capture(cap)?;
            Ok(Planes::RawStats { mean, variance })
        }
        CaptureFormat::Yuv420(layout) => {
            let (w, h) = (cap.width, cap.height);
            let yuv = split_yuv420(&cap.data, w, h, layout)?;
            Ok(Planes::Yuv {
                y: bytes_to_plane(&yuv.y, h, w)?,
                u: bytes_to_plane(&yuv.u, h / 2, w / 2)?,
                v: bytes_to_plane(&yuv.v, h / 2, w / 2)?,
            })
        }
        CaptureFormat::Jpeg => {
            let rgb = decompress_jpeg_to_rgb_image(&cap.data)?;
            Ok(Planes::Rgb {
                r: rgb.channel(0).to_owned(),
                g: rgb.channel(1).to_owned(),
                b: rgb.channel(2).to_owned(),
            })
        }
    }
}

/// Normalize, crop and decimate a 16-bit Bayer mosaic into its R, Gr, Gb
/// and B quadrants.
pub fn bayer_quadrants(raw: &Array2<u16>, props: &CameraProperties) -> Result<[Array2<f32>; 4]> {
    let white_level = props.white_level()?;
    let cfa = props.cfa_arrangement()?;
    let (h, w) = raw.dim();

    let cropped = crop_to_active_array(raw.view(), props)?;
    let (ch, cw) = cropped.dim();
    if ch % 2 != 0 || cw % 2 != 0 {
        return Err(CamItsError::InvalidDimensions {
            width: cw,
            height: ch,
        });
    }
    if (ch, cw) != (h, w) {
        debug!(from = ?(w, h), to = ?(cw, ch), "Cropped raw to active array");
    }

    let img = cropped.mapv(|v| v as f32 / white_level);
    let quads = [
        img.slice(s![0..;2, 0..;2]),
        img.slice(s![0..;2, 1..;2]),
        img.slice(s![1..;2, 0..;2]),
        img.slice(s![1..;2, 1..;2]),
    ];
    Ok(cfa.canonical_order().map(|i| quads[i].to_owned()))
}

/// Crop policy: a capture the size of the pixel array is cropped to the
/// active array, one already the size of the active array is kept as is,
/// anything else is inconsistent metadata.
fn crop_to_active_array<'a>(
    raw: ArrayView2<'a, u16>,
    props: &CameraProperties,
) -> Result<ArrayView2<'a, u16>> {
    let Some((full, active)) = props.active_crop()? else {
        return Ok(raw);
    };
    let (h, w) = raw.dim();
    let (aw, ah) = (active.width(), active.height());
    if w == full.width && h == full.height {
        Ok(raw.slice_move(s![active.top..active.top + ah, active.left..active.left + aw]))
    } else if w == aw && h == ah {
        Ok(raw)
    } else {
        Err(CamItsError::CropMismatch {
            width: w,
            height: h,
            full_width: full.width,
            full_height: full.height,
            active_width: aw,
            active_height: ah,
        })
    }
}
