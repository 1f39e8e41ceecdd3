use std::path::Path;

use crate::capture::YuvLayout;
use crate::color::convert_yuv420_planar_to_rgb_image;
use crate::error::Result;
use crate::frame::Image;
use crate::pipeline::config::YuvConversion;
use crate::planes::{bytes_to_plane, split_yuv420, Planes};

/// Load a raw YUV 4:2:0 file and convert it to RGB in [0, 1].
pub fn load_yuv420_to_rgb_image(
    path: &Path,
    width: usize,
    height: usize,
    layout: YuvLayout,
    conversion: &YuvConversion,
) -> Result<Image> {
    let bytes = std::fs::read(path)?;
    let yuv = split_yuv420(&bytes, width, height, layout)?;
    convert_yuv420_planar_to_rgb_image(&yuv.y, &yuv.u, &yuv.v, width, height, conversion)
}

/// Load a planar (Y, V, U) YUV 4:2:0 file as separate planes in [0, 1].
///
/// Chroma planes are half size in both dimensions; neutral chroma sits at
/// about 0.5.
pub fn load_yuv420_planar_to_yuv_planes(
    path: &Path,
    width: usize,
    height: usize,
) -> Result<Planes> {
    let bytes = std::fs::read(path)?;
    let yuv = split_yuv420(&bytes, width, height, YuvLayout::Yv12)?;
    Ok(Planes::Yuv {
        y: bytes_to_plane(&yuv.y, height, width)?,
        u: bytes_to_plane(&yuv.u, height / 2, width / 2)?,
        v: bytes_to_plane(&yuv.v, height / 2, width / 2)?,
    })
}
