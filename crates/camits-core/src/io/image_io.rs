use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb};
use ndarray::{Array2, Array3};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{CamItsError, Result};
use crate::filters::lut::{apply_lut, gamma_lut};
use crate::frame::Image;
use crate::pipeline::config::GammaConfig;

fn rgb_from_raw(width: u32, height: u32, samples: Vec<f32>) -> Result<Image> {
    let (w, h) = (width as usize, height as usize);
    let data = Array3::from_shape_vec((h, w, COLOR_CHANNEL_COUNT), samples)
        .map_err(|_| CamItsError::InvalidDimensions {
            width: w,
            height: h,
        })?;
    Ok(Image { data })
}

/// Load a standard image file as RGB in [0, 1]. Greyscale files are
/// replicated into all three channels.
pub fn load_rgb_image(path: &Path) -> Result<Image> {
    let rgb = image::open(path)?.to_rgb32f();
    let (w, h) = rgb.dimensions();
    rgb_from_raw(w, h, rgb.into_raw())
}

/// Decode an in-memory JPEG stream to RGB in [0, 1].
pub fn decompress_jpeg_to_rgb_image(jpeg: &[u8]) -> Result<Image> {
    let rgb = image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    let samples = rgb.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
    rgb_from_raw(w, h, samples)
}

/// Load a chart template as a greyscale plane at the file's native integer
/// scale: 0–255 for 8-bit files, 0–65535 for 16-bit ones.
pub fn load_chart_template(path: &Path) -> Result<Array2<f32>> {
    let img = image::open(path)?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    let samples: Vec<f32> = match &img {
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => img
            .to_luma16()
            .into_raw()
            .into_iter()
            .map(f32::from)
            .collect(),
        _ => img.to_luma8().into_raw().into_iter().map(f32::from).collect(),
    };
    tracing::debug!(width = w, height = h, path = %path.display(), "Loaded chart template");
    Array2::from_shape_vec((h, w), samples)
        .map_err(|_| CamItsError::InvalidDimensions { width: w, height: h })
}

/// Save an image, choosing the encoding from the file extension.
///
/// TIFF files are written with 16 bits per sample, everything else with 8.
/// Single-channel images are written as greyscale. With `apply_gamma` the
/// default gamma curve is applied first, for images holding linear values.
pub fn write_image(img: &Image, path: &Path, apply_gamma: bool) -> Result<()> {
    let encoded;
    let img = if apply_gamma {
        encoded = apply_lut(img, &gamma_lut(&GammaConfig::default())?)?;
        &encoded
    } else {
        img
    };

    let (w, h) = (img.width() as u32, img.height() as u32);
    let sixteen_bit = matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("tif" | "tiff")
    );
    let size_error = || CamItsError::InvalidDimensions {
        width: img.width(),
        height: img.height(),
    };

    match (img.channels(), sixteen_bit) {
        (1, false) => ImageBuffer::<Luma<u8>, _>::from_raw(w, h, quantize_u8(img))
            .ok_or_else(size_error)?
            .save(path)?,
        (1, true) => ImageBuffer::<Luma<u16>, _>::from_raw(w, h, quantize_u16(img))
            .ok_or_else(size_error)?
            .save(path)?,
        (3, false) => ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, quantize_u8(img))
            .ok_or_else(size_error)?
            .save(path)?,
        (3, true) => ImageBuffer::<Rgb<u16>, _>::from_raw(w, h, quantize_u16(img))
            .ok_or_else(size_error)?
            .save(path)?,
        (got, _) => {
            return Err(CamItsError::InvalidChannels {
                expected: "1 or 3",
                got,
            })
        }
    }
    tracing::debug!(path = %path.display(), width = w, height = h, "Wrote image");
    Ok(())
}

fn quantize_u8(img: &Image) -> Vec<u8> {
    img.data.iter().map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8).collect()
}

fn quantize_u16(img: &Image) -> Vec<u16> {
    img.data.iter().map(|&v| (v.clamp(0.0, 1.0) * 65535.0) as u16).collect()
}
