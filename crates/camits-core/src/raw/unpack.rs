//! Expansion of MIPI-style packed RAW10 / RAW12 buffers to 16 bits per pixel.
//!
//! Each packing group stores the 8 most significant bits of every pixel in
//! its own byte, followed by one byte that carries the remaining low bits of
//! all pixels of the group. The first pixel of a group owns the most
//! significant bits of that trailing byte.

use byteorder::{ByteOrder, LittleEndian};
use ndarray::Array2;
use rayon::prelude::*;

use crate::capture::{Capture, CaptureFormat};
use crate::consts::{
    PARALLEL_PIXEL_THRESHOLD, RAW10_GROUP_BYTES, RAW10_GROUP_PIXELS, RAW12_GROUP_BYTES,
    RAW12_GROUP_PIXELS,
};
use crate::error::{CamItsError, Result};

/// Byte-group geometry of a packed raw format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedLayout {
    pub bits: u32,
    pub group_bytes: usize,
    pub group_pixels: usize,
}

impl PackedLayout {
    pub const RAW10: PackedLayout = PackedLayout {
        bits: 10,
        group_bytes: RAW10_GROUP_BYTES,
        group_pixels: RAW10_GROUP_PIXELS,
    };

    pub const RAW12: PackedLayout = PackedLayout {
        bits: 12,
        group_bytes: RAW12_GROUP_BYTES,
        group_pixels: RAW12_GROUP_PIXELS,
    };

    /// Low bits per pixel stored in the trailing byte.
    fn lsb_bits(&self) -> u32 {
        self.bits - 8
    }

    /// Packed bytes in one row of `width` pixels.
    pub fn row_bytes(&self, width: usize) -> usize {
        width / self.group_pixels * self.group_bytes
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width == 0 || width % self.group_pixels != 0 {
            return Err(CamItsError::InvalidPackedWidth {
                bits: self.bits,
                width,
                group: self.group_pixels,
            });
        }
        Ok(())
    }
}

/// Unpack a RAW10 buffer of `width x height` pixels.
pub fn unpack_raw10_image(packed: &[u8], width: usize, height: usize) -> Result<Array2<u16>> {
    unpack_image(packed, width, height, PackedLayout::RAW10)
}

/// Unpack a RAW12 buffer of `width x height` pixels.
pub fn unpack_raw12_image(packed: &[u8], width: usize, height: usize) -> Result<Array2<u16>> {
    unpack_image(packed, width, height, PackedLayout::RAW12)
}

/// Unpack any supported packed layout into 16-bit words holding the
/// significant bits in their low end; the remaining high bits are zero.
pub fn unpack_image(
    packed: &[u8],
    width: usize,
    height: usize,
    layout: PackedLayout,
) -> Result<Array2<u16>> {
    layout.check_width(width)?;
    if height == 0 {
        return Err(CamItsError::InvalidDimensions { width, height });
    }
    let stride = layout.row_bytes(width);
    let needed = stride * height;
    if packed.len() < needed {
        return Err(CamItsError::BufferTooSmall {
            needed,
            got: packed.len(),
        });
    }
    let packed = &packed[..needed];

    let mut out = vec![0u16; width * height];
    if width * height >= PARALLEL_PIXEL_THRESHOLD {
        out.par_chunks_mut(width)
            .zip(packed.par_chunks(stride))
            .for_each(|(dst, src)| unpack_packed_row(dst, src, &layout));
    } else {
        out.chunks_mut(width)
            .zip(packed.chunks(stride))
            .for_each(|(dst, src)| unpack_packed_row(dst, src, &layout));
    }

    Array2::from_shape_vec((height, width), out)
        .map_err(|_| CamItsError::InvalidDimensions { width, height })
}

/// Expand one packed row. `dst` holds whole groups of pixels and `src` the
/// matching packed bytes; trailing partial groups are left untouched.
pub fn unpack_packed_row(dst: &mut [u16], src: &[u8], layout: &PackedLayout) {
    let lsb_bits = layout.lsb_bits();
    let lsb_mask = (1u16 << lsb_bits) - 1;
    let n = layout.group_pixels;

    for (pixels, group) in dst
        .chunks_exact_mut(n)
        .zip(src.chunks_exact(layout.group_bytes))
    {
        let low = group[n] as u16;
        for (i, px) in pixels.iter_mut().enumerate() {
            let shift = 8 - (i as u32 + 1) * lsb_bits;
            let msb = (group[i] as u16) << lsb_bits;
            *px = msb | ((low >> shift) & lsb_mask);
        }
    }
}

/// Convert a packed RAW10/RAW12 capture into a new RAW16 (`Raw`) capture.
/// Captures in any other format are rejected.
pub fn unpack_capture(cap: &Capture) -> Result<Capture> {
    let layout = match cap.format {
        CaptureFormat::Raw10 => PackedLayout::RAW10,
        CaptureFormat::Raw12 => PackedLayout::RAW12,
        other => {
            return Err(CamItsError::UnsupportedFormat(format!(
                "cannot unpack a {other} capture"
            )))
        }
    };
    let img = unpack_image(&cap.data, cap.width, cap.height, layout)?;
    tracing::debug!(
        bits = layout.bits,
        width = cap.width,
        height = cap.height,
        "Unpacked raw capture"
    );

    let mut data = vec![0u8; img.len() * 2];
    match img.as_slice() {
        Some(words) => LittleEndian::write_u16_into(words, &mut data),
        None => {
            let words: Vec<u16> = img.iter().copied().collect();
            LittleEndian::write_u16_into(&words, &mut data);
        }
    }

    Ok(Capture {
        width: cap.width,
        height: cap.height,
        format: CaptureFormat::Raw,
        data,
        metadata: cap.metadata.clone(),
    })
}
