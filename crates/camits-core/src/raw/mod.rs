pub mod cfa;
pub mod stats;
pub mod unpack;

use byteorder::{ByteOrder, LittleEndian};
use ndarray::Array2;

use crate::capture::{Capture, CaptureFormat};
use crate::error::{CamItsError, Result};

use self::unpack::{unpack_image, PackedLayout};

/// Decode a Bayer capture (RAW16, RAW10 or RAW12) into 16-bit samples.
pub fn decode_raw16(cap: &Capture) -> Result<Array2<u16>> {
    let (w, h) = (cap.width, cap.height);
    match cap.format {
        CaptureFormat::Raw => {
            let bytes = cap.require_bytes(w * h * 2)?;
            let mut words = vec![0u16; w * h];
            LittleEndian::read_u16_into(bytes, &mut words);
            Array2::from_shape_vec((h, w), words)
                .map_err(|_| CamItsError::InvalidDimensions { width: w, height: h })
        }
        CaptureFormat::Raw10 => unpack_image(&cap.data, w, h, PackedLayout::RAW10),
        CaptureFormat::Raw12 => unpack_image(&cap.data, w, h, PackedLayout::RAW12),
        other => Err(CamItsError::UnsupportedFormat(format!(
            "{other} is not a Bayer raw format"
        ))),
    }
}
