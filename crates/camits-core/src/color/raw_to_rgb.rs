use ndarray::{Array2, Array3, Axis, Zip};

use crate::capture::CaptureMetadata;
use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{CamItsError, Result};
use crate::frame::Image;
use crate::props::CameraProperties;
use crate::raw::cfa::{gains_in_canonical_order, reorder};

/// Per-channel constants of the raw → RGB conversion, in R, G, B order.
#[derive(Clone, Copy, Debug)]
struct RawTransform {
    black: [f32; 3],
    scale: f32,
    gains: [f32; 3],
    ccm: [[f32; 3]; 3],
}

impl RawTransform {
    fn from_metadata(props: &CameraProperties, metadata: &CaptureMetadata) -> Result<Self> {
        let white = props.white_level()?;
        let cfa = props.cfa_arrangement()?;
        let black = reorder(&props.black_levels()?, cfa.canonical_order());
        let max_black = black.iter().copied().fold(f32::MIN, f32::max);
        if white <= max_black {
            return Err(CamItsError::InvalidMetadata(format!(
                "white level {white} must exceed black level {max_black}"
            )));
        }
        let gains = gains_in_canonical_order(cfa, metadata.gains()?);

        // Gr stands in for the averaged green channel's offset and gain.
        Ok(Self {
            black: [black[0] / white, black[1] / white, black[3] / white],
            scale: white / (white - max_black),
            gains: [gains[0], gains[1], gains[3]],
            ccm: metadata.ccm()?,
        })
    }

    #[inline]
    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut balanced = [0.0f32; 3];
        for c in 0..COLOR_CHANNEL_COUNT {
            balanced[c] = ((rgb[c] - self.black[c]) * self.scale * self.gains[c]).clamp(0.0, 1.0);
        }
        self.ccm.map(|row| {
            (row[0] * balanced[0] + row[1] * balanced[1] + row[2] * balanced[2]).clamp(0.0, 1.0)
        })
    }
}

/// Reconstruct an RGB image from the four Bayer planes of a raw capture.
///
/// Planes are expected in canonical R, Gr, Gb, B order with values
/// normalized to the white level. Green is the mean of Gr and Gb. Each
/// channel is black-level corrected, rescaled so the white level maps to 1,
/// multiplied by the capture's white-balance gain and clipped, then the
/// capture's color correction matrix is applied and the result clipped again.
pub fn convert_raw_to_rgb_image(
    r: &Array2<f32>,
    gr: &Array2<f32>,
    gb: &Array2<f32>,
    b: &Array2<f32>,
    props: &CameraProperties,
    metadata: &CaptureMetadata,
) -> Result<Image> {
    let (h, w) = r.dim();
    for plane in [gr, gb, b] {
        if plane.dim() != (h, w) {
            return Err(CamItsError::InvalidDimensions {
                width: plane.ncols(),
                height: plane.nrows(),
            });
        }
    }
    let transform = RawTransform::from_metadata(props, metadata)?;

    let mut data = Array3::<f32>::zeros((h, w, COLOR_CHANNEL_COUNT));
    let zip = Zip::from(data.lanes_mut(Axis(2)))
        .and(r)
        .and(gr)
        .and(gb)
        .and(b);
    let kernel = |mut px: ndarray::ArrayViewMut1<f32>,
                  &rv: &f32,
                  &grv: &f32,
                  &gbv: &f32,
                  &bv: &f32| {
        let out = transform.apply([rv, (grv + gbv) / 2.0, bv]);
        for (dst, v) in px.iter_mut().zip(out) {
            *dst = v;
        }
    };
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(kernel);
    } else {
        zip.for_each(kernel);
    }

    tracing::debug!(width = w, height = h, scale = transform.scale, "Reconstructed RGB from raw");
    Ok(Image { data })
}
