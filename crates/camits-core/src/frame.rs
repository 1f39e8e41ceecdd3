use ndarray::{s, Array2, Array3, ArrayView2, Axis};

use crate::consts::{COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{CamItsError, Result};

/// A float image with 1 (greyscale / plane) or 3 (RGB) channels.
/// Pixel values produced by the pipeline are f32 in [0.0, 1.0].
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    /// Pixel data, shape = (height, width, channels)
    pub data: Array3<f32>,
}

impl Image {
    /// Wrap an `(h, w, c)` array, rejecting channel counts other than 1 or 3.
    pub fn new(data: Array3<f32>) -> Result<Self> {
        let chans = data.dim().2;
        if chans != 1 && chans != COLOR_CHANNEL_COUNT {
            return Err(CamItsError::InvalidChannels {
                expected: "1 or 3",
                got: chans,
            });
        }
        Ok(Self { data })
    }

    /// Single-channel image from a 2D plane.
    pub fn from_plane(plane: Array2<f32>) -> Self {
        Self {
            data: plane.insert_axis(Axis(2)),
        }
    }

    /// Stack three equally sized planes into an RGB image.
    pub fn from_rgb_planes(
        red: &Array2<f32>,
        green: &Array2<f32>,
        blue: &Array2<f32>,
    ) -> Result<Self> {
        let (h, w) = red.dim();
        if green.dim() != (h, w) || blue.dim() != (h, w) {
            return Err(CamItsError::InvalidDimensions {
                width: green.ncols().max(blue.ncols()),
                height: green.nrows().max(blue.nrows()),
            });
        }
        let mut data = Array3::<f32>::zeros((h, w, COLOR_CHANNEL_COUNT));
        data.index_axis_mut(Axis(2), 0).assign(red);
        data.index_axis_mut(Axis(2), 1).assign(green);
        data.index_axis_mut(Axis(2), 2).assign(blue);
        Ok(Self { data })
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    /// View of one channel as a 2D plane.
    pub fn channel(&self, index: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(2), index)
    }

    /// Luma plane: BT.601 weighted sum for RGB, the channel itself for
    /// single-channel images.
    pub fn luma(&self) -> Array2<f32> {
        if self.channels() == 1 {
            return self.channel(0).to_owned();
        }
        let r = self.channel(0);
        let g = self.channel(1);
        let b = self.channel(2);
        let mut luma = Array2::<f32>::zeros((self.height(), self.width()));
        ndarray::Zip::from(&mut luma)
            .and(&r)
            .and(&g)
            .and(&b)
            .for_each(|y, &rv, &gv, &bv| {
                *y = LUMINANCE_R * rv + LUMINANCE_G * gv + LUMINANCE_B * bv;
            });
        luma
    }

    /// Extract a tile given normalized `[0, 1]` coordinates.
    ///
    /// The origin is rounded up and the size rounded down, so a tile never
    /// extends past the region it describes. Tiles are clipped to the image.
    pub fn patch(&self, xnorm: f64, ynorm: f64, wnorm: f64, hnorm: f64) -> Image {
        let (h, w, _) = self.data.dim();
        let x0 = ((xnorm * w as f64).ceil().max(0.0) as usize).min(w);
        let y0 = ((ynorm * h as f64).ceil().max(0.0) as usize).min(h);
        let tw = (wnorm * w as f64).floor().max(0.0) as usize;
        let th = (hnorm * h as f64).floor().max(0.0) as usize;
        let x1 = x0.saturating_add(tw).min(w);
        let y1 = y0.saturating_add(th).min(h);
        Image {
            data: self.data.slice(s![y0..y1, x0..x1, ..]).to_owned(),
        }
    }

    /// Clamp every sample to [0, 1].
    pub fn clipped(&self) -> Image {
        Image {
            data: self.data.mapv(|v| v.clamp(0.0, 1.0)),
        }
    }
}
