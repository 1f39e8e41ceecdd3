#![allow(dead_code)]

use camits_core::capture::{Capture, CaptureFormat, CaptureMetadata, Rational};
use camits_core::props::CameraProperties;
use ndarray::Array2;

/// Deterministic SplitMix64 generator for synthetic fixtures.
pub struct SplitMix64(u64);

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn next_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    pub fn next_u16(&mut self, max_exclusive: u16) -> u16 {
        (self.next_u64() % max_exclusive as u64) as u16
    }
}

/// Pack 10-bit samples, 4 per 5 bytes, first pixel in the top bit pair of
/// the trailing byte.
pub fn pack_raw10(pixels: &Array2<u16>) -> Vec<u8> {
    let mut out = Vec::new();
    for row in pixels.rows() {
        let row: Vec<u16> = row.to_vec();
        for group in row.chunks_exact(4) {
            let mut low = 0u8;
            for (i, &p) in group.iter().enumerate() {
                out.push((p >> 2) as u8);
                low |= ((p & 0x3) as u8) << (6 - 2 * i);
            }
            out.push(low);
        }
    }
    out
}

/// Pack 12-bit samples, 2 per 3 bytes, first pixel in the high nibble.
pub fn pack_raw12(pixels: &Array2<u16>) -> Vec<u8> {
    let mut out = Vec::new();
    for row in pixels.rows() {
        let row: Vec<u16> = row.to_vec();
        for pair in row.chunks_exact(2) {
            out.push((pair[0] >> 4) as u8);
            out.push((pair[1] >> 4) as u8);
            out.push((((pair[0] & 0xF) << 4) | (pair[1] & 0xF)) as u8);
        }
    }
    out
}

/// Little-endian 16-bit buffer.
pub fn raw16_bytes(pixels: &Array2<u16>) -> Vec<u8> {
    pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
}

pub fn random_mosaic(height: usize, width: usize, max_exclusive: u16, seed: u64) -> Array2<u16> {
    let mut rng = SplitMix64::new(seed);
    Array2::from_shape_fn((height, width), |_| rng.next_u16(max_exclusive))
}

/// Mosaic whose 2x2 cells hold `cell` in physical row-major order.
pub fn tiled_mosaic(height: usize, width: usize, cell: [u16; 4]) -> Array2<u16> {
    Array2::from_shape_fn((height, width), |(r, c)| cell[(r % 2) * 2 + c % 2])
}

pub fn bayer_props(white: u32, black: [u32; 4], cfa: u8) -> CameraProperties {
    CameraProperties {
        white_level: Some(white),
        black_level_pattern: Some(black),
        color_filter_arrangement: Some(cfa),
        ..Default::default()
    }
}

pub fn ccm_rationals(m: [[i32; 3]; 3], denominator: i32) -> Vec<Rational> {
    m.iter()
        .flatten()
        .map(|&n| Rational::new(n, denominator))
        .collect()
}

/// Unit gains and an identity color transform.
pub fn neutral_metadata() -> CaptureMetadata {
    CaptureMetadata {
        color_gains: Some([1.0; 4]),
        color_transform: Some(ccm_rationals([[1, 0, 0], [0, 1, 0], [0, 0, 1]], 1)),
        ..Default::default()
    }
}

pub fn raw16_capture(pixels: &Array2<u16>, metadata: CaptureMetadata) -> Capture {
    let (h, w) = pixels.dim();
    Capture::new(w, h, CaptureFormat::Raw, raw16_bytes(pixels), metadata).unwrap()
}

/// Square chart-like template of random black/white blocks, 0–255 scale.
pub fn block_template(size: usize, block: usize, seed: u64) -> Array2<f32> {
    let mut rng = SplitMix64::new(seed);
    let blocks = size / block;
    let cells: Vec<f32> = (0..blocks * blocks)
        .map(|_| if rng.next_bool() { 255.0 } else { 0.0 })
        .collect();
    Array2::from_shape_fn((size, size), |(r, c)| cells[(r / block) * blocks + c / block])
}

/// Nearest-neighbour enlargement by an integer factor.
pub fn upscale_nearest(plane: &Array2<f32>, factor: usize) -> Array2<f32> {
    let (h, w) = plane.dim();
    Array2::from_shape_fn((h * factor, w * factor), |(r, c)| {
        plane[[r / factor, c / factor]]
    })
}

/// Flat `background` scene with `chart` pasted at (`x`, `y`).
pub fn embed(
    chart: &Array2<f32>,
    scene_h: usize,
    scene_w: usize,
    x: usize,
    y: usize,
    background: f32,
) -> Array2<f32> {
    let mut scene = Array2::from_elem((scene_h, scene_w), background);
    let (th, tw) = chart.dim();
    scene
        .slice_mut(ndarray::s![y..y + th, x..x + tw])
        .assign(chart);
    scene
}
