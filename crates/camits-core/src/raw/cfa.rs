use serde::{Deserialize, Serialize};

use crate::error::{CamItsError, Result};

/// Physical 2x2 color filter arrangement, named by its top-left row-major
/// order. Discriminants match the capture layer's arrangement codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum CfaArrangement {
    RGGB = 0,
    GRBG = 1,
    GBRG = 2,
    BGGR = 3,
}

impl CfaArrangement {
    pub const ALL: [CfaArrangement; 4] = [Self::RGGB, Self::GRBG, Self::GBRG, Self::BGGR];

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::RGGB),
            1 => Ok(Self::GRBG),
            2 => Ok(Self::GBRG),
            3 => Ok(Self::BGGR),
            other => Err(CamItsError::UnsupportedCfa(other)),
        }
    }

    /// Positions (0..4, row-major in the top-left 2x2 cell) of the R, Gr,
    /// Gb and B samples.
    pub fn canonical_order(self) -> [usize; 4] {
        match self {
            Self::RGGB => [0, 1, 2, 3],
            Self::GRBG => [1, 0, 3, 2],
            Self::GBRG => [2, 3, 0, 1],
            Self::BGGR => [3, 2, 1, 0],
        }
    }

    /// Whether the green sample on the even row is the one sharing a row
    /// with red (Gr).
    pub fn even_green_is_gr(self) -> bool {
        matches!(self, Self::RGGB | Self::GRBG)
    }
}

/// Pick `values[order[i]]` for each canonical slot `i`.
pub fn reorder<T: Copy>(values: &[T; 4], order: [usize; 4]) -> [T; 4] {
    order.map(|i| values[i])
}

/// Permutation `q` with `reorder(reorder(v, p), q) == v`.
pub fn inverse_order(order: [usize; 4]) -> [usize; 4] {
    let mut inv = [0usize; 4];
    for (i, &p) in order.iter().enumerate() {
        inv[p] = i;
    }
    inv
}

/// Permutation equivalent to applying `first` then `second`.
pub fn compose_orders(first: [usize; 4], second: [usize; 4]) -> [usize; 4] {
    second.map(|i| first[i])
}

/// Reorder white balance gains from R, G_even, G_odd, B to R, Gr, Gb, B.
pub fn gains_in_canonical_order(cfa: CfaArrangement, gains: [f32; 4]) -> [f32; 4] {
    if cfa.even_green_is_gr() {
        gains
    } else {
        [gains[0], gains[2], gains[1], gains[3]]
    }
}
