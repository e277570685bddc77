// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! One-dimensional Lagrange interpolation kernels.
//!
//! A kernel with `n` points evaluates weights for the samples at offsets
//! `-(n-1)/2 .. n/2` around the cell containing the interpolation point, with
//! `x ∈ [0, 1)` the fractional position inside that cell.

use std::fmt;

use crate::error::{HeritageError, HeritageResult};

/// Largest supported number of points per axis.
pub const MAX_POINTS: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// Value of the containing cell.
    Nearest,
    Linear,
    /// Three points centred on the containing cell.
    Quadratic,
    /// Four points, one before and two after the containing cell.
    #[default]
    Cubic,
}

impl Interpolation {
    pub fn from_points(points: usize) -> HeritageResult<Self> {
        match points {
            1 => Ok(Self::Nearest),
            2 => Ok(Self::Linear),
            3 => Ok(Self::Quadratic),
            4 => Ok(Self::Cubic),
            _ => Err(HeritageError::UnsupportedOrder { points }),
        }
    }

    /// Points per axis.
    pub const fn order(self) -> usize {
        match self {
            Self::Nearest => 1,
            Self::Linear => 2,
            Self::Quadratic => 3,
            Self::Cubic => 4,
        }
    }

    /// Entries in one stencil row.
    pub const fn points_per_row(self) -> usize {
        self.order() * self.order()
    }

    /// Offset of the first kernel sample relative to the containing cell.
    pub const fn first_offset(self) -> isize {
        -(((self.order() - 1) / 2) as isize)
    }

    /// Writes the kernel weights for fractional offset `x` into
    /// `out[..order]`. The weights sum to one.
    pub fn weights(self, x: f64, out: &mut [f64]) {
        match self {
            Self::Nearest => out[0] = 1.0,
            Self::Linear => {
                out[0] = 1.0 - x;
                out[1] = x;
            }
            Self::Quadratic => {
                out[0] = x * (x - 1.0) / 2.0;
                out[1] = 1.0 - x * x;
                out[2] = x * (x + 1.0) / 2.0;
            }
            Self::Cubic => {
                out[0] = -(x - 1.0) * (x - 2.0) * x / 6.0;
                out[1] = (x + 1.0) * (x - 1.0) * (x - 2.0) / 2.0;
                out[2] = (2.0 - x) * x * (x + 1.0) / 2.0;
                out[3] = x * (x + 1.0) * (x - 1.0) / 6.0;
            }
        }
    }

    /// Row positions of the samples that bound a saturating clamp: the 2x2
    /// block of kernel points closest to the interpolation point.
    pub fn saturation_ring(self) -> &'static [usize] {
        match self {
            Self::Nearest => &[0],
            Self::Linear => &[0, 1, 2, 3],
            Self::Quadratic => &[4, 5, 7, 8],
            Self::Cubic => &[5, 6, 9, 10],
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
        };
        f.write_str(name)
    }
}
