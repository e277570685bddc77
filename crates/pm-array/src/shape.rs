// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;

use crate::error::{ArrayError, ArrayResult};

/// Whether per-axis bounds checks run on the `Index` fast path.
pub const BOUNDS_CHECKED: bool = cfg!(any(debug_assertions, feature = "checked"));

/// Extents and index offsets of a row-major array of rank `N`.
///
/// Index `offsets[a]` addresses the first element along axis `a`, so the
/// valid range of that axis is `offsets[a] ..= offsets[a] + dims[a] - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape<const N: usize> {
    dims: [usize; N],
    offsets: [isize; N],
}

impl<const N: usize> Shape<N> {
    pub const fn new(dims: [usize; N]) -> Self {
        Self {
            dims,
            offsets: [0; N],
        }
    }

    pub const fn with_offsets(dims: [usize; N], offsets: [isize; N]) -> Self {
        Self { dims, offsets }
    }

    pub(crate) const fn empty() -> Self {
        Self::new([0; N])
    }

    pub const fn rank(&self) -> usize {
        N
    }

    pub fn dims(&self) -> [usize; N] {
        self.dims
    }

    pub fn offsets(&self) -> [isize; N] {
        self.offsets
    }

    pub fn dim(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    /// Number of elements addressed by the shape.
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major element strides.
    pub fn strides(&self) -> [usize; N] {
        let mut strides = [1usize; N];
        for axis in (0..N.saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * self.dims[axis + 1];
        }
        strides
    }

    /// Flat position of `index`, validating every axis against its extent.
    pub fn checked_index(&self, index: [isize; N]) -> ArrayResult<usize> {
        let mut flat = 0usize;
        for axis in 0..N {
            let local = index[axis] - self.offsets[axis];
            if local < 0 || local as usize >= self.dims[axis] {
                return Err(self.bounds_error(axis, index[axis]));
            }
            flat = flat * self.dims[axis] + local as usize;
        }
        Ok(flat)
    }

    /// Flat position of `index` without per-axis validation.
    #[inline]
    pub fn linear_index(&self, index: [isize; N]) -> usize {
        let mut flat = 0usize;
        for axis in 0..N {
            let local = index[axis].wrapping_sub(self.offsets[axis]) as usize;
            flat = flat.wrapping_mul(self.dims[axis]).wrapping_add(local);
        }
        flat
    }

    pub(crate) fn bounds_error(&self, axis: usize, value: isize) -> ArrayError {
        let lower = self.offsets[axis];
        let upper = match self.dims[axis] {
            0 => None,
            dim => Some(lower + dim as isize - 1),
        };
        ArrayError::Bounds {
            rank: N,
            axis: axis + 1,
            value,
            lower,
            upper,
        }
    }

    /// Fails with `ShapeMismatch` or `OffsetMismatch` unless `other` matches.
    pub fn ensure_matches(&self, other: &Shape<N>) -> ArrayResult<()> {
        if self.dims != other.dims {
            return Err(ArrayError::ShapeMismatch {
                left: self.dims.to_vec(),
                right: other.dims.to_vec(),
            });
        }
        if self.offsets != other.offsets {
            return Err(ArrayError::OffsetMismatch {
                left: self.offsets.to_vec(),
                right: other.offsets.to_vec(),
            });
        }
        Ok(())
    }
}

impl<const N: usize> From<[usize; N]> for Shape<N> {
    fn from(dims: [usize; N]) -> Self {
        Self::new(dims)
    }
}

impl<const N: usize> fmt::Display for Shape<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.dims)?;
        if self.offsets.iter().any(|offset| *offset != 0) {
            write!(f, "@{:?}", self.offsets)?;
        }
        Ok(())
    }
}
