// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;

use crate::error::{HeritageError, HeritageResult};

/// Extents of the rectangular phase-space mesh.
///
/// `size_x` counts rows (the position axis `q`) and `size_y` columns (the
/// momentum axis `p`); cells are flattened row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    pub size_x: usize,
    pub size_y: usize,
}

impl GridShape {
    pub const fn new(size_x: usize, size_y: usize) -> Self {
        Self { size_x, size_y }
    }

    pub const fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub const fn total(&self) -> usize {
        self.size_x * self.size_y
    }

    #[inline]
    pub const fn flat(&self, q: usize, p: usize) -> usize {
        q * self.size_y + p
    }

    #[inline]
    pub fn contains(&self, q: isize, p: isize) -> bool {
        q >= 0 && p >= 0 && (q as usize) < self.size_x && (p as usize) < self.size_y
    }

    pub const fn dims(&self) -> [usize; 2] {
        [self.size_x, self.size_y]
    }

    /// Rejects shapes that cannot back a stencil table.
    pub fn validate(&self) -> HeritageResult<()> {
        match self.size_x.checked_mul(self.size_y) {
            Some(0) => Err(HeritageError::EmptyGrid {
                size_x: self.size_x,
                size_y: self.size_y,
            }),
            Some(cells) if u32::try_from(cells).is_ok() => Ok(()),
            _ => Err(HeritageError::GridTooLarge {
                size_x: self.size_x,
                size_y: self.size_y,
            }),
        }
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.size_x, self.size_y)
    }
}
