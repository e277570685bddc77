// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use pm_array::{Array2, ArrayAccess, ArrayAccessMut};

use crate::error::HeritageResult;
use crate::grid::GridShape;

/// Byte alignment of field storage; one cache line.
pub const FIELD_ALIGNMENT: usize = 64;

/// Phase-space density sampled on a [`GridShape`], row-major.
#[derive(Clone, Debug)]
pub struct Field {
    shape: GridShape,
    data: Array2<f32>,
}

impl Field {
    pub fn zeros(shape: GridShape) -> HeritageResult<Self> {
        let data = Array2::allocate(shape.dims(), FIELD_ALIGNMENT)?;
        Ok(Self { shape, data })
    }

    pub fn from_vec(shape: GridShape, samples: Vec<f32>) -> HeritageResult<Self> {
        let data = Array2::from_vec(shape.dims(), samples, FIELD_ALIGNMENT)?;
        Ok(Self { shape, data })
    }

    /// Samples `f(q, p)` at every cell.
    pub fn from_fn(shape: GridShape, mut f: impl FnMut(usize, usize) -> f32) -> HeritageResult<Self> {
        let mut field = Self::zeros(shape)?;
        for (q, row) in field
            .as_mut_slice()
            .chunks_exact_mut(shape.size_y.max(1))
            .enumerate()
        {
            for (p, value) in row.iter_mut().enumerate() {
                *value = f(q, p);
            }
        }
        Ok(field)
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        self.data.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        self.data.as_mut_slice()
    }

    pub fn get(&self, q: usize, p: usize) -> Option<f32> {
        if q < self.shape.size_x && p < self.shape.size_y {
            Some(self.as_slice()[self.shape.flat(q, p)])
        } else {
            None
        }
    }

    /// Sum of all samples; the drop between steps is the mass lost at the
    /// grid boundary.
    pub fn total(&self) -> f64 {
        self.as_slice().iter().map(|value| f64::from(*value)).sum()
    }
}
