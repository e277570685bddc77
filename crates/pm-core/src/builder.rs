// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use pm_array::{Array2, ArrayAccessMut};
use pm_config::determinism;
use rayon::prelude::*;
use tracing::debug;

use crate::error::HeritageResult;
use crate::grid::GridShape;
use crate::kernel::{Interpolation, MAX_POINTS};
use crate::stencil::{HeritageMap, StencilEntry};
use crate::transform::CoordinateTransform;

/// Byte alignment of stencil tables.
pub const STENCIL_ALIGNMENT: usize = 64;

/// Builds heritage maps for a fixed grid and interpolation kernel.
#[derive(Clone, Copy, Debug)]
pub struct MapBuilder {
    shape: GridShape,
    interpolation: Interpolation,
}

impl MapBuilder {
    pub fn new(shape: GridShape, interpolation: Interpolation) -> Self {
        Self {
            shape,
            interpolation,
        }
    }

    /// Evaluates `transform` at every target cell and records the weighted
    /// sources around its image.
    ///
    /// Targets whose image falls outside the grid keep an all-zero row, as do
    /// individual kernel points that straddle the boundary.
    pub fn build<T>(&self, transform: &T) -> HeritageResult<HeritageMap>
    where
        T: CoordinateTransform + ?Sized,
    {
        self.shape.validate()?;
        let width = self.interpolation.points_per_row();
        let mut entries =
            Array2::<StencilEntry>::allocate([self.shape.total(), width], STENCIL_ALIGNMENT)?;

        let fill = |(target, row): (usize, &mut [StencilEntry])| {
            self.fill_row(transform, target, row)
        };
        let parallel = !determinism::lock_reduction_order();
        if parallel {
            entries
                .as_mut_slice()
                .par_chunks_mut(width)
                .enumerate()
                .for_each(fill);
        } else {
            entries
                .as_mut_slice()
                .chunks_mut(width)
                .enumerate()
                .for_each(fill);
        }

        let map = HeritageMap::from_parts(self.shape, self.interpolation, entries);
        debug!(
            shape = %self.shape,
            interpolation = %self.interpolation,
            parallel,
            "built heritage map"
        );
        Ok(map)
    }

    fn fill_row<T>(&self, transform: &T, target: usize, row: &mut [StencilEntry])
    where
        T: CoordinateTransform + ?Sized,
    {
        let shape = self.shape;
        let (q, p) = (target / shape.size_y, target % shape.size_y);
        let (sq, sp) = transform.source(q, p);
        if !sq.is_finite() || !sp.is_finite() {
            return;
        }

        let (cell_q, cell_p) = (sq.floor(), sp.floor());
        if cell_q < 0.0
            || cell_p < 0.0
            || cell_q >= shape.size_x as f64
            || cell_p >= shape.size_y as f64
        {
            return;
        }

        let order = self.interpolation.order();
        let mut icq = [0.0f64; MAX_POINTS];
        let mut icp = [0.0f64; MAX_POINTS];
        self.interpolation.weights(sq - cell_q, &mut icq);
        self.interpolation.weights(sp - cell_p, &mut icp);

        let first = self.interpolation.first_offset();
        let (base_q, base_p) = (cell_q as isize + first, cell_p as isize + first);
        for a in 0..order {
            let i0 = base_q + a as isize;
            for b in 0..order {
                let j0 = base_p + b as isize;
                row[a * order + b] = if shape.contains(i0, j0) {
                    let source = shape.flat(i0 as usize, j0 as usize) as u32;
                    StencilEntry::new(source, (icq[a] * icp[b]) as f32)
                } else {
                    StencilEntry::ZERO
                };
            }
        }
    }
}
