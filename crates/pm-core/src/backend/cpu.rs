// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use pm_config::determinism;
use rayon::prelude::*;

use super::{ComputeBackend, KernelVariant};
use crate::apply::apply_row;
use crate::error::{HeritageError, HeritageResult};
use crate::stencil::HeritageMap;

/// Target cells handed to one rayon task.
const CELL_BLOCK: usize = 1024;

/// Host backend. Cells are independent, so the parallel path produces the
/// same bits as the sequential one.
#[derive(Clone, Copy, Debug)]
pub struct CpuBackend {
    parallel: bool,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    /// Parallel unless determinism locks execution to the calling thread.
    pub fn new() -> Self {
        Self {
            parallel: !determinism::lock_reduction_order(),
        }
    }

    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    pub fn parallel() -> Self {
        Self { parallel: true }
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

impl ComputeBackend for CpuBackend {
    type MapHandle = ();

    fn name(&self) -> &'static str {
        "cpu"
    }

    fn upload(&self, _map: &HeritageMap) -> HeritageResult<()> {
        Ok(())
    }

    fn execute(
        &self,
        map: &HeritageMap,
        _handle: &(),
        input: &[f32],
        output: &mut [f32],
        variant: KernelVariant,
    ) -> HeritageResult<()> {
        variant.ensure_compatible(map)?;
        let cells = map.rows();
        if input.len() != cells || output.len() != cells {
            return Err(HeritageError::backend(
                "cpu",
                format!(
                    "expected {cells} samples, got input={} output={}",
                    input.len(),
                    output.len()
                ),
            ));
        }
        let ring = variant.ring();

        if self.parallel {
            output
                .par_chunks_mut(CELL_BLOCK)
                .enumerate()
                .for_each(|(block, out)| {
                    let start = block * CELL_BLOCK;
                    for (offset, value) in out.iter_mut().enumerate() {
                        *value = apply_row(map.row(start + offset), input, ring);
                    }
                });
        } else {
            for (cell, value) in output.iter_mut().enumerate() {
                *value = apply_row(map.row(cell), input, ring);
            }
        }
        Ok(())
    }
}
