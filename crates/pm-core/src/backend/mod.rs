// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Execution backends for heritage map application.
//!
//! A backend receives the map once through [`ComputeBackend::upload`] and is
//! then invoked once per step with flattened row-major fields. Results must
//! be visible in `output` when `execute` returns.

use std::fmt;

use crate::error::{HeritageError, HeritageResult};
use crate::kernel::Interpolation;
use crate::stencil::HeritageMap;

pub mod cpu;

pub use cpu::CpuBackend;

/// Kernel selector keyed by interpolation order and saturation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KernelVariant {
    pub interpolation: Interpolation,
    pub saturating: bool,
}

impl KernelVariant {
    pub const fn new(interpolation: Interpolation, saturating: bool) -> Self {
        Self {
            interpolation,
            saturating,
        }
    }

    /// Points per axis.
    pub const fn points(&self) -> usize {
        self.interpolation.order()
    }

    pub const fn points_per_row(&self) -> usize {
        self.interpolation.points_per_row()
    }

    /// Ring positions to clamp against, if saturating.
    pub fn ring(&self) -> Option<&'static [usize]> {
        self.saturating
            .then(|| self.interpolation.saturation_ring())
    }

    /// Rejects a kernel built for a different interpolation order than `map`.
    pub fn ensure_compatible(&self, map: &HeritageMap) -> HeritageResult<()> {
        if self.interpolation == map.interpolation() {
            Ok(())
        } else {
            Err(HeritageError::VariantMismatch {
                map: map.interpolation(),
                variant: self.interpolation,
            })
        }
    }

    /// Every variant a backend may be asked to run.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Interpolation::Nearest,
            Interpolation::Linear,
            Interpolation::Quadratic,
            Interpolation::Cubic,
        ]
        .into_iter()
        .flat_map(|interpolation| [false, true].map(|saturating| Self::new(interpolation, saturating)))
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.interpolation)?;
        if self.saturating {
            f.write_str("+saturating")?;
        }
        Ok(())
    }
}

/// Executes the stencil-apply kernel over every cell of a grid.
pub trait ComputeBackend {
    /// Backend-side copy of a heritage map.
    type MapHandle;

    fn name(&self) -> &'static str;

    fn upload(&self, map: &HeritageMap) -> HeritageResult<Self::MapHandle>;

    /// Writes `output[i] = Σ input[source] * weight` over row `i` of `map`,
    /// clamped when `variant.saturating`. `input` and `output` both hold
    /// `map.rows()` samples and never alias. A `variant` whose interpolation
    /// differs from the map's is an error.
    fn execute(
        &self,
        map: &HeritageMap,
        handle: &Self::MapHandle,
        input: &[f32],
        output: &mut [f32],
        variant: KernelVariant,
    ) -> HeritageResult<()>;
}
