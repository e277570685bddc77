// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use pm_array::ArrayError;
use thiserror::Error;

use crate::kernel::Interpolation;

pub type HeritageResult<T> = Result<T, HeritageError>;

/// Failures raised while building or applying a heritage map.
#[derive(Debug, Error)]
pub enum HeritageError {
    #[error(transparent)]
    Array(#[from] ArrayError),
    /// Interpolation kernels exist for 1 to 4 points per axis.
    #[error("unsupported interpolation order {points} (expected 1..=4)")]
    UnsupportedOrder { points: usize },
    #[error("grid {size_x}x{size_y} has no cells")]
    EmptyGrid { size_x: usize, size_y: usize },
    /// Stencil source indices are stored as `u32`.
    #[error("grid {size_x}x{size_y} exceeds the addressable stencil range")]
    GridTooLarge { size_x: usize, size_y: usize },
    /// A synchrotron period has to be split into at least one step.
    #[error("rotation needs at least one step per period")]
    ZeroSteps,
    #[error("{role} field has shape {got:?}, heritage map expects {expected:?}")]
    FieldShape {
        role: &'static str,
        expected: [usize; 2],
        got: [usize; 2],
    },
    /// The kernel's row stride must equal the map's.
    #[error("{variant} kernel cannot run a {map} heritage map")]
    VariantMismatch {
        map: Interpolation,
        variant: Interpolation,
    },
    #[error("{backend} backend failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

impl HeritageError {
    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            backend,
            message: message.into(),
        }
    }
}
