// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use bytemuck::{Pod, Zeroable};
use pm_array::{Array2, ArrayAccess};
use pm_config::HeritageSettings;

use crate::error::HeritageResult;
use crate::grid::GridShape;
use crate::kernel::Interpolation;
use crate::transform::{Rotation, RotationConvention};

/// One weighted source sample of a stencil row.
///
/// Sources outside the grid are stored as [`StencilEntry::ZERO`]; the zero
/// weight makes them contribute nothing while the index stays valid.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct StencilEntry {
    pub source: u32,
    pub weight: f32,
}

impl StencilEntry {
    pub const ZERO: Self = Self {
        source: 0,
        weight: 0.0,
    };

    pub const fn new(source: u32, weight: f32) -> Self {
        Self { source, weight }
    }

    pub fn is_zero(&self) -> bool {
        self.weight == 0.0
    }
}

/// Precomputed sparse operator advancing a field by one step.
///
/// Row `i` lists the `order²` weighted sources of target cell `i`, in
/// kernel-row-major order. The table is immutable once built.
#[derive(Clone, Debug)]
pub struct HeritageMap {
    shape: GridShape,
    interpolation: Interpolation,
    entries: Array2<StencilEntry>,
}

impl HeritageMap {
    pub(crate) fn from_parts(
        shape: GridShape,
        interpolation: Interpolation,
        entries: Array2<StencilEntry>,
    ) -> Self {
        debug_assert_eq!(
            entries.len(),
            shape.total() * interpolation.points_per_row()
        );
        Self {
            shape,
            interpolation,
            entries,
        }
    }

    /// Builds the map of a phase-space rotation.
    pub fn rotation(
        shape: GridShape,
        interpolation: Interpolation,
        angle: f64,
        convention: RotationConvention,
    ) -> HeritageResult<Self> {
        crate::builder::MapBuilder::new(shape, interpolation)
            .build(&Rotation::new(shape, angle, convention))
    }

    /// Builds the per-step rotation map of a run on a square grid.
    pub fn from_settings(settings: &HeritageSettings) -> HeritageResult<Self> {
        let shape = GridShape::square(settings.grid_size);
        let interpolation = Interpolation::from_points(settings.interpolation_points)?;
        let rotation =
            Rotation::per_step(shape, settings.steps, settings.rotation_convention.into())?;
        crate::builder::MapBuilder::new(shape, interpolation).build(&rotation)
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn points_per_row(&self) -> usize {
        self.interpolation.points_per_row()
    }

    pub fn rows(&self) -> usize {
        self.shape.total()
    }

    /// Stencil of target cell `i`.
    ///
    /// # Panics
    /// If `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[StencilEntry] {
        let width = self.points_per_row();
        &self.entries()[i * width..(i + 1) * width]
    }

    /// All rows, flattened contiguously in target order.
    pub fn entries(&self) -> &[StencilEntry] {
        self.entries.as_slice()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.entries())
    }

    /// Target cells whose every entry carries zero weight.
    pub fn empty_rows(&self) -> usize {
        self.entries()
            .chunks_exact(self.points_per_row())
            .filter(|row| row.iter().all(StencilEntry::is_zero))
            .count()
    }
}
