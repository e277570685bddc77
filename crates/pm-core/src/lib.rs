// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Heritage maps for phase-space density evolution.
//!
//! A [`HeritageMap`] is built once per coordinate transform by a
//! [`MapBuilder`]: every target cell records the weighted mesh points around
//! the image of the cell under the transform. A [`HeritageOperator`] then
//! applies the map to a [`Field`] on a [`ComputeBackend`], optionally
//! clamping each result to its nearest samples, and [`PingPong`] alternates
//! two fields across repeated steps.
//!
//! ```
//! use pm_core::{Field, GridShape, HeritageMap, HeritageOperator, Interpolation, RotationConvention};
//!
//! let shape = GridShape::square(16);
//! let map = HeritageMap::rotation(shape, Interpolation::Cubic, 0.1, RotationConvention::Absolute)?;
//! let operator = HeritageOperator::cpu(map, true)?;
//! let field = Field::from_fn(shape, |q, p| if q == 8 && p == 8 { 1.0 } else { 0.0 })?;
//! let rotated = operator.apply_to_new(&field)?;
//! assert_eq!(rotated.len(), 256);
//! # Ok::<(), pm_core::HeritageError>(())
//! ```

pub mod apply;
pub mod backend;
pub mod builder;
pub mod error;
pub mod evolve;
pub mod field;
pub mod grid;
pub mod kernel;
pub mod operator;
pub mod stencil;
pub mod telemetry;
pub mod transform;

pub use backend::{ComputeBackend, CpuBackend, KernelVariant};
pub use builder::MapBuilder;
pub use error::{HeritageError, HeritageResult};
pub use evolve::PingPong;
pub use field::Field;
pub use grid::GridShape;
pub use kernel::Interpolation;
pub use operator::HeritageOperator;
pub use stencil::{HeritageMap, StencilEntry};
pub use transform::{CoordinateTransform, Identity, Rotation, RotationConvention};
