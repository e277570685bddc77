// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Aligned, offset-indexed N-dimensional arrays.
//!
//! Arrays are row-major. Every axis carries a signed index offset so that,
//! for example, a mesh centred on zero can be addressed with negative
//! indices. Storage is either owned ([`Array`]), borrowed ([`ArrayView`],
//! [`ArrayViewMut`]) or pending hand-over ([`Temporary`]).

pub mod access;
pub mod array;
pub mod error;
pub mod memory;
pub mod shape;
pub mod temporary;
pub mod view;

pub use access::{ArrayAccess, ArrayAccessMut, ArrayState};
pub use array::{Array, Array1, Array2, Array3, Array4, Array5};
pub use error::{ArrayError, ArrayResult};
pub use memory::{is_ptr_aligned, AlignedBuffer};
pub use shape::{Shape, BOUNDS_CHECKED};
pub use temporary::Temporary;
pub use view::{ArrayView, ArrayViewMut};
