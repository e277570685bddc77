// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! GPU backend for heritage map application built on `wgpu`.
//!
//! [`WgpuBackend`] implements [`pm_core::ComputeBackend`]: the stencil table
//! is uploaded once, then every `execute` writes the input field, dispatches
//! one invocation per target cell and blocks until the output has been read
//! back into host memory.

pub mod backend;
pub mod error;
pub mod shader;

pub use backend::{WgpuBackend, WgpuMapHandle};
pub use error::WgpuBackendError;
pub use shader::{shader_source, WORKGROUP_SIZE};
