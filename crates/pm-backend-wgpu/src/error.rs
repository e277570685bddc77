// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use pm_core::HeritageError;
use thiserror::Error;

pub(crate) const BACKEND_NAME: &str = "wgpu";

/// Failures of GPU device setup and kernel execution.
#[derive(Debug, Error)]
pub enum WgpuBackendError {
    #[error("no suitable WGPU adapter")]
    NoAdapter,
    #[error("failed to acquire WGPU device: {0}")]
    Device(String),
    #[error("stencil table of {bytes} bytes exceeds the storage binding limit of {limit} bytes")]
    BindingTooLarge { bytes: u64, limit: u64 },
    #[error("expected {expected} samples, got input={input} output={output}")]
    FieldLength {
        expected: usize,
        input: usize,
        output: usize,
    },
    #[error("failed to map readback buffer: {0}")]
    Readback(String),
}

impl From<WgpuBackendError> for HeritageError {
    fn from(err: WgpuBackendError) -> Self {
        HeritageError::backend(BACKEND_NAME, err.to_string())
    }
}
