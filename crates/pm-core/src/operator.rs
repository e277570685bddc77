// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::sync::Arc;

use tracing::{debug, info_span};

use crate::backend::{ComputeBackend, CpuBackend, KernelVariant};
use crate::error::{HeritageError, HeritageResult};
use crate::field::Field;
use crate::stencil::HeritageMap;

/// A heritage map bound to the backend that applies it.
pub struct HeritageOperator<B: ComputeBackend = CpuBackend> {
    map: Arc<HeritageMap>,
    backend: B,
    handle: B::MapHandle,
    saturating: bool,
}

impl HeritageOperator<CpuBackend> {
    pub fn cpu(map: impl Into<Arc<HeritageMap>>, saturating: bool) -> HeritageResult<Self> {
        Self::new(map, CpuBackend::new(), saturating)
    }
}

impl<B: ComputeBackend> HeritageOperator<B> {
    /// Uploads `map` to `backend`.
    pub fn new(
        map: impl Into<Arc<HeritageMap>>,
        backend: B,
        saturating: bool,
    ) -> HeritageResult<Self> {
        let map = map.into();
        let handle = backend.upload(&map)?;
        debug!(
            backend = backend.name(),
            shape = %map.shape(),
            interpolation = %map.interpolation(),
            saturating,
            "bound heritage map to backend"
        );
        Ok(Self {
            map,
            backend,
            handle,
            saturating,
        })
    }

    pub fn map(&self) -> &Arc<HeritageMap> {
        &self.map
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_saturating(&self) -> bool {
        self.saturating
    }

    pub fn variant(&self) -> KernelVariant {
        KernelVariant::new(self.map.interpolation(), self.saturating)
    }

    /// Advances `input` by one step into `output`.
    pub fn apply(&self, input: &Field, output: &mut Field) -> HeritageResult<()> {
        let expected = self.map.shape();
        for (role, got) in [("input", input.shape()), ("output", output.shape())] {
            if got != expected {
                return Err(HeritageError::FieldShape {
                    role,
                    expected: expected.dims(),
                    got: got.dims(),
                });
            }
        }
        let _span = info_span!(
            "heritage.apply",
            backend = self.backend.name(),
            cells = expected.total(),
        )
        .entered();
        self.backend.execute(
            &self.map,
            &self.handle,
            input.as_slice(),
            output.as_mut_slice(),
            self.variant(),
        )
    }

    pub fn apply_to_new(&self, input: &Field) -> HeritageResult<Field> {
        let mut output = Field::zeros(self.map.shape())?;
        self.apply(input, &mut output)?;
        Ok(output)
    }
}
