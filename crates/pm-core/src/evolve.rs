// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use pm_config::HeritageSettings;
use std::mem;
use tracing::{debug, info_span};

use crate::backend::ComputeBackend;
use crate::error::{HeritageError, HeritageResult};
use crate::field::Field;
use crate::operator::HeritageOperator;
use crate::stencil::HeritageMap;

/// Two fields alternating as input and output of repeated map applications.
pub struct PingPong<B: ComputeBackend> {
    operator: HeritageOperator<B>,
    current: Field,
    next: Field,
    steps: u64,
}

impl<B: ComputeBackend> PingPong<B> {
    pub fn new(operator: HeritageOperator<B>, initial: Field) -> HeritageResult<Self> {
        let expected = operator.map().shape();
        if initial.shape() != expected {
            return Err(HeritageError::FieldShape {
                role: "initial",
                expected: expected.dims(),
                got: initial.shape().dims(),
            });
        }
        let next = Field::zeros(expected)?;
        Ok(Self {
            operator,
            current: initial,
            next,
            steps: 0,
        })
    }

    /// Builds the rotation map described by `settings` on `backend`.
    pub fn from_settings(
        settings: &HeritageSettings,
        backend: B,
        initial: Field,
    ) -> HeritageResult<Self> {
        let map = HeritageMap::from_settings(settings)?;
        let operator = HeritageOperator::new(map, backend, settings.interpolate_clamped)?;
        Self::new(operator, initial)
    }

    pub fn step(&mut self) -> HeritageResult<()> {
        self.operator.apply(&self.current, &mut self.next)?;
        mem::swap(&mut self.current, &mut self.next);
        self.steps += 1;
        Ok(())
    }

    pub fn run(&mut self, steps: u64) -> HeritageResult<()> {
        let _span = info_span!("heritage.run", steps).entered();
        let before = self.current.total();
        for _ in 0..steps {
            self.step()?;
        }
        debug!(
            steps,
            total = self.steps,
            mass_before = before,
            mass_after = self.current.total(),
            "advanced field"
        );
        Ok(())
    }

    pub fn current(&self) -> &Field {
        &self.current
    }

    pub fn into_current(self) -> Field {
        self.current
    }

    pub fn operator(&self) -> &HeritageOperator<B> {
        &self.operator
    }

    /// Applications performed so far.
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }
}
