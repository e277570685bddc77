// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use pm_config::RotationConventionSetting;

use crate::error::{HeritageError, HeritageResult};
use crate::grid::GridShape;

/// Maps a target cell to the real-valued source coordinate it inherits from.
pub trait CoordinateTransform: Sync {
    fn source(&self, q: usize, p: usize) -> (f64, f64);
}

impl<F> CoordinateTransform for F
where
    F: Fn(usize, usize) -> (f64, f64) + Sync,
{
    fn source(&self, q: usize, p: usize) -> (f64, f64) {
        self(q, p)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl CoordinateTransform for Identity {
    fn source(&self, q: usize, p: usize) -> (f64, f64) {
        (q as f64, p as f64)
    }
}

/// Coordinate frame in which the rotation is evaluated. All three rotate
/// around the grid centre and agree on square grids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RotationConvention {
    /// Raw mesh indices.
    #[default]
    Absolute,
    /// Indices scaled per axis to `[-0.5, 0.5)`.
    Normalized,
    /// Indices scaled per axis to `[-1, 1)`.
    Centered,
}

impl From<RotationConventionSetting> for RotationConvention {
    fn from(setting: RotationConventionSetting) -> Self {
        match setting {
            RotationConventionSetting::Absolute => Self::Absolute,
            RotationConventionSetting::Normalized => Self::Normalized,
            RotationConventionSetting::Centered => Self::Centered,
        }
    }
}

/// Phase-space rotation by `angle` radians around the grid centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    shape: GridShape,
    angle: f64,
    convention: RotationConvention,
    cos: f64,
    sin: f64,
}

impl Rotation {
    pub fn new(shape: GridShape, angle: f64, convention: RotationConvention) -> Self {
        Self {
            shape,
            angle,
            convention,
            cos: angle.cos(),
            sin: -angle.sin(),
        }
    }

    /// Rotation advancing one of `steps` equal steps per synchrotron period.
    pub fn per_step(
        shape: GridShape,
        steps: u32,
        convention: RotationConvention,
    ) -> HeritageResult<Self> {
        if steps == 0 {
            return Err(HeritageError::ZeroSteps);
        }
        Ok(Self::new(
            shape,
            std::f64::consts::TAU / f64::from(steps),
            convention,
        ))
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn convention(&self) -> RotationConvention {
        self.convention
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// The rotation undoing this one.
    pub fn inverse(&self) -> Self {
        Self::new(self.shape, -self.angle, self.convention)
    }

    #[inline]
    fn rotate(&self, u: f64, v: f64) -> (f64, f64) {
        (
            self.cos * u - self.sin * v,
            self.sin * u + self.cos * v,
        )
    }
}

impl CoordinateTransform for Rotation {
    fn source(&self, q: usize, p: usize) -> (f64, f64) {
        let sx = self.shape.size_x as f64;
        let sy = self.shape.size_y as f64;
        let (q, p) = (q as f64, p as f64);
        match self.convention {
            RotationConvention::Absolute => {
                let (u, v) = self.rotate(q - sx / 2.0, p - sy / 2.0);
                (u + sx / 2.0, v + sy / 2.0)
            }
            RotationConvention::Normalized => {
                let (u, v) = self.rotate(q / sx - 0.5, p / sy - 0.5);
                ((u + 0.5) * sx, (v + 0.5) * sy)
            }
            RotationConvention::Centered => {
                let (u, v) = self.rotate((2.0 * q - sx) / sx, (2.0 * p - sy) / sy);
                ((u + 1.0) * sx / 2.0, (v + 1.0) * sy / 2.0)
            }
        }
    }
}
