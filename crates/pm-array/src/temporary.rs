// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use crate::access::{ArrayAccess, ArrayAccessMut, ArrayState};
use crate::memory::AlignedBuffer;
use crate::shape::Shape;

/// Storage waiting to be moved into an [`Array`](crate::Array).
///
/// Produced by [`Array::into_temporary`](crate::Array::into_temporary) and
/// consumed by [`Array::assign_temporary`](crate::Array::assign_temporary).
#[derive(Debug)]
pub struct Temporary<T, const N: usize> {
    shape: Shape<N>,
    buffer: AlignedBuffer<T>,
    requested: usize,
}

impl<T, const N: usize> Temporary<T, N> {
    pub(crate) fn from_parts(shape: Shape<N>, buffer: AlignedBuffer<T>, requested: usize) -> Self {
        Self {
            shape,
            buffer,
            requested,
        }
    }

    pub(crate) fn into_parts(self) -> (Shape<N>, AlignedBuffer<T>, usize) {
        (self.shape, self.buffer, self.requested)
    }

    /// Alignment requested by the array this storage came from.
    pub fn alignment(&self) -> usize {
        self.requested
    }
}

impl<T: Copy, const N: usize> ArrayAccess<T, N> for Temporary<T, N> {
    fn shape(&self) -> &Shape<N> {
        &self.shape
    }

    fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    fn state(&self) -> ArrayState {
        ArrayState::Temporary
    }
}

impl<T: Copy, const N: usize> ArrayAccessMut<T, N> for Temporary<T, N> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self.buffer.as_mut_slice()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Array, ArrayAccess, ArrayAccessMut, ArrayState};

    #[test]
    fn temporaries_report_their_state() {
        let array = crate::Array2::<f32>::allocate([2, 2], 16).unwrap();
        let mut tmp = array.into_temporary().unwrap();
        assert_eq!(tmp.state(), ArrayState::Temporary);
        tmp.load_value(3.0).unwrap();
        assert_eq!(tmp.alignment(), 16);

        let mut target = Array::<f32, 2>::new();
        target.assign_temporary(tmp).unwrap();
        assert_eq!(target.as_slice(), &[3.0; 4]);
        assert_eq!(target.state(), ArrayState::AlignedOwning);
        assert_eq!(target.alignment(), 16);
    }

    #[test]
    fn unallocated_arrays_have_no_temporary() {
        assert!(Array::<u8, 1>::new().into_temporary().is_err());
    }
}
