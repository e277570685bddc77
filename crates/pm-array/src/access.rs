// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Indexing, loading and arithmetic shared by owning arrays and views.
//!
//! Every storage flavour only has to expose its [`Shape`] and a flat slice;
//! bounds checks and element-wise kernels live here once for all ranks.

use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use crate::error::{ArrayError, ArrayResult};
use crate::shape::{Shape, BOUNDS_CHECKED};

/// Lifecycle of the memory behind an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayState {
    Unallocated,
    /// Owns memory obtained with the natural alignment of the element type.
    Owning,
    /// Owns memory obtained with an explicitly requested alignment.
    AlignedOwning,
    /// Borrows memory owned elsewhere.
    Viewing,
    /// Owns memory that will be handed over on the next assignment.
    Temporary,
}

#[cold]
#[track_caller]
pub(crate) fn fault(err: ArrayError) -> ! {
    panic!("{err}")
}

/// Read access to a rank-`N` array.
pub trait ArrayAccess<T: Copy, const N: usize> {
    fn shape(&self) -> &Shape<N>;

    fn as_slice(&self) -> &[T];

    fn state(&self) -> ArrayState;

    fn dims(&self) -> [usize; N] {
        self.shape().dims()
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checked element access; never panics.
    fn get(&self, index: [isize; N]) -> ArrayResult<&T> {
        let flat = self.shape().checked_index(index)?;
        self.as_slice().get(flat).ok_or(ArrayError::Unallocated)
    }

    /// Element access that panics with the bounds fault when checks are
    /// compiled in. Without them only the flat position is validated.
    #[track_caller]
    fn at(&self, index: [isize; N]) -> &T {
        let flat = locate(self.shape(), index);
        &self.as_slice()[flat]
    }

    fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Contiguous block of all elements whose first index is `ix`.
    fn outer(&self, ix: isize) -> ArrayResult<&[T]> {
        let (start, width) = outer_range(self.shape(), ix)?;
        Ok(&self.as_slice()[start..start + width])
    }

    fn store_into(&self, out: &mut [T]) -> ArrayResult<()> {
        let data = self.as_slice();
        if out.len() != data.len() {
            return Err(ArrayError::DataLength {
                expected: data.len(),
                got: out.len(),
            });
        }
        out.copy_from_slice(data);
        Ok(())
    }

    fn min(&self) -> ArrayResult<T>
    where
        T: PartialOrd,
    {
        reduce(self.as_slice(), "minimum", |best, value| value < best)
    }

    fn max(&self) -> ArrayResult<T>
    where
        T: PartialOrd,
    {
        reduce(self.as_slice(), "maximum", |best, value| value > best)
    }

    /// Sum of absolute values accumulated in `f64`.
    fn l1(&self) -> f64
    where
        T: Into<f64>,
    {
        self.as_slice()
            .iter()
            .map(|value| (*value).into().abs())
            .sum()
    }
}

/// Write access to a rank-`N` array.
pub trait ArrayAccessMut<T: Copy, const N: usize>: ArrayAccess<T, N> {
    fn as_mut_slice(&mut self) -> &mut [T];

    fn get_mut(&mut self, index: [isize; N]) -> ArrayResult<&mut T> {
        let flat = self.shape().checked_index(index)?;
        self.as_mut_slice()
            .get_mut(flat)
            .ok_or(ArrayError::Unallocated)
    }

    #[track_caller]
    fn at_mut(&mut self, index: [isize; N]) -> &mut T {
        let flat = locate(self.shape(), index);
        &mut self.as_mut_slice()[flat]
    }

    fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    fn outer_mut(&mut self, ix: isize) -> ArrayResult<&mut [T]> {
        let (start, width) = outer_range(self.shape(), ix)?;
        Ok(&mut self.as_mut_slice()[start..start + width])
    }

    /// Sets every element to `value`.
    fn load_value(&mut self, value: T) -> ArrayResult<()> {
        if self.state() == ArrayState::Unallocated {
            return Err(ArrayError::Unallocated);
        }
        self.as_mut_slice().fill(value);
        Ok(())
    }

    /// Copies `data` element by element; its length must match exactly.
    fn load_slice(&mut self, data: &[T]) -> ArrayResult<()> {
        let dst = self.as_mut_slice();
        if dst.len() != data.len() {
            return Err(ArrayError::DataLength {
                expected: dst.len(),
                got: data.len(),
            });
        }
        dst.copy_from_slice(data);
        Ok(())
    }

    fn try_add_assign<R: ArrayAccess<T, N> + ?Sized>(&mut self, rhs: &R) -> ArrayResult<()>
    where
        T: AddAssign,
    {
        zip_apply::<T, N, Self, R, _>(self, rhs, |a, b| *a += b)
    }

    fn try_sub_assign<R: ArrayAccess<T, N> + ?Sized>(&mut self, rhs: &R) -> ArrayResult<()>
    where
        T: SubAssign,
    {
        zip_apply::<T, N, Self, R, _>(self, rhs, |a, b| *a -= b)
    }

    fn try_mul_assign<R: ArrayAccess<T, N> + ?Sized>(&mut self, rhs: &R) -> ArrayResult<()>
    where
        T: MulAssign,
    {
        zip_apply::<T, N, Self, R, _>(self, rhs, |a, b| *a *= b)
    }

    fn try_div_assign<R: ArrayAccess<T, N> + ?Sized>(&mut self, rhs: &R) -> ArrayResult<()>
    where
        T: DivAssign,
    {
        zip_apply::<T, N, Self, R, _>(self, rhs, |a, b| *a /= b)
    }
}

#[inline]
#[track_caller]
fn locate<const N: usize>(shape: &Shape<N>, index: [isize; N]) -> usize {
    if BOUNDS_CHECKED {
        match shape.checked_index(index) {
            Ok(flat) => flat,
            Err(err) => fault(err),
        }
    } else {
        shape.linear_index(index)
    }
}

fn outer_range<const N: usize>(shape: &Shape<N>, ix: isize) -> ArrayResult<(usize, usize)> {
    if N == 0 {
        return Err(ArrayError::Unsupported {
            op: "outer",
            rank: 0,
        });
    }
    let local = ix - shape.offsets()[0];
    if local < 0 || local as usize >= shape.dim(0) {
        return Err(shape.bounds_error(0, ix));
    }
    let width = shape.strides()[0];
    Ok((local as usize * width, width))
}

fn reduce<T: Copy>(
    data: &[T],
    label: &'static str,
    better: impl Fn(&T, &T) -> bool,
) -> ArrayResult<T> {
    let (first, rest) = data.split_first().ok_or(ArrayError::Empty(label))?;
    let mut best = *first;
    for value in rest {
        if better(&best, value) {
            best = *value;
        }
    }
    Ok(best)
}

fn zip_apply<T, const N: usize, L, R, F>(lhs: &mut L, rhs: &R, op: F) -> ArrayResult<()>
where
    T: Copy,
    F: Fn(&mut T, T),
    L: ArrayAccessMut<T, N> + ?Sized,
    R: ArrayAccess<T, N> + ?Sized,
{
    if lhs.shape().dims() != rhs.shape().dims() {
        return Err(ArrayError::ShapeMismatch {
            left: lhs.shape().dims().to_vec(),
            right: rhs.shape().dims().to_vec(),
        });
    }
    for (dst, src) in lhs.as_mut_slice().iter_mut().zip(rhs.as_slice()) {
        op(dst, *src);
    }
    Ok(())
}
