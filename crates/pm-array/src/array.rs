// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::ops::{AddAssign, DivAssign, Index, IndexMut, MulAssign, SubAssign};

use crate::access::{ArrayAccess, ArrayAccessMut, ArrayState};
use crate::error::{ArrayError, ArrayResult};
use crate::memory::AlignedBuffer;
use crate::shape::Shape;
use crate::temporary::Temporary;
use crate::view::{ArrayView, ArrayViewMut};

/// Owning row-major array of rank `N` over an aligned heap block.
#[derive(Debug)]
pub struct Array<T, const N: usize> {
    shape: Shape<N>,
    buffer: Option<AlignedBuffer<T>>,
    alignment: usize,
}

pub type Array1<T> = Array<T, 1>;
pub type Array2<T> = Array<T, 2>;
pub type Array3<T> = Array<T, 3>;
pub type Array4<T> = Array<T, 4>;
pub type Array5<T> = Array<T, 5>;

impl<T: Copy + Default, const N: usize> Clone for Array<T, N> {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape,
            buffer: self.buffer.clone(),
            alignment: self.alignment,
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for Array<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize> Array<T, N> {
    /// An unallocated array; it adopts a shape on first `assign`.
    pub const fn new() -> Self {
        Self {
            shape: Shape::empty(),
            buffer: None,
            alignment: 0,
        }
    }

    /// Allocates default-initialised storage. `alignment == 0` selects the
    /// natural alignment of `T`.
    pub fn allocate(shape: impl Into<Shape<N>>, alignment: usize) -> ArrayResult<Self> {
        let shape = shape.into();
        let buffer = AlignedBuffer::new(shape.len(), alignment)?;
        Ok(Self {
            shape,
            buffer: Some(buffer),
            alignment,
        })
    }

    pub fn zeros(shape: impl Into<Shape<N>>) -> ArrayResult<Self> {
        Self::allocate(shape, 0)
    }

    pub fn from_vec(shape: impl Into<Shape<N>>, data: Vec<T>, alignment: usize) -> ArrayResult<Self> {
        let shape = shape.into();
        if data.len() != shape.len() {
            return Err(ArrayError::DataLength {
                expected: shape.len(),
                got: data.len(),
            });
        }
        let buffer = AlignedBuffer::from_slice(&data, alignment)?;
        Ok(Self {
            shape,
            buffer: Some(buffer),
            alignment,
        })
    }

    /// Releases the current storage, then allocates for `shape`.
    ///
    /// On failure the array is left unallocated.
    pub fn reallocate(&mut self, shape: impl Into<Shape<N>>, alignment: usize) -> ArrayResult<()> {
        self.release();
        let shape = shape.into();
        self.buffer = Some(AlignedBuffer::new(shape.len(), alignment)?);
        self.shape = shape;
        self.alignment = alignment;
        Ok(())
    }

    pub fn release(&mut self) {
        self.buffer = None;
        self.shape = Shape::empty();
    }

    /// Requested byte alignment; `0` means natural alignment.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    pub fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }

    /// Copies `other` into this array. An unallocated array first takes the
    /// shape of `other`; an allocated one must already match it.
    pub fn assign<S: ArrayAccess<T, N> + ?Sized>(&mut self, other: &S) -> ArrayResult<()> {
        match &mut self.buffer {
            None => {
                let buffer = AlignedBuffer::from_slice(other.as_slice(), self.alignment)?;
                self.shape = *other.shape();
                self.buffer = Some(buffer);
            }
            Some(buffer) => {
                self.shape.ensure_matches(other.shape())?;
                buffer.as_mut_slice().copy_from_slice(other.as_slice());
            }
        }
        Ok(())
    }

    /// Takes over the storage of `tmp` when its alignment satisfies this
    /// array, copying otherwise. `tmp` is consumed either way.
    pub fn assign_temporary(&mut self, tmp: Temporary<T, N>) -> ArrayResult<()> {
        if self.buffer.is_some() {
            self.shape.ensure_matches(tmp.shape())?;
        }
        let (shape, buffer, requested) = tmp.into_parts();
        if buffer.alignment() >= self.required_alignment() {
            self.alignment = self.alignment.max(requested);
            self.shape = shape;
            self.buffer = Some(buffer);
            return Ok(());
        }
        match &mut self.buffer {
            Some(own) => own.as_mut_slice().copy_from_slice(buffer.as_slice()),
            None => {
                self.buffer = Some(AlignedBuffer::from_slice(buffer.as_slice(), self.alignment)?);
                self.shape = shape;
            }
        }
        Ok(())
    }

    /// Copies a flat rank-1 array into this one. Only rank 1 has an
    /// unambiguous target layout.
    pub fn reshape_from_flat(&mut self, flat: &Array1<T>) -> ArrayResult<()> {
        if N != 1 {
            return Err(ArrayError::Unsupported {
                op: "reshape_from_flat",
                rank: N,
            });
        }
        let dims = flat.shape().dims();
        let offsets = flat.shape().offsets();
        let mut target_dims = [0usize; N];
        let mut target_offsets = [0isize; N];
        target_dims[0] = dims[0];
        target_offsets[0] = offsets[0];
        let target = Shape::with_offsets(target_dims, target_offsets);
        if self.buffer.is_some() {
            self.shape.ensure_matches(&target)?;
            self.load_slice(flat.as_slice())
        } else {
            self.buffer = Some(AlignedBuffer::from_slice(flat.as_slice(), self.alignment)?);
            self.shape = target;
            Ok(())
        }
    }

    /// Wraps the storage so the next assignment can take it over.
    pub fn into_temporary(self) -> ArrayResult<Temporary<T, N>> {
        let buffer = self.buffer.ok_or(ArrayError::Unallocated)?;
        Ok(Temporary::from_parts(self.shape, buffer, self.alignment))
    }

    pub fn view(&self) -> ArrayView<'_, T, N> {
        ArrayView::from_parts(self.shape, self.as_slice())
    }

    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T, N> {
        let shape = self.shape;
        ArrayViewMut::from_parts(shape, self.as_mut_slice())
    }

    fn required_alignment(&self) -> usize {
        self.alignment.max(std::mem::align_of::<T>())
    }
}

impl<T: Copy, const N: usize> ArrayAccess<T, N> for Array<T, N> {
    fn shape(&self) -> &Shape<N> {
        &self.shape
    }

    fn as_slice(&self) -> &[T] {
        match &self.buffer {
            Some(buffer) => buffer.as_slice(),
            None => &[],
        }
    }

    fn state(&self) -> ArrayState {
        match (&self.buffer, self.alignment) {
            (None, _) => ArrayState::Unallocated,
            (Some(_), 0) => ArrayState::Owning,
            (Some(_), _) => ArrayState::AlignedOwning,
        }
    }
}

impl<T: Copy, const N: usize> ArrayAccessMut<T, N> for Array<T, N> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.buffer {
            Some(buffer) => buffer.as_mut_slice(),
            None => &mut [],
        }
    }
}

impl<T: Copy, const N: usize> Index<[isize; N]> for Array<T, N> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: [isize; N]) -> &T {
        self.at(index)
    }
}

impl<T: Copy, const N: usize> IndexMut<[isize; N]> for Array<T, N> {
    #[track_caller]
    fn index_mut(&mut self, index: [isize; N]) -> &mut T {
        self.at_mut(index)
    }
}

impl<'a, T: Copy, const N: usize> IntoIterator for &'a Array<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T: Copy, const N: usize> IntoIterator for &'a mut Array<T, N> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

macro_rules! scalar_assign {
    ($($trait:ident :: $method:ident),* $(,)?) => {
        $(
            impl<T: Copy + $trait, const N: usize> $trait<T> for Array<T, N> {
                fn $method(&mut self, rhs: T) {
                    for value in self.as_mut_slice() {
                        $trait::$method(value, rhs);
                    }
                }
            }

            impl<'a, T: Copy + $trait, const N: usize> $trait<T> for ArrayViewMut<'a, T, N> {
                fn $method(&mut self, rhs: T) {
                    for value in self.as_mut_slice() {
                        $trait::$method(value, rhs);
                    }
                }
            }
        )*
    };
}

scalar_assign!(
    AddAssign::add_assign,
    SubAssign::sub_assign,
    MulAssign::mul_assign,
    DivAssign::div_assign,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::is_ptr_aligned;

    #[test]
    fn states_follow_the_lifecycle() {
        let mut array = Array2::<f32>::new();
        assert_eq!(array.state(), ArrayState::Unallocated);
        array.reallocate([2, 2], 0).unwrap();
        assert_eq!(array.state(), ArrayState::Owning);
        array.reallocate([3, 3], 64).unwrap();
        assert_eq!(array.state(), ArrayState::AlignedOwning);
        assert_eq!(array.len(), 9);
        assert!(is_ptr_aligned(array.as_ptr(), 64));
        array.release();
        assert_eq!(array.state(), ArrayState::Unallocated);
    }

    #[test]
    fn assign_adopts_shape_when_unallocated() {
        let source = Array::from_vec([2, 3], vec![1, 2, 3, 4, 5, 6], 0).unwrap();
        let mut target = Array2::<i32>::new();
        target.assign(&source).unwrap();
        assert_eq!(target.dims(), [2, 3]);
        assert_eq!(target[[1, 2]], 6);

        let mut wrong = Array2::<i32>::zeros([3, 2]).unwrap();
        assert!(matches!(
            wrong.assign(&source),
            Err(ArrayError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn temporary_hands_over_storage() {
        let source = Array::from_vec([4], vec![1.0f32, 2.0, 3.0, 4.0], 64).unwrap();
        let ptr = source.as_ptr();
        let tmp = source.into_temporary().unwrap();
        let mut target = Array1::<f32>::allocate([4], 32).unwrap();
        target.assign_temporary(tmp).unwrap();
        assert_eq!(target.as_ptr(), ptr);
        assert_eq!(target.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(target.alignment(), 64);
    }

    #[test]
    fn unallocated_target_reports_adopted_alignment() {
        let source = Array2::<f32>::allocate([2, 2], 64).unwrap();
        let ptr = source.as_ptr();
        let mut target = Array2::<f32>::new();
        target.assign_temporary(source.into_temporary().unwrap()).unwrap();
        assert_eq!(target.as_ptr(), ptr);
        assert_eq!(target.state(), ArrayState::AlignedOwning);
        assert!(is_ptr_aligned(target.as_ptr(), target.alignment()));

        let natural = Array2::<f32>::allocate([2, 2], 0).unwrap();
        let mut target = Array2::<f32>::new();
        target.assign_temporary(natural.into_temporary().unwrap()).unwrap();
        assert_eq!(target.state(), ArrayState::Owning);
    }

    #[test]
    fn under_aligned_temporary_is_copied() {
        let source = Array::from_vec([3], vec![7u8, 8, 9], 0).unwrap();
        let ptr = source.as_ptr();
        let tmp = source.into_temporary().unwrap();
        let mut target = Array1::<u8>::allocate([3], 128).unwrap();
        target.assign_temporary(tmp).unwrap();
        assert_ne!(target.as_ptr(), ptr);
        assert!(is_ptr_aligned(target.as_ptr(), 128));
        assert_eq!(target.as_slice(), &[7, 8, 9]);
    }

    #[test]
    fn scalar_and_elementwise_arithmetic() {
        let mut array = Array::from_vec([2, 2], vec![1.0f64, 2.0, 3.0, 4.0], 0).unwrap();
        array += 1.0;
        array *= 2.0;
        assert_eq!(array.as_slice(), &[4.0, 6.0, 8.0, 10.0]);

        let other = Array::from_vec([2, 2], vec![1.0, 1.0, 2.0, 2.0], 0).unwrap();
        array.try_sub_assign(&other).unwrap();
        array.try_div_assign(&other).unwrap();
        assert_eq!(array.as_slice(), &[3.0, 5.0, 3.0, 4.0]);

        let mismatched = Array2::<f64>::zeros([2, 3]).unwrap();
        assert!(array.try_add_assign(&mismatched).is_err());
    }

    #[test]
    fn reductions() {
        let array = Array::from_vec([5], vec![3.0f32, -7.0, 2.5, 9.0, 0.0], 0).unwrap();
        assert_eq!(array.min().unwrap(), -7.0);
        assert_eq!(array.max().unwrap(), 9.0);
        assert!((array.l1() - 21.5).abs() < 1e-12);

        let empty = Array1::<f32>::zeros([0]).unwrap();
        assert_eq!(empty.min(), Err(ArrayError::Empty("minimum")));
    }

    #[test]
    fn outer_yields_contiguous_rows() {
        let array = Array::from_vec([3, 2], (0..6).collect(), 0).unwrap();
        assert_eq!(array.outer(1).unwrap(), &[2, 3]);
        assert!(array.outer(3).is_err());
    }

    #[test]
    fn reshape_from_flat_is_rank_one_only() {
        let flat = Array::from_vec([3], vec![1u16, 2, 3], 0).unwrap();
        let mut one = Array1::<u16>::new();
        one.reshape_from_flat(&flat).unwrap();
        assert_eq!(one.as_slice(), &[1, 2, 3]);

        let mut two = Array2::<u16>::zeros([3, 1]).unwrap();
        assert_eq!(
            two.reshape_from_flat(&flat),
            Err(ArrayError::Unsupported {
                op: "reshape_from_flat",
                rank: 2,
            })
        );
    }

    #[test]
    fn iterators_are_exact_and_reversible() {
        let mut array = Array::from_vec([2, 2], vec![1, 2, 3, 4], 0).unwrap();
        assert_eq!(array.iter().len(), 4);
        assert_eq!(array.iter().rev().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
        for value in &mut array {
            *value *= 10;
        }
        assert_eq!((&array).into_iter().sum::<i32>(), 100);
    }

    #[test]
    fn checked_get_never_panics() {
        let array = Array::from_vec([2, 2], vec![1, 2, 3, 4], 0).unwrap();
        let err = array.get([0, 2]).unwrap_err();
        assert_eq!(err.to_string(), "array2 index 2 is out of bounds (2 > 1)");
        assert!(Array2::<i32>::new().get([0, 0]).is_err());
    }

    #[cfg(any(debug_assertions, feature = "checked"))]
    #[test]
    #[should_panic(expected = "array2 index 1 is out of bounds (-1 < 0)")]
    fn index_panics_with_bounds_message() {
        let array = Array2::<f32>::zeros([2, 2]).unwrap();
        let _ = array[[-1, 0]];
    }
}
