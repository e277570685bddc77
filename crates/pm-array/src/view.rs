// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::ops::{Index, IndexMut};

use crate::access::{ArrayAccess, ArrayAccessMut, ArrayState};
use crate::error::{ArrayError, ArrayResult};
use crate::shape::Shape;

/// Read-only array over memory owned by someone else.
#[derive(Clone, Copy, Debug)]
pub struct ArrayView<'a, T, const N: usize> {
    shape: Shape<N>,
    data: &'a [T],
}

/// Mutable array over memory owned by someone else.
#[derive(Debug)]
pub struct ArrayViewMut<'a, T, const N: usize> {
    shape: Shape<N>,
    data: &'a mut [T],
}

fn fitted_len<const N: usize>(shape: &Shape<N>, available: usize) -> ArrayResult<usize> {
    let needed = shape.len();
    if available < needed {
        return Err(ArrayError::DataLength {
            expected: needed,
            got: available,
        });
    }
    Ok(needed)
}

impl<'a, T: Copy, const N: usize> ArrayView<'a, T, N> {
    /// Interprets the leading `shape.len()` elements of `data` as an array.
    pub fn dimension(shape: impl Into<Shape<N>>, data: &'a [T]) -> ArrayResult<Self> {
        let shape = shape.into();
        let len = fitted_len(&shape, data.len())?;
        Ok(Self::from_parts(shape, &data[..len]))
    }

    pub(crate) fn from_parts(shape: Shape<N>, data: &'a [T]) -> Self {
        Self { shape, data }
    }
}

impl<'a, T: Copy, const N: usize> ArrayViewMut<'a, T, N> {
    pub fn dimension(shape: impl Into<Shape<N>>, data: &'a mut [T]) -> ArrayResult<Self> {
        let shape = shape.into();
        let len = fitted_len(&shape, data.len())?;
        Ok(Self::from_parts(shape, &mut data[..len]))
    }

    pub(crate) fn from_parts(shape: Shape<N>, data: &'a mut [T]) -> Self {
        Self { shape, data }
    }
}

impl<T: Copy, const N: usize> ArrayAccess<T, N> for ArrayView<'_, T, N> {
    fn shape(&self) -> &Shape<N> {
        &self.shape
    }

    fn as_slice(&self) -> &[T] {
        self.data
    }

    fn state(&self) -> ArrayState {
        ArrayState::Viewing
    }
}

impl<T: Copy, const N: usize> ArrayAccess<T, N> for ArrayViewMut<'_, T, N> {
    fn shape(&self) -> &Shape<N> {
        &self.shape
    }

    fn as_slice(&self) -> &[T] {
        &*self.data
    }

    fn state(&self) -> ArrayState {
        ArrayState::Viewing
    }
}

impl<T: Copy, const N: usize> ArrayAccessMut<T, N> for ArrayViewMut<'_, T, N> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }
}

impl<T: Copy, const N: usize> Index<[isize; N]> for ArrayView<'_, T, N> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: [isize; N]) -> &T {
        self.at(index)
    }
}

impl<T: Copy, const N: usize> Index<[isize; N]> for ArrayViewMut<'_, T, N> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: [isize; N]) -> &T {
        self.at(index)
    }
}

impl<T: Copy, const N: usize> IndexMut<[isize; N]> for ArrayViewMut<'_, T, N> {
    #[track_caller]
    fn index_mut(&mut self, index: [isize; N]) -> &mut T {
        self.at_mut(index)
    }
}

impl<'a, T: Copy, const N: usize> IntoIterator for ArrayView<'a, T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, 'b, T: Copy, const N: usize> IntoIterator for &'b mut ArrayViewMut<'a, T, N> {
    type Item = &'b mut T;
    type IntoIter = std::slice::IterMut<'b, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_truncate_to_the_shape() {
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let view = ArrayView::dimension([2, 3], &data).unwrap();
        assert_eq!(view.len(), 6);
        assert_eq!(view[[1, 0]], 4.0);
        assert_eq!(view.state(), ArrayState::Viewing);

        let short = ArrayView::<f32, 2>::dimension([4, 2], &data).unwrap_err();
        assert_eq!(short, ArrayError::DataLength { expected: 8, got: 7 });
    }

    #[test]
    fn mutable_views_write_through() {
        let mut data = vec![0i32; 6];
        {
            let mut view = ArrayViewMut::dimension(Shape::with_offsets([2, 3], [1, -1]), &mut data)
                .unwrap();
            view[[2, 1]] = 9;
            view += 1;
            *view.get_mut([1, -1]).unwrap() = -5;
        }
        assert_eq!(data, vec![-5, 1, 1, 1, 1, 10]);
    }
}
