// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::error::{ArrayError, ArrayResult};

/// Fixed-length heap block whose start address is a multiple of `alignment`.
///
/// The layout used for allocation is rebuilt from `(len, alignment)` on drop,
/// so a buffer is always released by the allocator that produced it.
pub struct AlignedBuffer<T> {
    ptr: NonNull<T>,
    len: usize,
    alignment: usize,
}

// SAFETY: the buffer uniquely owns its elements, like `Vec<T>`.
unsafe impl<T: Send> Send for AlignedBuffer<T> {}
unsafe impl<T: Sync> Sync for AlignedBuffer<T> {}

impl<T: Copy + Default> AlignedBuffer<T> {
    /// Allocates `len` default-initialised elements.
    ///
    /// `alignment == 0` selects the natural alignment of `T`; any other value
    /// must be a power of two and is raised to at least `align_of::<T>()`.
    pub fn new(len: usize, alignment: usize) -> ArrayResult<Self> {
        let buffer = Self::uninit(len, alignment)?;
        for index in 0..len {
            unsafe {
                buffer.ptr.as_ptr().add(index).write(T::default());
            }
        }
        Ok(buffer)
    }

    pub fn from_slice(data: &[T], alignment: usize) -> ArrayResult<Self> {
        let buffer = Self::uninit(data.len(), alignment)?;
        if !data.is_empty() {
            unsafe {
                ptr::copy_nonoverlapping(data.as_ptr(), buffer.ptr.as_ptr(), data.len());
            }
        }
        Ok(buffer)
    }

    fn uninit(len: usize, alignment: usize) -> ArrayResult<Self> {
        let alignment = effective_alignment::<T>(alignment)?;
        let bytes = len
            .checked_mul(mem::size_of::<T>())
            .ok_or(ArrayError::MemoryExceeded { bytes: usize::MAX })?;
        if bytes == 0 {
            return Ok(Self {
                ptr: dangling(alignment),
                len,
                alignment,
            });
        }
        let layout = Layout::from_size_align(bytes, alignment)
            .map_err(|_| ArrayError::MemoryExceeded { bytes })?;
        let raw = unsafe { alloc(layout) };
        let ptr = NonNull::new(raw as *mut T).ok_or(ArrayError::MemoryExceeded { bytes })?;
        Ok(Self {
            ptr,
            len,
            alignment,
        })
    }
}

impl<T> AlignedBuffer<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte alignment guaranteed for the start of the block.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    fn byte_len(&self) -> usize {
        self.len * mem::size_of::<T>()
    }

    fn layout(&self) -> Layout {
        // SAFETY: validated by `Layout::from_size_align` when allocating.
        unsafe { Layout::from_size_align_unchecked(self.byte_len(), self.alignment) }
    }
}

impl<T> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        if self.byte_len() != 0 {
            unsafe {
                dealloc(self.ptr.as_ptr() as *mut u8, self.layout());
            }
        }
    }
}

impl<T: Copy + Default> Clone for AlignedBuffer<T> {
    fn clone(&self) -> Self {
        match Self::from_slice(self.as_slice(), self.alignment) {
            Ok(buffer) => buffer,
            Err(_) => handle_alloc_error(self.layout()),
        }
    }
}

impl<T> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("alignment", &self.alignment)
            .finish()
    }
}

fn effective_alignment<T>(requested: usize) -> ArrayResult<usize> {
    let natural = mem::align_of::<T>();
    if requested == 0 {
        return Ok(natural);
    }
    if !requested.is_power_of_two() {
        return Err(ArrayError::InvalidAlignment {
            alignment: requested,
        });
    }
    Ok(requested.max(natural))
}

fn dangling<T>(alignment: usize) -> NonNull<T> {
    // A non-zero power of two is a valid, suitably aligned dangling address.
    NonNull::new(alignment as *mut T).unwrap_or(NonNull::dangling())
}

pub fn is_ptr_aligned<T>(ptr: *const T, alignment: usize) -> bool {
    alignment != 0 && (ptr as usize) % alignment == 0
}
