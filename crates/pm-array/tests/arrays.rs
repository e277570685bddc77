// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use approx::assert_relative_eq;
use pm_array::{
    is_ptr_aligned, Array, Array2, Array3, ArrayAccess, ArrayAccessMut, ArrayError, ArrayState,
    ArrayView, Shape,
};

#[test]
fn centred_mesh_accepts_negative_indices() {
    let mut mesh = Array2::<f64>::allocate(Shape::with_offsets([5, 5], [-2, -2]), 64).unwrap();
    for q in -2..=2isize {
        for p in -2..=2isize {
            mesh[[q, p]] = (q * q + p * p) as f64;
        }
    }
    assert_relative_eq!(mesh[[0, 0]], 0.0);
    assert_relative_eq!(mesh[[-2, 2]], 8.0);
    assert_relative_eq!(mesh.max().unwrap(), 8.0);
    assert_relative_eq!(mesh.l1(), 100.0);

    let err = mesh.get([3, 0]).unwrap_err();
    assert_eq!(err.to_string(), "array2 index 1 is out of bounds (3 > 2)");
    let err = mesh.get([0, -3]).unwrap_err();
    assert_eq!(err.to_string(), "array2 index 2 is out of bounds (-3 < -2)");
}

#[test]
fn rank_three_outer_slabs_are_contiguous() {
    let data: Vec<u32> = (0..24).collect();
    let cube = Array::from_vec([2, 3, 4], data, 32).unwrap();
    assert!(is_ptr_aligned(cube.as_ptr(), 32));
    assert_eq!(cube.outer(1).unwrap(), &(12..24).collect::<Vec<_>>()[..]);
    assert_eq!(cube[[1, 2, 3]], 23);
}

#[test]
fn views_combine_with_owned_arrays() {
    let external = vec![1.0f32; 6];
    let view = ArrayView::dimension([2, 3], &external).unwrap();

    let mut owned = Array2::<f32>::zeros([2, 3]).unwrap();
    owned.load_value(2.0).unwrap();
    owned.try_mul_assign(&view).unwrap();
    owned.try_add_assign(&view).unwrap();
    assert!(owned.iter().all(|value| *value == 3.0));

    let mut store = vec![0.0f32; 6];
    owned.store_into(&mut store).unwrap();
    assert_eq!(store, vec![3.0; 6]);

    let mut wrong = vec![0.0f32; 5];
    assert_eq!(
        owned.store_into(&mut wrong),
        Err(ArrayError::DataLength { expected: 6, got: 5 })
    );
}

#[test]
fn assign_copies_between_states() {
    let external = [4i64, 5, 6, 7];
    let view = ArrayView::dimension([2, 2], &external).unwrap();
    let mut owned = Array2::<i64>::new();
    owned.assign(&view).unwrap();
    assert_eq!(owned.state(), ArrayState::Owning);
    assert_ne!(owned.as_ptr(), external.as_ptr());
    assert_eq!(owned[[1, 1]], 7);

    let copy = owned.clone();
    owned += 1;
    assert_eq!(copy[[0, 0]], 4);
    assert_eq!(owned[[0, 0]], 5);
}

#[test]
fn unallocated_arrays_reject_loads() {
    let mut array = Array3::<f32>::new();
    assert_eq!(array.load_value(1.0), Err(ArrayError::Unallocated));
    assert!(array.is_empty());
}

#[test]
fn invalid_alignment_is_reported() {
    let err = Array2::<f32>::allocate([4, 4], 48).unwrap_err();
    assert_eq!(err, ArrayError::InvalidAlignment { alignment: 48 });
}
