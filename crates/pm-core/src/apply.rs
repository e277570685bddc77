// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Per-cell evaluation of a stencil row.
//!
//! Every backend must agree with these functions: entries are accumulated in
//! row order, then the optional clamp is applied.

use crate::stencil::StencilEntry;

/// Weighted sum of the row's sources, in row order.
#[inline]
pub fn stencil_sum(row: &[StencilEntry], input: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    for entry in row {
        acc += input[entry.source as usize] * entry.weight;
    }
    acc
}

/// Clamps `value` to the range spanned by the live ring samples.
///
/// Ring entries with zero weight do not bound the clamp. If none is live the
/// value is returned unchanged, so empty rows stay exactly zero.
#[inline]
pub fn saturate(value: f32, row: &[StencilEntry], input: &[f32], ring: &[usize]) -> f32 {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &position in ring {
        let entry = row[position];
        if entry.weight != 0.0 {
            let sample = input[entry.source as usize];
            lo = lo.min(sample);
            hi = hi.max(sample);
        }
    }
    if lo <= hi {
        value.clamp(lo, hi)
    } else {
        value
    }
}

/// Output value of one target cell.
#[inline]
pub fn apply_row(row: &[StencilEntry], input: &[f32], ring: Option<&[usize]>) -> f32 {
    let value = stencil_sum(row, input);
    match ring {
        Some(ring) => saturate(value, row, input, ring),
        None => value,
    }
}
