// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use thiserror::Error;

/// Result alias used throughout the array crate.
pub type ArrayResult<T> = Result<T, ArrayError>;

/// Faults raised by array construction, indexing and arithmetic.
///
/// All of them describe caller bugs or exhausted resources; none is retried.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// An index fell outside the declared extent of one axis. `axis` is
    /// 1-based and the bounds already include the axis offset.
    #[error(
        "array{rank} index {axis} is out of bounds ({})",
        describe_bounds(.value, .lower, .upper)
    )]
    Bounds {
        rank: usize,
        axis: usize,
        value: isize,
        lower: isize,
        upper: Option<isize>,
    },
    /// A binary operation combined arrays of different shapes.
    #[error("shape mismatch: left={left:?}, right={right:?} cannot be combined")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
    /// Axis offsets differ between otherwise matching arrays.
    #[error("offset mismatch: left={left:?}, right={right:?}")]
    OffsetMismatch { left: Vec<isize>, right: Vec<isize> },
    /// The requested byte alignment is not a power of two.
    #[error("invalid alignment requested ({alignment} bytes)")]
    InvalidAlignment { alignment: usize },
    /// The allocator could not provide the requested block.
    #[error("memory limits exceeded ({bytes} bytes requested)")]
    MemoryExceeded { bytes: usize },
    /// A buffer handed to a constructor does not match the shape.
    #[error("data length mismatch: expected {expected}, got {got}")]
    DataLength { expected: usize, got: usize },
    /// The operation has no meaning for arrays of this rank.
    #[error("operation `{op}` is not supported for rank-{rank} arrays")]
    Unsupported { op: &'static str, rank: usize },
    #[error("operation attempted on unallocated array")]
    Unallocated,
    #[error("cannot take {0} of empty array")]
    Empty(&'static str),
}

fn describe_bounds(value: &isize, lower: &isize, upper: &Option<isize>) -> String {
    match upper {
        None => format!("{value} index given to empty array"),
        Some(_) if value < lower => format!("{value} < {lower}"),
        Some(upper) => format!("{value} > {upper}"),
    }
}
