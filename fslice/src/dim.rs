/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Per-axis section arithmetic.
//!
//! Sectioning a view works one axis at a time. For an axis with upper
//! bound `U` and multiplier `M`:
//!
//! - a single index `i` contributes the constant `M * i` and the axis
//!   disappears ([`index_offset`]);
//! - a range `lo:hi:s` yields a new axis ([`Dim`]) of
//!   `max(0, ⌊(hi - lo) / s⌋ + 1)` elements with multiplier `M * s`.
//!   Element `j` of the new axis sits at parent index
//!   `lo + (j - 1) * s`, so the axis contributes the constant
//!   `M * (lo - s)`.

use serde::Deserialize;
use serde::Serialize;

use crate::range::Range;

/// Whether section arguments are checked against axis bounds.
pub(crate) const BOUNDS_CHECK: bool = cfg!(any(debug_assertions, feature = "bounds-check"));

/// Contract violations. Fallible constructors return these; hot-path
/// operations panic with their message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
    #[error("index {index} out of range 1:{upper} on axis {axis}")]
    IndexOutOfRange { axis: usize, index: i32, upper: i32 },

    #[error("range {range} out of range 1:{upper} on axis {axis}")]
    RangeOutOfRange { axis: usize, range: Range, upper: i32 },

    #[error("zero stride in range {range} on axis {axis}")]
    ZeroStride { axis: usize, range: Range },

    #[error("range {range} runs against its stride on axis {axis}")]
    InvertedRange { axis: usize, range: Range },

    #[error("section keeps {got} axes, expected {expected}")]
    RankMismatch { expected: usize, got: usize },

    #[error("operands not conformable: {lhs:?} vs {rhs:?}")]
    NotConformable { lhs: Vec<i32>, rhs: Vec<i32> },

    #[error("addresses {begin}..={end} outside buffer of length {len}")]
    OutOfBuffer { begin: i64, end: i64, len: usize },

    #[error("shape {shape:?} holds {expected} elements, buffer has {len}")]
    ShapeMismatch {
        shape: Vec<i32>,
        expected: usize,
        len: usize,
    },

    #[error("sequence of {got} values assigned to {expected} elements")]
    ValueCount { expected: usize, got: usize },

    #[error("division by zero element")]
    DivideByZero,
}

/// Fail a contract.
#[track_caller]
pub(crate) fn violated(err: SliceError) -> ! {
    panic!("contract violation: {}", err)
}

/// The descriptor of one range-sectioned axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dim {
    /// Upper bound (and element count) of the new axis.
    pub size: i32,
    /// Multiplier of the new axis.
    pub multiplier: i64,
    /// Contribution to the base constant.
    pub offset: i64,
}

impl Dim {
    /// Section axis `axis` (1-based, for error reporting) of upper
    /// bound `upper` and multiplier `multiplier` by `range`.
    pub fn new(axis: usize, upper: i32, range: &Range, multiplier: i64) -> Result<Self, SliceError> {
        let (lo, hi, stride) = range.resolve(upper);
        if stride == 0 {
            return Err(SliceError::ZeroStride {
                axis,
                range: *range,
            });
        }

        // Widened so that no range over i32 indices can overflow.
        let (lo, hi, stride) = (i64::from(lo), i64::from(hi), i64::from(stride));
        let size = (floor_div(hi - lo, stride) + 1).max(0);
        if size == 0 {
            // Only the zero-trip form `lo = hi + stride` (e.g. `k+1:k`)
            // may be empty, unless the emptiness comes from the axis
            // itself: an omitted end or an empty axis.
            let from_axis = range.lo.is_none() || range.hi.is_none() || upper == 0;
            if lo != hi + stride && !from_axis {
                return Err(SliceError::InvertedRange {
                    axis,
                    range: *range,
                });
            }
        } else if BOUNDS_CHECK {
            let last = lo + (size - 1) * stride;
            let axis_range = 1..=i64::from(upper);
            if !axis_range.contains(&lo) || !axis_range.contains(&last) {
                return Err(SliceError::RangeOutOfRange {
                    axis,
                    range: *range,
                    upper,
                });
            }
        }

        Ok(Self {
            size: i32::try_from(size).map_err(|_| SliceError::RangeOutOfRange {
                axis,
                range: *range,
                upper,
            })?,
            multiplier: multiplier * stride,
            offset: multiplier * (lo - stride),
        })
    }
}

/// The constant contributed by fixing axis `axis` at `index`.
pub fn index_offset(axis: usize, upper: i32, index: i32, multiplier: i64) -> Result<i64, SliceError> {
    if BOUNDS_CHECK && !in_range(upper, index) {
        return Err(SliceError::IndexOutOfRange { axis, index, upper });
    }
    Ok(multiplier * i64::from(index))
}

pub(crate) fn in_range(upper: i32, index: i32) -> bool {
    1 <= index && index <= upper
}

// ⌊a / b⌋ for b ≠ 0.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}
