/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Strided multidimensional array views with Fortran semantics.
//!
//! Provides [`View`], a non-owning rank-`N` window onto a buffer,
//! described by one multiplier per axis and a base constant. See
//! [`View`] for more details.
//!
//! Views are indexed from 1 on every axis. Sectioning a view with a
//! mix of indices and strided ranges ([`View::section`], [`s!`])
//! produces a view whose rank is the number of ranges, without copying
//! any data. Whole-view assignment ([`BulkAssign`]) and comparison
//! ([`compare`]) behave as if the entire right-hand side were read
//! before anything is written, even when the operands share memory.
//!
//! ```
//! use fslice::Array;
//! use fslice::BulkAssign;
//! use fslice::Range;
//! use fslice::View;
//! use fslice::compare;
//! use fslice::s;
//!
//! let mut a = Array::from_fn([4, 4], |[i, j]| 10 * i + j);
//! let v = a.view();
//!
//! // Mirror the upper half onto the lower half, in place.
//! let upper: View<'_, i32, 2> = v.section(s![1..=2, ..]);
//! let lower: View<'_, i32, 2> = v.section(s![Range::new(4, 3).by(-1), ..]);
//! lower.assign(&upper);
//! assert!(compare::eq(&lower, &upper));
//! assert_eq!(a[[4, 3]], 13);
//! ```

mod array;
mod assign;
mod dim;
mod iter;
mod layout;
mod member;
mod operand;
mod range;
mod view;

#[cfg(test)]
mod strategy;

/// Elementwise comparisons reduced to a single answer.
pub mod compare;

/// Owning column-major arrays with arbitrary lower bounds.
pub use array::Array;
/// The declared index range of one array axis.
pub use array::IndexRange;
/// Bulk assignment with alias-safe semantics.
pub use assign::BulkAssign;
pub use dim::Dim;
/// Errors from view construction and sectioning.
pub use dim::SliceError;
pub use dim::index_offset;
/// Column-major coordinate iteration.
pub use iter::Indices;
pub use layout::Layout;
/// A view of one field of every record.
pub use member::Member;
pub use operand::Footprint;
pub use operand::Operand;
pub use operand::OperandMut;
pub use operand::Scalar;
pub use operand::conformable;
pub use operand::equal_dimensions;
/// A strided `lo:hi:stride` range.
pub use range::Range;
pub use range::Subscript;
pub use view::View;
