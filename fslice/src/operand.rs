/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Operands of bulk and comparison operations.
//!
//! Views, member projections, owning arrays and broadcast scalars all
//! take part in the same elementwise operations. [`Operand`] is the
//! seam between them: every operand addresses its elements by 1-based
//! coordinates in its own shape, regardless of where its index range
//! starts, so two operands line up element for element exactly when
//! their per-axis sizes agree.

use crate::dim::SliceError;
use crate::dim::violated;
use crate::layout::Layout;

/// A readable rank-`N` operand.
pub trait Operand<const N: usize> {
    type Elem: Copy;

    /// Per-axis sizes, or `None` for a broadcast scalar.
    fn shape(&self) -> Option<[i32; N]>;

    /// The element at 1-based coordinate `idx`.
    fn value(&self, idx: [i32; N]) -> Self::Elem;

    /// The memory the operand reads, if it reads any.
    fn footprint(&self) -> Option<Footprint<N>> {
        None
    }
}

/// An operand whose elements can be written through a shared
/// reference.
pub trait OperandMut<const N: usize>: Operand<N> {
    fn store(&self, idx: [i32; N], value: Self::Elem);
}

/// A value broadcast against every element of the other operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scalar<T>(pub T);

impl<T: Copy, const N: usize> Operand<N> for Scalar<T> {
    type Elem = T;

    fn shape(&self) -> Option<[i32; N]> {
        None
    }

    fn value(&self, _idx: [i32; N]) -> T {
        self.0
    }
}

/// The memory an operand touches and the geometry it touches it
/// with.
///
/// Two footprints are equal only for operands that read the same
/// elements in the same order; that is the identity bulk operations
/// short-circuit on. [`Footprint::overlaps`] is the conservative
/// aliasing test: it compares byte ranges, not individual elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint<const N: usize> {
    /// First byte touched.
    pub begin: usize,
    /// Last byte touched.
    pub end: usize,
    /// Address of the start of the buffer.
    pub origin: usize,
    pub layout: Layout<N>,
    /// Distinguishes projections of the same records; zero for direct
    /// element access.
    pub projection: usize,
}

impl<const N: usize> Footprint<N> {
    /// The footprint of `layout` over the buffer of `E` starting at
    /// `origin`, or `None` if the layout is empty.
    pub(crate) fn of<E>(origin: *const E, layout: Layout<N>, projection: usize) -> Option<Self> {
        let (lo, hi) = layout.extent()?;
        let elem = std::mem::size_of::<E>().max(1) as i64;
        let origin = origin as usize;
        Some(Self {
            begin: origin.wrapping_add_signed((lo * elem) as isize),
            end: origin.wrapping_add_signed(((hi + 1) * elem - 1) as isize),
            origin,
            layout,
            projection,
        })
    }

    pub fn overlaps<const M: usize>(&self, other: &Footprint<M>) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }
}

/// Whether `a` and `b` have equal per-axis sizes. Lower bounds and
/// strides do not matter; a broadcast scalar conforms with anything.
///
/// Both operands share the rank `N`, so a [`Scalar`] on either side
/// takes the rank of the other operand.
pub fn conformable<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N> + ?Sized,
{
    match (a.shape(), b.shape()) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

/// Whether `a` and `b` have equal rank and equal per-axis sizes, for
/// operands whose ranks may differ. A [`Scalar`] operand needs its rank
/// spelled out here; [`conformable`] infers it.
pub fn equal_dimensions<A, B, const N: usize, const M: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<M> + ?Sized,
{
    match (a.shape(), b.shape()) {
        (Some(x), Some(y)) => N == M && x[..] == y[..],
        _ => true,
    }
}

/// Assert that `a` and `b` conform and return the shape both are
/// traversed in.
#[track_caller]
pub(crate) fn assert_conformable<A, B, const N: usize>(a: &A, b: &B) -> [i32; N]
where
    A: Operand<N> + ?Sized,
    B: Operand<N> + ?Sized,
{
    match (a.shape(), b.shape()) {
        (Some(x), Some(y)) => {
            if x != y {
                violated(SliceError::NotConformable {
                    lhs: x.to_vec(),
                    rhs: y.to_vec(),
                });
            }
            x
        }
        (Some(x), None) | (None, Some(x)) => x,
        (None, None) => [1; N],
    }
}

/// Whether `a` and `b` are the same operand.
pub(crate) fn same<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N> + ?Sized,
{
    match (a.footprint(), b.footprint()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
