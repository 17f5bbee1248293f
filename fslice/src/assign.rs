/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Whole-section assignment and compound assignment.
//!
//! Every operation here has array-expression semantics: the result is
//! as if the entire source were read before any destination element
//! was written, even when source and destination share memory. Most
//! calls cannot alias and stream element by element; when the
//! footprints of source and destination intersect, the source is first
//! read into a temporary buffer.
//!
//! ```
//! use fslice::Array;
//! use fslice::BulkAssign;
//! use fslice::View;
//! use fslice::s;
//!
//! let mut a = Array::from_fn([6], |[i]| i);
//! let v = a.view();
//! let hi: View<'_, i32, 1> = v.section(s![2..=6]);
//! hi.assign(&v.section::<1>(s![1..=5]));
//! assert_eq!(a.as_slice(), &[1, 1, 2, 3, 4, 5]);
//! ```

use std::ops::Add;
use std::ops::AddAssign;
use std::ops::BitAnd;
use std::ops::BitOr;
use std::ops::Div;
use std::ops::DivAssign;
use std::ops::Mul;
use std::ops::MulAssign;
use std::ops::Sub;
use std::ops::SubAssign;

use num_traits::Zero;

use crate::dim::SliceError;
use crate::dim::violated;
use crate::iter::Indices;
use crate::operand::Operand;
use crate::operand::OperandMut;
use crate::operand::Scalar;
use crate::operand::assert_conformable;
use crate::operand::same;
use crate::view::View;

/// Bulk operations on a writable operand. Implemented for every
/// [`OperandMut`].
///
/// All operations panic if the source does not conform to `self`
/// (see [`crate::conformable`]). Elements are visited with axis 1
/// varying fastest.
pub trait BulkAssign<const N: usize>: OperandMut<N> {
    /// `self = src`.
    #[track_caller]
    fn assign<S>(&self, src: &S)
    where
        S: Operand<N, Elem = Self::Elem> + ?Sized,
    {
        assert_conformable(self, src);
        if same(self, src) {
            return;
        }
        store_all(self, src, "assign", |s| s);
    }

    /// `self = src`, converting each source element into `Self::Elem`.
    #[track_caller]
    fn assign_from<S>(&self, src: &S)
    where
        S: Operand<N> + ?Sized,
        S::Elem: Into<Self::Elem>,
    {
        store_all(self, src, "assign_from", |s| s.into());
    }

    /// `self = self + src`.
    #[track_caller]
    fn assign_add<S>(&self, src: &S)
    where
        S: Operand<N, Elem = Self::Elem> + ?Sized,
        Self::Elem: Add<Output = Self::Elem>,
    {
        update(self, src, "assign_add", |d, s| d + s);
    }

    /// `self = self - src`.
    #[track_caller]
    fn assign_sub<S>(&self, src: &S)
    where
        S: Operand<N, Elem = Self::Elem> + ?Sized,
        Self::Elem: Sub<Output = Self::Elem>,
    {
        update(self, src, "assign_sub", |d, s| d - s);
    }

    /// `self = self * src`.
    #[track_caller]
    fn assign_mul<S>(&self, src: &S)
    where
        S: Operand<N, Elem = Self::Elem> + ?Sized,
        Self::Elem: Mul<Output = Self::Elem>,
    {
        update(self, src, "assign_mul", |d, s| d * s);
    }

    /// `self = self / src`. Panics before writing anything if any
    /// divisor is zero.
    #[track_caller]
    fn assign_div<S>(&self, src: &S)
    where
        S: Operand<N, Elem = Self::Elem> + ?Sized,
        Self::Elem: Div<Output = Self::Elem> + Zero,
    {
        let shape = assert_conformable(self, src);
        let divisors = match src.shape() {
            Some(_) => Indices::new(shape),
            // A broadcast divisor is checked even against an empty
            // destination.
            None => Indices::new([1; N]),
        };
        for idx in divisors {
            if src.value(idx).is_zero() {
                violated(SliceError::DivideByZero);
            }
        }
        update(self, src, "assign_div", |d, s| d / s);
    }

    /// `self = self & src`; logical and for `bool` elements.
    #[track_caller]
    fn assign_and<S>(&self, src: &S)
    where
        S: Operand<N, Elem = Self::Elem> + ?Sized,
        Self::Elem: BitAnd<Output = Self::Elem>,
    {
        update(self, src, "assign_and", |d, s| d & s);
    }

    /// `self = self | src`; logical or for `bool` elements.
    #[track_caller]
    fn assign_or<S>(&self, src: &S)
    where
        S: Operand<N, Elem = Self::Elem> + ?Sized,
        Self::Elem: BitOr<Output = Self::Elem>,
    {
        update(self, src, "assign_or", |d, s| d | s);
    }

    /// Store `values` into `self` in iteration order. The sequence
    /// must have exactly one value per element; it is consumed while
    /// writing, so it must not read from `self`.
    #[track_caller]
    fn assign_iter<I>(&self, values: I)
    where
        I: IntoIterator<Item = Self::Elem>,
        I::IntoIter: ExactSizeIterator,
    {
        let values = values.into_iter();
        let indices = Indices::new(self.shape().unwrap_or([1; N]));
        if values.len() != indices.len() {
            violated(SliceError::ValueCount {
                expected: indices.len(),
                got: values.len(),
            });
        }
        for (idx, value) in indices.zip(values) {
            self.store(idx, value);
        }
    }

    /// Set every element to `value`.
    fn fill(&self, value: Self::Elem) {
        store_all(self, &Scalar(value), "fill", |s| s);
    }
}

impl<D, const N: usize> BulkAssign<N> for D where D: OperandMut<N> + ?Sized {}

/// `dst[i] = f(dst[i], src[i])` for every `i`, staging `src` if it
/// may share memory with `dst`.
#[track_caller]
fn update<D, S, const N: usize>(
    dst: &D,
    src: &S,
    op: &'static str,
    f: impl Fn(D::Elem, S::Elem) -> D::Elem,
) where
    D: OperandMut<N> + ?Sized,
    S: Operand<N> + ?Sized,
{
    let shape = assert_conformable(dst, src);
    let indices = Indices::new(shape);
    if indices.len() == 0 {
        return;
    }

    match (dst.footprint(), src.footprint()) {
        (Some(d), Some(s)) if d.overlaps(&s) => {
            tracing::trace!(op, dst = %d.layout, src = %s.layout, "staging aliased source");
            let staged: Vec<S::Elem> = indices.clone().map(|idx| src.value(idx)).collect();
            for (idx, s) in indices.zip(staged) {
                dst.store(idx, f(dst.value(idx), s));
            }
        }
        _ => {
            for idx in indices {
                dst.store(idx, f(dst.value(idx), src.value(idx)));
            }
        }
    }
}

/// `dst[i] = f(src[i])` for every `i`. Unlike [`update`], `dst` is
/// never read.
#[track_caller]
fn store_all<D, S, const N: usize>(
    dst: &D,
    src: &S,
    op: &'static str,
    f: impl Fn(S::Elem) -> D::Elem,
) where
    D: OperandMut<N> + ?Sized,
    S: Operand<N> + ?Sized,
{
    let shape = assert_conformable(dst, src);
    let indices = Indices::new(shape);
    if indices.len() == 0 {
        return;
    }

    match (dst.footprint(), src.footprint()) {
        (Some(d), Some(s)) if d.overlaps(&s) => {
            tracing::trace!(op, dst = %d.layout, src = %s.layout, "staging aliased source");
            let staged: Vec<D::Elem> = indices.clone().map(|idx| f(src.value(idx))).collect();
            for (idx, value) in indices.zip(staged) {
                dst.store(idx, value);
            }
        }
        _ => {
            for idx in indices {
                dst.store(idx, f(src.value(idx)));
            }
        }
    }
}

impl<T, const N: usize> AddAssign<T> for View<'_, T, N>
where
    T: Copy + Add<Output = T>,
{
    fn add_assign(&mut self, rhs: T) {
        self.assign_add(&Scalar(rhs));
    }
}

impl<T, const N: usize> SubAssign<T> for View<'_, T, N>
where
    T: Copy + Sub<Output = T>,
{
    fn sub_assign(&mut self, rhs: T) {
        self.assign_sub(&Scalar(rhs));
    }
}

impl<T, const N: usize> MulAssign<T> for View<'_, T, N>
where
    T: Copy + Mul<Output = T>,
{
    fn mul_assign(&mut self, rhs: T) {
        self.assign_mul(&Scalar(rhs));
    }
}

impl<T, const N: usize> DivAssign<T> for View<'_, T, N>
where
    T: Copy + Div<Output = T> + Zero,
{
    #[track_caller]
    fn div_assign(&mut self, rhs: T) {
        self.assign_div(&Scalar(rhs));
    }
}
