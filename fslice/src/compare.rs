/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Elementwise comparison of two conformable operands, reduced to a
//! single answer.
//!
//! There are four families, one per reduction:
//!
//! - the plain predicates [`eq`], [`ne`], [`lt`], [`le`], [`gt`],
//!   [`ge`] hold when every pair of elements satisfies the relation
//!   (`ne` is the negation of `eq`, not "every pair differs");
//! - `any_*` holds when at least one pair does;
//! - `all_*` are aliases phrased for readability, except [`all_ne`],
//!   which holds when no pair is equal;
//! - `count_*` counts the pairs that do.
//!
//! Either operand may be a [`Scalar`](crate::Scalar), which is
//! compared against every element of the other.
//!
//! ```
//! use fslice::Array;
//! use fslice::Scalar;
//! use fslice::compare;
//!
//! let a = Array::from_fn([2, 3], |[i, j]| i * j);
//! assert!(compare::le(&a, &Scalar(6)));
//! assert!(compare::any_eq(&a, &Scalar(4)));
//! assert_eq!(compare::count_gt(&a, &Scalar(2)), 3);
//! ```
//!
//! Every function panics if its operands do not conform. On empty
//! operands, and on an operand compared with itself, the answer is
//! decided without visiting any element: `eq` and `le` (and their
//! mirrors) hold, `lt` does not, and every `any_*` on empty operands is
//! false.

use crate::iter::Indices;
use crate::operand::Operand;
use crate::operand::assert_conformable;
use crate::operand::same;

enum Shortcut {
    Empty,
    Same(usize),
}

// Shape to traverse, or how the answer is decided without traversal.
#[track_caller]
fn classify<A, B, const N: usize>(a: &A, b: &B) -> Result<[i32; N], Shortcut>
where
    A: Operand<N> + ?Sized,
    B: Operand<N> + ?Sized,
{
    let shape = assert_conformable(a, b);
    let size = Indices::new(shape).len();
    if size == 0 {
        Err(Shortcut::Empty)
    } else if same(a, b) {
        Err(Shortcut::Same(size))
    } else {
        Ok(shape)
    }
}

fn pairs<'s, A, B, const N: usize>(
    a: &'s A,
    b: &'s B,
    shape: [i32; N],
) -> impl Iterator<Item = (A::Elem, B::Elem)> + 's
where
    A: Operand<N> + ?Sized,
    B: Operand<N> + ?Sized,
{
    Indices::new(shape).map(move |idx| (a.value(idx), b.value(idx)))
}

/// Every pair of elements is equal.
#[track_caller]
pub fn eq<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialEq,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).all(|(x, y)| x == y),
        Err(_) => true,
    }
}

/// Some pair of elements differs.
#[track_caller]
pub fn ne<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialEq,
{
    !eq(a, b)
}

/// Every element of `a` is less than its counterpart in `b`.
#[track_caller]
pub fn lt<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).all(|(x, y)| x < y),
        Err(_) => false,
    }
}

/// Every element of `a` is less than or equal to its counterpart in
/// `b`.
#[track_caller]
pub fn le<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).all(|(x, y)| x <= y),
        Err(_) => true,
    }
}

#[track_caller]
pub fn gt<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    lt(b, a)
}

#[track_caller]
pub fn ge<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    le(b, a)
}

/// Some pair of elements is equal.
#[track_caller]
pub fn any_eq<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialEq,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).any(|(x, y)| x == y),
        Err(Shortcut::Same(_)) => true,
        Err(_) => false,
    }
}

#[track_caller]
pub fn any_ne<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialEq,
{
    !eq(a, b)
}

#[track_caller]
pub fn any_lt<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).any(|(x, y)| x < y),
        Err(_) => false,
    }
}

#[track_caller]
pub fn any_le<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).any(|(x, y)| x <= y),
        Err(Shortcut::Same(_)) => true,
        Err(_) => false,
    }
}

#[track_caller]
pub fn any_gt<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    any_lt(b, a)
}

#[track_caller]
pub fn any_ge<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    any_le(b, a)
}

#[track_caller]
pub fn all_eq<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialEq,
{
    eq(a, b)
}

/// No pair of elements is equal.
#[track_caller]
pub fn all_ne<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialEq,
{
    !any_eq(a, b)
}

#[track_caller]
pub fn all_lt<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    lt(a, b)
}

#[track_caller]
pub fn all_le<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    le(a, b)
}

#[track_caller]
pub fn all_gt<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    gt(a, b)
}

#[track_caller]
pub fn all_ge<A, B, const N: usize>(a: &A, b: &B) -> bool
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    ge(a, b)
}

/// The number of equal pairs.
#[track_caller]
pub fn count_eq<A, B, const N: usize>(a: &A, b: &B) -> usize
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialEq,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).filter(|(x, y)| x == y).count(),
        Err(Shortcut::Same(size)) => size,
        Err(_) => 0,
    }
}

/// The number of pairs that differ.
#[track_caller]
pub fn count_ne<A, B, const N: usize>(a: &A, b: &B) -> usize
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialEq,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).filter(|(x, y)| x != y).count(),
        Err(_) => 0,
    }
}

#[track_caller]
pub fn count_lt<A, B, const N: usize>(a: &A, b: &B) -> usize
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).filter(|(x, y)| x < y).count(),
        Err(_) => 0,
    }
}

#[track_caller]
pub fn count_le<A, B, const N: usize>(a: &A, b: &B) -> usize
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    match classify(a, b) {
        Ok(shape) => pairs(a, b, shape).filter(|(x, y)| x <= y).count(),
        Err(Shortcut::Same(size)) => size,
        Err(_) => 0,
    }
}

#[track_caller]
pub fn count_gt<A, B, const N: usize>(a: &A, b: &B) -> usize
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    count_lt(b, a)
}

#[track_caller]
pub fn count_ge<A, B, const N: usize>(a: &A, b: &B) -> usize
where
    A: Operand<N> + ?Sized,
    B: Operand<N, Elem = A::Elem> + ?Sized,
    A::Elem: PartialOrd,
{
    count_le(b, a)
}
