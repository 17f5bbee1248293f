/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use itertools::izip;

use crate::dim::in_range;

/// The affine map from 1-based view coordinates to linear addresses
/// in a buffer: `f(i) = base + dot(multipliers, i)` for
/// `1 <= i[j] <= upper[j]`.
///
/// Multipliers may be negative (a reversed axis) or zero (an axis
/// that revisits the same address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout<const N: usize> {
    multipliers: [i64; N],
    base: i64,
    upper: [i32; N],
}

impl<const N: usize> Layout<N> {
    pub fn new(multipliers: [i64; N], base: i64, upper: [i32; N]) -> Self {
        Self {
            multipliers,
            base,
            upper: upper.map(|u| u.max(0)),
        }
    }

    /// The dense column-major layout of `shape` starting at address 0:
    /// multipliers `1, s1, s1*s2, ...` with element `(1, ..., 1)` at
    /// address 0.
    pub fn column_major(shape: [i32; N]) -> Self {
        let mut multipliers = [0i64; N];
        let mut m = 1i64;
        for (mult, &size) in multipliers.iter_mut().zip(&shape) {
            *mult = m;
            m *= i64::from(size.max(0));
        }
        let base = -multipliers.iter().sum::<i64>();
        Self::new(multipliers, base, shape)
    }

    pub fn multipliers(&self) -> &[i64; N] {
        &self.multipliers
    }

    pub fn base(&self) -> i64 {
        self.base
    }

    pub fn upper(&self) -> &[i32; N] {
        &self.upper
    }

    /// The number of addressable coordinates; zero if any axis is
    /// empty.
    pub fn size(&self) -> usize {
        self.upper.iter().map(|&u| u as usize).product()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn contains(&self, idx: &[i32; N]) -> bool {
        self.upper.iter().zip(idx).all(|(&u, &i)| in_range(u, i))
    }

    /// Linear address of `idx`. The coordinate is not checked.
    pub fn address(&self, idx: &[i32; N]) -> i64 {
        // Dot product ∑ⱼ (multiplierⱼ × iⱼ)
        self.base
            + self
                .multipliers
                .iter()
                .zip(idx)
                .map(|(&m, &i)| m * i64::from(i))
                .sum::<i64>()
    }

    /// The least and greatest addresses the layout touches, or `None`
    /// when it is empty.
    pub fn extent(&self) -> Option<(i64, i64)> {
        if self.is_empty() {
            return None;
        }
        let mut begin = self.base;
        let mut end = self.base;
        for (&m, &u) in izip!(&self.multipliers, &self.upper) {
            let u = i64::from(u);
            begin += m * if m >= 0 { 1 } else { u };
            end += m * if m <= 0 { 1 } else { u };
        }
        Some((begin, end))
    }

    /// Exchange axes `a` and `b` (1-based).
    pub fn swap_axes(&self, a: usize, b: usize) -> Self {
        assert!(
            (1..=N).contains(&a) && (1..=N).contains(&b),
            "axes {} and {} not in 1..={}",
            a,
            b,
            N
        );
        let mut swapped = *self;
        swapped.multipliers.swap(a - 1, b - 1);
        swapped.upper.swap(a - 1, b - 1);
        swapped
    }
}

impl<const N: usize> fmt::Display for Layout<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[k={} m={:?} u={:?}]",
            self.base, self.multipliers, self.upper
        )
    }
}
