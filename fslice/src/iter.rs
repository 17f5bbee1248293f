/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

/// Iterates the 1-based coordinates of a shape in the order every
/// bulk operation uses: axis 1 varies fastest, axis `N` slowest.
///
/// The order is observable (it fixes which element each value of an
/// assigned sequence lands on) and must not change.
///
/// ```
/// use fslice::Indices;
///
/// let order: Vec<_> = Indices::new([2, 2]).collect();
/// assert_eq!(order, vec![[1, 1], [2, 1], [1, 2], [2, 2]]);
/// ```
#[derive(Debug, Clone)]
pub struct Indices<const N: usize> {
    upper: [i32; N],
    next: Option<[i32; N]>,
    remaining: usize,
}

impl<const N: usize> Indices<N> {
    pub fn new(upper: [i32; N]) -> Self {
        let remaining: usize = upper.iter().map(|&u| u.max(0) as usize).product();
        Self {
            upper,
            next: (remaining > 0).then_some([1; N]),
            remaining,
        }
    }
}

impl<const N: usize> Iterator for Indices<N> {
    type Item = [i32; N];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.remaining -= 1;

        let mut idx = current;
        self.next = None;
        for axis in 0..N {
            if idx[axis] < self.upper[axis] {
                idx[axis] += 1;
                self.next = Some(idx);
                break;
            }
            idx[axis] = 1;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<const N: usize> ExactSizeIterator for Indices<N> {}
