/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Property-based generators for shapes and ranges.
//!
//! Example usage:
//!
//! ```ignore
//! use proptest::prelude::*;
//!
//! use crate::strategy::gen_ranges;
//! use crate::strategy::gen_shape;
//!
//! proptest! {
//!     #[test]
//!     fn test_section(
//!         (shape, ranges) in gen_shape::<3>(5)
//!             .prop_flat_map(|shape| (Just(shape), gen_ranges(shape)))
//!     ) {
//!         // Section an array of `shape` by `ranges`.
//!     }
//! }
//! ```
//!
//! This module is only included in test builds (`#[cfg(test)]`).

use proptest::prelude::*;

use crate::range::Range;

/// A rank-`N` shape with every extent in `1..=max`.
pub fn gen_shape<const N: usize>(max: i32) -> impl Strategy<Value = [i32; N]> {
    prop::collection::vec(1..=max, N).prop_map(|extents| {
        <[i32; N]>::try_from(extents).expect("vec of length N")
    })
}

/// A nonempty range over `1..=upper` with a stride of either sign.
/// With a stride above 1 the far end need not itself be selected.
pub fn gen_range(upper: i32) -> BoxedStrategy<Range> {
    (1..=upper, 1..=upper, 1..=upper)
        .prop_map(|(first, end, step)| {
            if first <= end {
                Range::new(first, end).by(step)
            } else {
                Range::new(first, end).by(-step)
            }
        })
        .boxed()
}

/// One [`gen_range`] per axis of `shape`.
pub fn gen_ranges<const N: usize>(shape: [i32; N]) -> impl Strategy<Value = [Range; N]> {
    shape
        .iter()
        .map(|&u| gen_range(u))
        .collect::<Vec<_>>()
        .prop_map(|ranges| <[Range; N]>::try_from(ranges).expect("one range per axis"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::Dim;

    proptest! {
        #[test]
        fn generated_ranges_are_valid(
            (shape, ranges) in gen_shape::<4>(6).prop_flat_map(|shape| (Just(shape), gen_ranges(shape)))
        ) {
            for (axis, (u, r)) in shape.iter().zip(&ranges).enumerate() {
                let dim = Dim::new(axis + 1, *u, r, 1).unwrap();
                prop_assert!(dim.size >= 1);
                prop_assert!(dim.size <= *u);
            }
        }
    }
}
