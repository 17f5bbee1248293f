/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::cell::Cell;
use std::fmt;
use std::ops::Index;
use std::ops::IndexMut;
use std::ops::RangeInclusive;

use itertools::izip;
use serde::Deserialize;
use serde::Serialize;

use crate::dim::SliceError;
use crate::iter::Indices;
use crate::layout::Layout;
use crate::operand::Footprint;
use crate::operand::Operand;
use crate::view::View;

/// The declared index range `lower..=upper` of one array axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    pub lower: i32,
    pub upper: i32,
}

impl IndexRange {
    pub fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    /// Number of indices in the range; zero if `upper < lower`.
    pub fn size(&self) -> i32 {
        (self.upper - self.lower + 1).max(0)
    }

    pub fn contains(&self, index: i32) -> bool {
        self.lower <= index && index <= self.upper
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lower, self.upper)
    }
}

impl From<RangeInclusive<i32>> for IndexRange {
    fn from(r: RangeInclusive<i32>) -> Self {
        Self::new(*r.start(), *r.end())
    }
}

/// An extent of `n` means `1..=n`.
impl From<i32> for IndexRange {
    fn from(n: i32) -> Self {
        Self::new(1, n)
    }
}

/// An owning rank-`N` array stored in column-major order, with an
/// arbitrary lower bound on every axis.
///
/// Arrays are indexed in their own declared coordinates. Views of an
/// array ([`Array::view`]) and its [`Operand`] impl use positions
/// `1..=size_of(axis)` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T, const N: usize> {
    data: Vec<T>,
    bounds: [IndexRange; N],
}

impl<T, const N: usize> Array<T, N> {
    /// An array with the given bounds, every element `value`.
    pub fn new(bounds: [IndexRange; N], value: T) -> Self
    where
        T: Clone,
    {
        let len = bounds.iter().map(|b| b.size() as usize).product();
        Self {
            data: vec![value; len],
            bounds,
        }
    }

    /// An array indexed `1..=shape[j]` on every axis, every element
    /// `value`.
    pub fn filled(shape: [i32; N], value: T) -> Self
    where
        T: Clone,
    {
        Self::new(shape.map(IndexRange::from), value)
    }

    /// Adopt `data`, which must hold the elements of `bounds` in
    /// column-major order.
    pub fn from_vec(bounds: [IndexRange; N], data: Vec<T>) -> Result<Self, SliceError> {
        let expected: usize = bounds.iter().map(|b| b.size() as usize).product();
        if data.len() != expected {
            return Err(SliceError::ShapeMismatch {
                shape: bounds.iter().map(|b| b.size()).collect(),
                expected,
                len: data.len(),
            });
        }
        Ok(Self { data, bounds })
    }

    /// An array indexed `1..=shape[j]` whose element at `idx` is
    /// `f(idx)`. Elements are produced in column-major order.
    pub fn from_fn(shape: [i32; N], f: impl FnMut([i32; N]) -> T) -> Self {
        Self {
            data: Indices::new(shape).map(f).collect(),
            bounds: shape.map(IndexRange::from),
        }
    }

    pub fn bounds(&self) -> &[IndexRange; N] {
        &self.bounds
    }

    pub fn rank(&self) -> usize {
        N
    }

    /// Lower bound of axis `axis` (1-based).
    pub fn lower(&self, axis: usize) -> i32 {
        self.bounds[axis - 1].lower
    }

    /// Upper bound of axis `axis` (1-based).
    pub fn upper(&self, axis: usize) -> i32 {
        self.bounds[axis - 1].upper
    }

    /// Extent of axis `axis` (1-based).
    pub fn size_of(&self, axis: usize) -> usize {
        self.bounds[axis - 1].size() as usize
    }

    pub fn sizes(&self) -> [i32; N] {
        self.bounds.map(|b| b.size())
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The elements in column-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// The element at `idx` in the array's declared coordinates.
    pub fn get(&self, idx: [i32; N]) -> Option<&T> {
        self.offset(&idx).map(|k| &self.data[k])
    }

    pub fn get_mut(&mut self, idx: [i32; N]) -> Option<&mut T> {
        self.offset(&idx).map(|k| &mut self.data[k])
    }

    /// A view of the whole array, indexed from 1 on every axis.
    pub fn view(&mut self) -> View<'_, T, N> {
        let sizes = self.sizes();
        let cells = Cell::from_mut(&mut self.data[..]).as_slice_of_cells();
        // The layout covers exactly `data`.
        View::from_cells(cells, sizes).unwrap_or_else(|err| crate::dim::violated(err))
    }

    fn offset(&self, idx: &[i32; N]) -> Option<usize> {
        let mut offset = 0usize;
        let mut stride = 1usize;
        for (b, &i) in izip!(&self.bounds, idx) {
            if !b.contains(i) {
                return None;
            }
            offset += (i - b.lower) as usize * stride;
            stride *= b.size() as usize;
        }
        Some(offset)
    }
}

impl<T, const N: usize> Index<[i32; N]> for Array<T, N> {
    type Output = T;

    #[track_caller]
    fn index(&self, idx: [i32; N]) -> &T {
        match self.offset(&idx) {
            Some(k) => &self.data[k],
            None => panic!("index {:?} out of bounds {:?}", idx, self.bounds),
        }
    }
}

impl<T, const N: usize> IndexMut<[i32; N]> for Array<T, N> {
    #[track_caller]
    fn index_mut(&mut self, idx: [i32; N]) -> &mut T {
        match self.offset(&idx) {
            Some(k) => &mut self.data[k],
            None => panic!("index {:?} out of bounds {:?}", idx, self.bounds),
        }
    }
}

impl<T: Copy, const N: usize> Operand<N> for Array<T, N> {
    type Elem = T;

    fn shape(&self) -> Option<[i32; N]> {
        Some(self.sizes())
    }

    fn value(&self, idx: [i32; N]) -> T {
        let lower = self.bounds.map(|b| b.lower);
        let mut own = [0; N];
        for (o, &i, &l) in izip!(&mut own, &idx, &lower) {
            *o = i - 1 + l;
        }
        self[own]
    }

    fn footprint(&self) -> Option<Footprint<N>> {
        Footprint::of(self.data.as_ptr(), Layout::column_major(self.sizes()), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s;

    #[test]
    fn test_declared_bounds() {
        let mut a = Array::new([(0..=2).into(), (-1..=1).into()], 0i64);
        assert_eq!(a.size(), 9);
        assert_eq!(a.lower(1), 0);
        assert_eq!(a.upper(2), 1);
        assert_eq!(a.size_of(2), 3);
        assert_eq!(a.sizes(), [3, 3]);

        a[[0, -1]] = 1;
        a[[2, 1]] = 9;
        *a.get_mut([1, 0]).unwrap() = 5;
        assert_eq!(a.as_slice()[0], 1);
        assert_eq!(a.as_slice()[8], 9);
        assert_eq!(a.as_slice()[4], 5);
        assert_eq!(a.get([3, 0]), None);

        // The operand and view address the same element at (2, 2).
        assert_eq!(a.value([2, 2]), 5);
        assert_eq!(a.view().get([2, 2]), 5);
    }

    #[test]
    fn test_from_fn_is_column_major() {
        let a = Array::from_fn([2, 3], |[i, j]| (i, j));
        assert_eq!(
            a.as_slice(),
            &[(1, 1), (2, 1), (1, 2), (2, 2), (1, 3), (2, 3)]
        );
        assert_eq!(a[[2, 3]], (2, 3));
    }

    #[test]
    fn test_view_layout() {
        let mut a = Array::filled([3, 4, 5], 0u16);
        let v = a.view();
        assert_eq!(v.layout().multipliers(), &[1, 3, 12]);
        assert_eq!(v.layout().base(), -16);
        let row: View<'_, u16, 1> = v.section(s![2, .., 5]);
        row.set([4], 7);
        assert_eq!(a[[2, 4, 5]], 7);
        assert_eq!(a.footprint().unwrap().layout, Layout::column_major([3, 4, 5]));
    }

    #[test]
    fn test_from_vec() {
        let a = Array::from_vec([IndexRange::from(2), IndexRange::new(5, 6)], vec![1, 2, 3, 4]).unwrap();
        assert_eq!(a[[2, 6]], 4);
        assert_eq!(a.clone().into_vec(), vec![1, 2, 3, 4]);
        assert_eq!(
            Array::from_vec([IndexRange::from(3)], vec![1, 2]).unwrap_err(),
            SliceError::ShapeMismatch {
                shape: vec![3],
                expected: 3,
                len: 2
            }
        );
    }

    #[test]
    fn test_empty_bounds() {
        let a = Array::new([IndexRange::new(4, 3), IndexRange::from(2)], 1.0f64);
        assert!(a.is_empty());
        assert_eq!(a.sizes(), [0, 2]);
        assert!(a.footprint().is_none());
    }

    #[test]
    fn test_index_range_serde() {
        let r = IndexRange::new(-3, 4);
        assert_eq!(r.to_string(), "-3:4");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"lower":-3,"upper":4}"#);
        assert_eq!(serde_json::from_str::<IndexRange>(&json).unwrap(), r);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_out_of_bounds() {
        let a = Array::filled([2, 2], 0);
        let _ = a[[0, 1]];
    }
}
