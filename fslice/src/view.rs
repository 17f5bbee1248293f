/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Strided views with Fortran indexing.
//!
//! A [`View`] describes a rank-`N` subset of a buffer through a
//! [`Layout`]: one multiplier per axis, a base constant, and an upper
//! bound per axis. Every axis of a view is indexed `1..=upper`
//! regardless of how the parent was indexed, so sectioning a view
//! always restarts its coordinates at 1.
//!
//! ```
//! use fslice::Range;
//! use fslice::View;
//! use fslice::s;
//!
//! let mut data: Vec<f64> = (1..=12).map(f64::from).collect();
//! let v = View::contiguous(&mut data, [3, 4]).unwrap();
//!
//! // Column 2, rows reversed.
//! let col: View<'_, f64, 1> = v.section(s![Range::full().by(-1), 2]);
//! assert_eq!(col.to_vec(), vec![6.0, 5.0, 4.0]);
//!
//! // Writes through one view are visible through every other.
//! col.set([1], 0.0);
//! assert_eq!(v.get([3, 2]), 0.0);
//! ```
//!
//! Views borrow the buffer as a slice of [`Cell`]s. Any number of
//! views may read and write overlapping parts of the same buffer; the
//! bulk operations in [`crate::assign`] detect overlap and stage the
//! source when it matters. Because `Cell` is not `Sync`, a buffer and
//! all views of it stay on one thread.

use std::cell::Cell;
use std::fmt;

use crate::array::IndexRange;
use crate::dim::Dim;
use crate::dim::SliceError;
use crate::dim::index_offset;
use crate::dim::violated;
use crate::iter::Indices;
use crate::layout::Layout;
use crate::member::Member;
use crate::operand::Footprint;
use crate::operand::Operand;
use crate::operand::OperandMut;
use crate::range::Subscript;

/// A non-owning rank-`N` view of a buffer of `T`.
pub struct View<'a, T, const N: usize> {
    data: &'a [Cell<T>],
    layout: Layout<N>,
}

impl<T, const N: usize> Clone for View<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for View<'_, T, N> {}

impl<T, const N: usize> fmt::Debug for View<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("layout", &format_args!("{}", self.layout))
            .field("len", &self.data.len())
            .finish()
    }
}

impl<'a, T, const N: usize> View<'a, T, N> {
    /// A view of `data` with the given layout. Fails unless every
    /// address the layout reaches lies inside `data`.
    pub fn new(data: &'a [Cell<T>], layout: Layout<N>) -> Result<Self, SliceError> {
        if let Some((begin, end)) = layout.extent() {
            if begin < 0 || end >= data.len() as i64 {
                tracing::debug!(%layout, len = data.len(), "view reaches outside its buffer");
                return Err(SliceError::OutOfBuffer {
                    begin,
                    end,
                    len: data.len(),
                });
            }
        }
        Ok(Self { data, layout })
    }

    /// A dense column-major view of all of `data`.
    pub fn from_cells(data: &'a [Cell<T>], shape: [i32; N]) -> Result<Self, SliceError> {
        let layout = Layout::column_major(shape);
        if layout.size() != data.len() {
            return Err(SliceError::ShapeMismatch {
                shape: shape.to_vec(),
                expected: layout.size(),
                len: data.len(),
            });
        }
        Ok(Self { data, layout })
    }

    /// A dense column-major view of all of `data`, which stays
    /// borrowed for as long as the view (or any view derived from it)
    /// lives.
    pub fn contiguous(data: &'a mut [T], shape: [i32; N]) -> Result<Self, SliceError> {
        Self::from_cells(Cell::from_mut(data).as_slice_of_cells(), shape)
    }

    pub fn layout(&self) -> &Layout<N> {
        &self.layout
    }

    pub fn rank(&self) -> usize {
        N
    }

    /// The number of elements.
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// The upper bound of each axis.
    pub fn uppers(&self) -> [i32; N] {
        *self.layout.upper()
    }

    /// The upper bound of axis `axis` (1-based).
    pub fn upper(&self, axis: usize) -> i32 {
        self.layout.upper()[check_axis::<N>(axis)]
    }

    /// The lower bound of axis `axis` (1-based), which is always 1.
    pub fn lower(&self, axis: usize) -> i32 {
        check_axis::<N>(axis);
        1
    }

    /// The number of elements along axis `axis` (1-based).
    pub fn size_of(&self, axis: usize) -> usize {
        self.upper(axis) as usize
    }

    /// The index range `1..=upper` of axis `axis` (1-based).
    pub fn index_range(&self, axis: usize) -> IndexRange {
        IndexRange::new(1, self.upper(axis))
    }

    pub fn contains(&self, idx: [i32; N]) -> bool {
        self.layout.contains(&idx)
    }

    /// The linear address of `idx` in the buffer.
    pub fn index(&self, idx: [i32; N]) -> i64 {
        self.layout.address(&idx)
    }

    /// The element at `idx`. Panics if `idx` is outside the view.
    #[track_caller]
    pub fn at(&self, idx: [i32; N]) -> &'a Cell<T> {
        if let Some(axis) = (0..N).find(|&j| !(1..=self.layout.upper()[j]).contains(&idx[j])) {
            violated(SliceError::IndexOutOfRange {
                axis: axis + 1,
                index: idx[axis],
                upper: self.layout.upper()[axis],
            });
        }
        self.cell(&idx)
    }

    /// The element at `idx` without any checks.
    ///
    /// # Safety
    ///
    /// `idx` must satisfy `1 <= idx[j] <= upper(j)` on every axis, and
    /// the view must have been constructed with bounds checking in
    /// effect so that every such coordinate addresses the buffer.
    pub unsafe fn at_unchecked(&self, idx: [i32; N]) -> &'a Cell<T> {
        // SAFETY: the caller guarantees the address is in the buffer.
        unsafe { self.data.get_unchecked(self.layout.address(&idx) as usize) }
    }

    pub fn get(&self, idx: [i32; N]) -> T
    where
        T: Copy,
    {
        self.at(idx).get()
    }

    pub fn set(&self, idx: [i32; N], value: T) {
        self.at(idx).set(value)
    }

    /// Section the view. Each subscript either fixes its axis at an
    /// index, removing the axis, or selects a range of it, keeping
    /// the axis; `M` must equal the number of ranges. Subscripts
    /// follow this view's own axis order.
    pub fn try_section<const M: usize>(
        &self,
        subs: [Subscript; N],
    ) -> Result<View<'a, T, M>, SliceError> {
        let got = subs.iter().filter(|s| s.is_range()).count();
        if got != M {
            return Err(SliceError::RankMismatch { expected: M, got });
        }

        let mut base = self.layout.base();
        let mut multipliers = [0i64; M];
        let mut upper = [0i32; M];
        let mut kept = 0;
        for (axis, sub) in subs.iter().enumerate() {
            let (u, m) = (self.layout.upper()[axis], self.layout.multipliers()[axis]);
            match sub {
                Subscript::Index(i) => base += index_offset(axis + 1, u, *i, m)?,
                Subscript::Range(r) => {
                    let dim = Dim::new(axis + 1, u, r, m)?;
                    multipliers[kept] = dim.multiplier;
                    upper[kept] = dim.size;
                    base += dim.offset;
                    kept += 1;
                }
            }
        }

        Ok(View {
            data: self.data,
            layout: Layout::new(multipliers, base, upper),
        })
    }

    /// [`View::try_section`], panicking on invalid subscripts.
    #[track_caller]
    pub fn section<const M: usize>(&self, subs: [Subscript; N]) -> View<'a, T, M> {
        self.try_section(subs).unwrap_or_else(|err| violated(err))
    }

    /// The view with axes `a` and `b` (1-based) exchanged.
    pub fn swap_axes(&self, a: usize, b: usize) -> Self {
        Self {
            data: self.data,
            layout: self.layout.swap_axes(a, b),
        }
    }

    /// Project every element onto one of its fields.
    ///
    /// ```
    /// use fslice::View;
    ///
    /// #[derive(Clone, Copy)]
    /// struct Particle {
    ///     mass: f64,
    ///     charge: i8,
    /// }
    ///
    /// let mut cells = vec![Particle { mass: 1.0, charge: -1 }; 4];
    /// let v = View::contiguous(&mut cells, [2, 2]).unwrap();
    /// let mass = v.member(|c| &mut c.mass);
    /// mass.set([2, 1], 4.0);
    /// assert_eq!(mass.get([2, 1]), 4.0);
    /// assert_eq!(v.member(|c| &mut c.charge).get([2, 1]), -1);
    /// ```
    pub fn member<M>(&self, field: fn(&mut T) -> &mut M) -> Member<'a, T, M, N>
    where
        T: Copy,
        M: Copy,
    {
        Member::new(*self, field)
    }

    /// The elements in bulk-operation order.
    pub fn values(&self) -> impl Iterator<Item = T> + 'a
    where
        T: Copy,
    {
        let view = *self;
        Indices::new(self.uppers()).map(move |idx| view.cell(&idx).get())
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Copy,
    {
        self.values().collect()
    }

    /// The element at `idx`, which is trusted to be inside the view.
    #[track_caller]
    pub(crate) fn cell(&self, idx: &[i32; N]) -> &'a Cell<T> {
        let addr = self.layout.address(idx);
        usize::try_from(addr)
            .ok()
            .and_then(|a| self.data.get(a))
            .unwrap_or_else(|| {
                violated(SliceError::OutOfBuffer {
                    begin: addr,
                    end: addr,
                    len: self.data.len(),
                })
            })
    }

    pub(crate) fn footprint_with(&self, projection: usize) -> Option<Footprint<N>> {
        Footprint::of(self.data.as_ptr(), self.layout, projection)
    }
}

#[track_caller]
fn check_axis<const N: usize>(axis: usize) -> usize {
    assert!(
        (1..=N).contains(&axis),
        "axis {} not in 1..={}",
        axis,
        N
    );
    axis - 1
}

impl<T: Copy, const N: usize> Operand<N> for View<'_, T, N> {
    type Elem = T;

    fn shape(&self) -> Option<[i32; N]> {
        Some(self.uppers())
    }

    fn value(&self, idx: [i32; N]) -> T {
        self.cell(&idx).get()
    }

    fn footprint(&self) -> Option<Footprint<N>> {
        self.footprint_with(0)
    }
}

impl<T: Copy, const N: usize> OperandMut<N> for View<'_, T, N> {
    fn store(&self, idx: [i32; N], value: T) {
        self.cell(&idx).set(value)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::Array;
    use crate::Range;
    use crate::s;
    use crate::strategy::gen_ranges;
    use crate::strategy::gen_shape;

    // Element (i, j, k) holds 100 i + 10 j + k.
    fn coded(shape: [i32; 3]) -> Array<i32, 3> {
        Array::from_fn(shape, |[i, j, k]| 100 * i + 10 * j + k)
    }

    #[test]
    fn test_rank_reduction_middle_axis() {
        let mut a = coded([3, 4, 5]);
        let v = a.view();
        assert_eq!(v.layout().multipliers(), &[1, 3, 12]);

        let plane: View<'_, i32, 2> = v.section(s![.., 2, ..]);
        assert_eq!(plane.uppers(), [3, 5]);
        for i1 in 1..=3 {
            for i3 in 1..=5 {
                assert_eq!(plane.get([i1, i3]), v.get([i1, 2, i3]));
            }
        }
    }

    #[test]
    fn test_all_subscript_combinations() {
        let mut a = coded([3, 4, 5]);
        let v = a.view();

        let full: View<'_, i32, 3> = v.section(s![2..=3, 1..=4, 2..=5]);
        assert_eq!(full.uppers(), [2, 4, 4]);
        assert_eq!(full.get([1, 1, 1]), 212);
        assert_eq!(full.get([2, 4, 4]), 345);

        let a23: View<'_, i32, 2> = v.section(s![3, 2..=3, ..]);
        assert_eq!(a23.get([2, 5]), 335);
        let a13: View<'_, i32, 2> = v.section(s![.., 4, 5..]);
        assert_eq!(a13.uppers(), [3, 1]);
        assert_eq!(a13.get([3, 1]), 345);
        let a12: View<'_, i32, 2> = v.section(s![..2, .., 1]);
        assert_eq!(a12.get([1, 4]), 141);

        let r1: View<'_, i32, 1> = v.section(s![.., 2, 3]);
        assert_eq!(r1.to_vec(), vec![123, 223, 323]);
        let r2: View<'_, i32, 1> = v.section(s![1, .., 3]);
        assert_eq!(r2.to_vec(), vec![113, 123, 133, 143]);
        let r3: View<'_, i32, 1> = v.section(s![1, 2, Range::full().by(-2)]);
        assert_eq!(r3.to_vec(), vec![125, 123, 121]);

        let point: View<'_, i32, 0> = v.section(s![3, 4, 5]);
        assert_eq!(point.get([]), 345);
    }

    #[test]
    fn test_section_of_section() {
        let mut a = coded([4, 4, 4]);
        let v = a.view();
        let rev: View<'_, i32, 3> = v.section(s![Range::full().by(-1), .., Range::new(4, 1).by(-3)]);
        assert_eq!(rev.uppers(), [4, 4, 2]);
        assert_eq!(rev.get([1, 1, 1]), 414);
        assert_eq!(rev.get([1, 1, 2]), 411);

        // Coordinates restart at 1 in every derived view.
        let line: View<'_, i32, 1> = rev.section(s![2..=3, 2, 2]);
        assert_eq!(line.to_vec(), vec![321, 221]);
    }

    #[test]
    fn test_zero_multiplier_axis() {
        let mut data = vec![1, 2, 3];
        let cells = Cell::from_mut(&mut data[..]).as_slice_of_cells();
        // Every column revisits the same three elements.
        let v = View::new(cells, Layout::new([1, 0], -1, [3, 4])).unwrap();
        assert_eq!(v.to_vec(), vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]);
        v.set([2, 4], 20);
        assert_eq!(v.get([2, 1]), 20);
    }

    #[test]
    fn test_strided_whole_axis_of_empty_array() {
        let mut a = Array::filled([3, 0], 0);
        let v = a.view();
        for stride in [1, -1, 2, -2, 3] {
            let s: View<'_, i32, 2> = v.section(s![.., Range::full().by(stride)]);
            assert_eq!(s.uppers(), [3, 0]);
            assert!(s.is_empty());
        }
        let s: View<'_, i32, 1> = v.section(s![Range::full().by(-2), ..]).section(s![2, ..]);
        assert_eq!(s.uppers(), [0]);
    }

    #[test]
    fn test_ranges_at_the_integer_limits() {
        let mut a = Array::from_fn([4], |[i]| i);
        let v = a.view();
        let below: View<'_, i32, 1> = v.section(s![..i32::MIN]);
        assert!(below.is_empty());
        let r: Result<View<'_, i32, 1>, _> = v.try_section(s![0..i32::MIN]);
        assert!(matches!(r, Err(SliceError::InvertedRange { axis: 1, .. })));
        let r: Result<View<'_, i32, 1>, _> = v.try_section(s![i32::MIN..=i32::MAX]);
        assert!(matches!(r, Err(SliceError::RangeOutOfRange { axis: 1, .. })));
    }

    #[test]
    fn test_empty_views() {
        let mut a = coded([3, 4, 5]);
        let v = a.view();
        let e: View<'_, i32, 3> = v.section(s![.., 3..=2, ..]);
        assert!(e.is_empty());
        assert_eq!(e.size(), 0);
        assert_eq!(e.uppers(), [3, 0, 5]);
        assert!(e.footprint().is_none());
        assert_eq!(e.to_vec(), Vec::<i32>::new());

        let mut none: Vec<f32> = Vec::new();
        let v = View::contiguous(&mut none, [0, 7]).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_inspectors() {
        let mut a = coded([3, 4, 5]);
        let v: View<'_, i32, 2> = a.view().section(s![2, .., Range::new(1, 5).by(2)]);
        assert_eq!(v.rank(), 2);
        assert_eq!(v.size(), 12);
        assert_eq!(v.size_of(1), 4);
        assert_eq!(v.size_of(2), 3);
        assert_eq!(v.lower(2), 1);
        assert_eq!(v.upper(2), 3);
        assert_eq!(v.index_range(1), IndexRange::new(1, 4));
        assert_eq!(v.index_range(2).to_string(), "1:3");
        assert!(v.contains([4, 3]));
        assert!(!v.contains([4, 4]));
        assert_eq!(v.index([1, 1]), 1);
        assert_eq!(v.index([1, 2]), 1 + 24);
    }

    #[test]
    fn test_unchecked_access() {
        let mut a = coded([2, 2, 2]);
        let v = a.view();
        // SAFETY: (2, 1, 2) is inside the view.
        let c = unsafe { v.at_unchecked([2, 1, 2]) };
        assert_eq!(c.get(), 212);
    }

    #[test]
    fn test_swap_axes() {
        let mut a = Array::from_fn([2, 3], |[i, j]| 10 * i + j);
        let v = a.view();
        let t = v.swap_axes(1, 2);
        assert_eq!(t.uppers(), [3, 2]);
        assert_eq!(t.to_vec(), vec![11, 12, 13, 21, 22, 23]);
    }

    #[test]
    fn test_construction_errors() {
        let mut data = vec![0u8; 6];
        assert_eq!(
            View::contiguous(&mut data, [2, 4]).unwrap_err(),
            SliceError::ShapeMismatch {
                shape: vec![2, 4],
                expected: 8,
                len: 6
            }
        );

        let cells = Cell::from_mut(&mut data[..]).as_slice_of_cells();
        assert_eq!(
            View::new(cells, Layout::new([2], -1, [4])).unwrap_err(),
            SliceError::OutOfBuffer {
                begin: 1,
                end: 7,
                len: 6
            }
        );
        assert!(View::new(cells, Layout::new([-2], 7, [3])).is_ok());
    }

    #[test]
    fn test_rank_mismatch() {
        let mut a = coded([2, 2, 2]);
        let v = a.view();
        let r: Result<View<'_, i32, 2>, _> = v.try_section(s![1, 2, ..]);
        assert_eq!(
            r.unwrap_err(),
            SliceError::RankMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    #[should_panic(expected = "index 3 out of range 1:2 on axis 2")]
    fn test_at_out_of_range() {
        let mut a = coded([2, 2, 2]);
        a.view().at([1, 3, 1]);
    }

    #[test]
    #[should_panic(expected = "zero stride")]
    fn test_section_zero_stride() {
        let mut a = coded([2, 2, 2]);
        let _: View<'_, i32, 3> = a.view().section(s![.., Range::full().by(0), ..]);
    }

    #[test]
    #[should_panic(expected = "axis 4 not in 1..=3")]
    fn test_bad_axis() {
        let mut a = coded([2, 2, 2]);
        a.view().upper(4);
    }

    proptest! {
        // Sectioning and then indexing agrees with indexing the parent
        // at the coordinates the ranges select.
        #[test]
        fn section_commutes_with_access(
            (shape, ranges) in gen_shape::<3>(5).prop_flat_map(|shape| (Just(shape), gen_ranges(shape)))
        ) {
            let mut a = coded(shape);
            let v = a.view();
            let s: View<'_, i32, 3> = v.section(ranges.map(Subscript::Range));
            for idx in Indices::new(s.uppers()) {
                let mut parent = [0; 3];
                for axis in 0..3 {
                    let (lo, _, stride) = ranges[axis].resolve(shape[axis]);
                    parent[axis] = lo + (idx[axis] - 1) * stride;
                }
                prop_assert_eq!(s.get(idx), v.get(parent));
            }
        }
    }
}
