/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use crate::array::IndexRange;
use crate::dim::SliceError;
use crate::operand::Footprint;
use crate::operand::Operand;
use crate::operand::OperandMut;
use crate::range::Subscript;
use crate::view::View;

/// A view of one field of every record in a [`View`].
///
/// The projection has the parent's shape and reads and writes the
/// selected field in place. Writing a field leaves the rest of its
/// record untouched.
pub struct Member<'a, S, M, const N: usize> {
    view: View<'a, S, N>,
    field: fn(&mut S) -> &mut M,
}

impl<S, M, const N: usize> Clone for Member<'_, S, M, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, M, const N: usize> Copy for Member<'_, S, M, N> {}

impl<S, M, const N: usize> fmt::Debug for Member<'_, S, M, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("view", &self.view)
            .field("field", &(self.field as usize))
            .finish()
    }
}

impl<'a, S: Copy, M: Copy, const N: usize> Member<'a, S, M, N> {
    pub(crate) fn new(view: View<'a, S, N>, field: fn(&mut S) -> &mut M) -> Self {
        Self { view, field }
    }

    /// The records this member projects.
    pub fn view(&self) -> &View<'a, S, N> {
        &self.view
    }

    pub fn rank(&self) -> usize {
        N
    }

    pub fn size(&self) -> usize {
        self.view.size()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn uppers(&self) -> [i32; N] {
        self.view.uppers()
    }

    pub fn upper(&self, axis: usize) -> i32 {
        self.view.upper(axis)
    }

    pub fn lower(&self, axis: usize) -> i32 {
        self.view.lower(axis)
    }

    pub fn size_of(&self, axis: usize) -> usize {
        self.view.size_of(axis)
    }

    pub fn index_range(&self, axis: usize) -> IndexRange {
        self.view.index_range(axis)
    }

    #[track_caller]
    pub fn get(&self, idx: [i32; N]) -> M {
        let mut record = self.view.at(idx).get();
        *(self.field)(&mut record)
    }

    #[track_caller]
    pub fn set(&self, idx: [i32; N], value: M) {
        let cell = self.view.at(idx);
        let mut record = cell.get();
        *(self.field)(&mut record) = value;
        cell.set(record);
    }

    /// The same field over a section of the records.
    pub fn try_section<const K: usize>(
        &self,
        subs: [Subscript; N],
    ) -> Result<Member<'a, S, M, K>, SliceError> {
        Ok(Member {
            view: self.view.try_section(subs)?,
            field: self.field,
        })
    }

    #[track_caller]
    pub fn section<const K: usize>(&self, subs: [Subscript; N]) -> Member<'a, S, M, K> {
        Member {
            view: self.view.section(subs),
            field: self.field,
        }
    }

    pub fn to_vec(&self) -> Vec<M> {
        let field = self.field;
        self.view
            .values()
            .map(|mut record| *field(&mut record))
            .collect()
    }
}

impl<S: Copy, M: Copy, const N: usize> Operand<N> for Member<'_, S, M, N> {
    type Elem = M;

    fn shape(&self) -> Option<[i32; N]> {
        Some(self.uppers())
    }

    fn value(&self, idx: [i32; N]) -> M {
        let mut record = self.view.cell(&idx).get();
        *(self.field)(&mut record)
    }

    fn footprint(&self) -> Option<Footprint<N>> {
        self.view.footprint_with(self.field as usize)
    }
}

impl<S: Copy, M: Copy, const N: usize> OperandMut<N> for Member<'_, S, M, N> {
    fn store(&self, idx: [i32; N], value: M) {
        let cell = self.view.cell(&idx);
        let mut record = cell.get();
        *(self.field)(&mut record) = value;
        cell.set(record);
    }
}
