/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Subscript arguments for sectioning views.
//!
//! A section call takes one [`Subscript`] per axis of the view being
//! sectioned. Each subscript is either a single index, which removes
//! the axis from the result, or a [`Range`], which keeps it. The
//! [`s!`](crate::s) macro classifies call-site arguments:
//!
//! ```
//! use fslice::Range;
//! use fslice::Subscript;
//! use fslice::s;
//!
//! let subs = s![2, .., 1..=3, Range::full().by(-1)];
//! assert_eq!(subs[0], Subscript::Index(2));
//! assert_eq!(subs[1], Subscript::Range(Range::full()));
//! assert_eq!(subs[2], Subscript::Range(Range::new(1, 3)));
//! ```

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A 1-based index range with a stride, in Fortran `lo:hi:stride`
/// form. Both ends are inclusive. An omitted end resolves to the end
/// of the axis in the direction of the stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub lo: Option<i32>,
    pub hi: Option<i32>,
    pub stride: i32,
}

impl Range {
    /// The inclusive range `lo:hi` with unit stride.
    pub fn new(lo: i32, hi: i32) -> Self {
        Self {
            lo: Some(lo),
            hi: Some(hi),
            stride: 1,
        }
    }

    /// The whole axis, `:`.
    pub fn full() -> Self {
        Self {
            lo: None,
            hi: None,
            stride: 1,
        }
    }

    /// Replace the stride. A negative stride walks the range from `lo`
    /// down to `hi`.
    pub fn by(self, stride: i32) -> Self {
        Self { stride, ..self }
    }

    /// Resolve omitted ends against an axis with upper bound `upper`,
    /// returning `(lo, hi, stride)`.
    pub(crate) fn resolve(&self, upper: i32) -> (i32, i32, i32) {
        let (first, last) = if self.stride < 0 { (upper, 1) } else { (1, upper) };
        (
            self.lo.unwrap_or(first),
            self.hi.unwrap_or(last),
            self.stride,
        )
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lo) = self.lo {
            write!(f, "{}", lo)?;
        }
        write!(f, ":")?;
        if let Some(hi) = self.hi {
            write!(f, "{}", hi)?;
        }
        if self.stride != 1 {
            write!(f, ":{}", self.stride)?;
        }
        Ok(())
    }
}

impl From<std::ops::RangeInclusive<i32>> for Range {
    fn from(r: std::ops::RangeInclusive<i32>) -> Self {
        Self::new(*r.start(), *r.end())
    }
}

impl From<std::ops::Range<i32>> for Range {
    fn from(r: std::ops::Range<i32>) -> Self {
        // `lo..i32::MIN` selects no valid index either way.
        Self::new(r.start, r.end.saturating_sub(1))
    }
}

impl From<std::ops::RangeFrom<i32>> for Range {
    fn from(r: std::ops::RangeFrom<i32>) -> Self {
        Self {
            lo: Some(r.start),
            ..Self::full()
        }
    }
}

impl From<std::ops::RangeTo<i32>> for Range {
    fn from(r: std::ops::RangeTo<i32>) -> Self {
        Self {
            hi: Some(r.end.saturating_sub(1)),
            ..Self::full()
        }
    }
}

impl From<std::ops::RangeToInclusive<i32>> for Range {
    fn from(r: std::ops::RangeToInclusive<i32>) -> Self {
        Self {
            hi: Some(r.end),
            ..Self::full()
        }
    }
}

impl From<std::ops::RangeFull> for Range {
    fn from(_: std::ops::RangeFull) -> Self {
        Self::full()
    }
}

/// One section argument: a single index (rank-reducing) or a range
/// (rank-preserving).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subscript {
    Index(i32),
    Range(Range),
}

impl Subscript {
    pub fn is_range(&self) -> bool {
        matches!(self, Subscript::Range(_))
    }
}

impl fmt::Display for Subscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subscript::Index(i) => write!(f, "{}", i),
            Subscript::Range(r) => write!(f, "{}", r),
        }
    }
}

impl From<i32> for Subscript {
    fn from(index: i32) -> Self {
        Subscript::Index(index)
    }
}

macro_rules! subscript_from_range {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Subscript {
                fn from(r: $ty) -> Self {
                    Subscript::Range(r.into())
                }
            }
        )*
    };
}

subscript_from_range!(
    Range,
    std::ops::Range<i32>,
    std::ops::RangeInclusive<i32>,
    std::ops::RangeFrom<i32>,
    std::ops::RangeTo<i32>,
    std::ops::RangeToInclusive<i32>,
    std::ops::RangeFull,
);

/// Build the subscript array for a section call. Integers become
/// indices; Rust ranges and [`Range`] values become ranges.
///
/// ```
/// use fslice::Array;
/// use fslice::View;
/// use fslice::s;
///
/// let mut a = Array::from_fn([3, 4, 5], |[i, j, k]| (100 * i + 10 * j + k) as f64);
/// let v = a.view();
/// let plane: View<'_, f64, 2> = v.section(s![.., 2, ..]);
/// assert_eq!(plane.get([3, 5]), 325.0);
/// ```
#[macro_export]
macro_rules! s {
    ( $( $arg:expr ),* $(,)? ) => {
        [ $( $crate::Subscript::from($arg) ),* ]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(Range::full().resolve(7), (1, 7, 1));
        assert_eq!(Range::full().by(-1).resolve(7), (7, 1, -1));
        assert_eq!(Range::from(3..).resolve(7), (3, 7, 1));
        assert_eq!(Range::from(..5).resolve(7), (1, 4, 1));
        assert_eq!(Range::from(..=5).resolve(7), (1, 5, 1));
        assert_eq!(Range::from(2..6).by(2).resolve(7), (2, 5, 2));
        assert_eq!(
            Range {
                lo: None,
                hi: Some(2),
                stride: -2
            }
            .resolve(7),
            (7, 2, -2)
        );
    }

    #[test]
    fn test_exclusive_end_at_minimum() {
        assert_eq!(Range::from(..i32::MIN).hi, Some(i32::MIN));
        assert_eq!(Range::from(0..i32::MIN), Range::new(0, i32::MIN));
    }

    #[test]
    fn test_display() {
        assert_eq!(Range::full().to_string(), ":");
        assert_eq!(Range::new(2, 5).to_string(), "2:5");
        assert_eq!(Range::new(5, 1).by(-2).to_string(), "5:1:-2");
        assert_eq!(Range::from(3..).to_string(), "3:");
        assert_eq!(Subscript::Index(4).to_string(), "4");
    }

    #[test]
    fn test_macro_classifies_arguments() {
        let subs = crate::s![1, 2..=3, .., ..4, 5.., Range::new(9, 1).by(-4)];
        assert_eq!(subs.iter().filter(|s| s.is_range()).count(), 5);
        assert_eq!(subs[0], Subscript::Index(1));
        assert_eq!(subs[3], Subscript::Range(Range::from(..=3)));
        assert_eq!(
            subs[5],
            Subscript::Range(Range {
                lo: Some(9),
                hi: Some(1),
                stride: -4
            })
        );
    }

    #[test]
    fn test_serde() {
        let r = Range::new(1, 9).by(2);
        let json = serde_json::to_string(&Subscript::Range(r)).unwrap();
        assert_eq!(json, r#"{"Range":{"lo":1,"hi":9,"stride":2}}"#);
        let back: Subscript = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Subscript::Range(r));
    }
}
