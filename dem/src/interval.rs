//! Closed integer intervals used to describe sample extents.

use crate::DemError;
use std::fmt;

/// A closed interval `[from..to]` of integer sample indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval1D {
    from: i32,
    to: i32,
}

impl Interval1D {
    pub fn new(from: i32, to: i32) -> Result<Self, DemError> {
        if to < from {
            return Err(DemError::Interval(from, to));
        }
        Ok(Self { from, to })
    }

    pub(crate) fn new_unchecked(from: i32, to: i32) -> Self {
        debug_assert!(from <= to);
        Self { from, to }
    }

    /// Smallest element of the interval.
    pub fn included_from(&self) -> i32 {
        self.from
    }

    /// Largest element of the interval.
    pub fn included_to(&self) -> i32 {
        self.to
    }

    /// Number of integers in the interval.
    pub fn size(&self) -> u64 {
        u64::from(self.to.abs_diff(self.from)) + 1
    }

    pub fn contains(&self, v: i32) -> bool {
        self.from <= v && v <= self.to
    }

    pub fn size_of_intersection_with(&self, that: &Self) -> u64 {
        let from = self.from.max(that.from);
        let to = self.to.min(that.to);
        if to < from {
            0
        } else {
            u64::from(to.abs_diff(from)) + 1
        }
    }

    /// Smallest interval containing both `self` and `that`.
    pub fn bounding_union(&self, that: &Self) -> Self {
        Self {
            from: self.from.min(that.from),
            to: self.to.max(that.to),
        }
    }

    /// True when `self` and `that` overlap or touch, so their union
    /// has no gap.
    pub fn is_unionable_with(&self, that: &Self) -> bool {
        self.size() + that.size() - self.size_of_intersection_with(that)
            == self.bounding_union(that).size()
    }

    pub fn union(&self, that: &Self) -> Result<Self, DemError> {
        if self.is_unionable_with(that) {
            Ok(self.bounding_union(that))
        } else {
            Err(DemError::NotUnionable1D(*self, *that))
        }
    }
}

impl fmt::Display for Interval1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.from, self.to)
    }
}

/// Cartesian product of two [`Interval1D`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval2D {
    x: Interval1D,
    y: Interval1D,
}

impl Interval2D {
    pub fn new(x: Interval1D, y: Interval1D) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> Interval1D {
        self.x
    }

    pub fn y(&self) -> Interval1D {
        self.y
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x.contains(x) && self.y.contains(y)
    }

    pub fn size(&self) -> u128 {
        u128::from(self.x.size()) * u128::from(self.y.size())
    }

    pub fn size_of_intersection_with(&self, that: &Self) -> u128 {
        u128::from(self.x.size_of_intersection_with(&that.x))
            * u128::from(self.y.size_of_intersection_with(&that.y))
    }

    pub fn bounding_union(&self, that: &Self) -> Self {
        Self {
            x: self.x.bounding_union(&that.x),
            y: self.y.bounding_union(&that.y),
        }
    }

    /// True when both axes are independently unionable.
    pub fn is_unionable_with(&self, that: &Self) -> bool {
        self.x.is_unionable_with(&that.x) && self.y.is_unionable_with(&that.y)
    }

    /// True when `self` and `that` together cover their bounding
    /// union with no hole.
    ///
    /// Axis-wise unionability is not enough: `[0..1]×[0..1]` and
    /// `[2..3]×[2..3]` are unionable on both axes yet leave two empty
    /// quadrants in their bounding rectangle.
    pub fn tiles_exactly_with(&self, that: &Self) -> bool {
        self.is_unionable_with(that)
            && self.size() + that.size() - self.size_of_intersection_with(that)
                == self.bounding_union(that).size()
    }

    pub fn union(&self, that: &Self) -> Result<Self, DemError> {
        if self.is_unionable_with(that) {
            Ok(self.bounding_union(that))
        } else {
            Err(DemError::NotUnionable(*self, *that))
        }
    }
}

impl fmt::Display for Interval2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.x, self.y)
    }
}
