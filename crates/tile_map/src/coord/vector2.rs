//! Two-component integer vector and its box iterator.
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub, SubAssign};

use glam::{IVec2, Vec2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coord::IntVector3;
use crate::math::{ceil_divide, floor_divide, pair_signed};

/// Integer vector with two components.
///
/// Ordering is lexicographic: `x` first, then `y`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVector2 {
    pub x: i32,
    pub y: i32,
}

impl IntVector2 {
    pub const ZERO: Self = Self::new(0, 0);
    pub const ONE: Self = Self::new(1, 1);
    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);
    pub const DOWN: Self = Self::new(0, -1);
    pub const UP: Self = Self::new(0, 1);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn splat(v: i32) -> Self {
        Self { x: v, y: v }
    }

    /// Enumerates every point of the closed box `[a, b]`, X fastest.
    pub fn interval(a: Self, b: Self) -> Interval2 {
        Interval2::new(a, b)
    }

    /// Enumerates every point of the half-open box `[a, b)`, X fastest.
    pub fn range(a: Self, b: Self) -> Interval2 {
        Interval2::new(a, b - Self::ONE)
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> i32 {
        self.x * rhs.x + self.y * rhs.y
    }

    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y))
    }

    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y))
    }

    /// Component-wise product.
    #[inline]
    pub fn scale(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }

    /// Component-wise [`floor_divide`] by a scalar.
    #[inline]
    pub fn floor_div(self, d: i32) -> Self {
        Self::new(floor_divide(self.x, d), floor_divide(self.y, d))
    }

    /// Component-wise [`ceil_divide`] by a scalar.
    #[inline]
    pub fn ceil_div(self, d: i32) -> Self {
        Self::new(ceil_divide(self.x, d), ceil_divide(self.y, d))
    }

    /// Area of the rectangle spanned by this vector.
    #[inline]
    pub fn area(self) -> i32 {
        self.x * self.y
    }

    /// Whether the point lies in the closed box `[lower, upper]`.
    #[inline]
    pub fn in_interval(self, lower: Self, upper: Self) -> bool {
        self.x >= lower.x && self.x <= upper.x && self.y >= lower.y && self.y <= upper.y
    }

    /// Whether the point lies in the half-open box `[lower, upper)`.
    #[inline]
    pub fn in_range(self, lower: Self, upper: Self) -> bool {
        self.x >= lower.x && self.x < upper.x && self.y >= lower.y && self.y < upper.y
    }

    /// Flat offset of this position inside `area`, rows of X laid out one after another.
    #[inline]
    pub fn to_index(self, area: Self) -> usize {
        debug_assert!(self.in_range(Self::ZERO, area), "{self} outside {area}");
        (self.y * area.x + self.x) as usize
    }

    /// Inverse of [`IntVector2::to_index`].
    #[inline]
    pub fn from_index(index: usize, area: Self) -> Self {
        let index = index as i32;
        Self::new(index % area.x, index / area.x)
    }

    pub fn floor(v: Vec2) -> Self {
        Self::new(v.x.floor() as i32, v.y.floor() as i32)
    }

    pub fn ceil(v: Vec2) -> Self {
        Self::new(v.x.ceil() as i32, v.y.ceil() as i32)
    }

    /// Rounds half to even.
    pub fn round(v: Vec2) -> Self {
        Self::new(v.x.round_ties_even() as i32, v.y.round_ties_even() as i32)
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    #[inline]
    pub fn extend(self, z: i32) -> IntVector3 {
        IntVector3::new(self.x, self.y, z)
    }

    /// Collision-free key built by Cantor pairing the zigzag-encoded components.
    #[inline]
    pub fn cantor_key(self) -> u128 {
        pair_signed(self.x, self.y)
    }
}

impl fmt::Display for IntVector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for IntVector2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for IntVector2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for IntVector2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for IntVector2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for IntVector2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<i32> for IntVector2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Truncating division; see [`IntVector2::floor_div`] and [`IntVector2::ceil_div`].
impl Div<i32> for IntVector2 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Index<usize> for IntVector2 {
    type Output = i32;
    fn index(&self, i: usize) -> &i32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("IntVector2 index {i} out of range"),
        }
    }
}

impl From<(i32, i32)> for IntVector2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<IVec2> for IntVector2 {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<IntVector2> for IVec2 {
    fn from(v: IntVector2) -> Self {
        IVec2::new(v.x, v.y)
    }
}

impl From<mint::Vector2<i32>> for IntVector2 {
    fn from(v: mint::Vector2<i32>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<IntVector2> for mint::Vector2<i32> {
    fn from(v: IntVector2) -> Self {
        mint::Vector2 { x: v.x, y: v.y }
    }
}

/// Lazy iterator over the closed box `[begin, end]`, X fastest then Y.
///
/// Cloning the iterator restarts from the clone's current position; keep a pristine
/// copy to enumerate the box again.
#[derive(Clone, Debug)]
pub struct Interval2 {
    begin: IntVector2,
    end: IntVector2,
    next: Option<IntVector2>,
}

impl Interval2 {
    pub fn new(begin: IntVector2, end: IntVector2) -> Self {
        let empty = end.x < begin.x || end.y < begin.y;
        Self {
            begin,
            end,
            next: (!empty).then_some(begin),
        }
    }

    pub fn begin(&self) -> IntVector2 {
        self.begin
    }

    /// Inclusive upper corner.
    pub fn end(&self) -> IntVector2 {
        self.end
    }

    fn remaining(&self) -> usize {
        match self.next {
            None => 0,
            Some(p) => {
                let width = (self.end.x as i64) - (self.begin.x as i64) + 1;
                let rows_after = (self.end.y as i64) - (p.y as i64);
                let in_row = (self.end.x as i64) - (p.x as i64) + 1;
                (rows_after * width + in_row) as usize
            }
        }
    }
}

impl Iterator for Interval2 {
    type Item = IntVector2;

    fn next(&mut self) -> Option<IntVector2> {
        let current = self.next?;
        self.next = if current.x < self.end.x {
            Some(IntVector2::new(current.x + 1, current.y))
        } else if current.y < self.end.y {
            Some(IntVector2::new(self.begin.x, current.y + 1))
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Interval2 {}

impl FusedIterator for Interval2 {}
