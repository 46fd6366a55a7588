//! Three-component integer vector and its box iterator.
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub, SubAssign};

use glam::{IVec3, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coord::IntVector2;
use crate::math::{ceil_divide, floor_divide, pair_wide, z_to_n};

/// Integer vector with three components, used for chunk coordinates and tile positions.
///
/// Ordering is lexicographic: `x`, then `y`, then `z`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVector3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl IntVector3 {
    pub const ZERO: Self = Self::new(0, 0, 0);
    pub const ONE: Self = Self::new(1, 1, 1);
    pub const LEFT: Self = Self::new(-1, 0, 0);
    pub const RIGHT: Self = Self::new(1, 0, 0);
    pub const DOWN: Self = Self::new(0, -1, 0);
    pub const UP: Self = Self::new(0, 1, 0);
    pub const BACK: Self = Self::new(0, 0, -1);
    pub const FORWARD: Self = Self::new(0, 0, 1);

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: i32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Enumerates every point of the closed box `[a, b]`, X fastest, then Y, then Z.
    pub fn interval(a: Self, b: Self) -> Interval3 {
        Interval3::new(a, b)
    }

    /// Enumerates every point of the half-open box `[a, b)`, X fastest, then Y, then Z.
    pub fn range(a: Self, b: Self) -> Interval3 {
        Interval3::new(a, b - Self::ONE)
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> i32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    #[inline]
    pub fn scale(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }

    #[inline]
    pub fn floor_div(self, d: i32) -> Self {
        Self::new(
            floor_divide(self.x, d),
            floor_divide(self.y, d),
            floor_divide(self.z, d),
        )
    }

    #[inline]
    pub fn ceil_div(self, d: i32) -> Self {
        Self::new(
            ceil_divide(self.x, d),
            ceil_divide(self.y, d),
            ceil_divide(self.z, d),
        )
    }

    #[inline]
    pub fn volume(self) -> i32 {
        self.x * self.y * self.z
    }

    #[inline]
    pub fn in_interval(self, lower: Self, upper: Self) -> bool {
        self.x >= lower.x
            && self.x <= upper.x
            && self.y >= lower.y
            && self.y <= upper.y
            && self.z >= lower.z
            && self.z <= upper.z
    }

    #[inline]
    pub fn in_range(self, lower: Self, upper: Self) -> bool {
        self.x >= lower.x
            && self.x < upper.x
            && self.y >= lower.y
            && self.y < upper.y
            && self.z >= lower.z
            && self.z < upper.z
    }

    /// Flat offset inside `volume`, X fastest, then Y, then Z.
    #[inline]
    pub fn to_index(self, volume: Self) -> usize {
        debug_assert!(self.in_range(Self::ZERO, volume), "{self} outside {volume}");
        ((self.z * volume.y + self.y) * volume.x + self.x) as usize
    }

    /// Inverse of [`IntVector3::to_index`].
    #[inline]
    pub fn from_index(index: usize, volume: Self) -> Self {
        let index = index as i32;
        Self::new(
            index % volume.x,
            index / volume.x % volume.y,
            index / volume.x / volume.y,
        )
    }

    pub fn floor(v: Vec3) -> Self {
        Self::new(v.x.floor() as i32, v.y.floor() as i32, v.z.floor() as i32)
    }

    pub fn ceil(v: Vec3) -> Self {
        Self::new(v.x.ceil() as i32, v.y.ceil() as i32, v.z.ceil() as i32)
    }

    /// Rounds half to even.
    pub fn round(v: Vec3) -> Self {
        Self::new(
            v.x.round_ties_even() as i32,
            v.y.round_ties_even() as i32,
            v.z.round_ties_even() as i32,
        )
    }

    #[inline]
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    #[inline]
    pub fn truncate(self) -> IntVector2 {
        IntVector2::new(self.x, self.y)
    }

    /// Cantor key `pair(x, pair(y, z))` over zigzag-encoded components.
    /// `None` when the nested pairing leaves the `u128` range.
    pub fn cantor_key(self) -> Option<u128> {
        let inner = pair_wide(z_to_n(self.y) as u128, z_to_n(self.z) as u128)?;
        pair_wide(z_to_n(self.x) as u128, inner)
    }
}

impl fmt::Display for IntVector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for IntVector3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for IntVector3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for IntVector3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for IntVector3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for IntVector3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<i32> for IntVector3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Truncating division; see [`IntVector3::floor_div`] and [`IntVector3::ceil_div`].
impl Div<i32> for IntVector3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Index<usize> for IntVector3 {
    type Output = i32;
    fn index(&self, i: usize) -> &i32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("IntVector3 index {i} out of range"),
        }
    }
}

impl From<(i32, i32, i32)> for IntVector3 {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<IVec3> for IntVector3 {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<IntVector3> for IVec3 {
    fn from(v: IntVector3) -> Self {
        IVec3::new(v.x, v.y, v.z)
    }
}

impl From<mint::Vector3<i32>> for IntVector3 {
    fn from(v: mint::Vector3<i32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<IntVector3> for mint::Vector3<i32> {
    fn from(v: IntVector3) -> Self {
        mint::Vector3 {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Lazy iterator over the closed box `[begin, end]`, X fastest, then Y, then Z.
#[derive(Clone, Debug)]
pub struct Interval3 {
    begin: IntVector3,
    end: IntVector3,
    next: Option<IntVector3>,
}

impl Interval3 {
    pub fn new(begin: IntVector3, end: IntVector3) -> Self {
        let empty = end.x < begin.x || end.y < begin.y || end.z < begin.z;
        Self {
            begin,
            end,
            next: (!empty).then_some(begin),
        }
    }

    pub fn begin(&self) -> IntVector3 {
        self.begin
    }

    pub fn end(&self) -> IntVector3 {
        self.end
    }

    fn remaining(&self) -> usize {
        let Some(p) = self.next else {
            return 0;
        };
        let width = (self.end.x as i64) - (self.begin.x as i64) + 1;
        let height = (self.end.y as i64) - (self.begin.y as i64) + 1;
        let slices_after = (self.end.z as i64) - (p.z as i64);
        let rows_after = (self.end.y as i64) - (p.y as i64);
        let in_row = (self.end.x as i64) - (p.x as i64) + 1;
        (slices_after * width * height + rows_after * width + in_row) as usize
    }
}

impl Iterator for Interval3 {
    type Item = IntVector3;

    fn next(&mut self) -> Option<IntVector3> {
        let c = self.next?;
        self.next = if c.x < self.end.x {
            Some(IntVector3::new(c.x + 1, c.y, c.z))
        } else if c.y < self.end.y {
            Some(IntVector3::new(self.begin.x, c.y + 1, c.z))
        } else if c.z < self.end.z {
            Some(IntVector3::new(self.begin.x, self.begin.y, c.z + 1))
        } else {
            None
        };
        Some(c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Interval3 {}

impl FusedIterator for Interval3 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_compares_x_then_y_then_z() {
        assert!(IntVector3::new(0, 9, 9) < IntVector3::new(1, 0, 0));
        assert!(IntVector3::new(1, 0, 9) < IntVector3::new(1, 1, 0));
        assert!(IntVector3::new(1, 1, 0) < IntVector3::new(1, 1, 1));
    }

    #[test]
    fn range_matches_index_layout() {
        let volume = IntVector3::new(3, 2, 2);
        let mut flat = vec![IntVector3::splat(-1); volume.volume() as usize];
        for p in IntVector3::range(IntVector3::ZERO, volume) {
            flat[p.to_index(volume)] = p;
        }
        for (i, p) in flat.iter().enumerate() {
            assert_eq!(IntVector3::from_index(i, volume), *p);
        }
        let order: Vec<_> = IntVector3::range(IntVector3::ZERO, volume).collect();
        assert_eq!(order[1], IntVector3::new(1, 0, 0));
        assert_eq!(order[3], IntVector3::new(0, 1, 0));
        assert_eq!(order[6], IntVector3::new(0, 0, 1));
    }

    #[test]
    fn interval_len_tracks_progress() {
        let mut it = IntVector3::interval(IntVector3::splat(-1), IntVector3::splat(1));
        assert_eq!(it.len(), 27);
        for expected in (0..27).rev() {
            it.next();
            assert_eq!(it.len(), expected);
        }
        assert_eq!(it.next(), None);
    }

    #[test]
    fn helpers_match_componentwise_definitions() {
        let a = IntVector3::new(-5, 4, 1);
        assert_eq!(a.floor_div(2), IntVector3::new(-3, 2, 0));
        assert_eq!(a.ceil_div(2), IntVector3::new(-2, 2, 1));
        assert_eq!(a.truncate(), IntVector2::new(-5, 4));
        assert_eq!(a.truncate().extend(1), a);
        assert_eq!(a.dot(IntVector3::ONE), 0);
        assert_eq!(a[2], 1);
        assert_eq!(IntVector3::floor(Vec3::new(-0.1, 0.9, 2.0)), IntVector3::new(-1, 0, 2));
        assert_eq!(IntVector3::ceil(Vec3::new(-0.1, 0.9, 2.0)), IntVector3::new(0, 1, 2));
    }

    #[test]
    fn cantor_key_distinguishes_neighbours() {
        let keys: std::collections::HashSet<_> =
            IntVector3::interval(IntVector3::splat(-3), IntVector3::splat(3))
                .map(|p| p.cantor_key().expect("small coordinates fit"))
                .collect();
        assert_eq!(keys.len(), 7 * 7 * 7);
    }
}
