//! Exact integer helpers used by coordinate and geometry code.
//!
//! Division helpers round toward negative or positive infinity regardless of operand
//! signs, so chunk coordinates of negative tiles floor correctly. The pairing helpers
//! implement Cantor pairing over zigzag-encoded integers and are exact: unpairing uses
//! an integer square root, never floating point.

/// Divides `a` by `b`, rounding toward negative infinity.
///
/// # Panics
///
/// Panics if `b` is zero.
#[inline]
pub fn floor_divide(a: i32, b: i32) -> i32 {
    let q = a / b;
    let r = a % b;
    if r != 0 && ((r < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// Divides `a` by `b`, rounding toward positive infinity.
///
/// # Panics
///
/// Panics if `b` is zero.
#[inline]
pub fn ceil_divide(a: i32, b: i32) -> i32 {
    let q = a / b;
    let r = a % b;
    if r != 0 && ((r < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}

/// Remainder matching [`floor_divide`]: takes the sign of `b`, so it is never negative
/// for a positive divisor. `a == floor_divide(a, b) * b + floor_mod(a, b)`.
///
/// # Panics
///
/// Panics if `b` is zero.
#[inline]
pub fn floor_mod(a: i32, b: i32) -> i32 {
    let r = a % b;
    if r != 0 && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    }
}

/// Maps an integer onto the naturals (zigzag): 0, -1, 1, -2, 2 ... become 0, 1, 2, 3, 4 ...
#[inline]
pub fn z_to_n(x: i32) -> u32 {
    ((x << 1) ^ (x >> 31)) as u32
}

/// Inverse of [`z_to_n`].
#[inline]
pub fn n_to_z(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Cantor pairing of two naturals. Widened to `u128` so every `u32` pair is exact.
#[inline]
pub fn pair(x: u32, y: u32) -> u128 {
    pair_wide(x as u128, y as u128).unwrap_or(u128::MAX)
}

/// Inverse of [`pair`]. Returns `None` when `z` encodes a pair outside the `u32` range.
pub fn unpair(z: u128) -> Option<(u32, u32)> {
    let (x, y) = unpair_wide(z)?;
    Some((u32::try_from(x).ok()?, u32::try_from(y).ok()?))
}

/// Pairs two integers by zigzag-encoding them first.
#[inline]
pub fn pair_signed(x: i32, y: i32) -> u128 {
    pair(z_to_n(x), z_to_n(y))
}

/// Inverse of [`pair_signed`].
pub fn unpair_signed(z: u128) -> Option<(i32, i32)> {
    let (x, y) = unpair(z)?;
    Some((n_to_z(x), n_to_z(y)))
}

/// Cantor pairing on wide operands; `None` on overflow.
pub(crate) fn pair_wide(x: u128, y: u128) -> Option<u128> {
    let s = x.checked_add(y)?;
    let tri = if s % 2 == 0 {
        (s / 2).checked_mul(s.checked_add(1)?)?
    } else {
        s.checked_mul(s.div_ceil(2))?
    };
    tri.checked_add(y)
}

fn unpair_wide(z: u128) -> Option<(u128, u128)> {
    let disc = z.checked_mul(8)?.checked_add(1)?;
    let w = (disc.isqrt() - 1) / 2;
    let t = w * (w + 1) / 2;
    let y = z - t;
    Some((w - y, y))
}
