//! Tile and chunk boundary classification for debug overlays.
//!
//! [`boundary_segments`] walks a box of chunks and emits every tile edge as a
//! normal-space line segment tagged with whether it also lies on a chunk border.
//! Drawing is left to the caller; transform the segments with
//! [`Geometry::normal_to_map`] to place them in map space.
use glam::{Mat4, Vec3};

use crate::coord::IntVector3;
use crate::geometry::{Geometry, Tiling};
use crate::math::floor_mod;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Tile,
    Chunk,
}

impl BoundaryKind {
    fn of(on_chunk_border: bool) -> Self {
        if on_chunk_border {
            BoundaryKind::Chunk
        } else {
            BoundaryKind::Tile
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundarySegment {
    pub start: Vec3,
    pub end: Vec3,
    pub kind: BoundaryKind,
}

impl BoundarySegment {
    /// Applies an affine transform to both end points.
    pub fn transformed(&self, m: &Mat4) -> Self {
        Self {
            start: m.transform_point3(self.start),
            end: m.transform_point3(self.end),
            kind: self.kind,
        }
    }
}

#[inline]
fn divisible(a: i32, b: i32) -> bool {
    floor_mod(a, b) == 0
}

/// Enumerates the boundaries of every tile in the chunks `[chunk_least, chunk_greatest]`.
///
/// `chunk_size` is in tiles and must be positive on every axis. Use a Z size of 1 and
/// equal Z bounds for 2D maps.
pub fn boundary_segments(
    geometry: &Geometry,
    chunk_size: IntVector3,
    chunk_least: IntVector3,
    chunk_greatest: IntVector3,
) -> Vec<BoundarySegment> {
    debug_assert!(
        chunk_size.x > 0 && chunk_size.y > 0 && chunk_size.z > 0,
        "chunk_size must be > 0"
    );
    let lo = chunk_least.scale(chunk_size);
    let hi = (chunk_greatest + IntVector3::ONE).scale(chunk_size);
    let mut out = Vec::new();
    if hi.x <= lo.x || hi.y <= lo.y || hi.z <= lo.z {
        return out;
    }

    if geometry.tiling().is_staggered() {
        staggered_segments(geometry, chunk_size, lo, hi, &mut out);
    } else {
        grid_segments(geometry, chunk_size, lo, hi, &mut out);
    }
    out
}

fn grid_segments(
    geometry: &Geometry,
    size: IntVector3,
    lo: IntVector3,
    hi: IntVector3,
    out: &mut Vec<BoundarySegment>,
) {
    let mut push = |on_chunk: bool, a: IntVector3, b: IntVector3| {
        out.push(BoundarySegment {
            start: geometry.tile_to_normal(a),
            end: geometry.tile_to_normal(b),
            kind: BoundaryKind::of(on_chunk),
        });
    };

    for y in lo.y..=hi.y {
        for x in lo.x..=hi.x {
            let on_chunk = divisible(x, size.x) && divisible(y, size.y);
            push(on_chunk, IntVector3::new(x, y, lo.z), IntVector3::new(x, y, hi.z));
        }
    }
    for z in lo.z..=hi.z {
        for x in lo.x..=hi.x {
            let on_chunk = divisible(x, size.x) && divisible(z, size.z);
            push(on_chunk, IntVector3::new(x, lo.y, z), IntVector3::new(x, hi.y, z));
        }
    }
    for z in lo.z..=hi.z {
        for y in lo.y..=hi.y {
            let on_chunk = divisible(y, size.y) && divisible(z, size.z);
            push(on_chunk, IntVector3::new(lo.x, y, z), IntVector3::new(hi.x, y, z));
        }
    }
}

fn staggered_segments(
    geometry: &Geometry,
    size: IntVector3,
    lo: IntVector3,
    hi: IntVector3,
    out: &mut Vec<BoundarySegment>,
) {
    // Rows that start a chunk on the left alternate with the row parity.
    let border_even = geometry.tiling() == Tiling::StaggeredOdd;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);

    for tile in IntVector3::range(lo, hi) {
        let IntVector3 { x, y, z } = tile;
        let even_row = divisible(y, 2);
        let down = divisible(y, size.y);
        let up = divisible(y + 1, size.y);
        let left = divisible(x, size.x) && (even_row == border_even);
        let right = divisible(x + 1, size.x) && (even_row != border_even);
        let back = divisible(z, size.z);
        let front = divisible(z + 1, size.z);

        let p = geometry.tile_to_normal(tile);
        let mut edge = |on_chunk: bool, a: Vec3, b: Vec3| {
            out.push(BoundarySegment {
                start: p + a,
                end: p + b,
                kind: BoundaryKind::of(on_chunk),
            });
        };

        for (depth, border) in [(0.0, back), (1.0, front)] {
            edge((down || left) && border, corner(0.0, 0.0, depth), corner(1.0, 0.0, depth));
            edge((right || down) && border, corner(1.0, 0.0, depth), corner(1.0, 1.0, depth));
            edge((up || right) && border, corner(1.0, 1.0, depth), corner(0.0, 1.0, depth));
            edge((left || up) && border, corner(0.0, 1.0, depth), corner(0.0, 0.0, depth));
            if depth == 0.0 {
                edge(down && left, Vec3::ZERO, corner(0.0, 0.0, 1.0));
                edge(right && down, corner(1.0, 0.0, 0.0), corner(1.0, 0.0, 1.0));
                edge(up && right, corner(1.0, 1.0, 0.0), corner(1.0, 1.0, 1.0));
                edge(left && up, corner(0.0, 1.0, 0.0), corner(0.0, 1.0, 1.0));
            }
        }
    }
}
