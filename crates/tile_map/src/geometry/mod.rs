//! Tiling geometry: conversions between tile, normal, renorm and map space.
//!
//! - Tile space: integer tile coordinates as stored in chunks.
//! - Normal space: continuous space where every tile is a unit cell. Staggered
//!   tilings shear their rows here so that neighbouring tiles stay adjacent.
//! - Renorm space: normal space after orientation flips and, for isometric and
//!   staggered tilings, the diamond basis change.
//! - Map space: renorm space scaled by the per-tile size; used to place visuals.
//!
//! A [`Geometry`] caches the six affine matrices between the continuous spaces and
//! recomputes them whenever one of its fields changes.
pub mod boundary;

use std::fmt;

use glam::{Mat4, Vec3, Vec4};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coord::IntVector3;
use crate::error::{Error, Result};
use crate::math::{ceil_divide, floor_divide, floor_mod};

/// Geometric layout family of a tile map.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tiling {
    /// Square grid.
    #[default]
    Rectangular = 0,
    /// Diamond grid.
    Isometric = 1,
    /// Diamond tiles laid out in offset rows, odd rows shifted in.
    StaggeredOdd = 2,
    /// Diamond tiles laid out in offset rows, even rows shifted in.
    StaggeredEven = 3,
}

impl Tiling {
    pub const ALL: [Tiling; 4] = [
        Tiling::Rectangular,
        Tiling::Isometric,
        Tiling::StaggeredOdd,
        Tiling::StaggeredEven,
    ];

    /// Maps the TMX `orientation` and `staggerindex` attributes onto a tiling.
    ///
    /// `staggered` maps to [`Tiling::StaggeredOdd`] unless the stagger index is `even`.
    pub fn from_tmx(orientation: &str, stagger_index: Option<&str>) -> Result<Self> {
        match orientation {
            "orthogonal" => Ok(Tiling::Rectangular),
            "isometric" => Ok(Tiling::Isometric),
            "staggered" => match stagger_index {
                None | Some("odd") => Ok(Tiling::StaggeredOdd),
                Some("even") => Ok(Tiling::StaggeredEven),
                Some(other) => Err(Error::UnsupportedTiling(format!(
                    "staggered with stagger index '{other}'"
                ))),
            },
            other => Err(Error::UnsupportedTiling(other.to_owned())),
        }
    }

    #[inline]
    pub fn is_staggered(self) -> bool {
        matches!(self, Tiling::StaggeredOdd | Tiling::StaggeredEven)
    }
}

impl TryFrom<u8> for Tiling {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Tiling::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| Error::UnsupportedTiling(format!("discriminant {value}")))
    }
}

impl fmt::Display for Tiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tiling::Rectangular => "rectangular",
            Tiling::Isometric => "isometric",
            Tiling::StaggeredOdd => "staggered-odd",
            Tiling::StaggeredEven => "staggered-even",
        };
        f.write_str(name)
    }
}

/// Screen directions the map's X and Y axes point toward.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    RightUp = 0,
    LeftUp = 1,
    RightDown = 2,
    LeftDown = 3,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::RightUp,
        Orientation::LeftUp,
        Orientation::RightDown,
        Orientation::LeftDown,
    ];

    /// Per-axis sign applied in renorm space: `(±1, ±1, 1)`.
    pub fn axis_signs(self) -> Vec3 {
        let x = match self {
            Orientation::RightUp | Orientation::RightDown => 1.0,
            Orientation::LeftUp | Orientation::LeftDown => -1.0,
        };
        let y = match self {
            Orientation::RightUp | Orientation::LeftUp => 1.0,
            Orientation::RightDown | Orientation::LeftDown => -1.0,
        };
        Vec3::new(x, y, 1.0)
    }
}

impl TryFrom<u8> for Orientation {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Orientation::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| Error::UnsupportedOrientation(format!("discriminant {value}")))
    }
}

/// Affine transforms between the continuous spaces of a [`Geometry`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpaceMatrices {
    pub normal_to_renorm: Mat4,
    pub renorm_to_normal: Mat4,
    pub renorm_to_map: Mat4,
    pub map_to_renorm: Mat4,
    pub normal_to_map: Mat4,
    pub map_to_normal: Mat4,
}

impl SpaceMatrices {
    fn compute(tiling: Tiling, orientation: Orientation, size: Vec3) -> Self {
        let flip = Mat4::from_scale(orientation.axis_signs());
        let normal_to_renorm = match tiling {
            Tiling::Rectangular => flip,
            Tiling::Isometric => diamond_basis() * flip,
            Tiling::StaggeredOdd | Tiling::StaggeredEven => flip * diamond_basis(),
        };
        let renorm_to_map = Mat4::from_scale(size);
        let normal_to_map = renorm_to_map * normal_to_renorm;
        Self {
            normal_to_renorm,
            renorm_to_normal: normal_to_renorm.inverse(),
            renorm_to_map,
            map_to_renorm: renorm_to_map.inverse(),
            normal_to_map,
            map_to_normal: normal_to_map.inverse(),
        }
    }
}

/// Rotates the unit square into a diamond; determinant 0.5.
fn diamond_basis() -> Mat4 {
    Mat4::from_cols(
        Vec4::new(0.5, -0.5, 0.0, 0.0),
        Vec4::new(0.5, 0.5, 0.0, 0.0),
        Vec4::Z,
        Vec4::W,
    )
}

/// Serialized form of a [`Geometry`]: the three fields the matrices derive from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryParams {
    pub tiling: Tiling,
    pub orientation: Orientation,
    pub size: Vec3,
}

impl From<GeometryParams> for Geometry {
    fn from(p: GeometryParams) -> Self {
        Geometry::new(p.tiling, p.orientation, p.size)
    }
}

impl From<Geometry> for GeometryParams {
    fn from(g: Geometry) -> Self {
        Self {
            tiling: g.tiling,
            orientation: g.orientation,
            size: g.size,
        }
    }
}

/// Tiling, orientation and per-tile size of a map, plus the transforms derived from them.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "GeometryParams", into = "GeometryParams")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    tiling: Tiling,
    orientation: Orientation,
    size: Vec3,
    matrices: SpaceMatrices,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(Tiling::Rectangular, Orientation::RightUp, Vec3::ONE)
    }
}

impl Geometry {
    pub fn new(tiling: Tiling, orientation: Orientation, size: Vec3) -> Self {
        Self {
            tiling,
            orientation,
            size,
            matrices: SpaceMatrices::compute(tiling, orientation, size),
        }
    }

    pub fn tiling(&self) -> Tiling {
        self.tiling
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Size of one tile in map units.
    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn set_tiling(&mut self, tiling: Tiling) {
        *self = Self::new(tiling, self.orientation, self.size);
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        *self = Self::new(self.tiling, orientation, self.size);
    }

    pub fn set_size(&mut self, size: Vec3) {
        *self = Self::new(self.tiling, self.orientation, size);
    }

    /// Checks that the size keeps every matrix invertible.
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "tile size must be finite (got {})",
                self.size
            )));
        }
        if self.size.cmpeq(Vec3::ZERO).any() {
            return Err(Error::InvalidConfig(format!(
                "tile size must be non-zero on every axis (got {})",
                self.size
            )));
        }
        Ok(())
    }

    pub fn matrices(&self) -> &SpaceMatrices {
        &self.matrices
    }

    pub fn normal_to_renorm(&self) -> Mat4 {
        self.matrices.normal_to_renorm
    }

    pub fn renorm_to_normal(&self) -> Mat4 {
        self.matrices.renorm_to_normal
    }

    pub fn renorm_to_map(&self) -> Mat4 {
        self.matrices.renorm_to_map
    }

    pub fn map_to_renorm(&self) -> Mat4 {
        self.matrices.map_to_renorm
    }

    pub fn normal_to_map(&self) -> Mat4 {
        self.matrices.normal_to_map
    }

    pub fn map_to_normal(&self) -> Mat4 {
        self.matrices.map_to_normal
    }

    /// Normal-space position of the lower corner of a tile.
    ///
    /// Staggered rows are expressed as a shear using floor division and the
    /// non-negative remainder of `y` by two.
    ///
    /// The result is `f32`. It is exact, and [`Geometry::normal_to_tile`] inverts it,
    /// while every tile component stays within `±2^23`.
    pub fn tile_to_normal(&self, tile: IntVector3) -> Vec3 {
        let IntVector3 { x, y, z } = tile;
        match self.tiling {
            Tiling::Rectangular | Tiling::Isometric => tile.as_vec3(),
            Tiling::StaggeredEven => {
                let half = floor_divide(y, 2);
                let odd = floor_mod(y, 2);
                Vec3::new((x - half - odd) as f32, (x + half) as f32, z as f32)
            }
            Tiling::StaggeredOdd => {
                let half = floor_divide(y, 2);
                let odd = floor_mod(y, 2);
                Vec3::new((x - half) as f32, (x + half + odd) as f32, z as f32)
            }
        }
    }

    /// Tile containing a normal-space position; inverse of [`Geometry::tile_to_normal`].
    pub fn normal_to_tile(&self, normal: Vec3) -> IntVector3 {
        let near = IntVector3::floor(normal);
        match self.tiling {
            Tiling::Rectangular | Tiling::Isometric => near,
            Tiling::StaggeredEven => IntVector3::new(
                ceil_divide(near.x + near.y, 2),
                near.y - near.x,
                near.z,
            ),
            Tiling::StaggeredOdd => IntVector3::new(
                floor_divide(near.x + near.y, 2),
                near.y - near.x,
                near.z,
            ),
        }
    }

    /// Draw order key: tiles with a larger key are drawn over tiles with a smaller one.
    ///
    /// `flip_x` / `flip_y` reverse the precedence along that axis. The staggered
    /// formulas use truncating division and remainder.
    pub fn tile_sorting_order(&self, x: i32, y: i32, flip_x: bool, flip_y: bool) -> i32 {
        let sx = if flip_x { -1 } else { 1 };
        let sy = if flip_y { -1 } else { 1 };
        let side = if y > 0 { 1 } else { -1 };
        let odd_row = y % 2 != 0;
        match self.tiling {
            Tiling::Rectangular | Tiling::Isometric => x * sx + y * sy,
            Tiling::StaggeredEven => {
                x * (sx + sy) + (y / 2) * (sy - sx) - side * if odd_row { sx } else { 0 }
            }
            Tiling::StaggeredOdd => {
                x * (sx + sy) + (y / 2) * (sy - sx) + side * if odd_row { sy } else { 0 }
            }
        }
    }

    /// Map-space anchor at the centre of a tile.
    ///
    /// Computed in `f32`. [`Geometry::map_to_tile`] recovers the tile while every tile
    /// component stays within `±2^20`; past that the anchor loses sub-tile precision.
    pub fn tile_center_to_map(&self, tile: IntVector3) -> Vec3 {
        let centre = self.tile_to_normal(tile) + Vec3::new(0.5, 0.5, 0.0);
        self.matrices.normal_to_map.transform_point3(centre)
    }

    /// Tile under a map-space position. Same `f32` range as
    /// [`Geometry::tile_center_to_map`].
    pub fn map_to_tile(&self, map: Vec3) -> IntVector3 {
        self.normal_to_tile(self.matrices.map_to_normal.transform_point3(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_geometries() -> impl Iterator<Item = Geometry> {
        Tiling::ALL.into_iter().flat_map(|t| {
            Orientation::ALL
                .into_iter()
                .map(move |o| Geometry::new(t, o, Vec3::new(2.0, 1.0, 1.0)))
        })
    }

    #[test]
    fn normal_to_tile_inverts_tile_to_normal() {
        for tiling in Tiling::ALL {
            let g = Geometry::new(tiling, Orientation::RightUp, Vec3::ONE);
            for p in IntVector3::interval(IntVector3::new(-9, -9, -2), IntVector3::new(9, 9, 2)) {
                assert_eq!(g.normal_to_tile(g.tile_to_normal(p)), p, "{tiling} at {p}");
            }
        }
    }

    #[test]
    fn round_trip_holds_far_from_origin() {
        for tiling in Tiling::ALL {
            let g = Geometry::new(tiling, Orientation::LeftDown, Vec3::ONE);
            for p in [
                IntVector3::new(100_000, -77_777, 3),
                IntVector3::new(-4_000_001, 4_000_001, 0),
                IntVector3::new(-1, -1, -1),
            ] {
                assert_eq!(g.normal_to_tile(g.tile_to_normal(p)), p, "{tiling} at {p}");
            }
        }
    }

    #[test]
    fn round_trips_hold_at_documented_f32_limits() {
        let normal_limit = (1 << 23) - 1;
        let map_limit = (1 << 20) - 1;
        for g in all_geometries() {
            for (sx, sy) in [(1, 1), (1, -1), (-1, 1), (-1, -1), (0, 1), (1, 0)] {
                let far = IntVector3::new(sx * normal_limit, sy * normal_limit, 0);
                let back = g.normal_to_tile(g.tile_to_normal(far));
                assert_eq!(back, far, "{:?} at {far}", g.tiling());
                let near = IntVector3::new(sx * map_limit, sy * map_limit, 0);
                let back = g.map_to_tile(g.tile_center_to_map(near));
                assert_eq!(back, near, "{:?} at {near}", g.tiling());
            }
        }
    }

    #[test]
    fn staggered_rows_shear_with_floor_semantics() {
        let even = Geometry::new(Tiling::StaggeredEven, Orientation::RightUp, Vec3::ONE);
        assert_eq!(even.tile_to_normal(IntVector3::new(0, 1, 0)), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(even.tile_to_normal(IntVector3::new(0, -1, 0)), Vec3::new(0.0, -1.0, 0.0));
        let odd = Geometry::new(Tiling::StaggeredOdd, Orientation::RightUp, Vec3::ONE);
        assert_eq!(odd.tile_to_normal(IntVector3::new(0, 1, 0)), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(odd.tile_to_normal(IntVector3::new(0, -1, 0)), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rectangular_sorting_order_follows_x_plus_y() {
        let g = Geometry::default();
        for p in IntVector3::interval(IntVector3::splat(-5), IntVector3::new(5, 5, 0)) {
            assert_eq!(g.tile_sorting_order(p.x, p.y, false, false), p.x + p.y);
            assert_eq!(g.tile_sorting_order(p.x, p.y, true, false), -p.x + p.y);
            assert_eq!(g.tile_sorting_order(p.x, p.y, false, true), p.x - p.y);
        }
        assert!(g.tile_sorting_order(1, 1, false, false) > g.tile_sorting_order(0, 1, false, false));
    }

    #[test]
    fn staggered_sorting_order_uses_truncating_arithmetic() {
        let even = Geometry::new(Tiling::StaggeredEven, Orientation::RightUp, Vec3::ONE);
        assert_eq!(even.tile_sorting_order(2, 3, false, false), 3);
        assert_eq!(even.tile_sorting_order(2, -3, false, false), 5);
        assert_eq!(even.tile_sorting_order(0, -3, true, false), -3);
        let odd = Geometry::new(Tiling::StaggeredOdd, Orientation::RightUp, Vec3::ONE);
        assert_eq!(odd.tile_sorting_order(2, 3, false, false), 5);
        assert_eq!(odd.tile_sorting_order(2, -3, false, false), 3);
        assert_eq!(odd.tile_sorting_order(1, 4, false, true), -4);
    }

    #[test]
    fn matrices_invert_each_other() {
        for g in all_geometries() {
            let m = g.matrices();
            assert!((m.normal_to_renorm * m.renorm_to_normal).abs_diff_eq(Mat4::IDENTITY, 1e-5));
            assert!((m.renorm_to_map * m.map_to_renorm).abs_diff_eq(Mat4::IDENTITY, 1e-5));
            assert!((m.normal_to_map * m.map_to_normal).abs_diff_eq(Mat4::IDENTITY, 1e-5));
            assert!(m.normal_to_map.abs_diff_eq(m.renorm_to_map * m.normal_to_renorm, 1e-6));
        }
    }

    #[test]
    fn diamond_basis_has_half_determinant() {
        for tiling in [Tiling::Isometric, Tiling::StaggeredOdd] {
            for o in Orientation::ALL {
                let g = Geometry::new(tiling, o, Vec3::ONE);
                assert!((g.normal_to_renorm().determinant().abs() - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn isometric_applies_flip_before_basis_change() {
        let iso = Geometry::new(Tiling::Isometric, Orientation::LeftUp, Vec3::ONE);
        let stag = Geometry::new(Tiling::StaggeredOdd, Orientation::LeftUp, Vec3::ONE);
        let p = Vec3::new(1.0, 0.0, 0.0);
        assert!(iso.normal_to_renorm().transform_point3(p).abs_diff_eq(Vec3::new(-0.5, 0.5, 0.0), 1e-6));
        assert!(stag.normal_to_renorm().transform_point3(p).abs_diff_eq(Vec3::new(-0.5, -0.5, 0.0), 1e-6));
    }

    #[test]
    fn map_to_tile_recovers_tile_centres() {
        for g in all_geometries() {
            for p in IntVector3::interval(IntVector3::new(-4, -4, 0), IntVector3::new(4, 4, 0)) {
                assert_eq!(g.map_to_tile(g.tile_center_to_map(p)), p, "{:?} at {p}", g.tiling());
            }
        }
    }

    #[test]
    fn setters_refresh_cached_matrices() {
        let mut g = Geometry::default();
        g.set_size(Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(g.renorm_to_map(), Mat4::from_scale(Vec3::new(3.0, 2.0, 1.0)));
        g.set_orientation(Orientation::RightDown);
        assert_eq!(g.normal_to_renorm(), Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0)));
        g.set_tiling(Tiling::Isometric);
        assert_eq!(g, Geometry::new(Tiling::Isometric, Orientation::RightDown, Vec3::new(3.0, 2.0, 1.0)));
    }

    #[test]
    fn validate_rejects_degenerate_sizes() {
        assert!(Geometry::default().validate().is_ok());
        let flat = Geometry::new(Tiling::Rectangular, Orientation::RightUp, Vec3::new(1.0, 0.0, 1.0));
        assert!(matches!(flat.validate(), Err(Error::InvalidConfig(_))), "zero size rejected");
        let nan = Geometry::new(Tiling::Rectangular, Orientation::RightUp, Vec3::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn tmx_orientation_maps_onto_tiling() {
        assert_eq!(Tiling::from_tmx("orthogonal", None).unwrap(), Tiling::Rectangular);
        assert_eq!(Tiling::from_tmx("isometric", None).unwrap(), Tiling::Isometric);
        assert_eq!(Tiling::from_tmx("staggered", None).unwrap(), Tiling::StaggeredOdd);
        assert_eq!(Tiling::from_tmx("staggered", Some("even")).unwrap(), Tiling::StaggeredEven);
        assert!(matches!(
            Tiling::from_tmx("hexagonal", None),
            Err(Error::UnsupportedTiling(ref s)) if s == "hexagonal"
        ));
    }

    #[test]
    fn discriminants_are_checked() {
        assert_eq!(Tiling::try_from(3).unwrap(), Tiling::StaggeredEven);
        assert!(matches!(Tiling::try_from(4), Err(Error::UnsupportedTiling(_))));
        assert_eq!(Orientation::try_from(2).unwrap(), Orientation::RightDown);
        assert!(matches!(Orientation::try_from(9), Err(Error::UnsupportedOrientation(_))));
    }
}
