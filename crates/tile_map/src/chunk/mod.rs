//! Chunks: fixed-size blocks of layered tile GIDs and the layout that places them.
//!
//! A [`Chunk`] stores raw GIDs (flip flags included) for every layer of a
//! `size.x * size.y` block of tiles. A [`ChunkLayout`] converts between tile
//! coordinates and `(chunk index, local coordinate)` pairs using floor division, so
//! negative tile coordinates land in negative chunks.
pub mod bake;
pub mod generator;
pub mod manager;
pub mod store;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coord::{Interval2, IntVector2, IntVector3};
use crate::error::{Error, Result};
use crate::math::{floor_divide, floor_mod};

pub use bake::{bake_chunks, BakedChunks};
pub use generator::SeededChunkGenerator;
pub use manager::ChunkManager;
pub use store::{chunk_key, ChunkStore, MemoryChunkStore, StaticChunkManager};
#[cfg(feature = "ron")]
pub use store::DirChunkStore;

/// Layered block of raw tile GIDs.
///
/// `ids` is laid out X fastest, then Y, then layer; see [`IntVector3::to_index`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk coordinate.
    pub index: IntVector2,
    /// `(width, height, layers)` in tiles.
    pub size: IntVector3,
    pub ids: Vec<u32>,
}

impl Chunk {
    /// Zero-filled chunk.
    pub fn new(index: IntVector2, size: IntVector3) -> Result<Self> {
        Self::check_size(size)?;
        Ok(Self {
            index,
            size,
            ids: vec![0; size.volume() as usize],
        })
    }

    /// Wraps existing GIDs; their count must match `size`.
    pub fn from_ids(index: IntVector2, size: IntVector3, ids: Vec<u32>) -> Result<Self> {
        Self::check_size(size)?;
        if ids.len() != size.volume() as usize {
            return Err(Error::InvalidChunk(format!(
                "chunk {index} of size {size} needs {} ids, got {}",
                size.volume(),
                ids.len()
            )));
        }
        Ok(Self { index, size, ids })
    }

    fn check_size(size: IntVector3) -> Result<()> {
        if size.x <= 0 || size.y <= 0 || size.z < 0 {
            return Err(Error::InvalidChunk(format!(
                "chunk size must be positive with a non-negative layer count (got {size})"
            )));
        }
        Ok(())
    }

    /// Controller coordinate of this chunk (`z = 0`).
    pub fn coord(&self) -> IntVector3 {
        self.index.extend(0)
    }

    /// Width and height in tiles.
    pub fn tile_size(&self) -> IntVector2 {
        self.size.truncate()
    }

    pub fn layers(&self) -> usize {
        self.size.z as usize
    }

    fn offset(&self, local: IntVector2, layer: usize) -> Result<usize> {
        if layer >= self.layers() {
            return Err(Error::LayerOutOfRange {
                layer,
                layers: self.layers(),
            });
        }
        if !local.in_range(IntVector2::ZERO, self.tile_size()) {
            return Err(Error::TileOutOfRange {
                local,
                size: self.tile_size(),
            });
        }
        Ok(local.extend(layer as i32).to_index(self.size))
    }

    /// Raw GID at a local tile coordinate.
    pub fn get(&self, local: IntVector2, layer: usize) -> Result<u32> {
        Ok(self.ids[self.offset(local, layer)?])
    }

    /// Replaces the raw GID at a local tile coordinate and returns the old one.
    pub fn set(&mut self, local: IntVector2, layer: usize, gid: u32) -> Result<u32> {
        let i = self.offset(local, layer)?;
        Ok(std::mem::replace(&mut self.ids[i], gid))
    }

    /// GIDs of one layer, row by row.
    pub fn layer(&self, layer: usize) -> Option<&[u32]> {
        let area = self.tile_size().area() as usize;
        (layer < self.layers()).then(|| &self.ids[layer * area..(layer + 1) * area])
    }

    /// `(local x, local y, layer)` and GID of every cell.
    pub fn cells(&self) -> impl Iterator<Item = (IntVector3, u32)> + '_ {
        IntVector3::range(IntVector3::ZERO, self.size).zip(self.ids.iter().copied())
    }
}

/// Inclusive box of chunk coordinates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkBounds {
    pub least: IntVector2,
    pub greatest: IntVector2,
}

impl ChunkBounds {
    pub fn new(least: IntVector2, greatest: IntVector2) -> Self {
        Self { least, greatest }
    }

    pub fn is_empty(&self) -> bool {
        self.greatest.x < self.least.x || self.greatest.y < self.least.y
    }

    pub fn contains(&self, chunk: IntVector2) -> bool {
        chunk.in_interval(self.least, self.greatest)
    }

    /// Intersection with another box, `None` when disjoint.
    pub fn intersect(&self, other: &ChunkBounds) -> Option<ChunkBounds> {
        let b = ChunkBounds::new(self.least.max(other.least), self.greatest.min(other.greatest));
        (!b.is_empty()).then_some(b)
    }

    pub fn iter(&self) -> Interval2 {
        IntVector2::interval(self.least, self.greatest)
    }

    pub fn chunk_count(&self) -> usize {
        self.iter().len()
    }
}

/// How tile coordinates split into chunks, and which chunks exist.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkLayout {
    pub chunk_size: IntVector2,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounds: Option<ChunkBounds>,
}

impl ChunkLayout {
    pub fn new(chunk_size: IntVector2) -> Self {
        Self {
            chunk_size,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: ChunkBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size.x <= 0 || self.chunk_size.y <= 0 {
            return Err(Error::InvalidConfig(format!(
                "chunk_size must be > 0 on both axes (got {})",
                self.chunk_size
            )));
        }
        if let Some(b) = self.bounds {
            if b.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "chunk bounds are inverted: least {} greatest {}",
                    b.least, b.greatest
                )));
            }
        }
        Ok(())
    }

    /// Chunk containing a tile.
    pub fn chunk_of_tile(&self, tile: IntVector2) -> IntVector2 {
        IntVector2::new(
            floor_divide(tile.x, self.chunk_size.x),
            floor_divide(tile.y, self.chunk_size.y),
        )
    }

    /// Tile position inside its chunk, always in `[0, chunk_size)`.
    pub fn local_of_tile(&self, tile: IntVector2) -> IntVector2 {
        IntVector2::new(
            floor_mod(tile.x, self.chunk_size.x),
            floor_mod(tile.y, self.chunk_size.y),
        )
    }

    /// Tile coordinate of a local position inside a chunk.
    pub fn tile_of(&self, chunk: IntVector2, local: IntVector2) -> IntVector2 {
        chunk.scale(self.chunk_size) + local
    }

    /// Whether a chunk lies inside the bounds; always true without bounds.
    pub fn contains_chunk(&self, chunk: IntVector2) -> bool {
        self.bounds.is_none_or(|b| b.contains(chunk))
    }
}

/// Creates a deterministic seed for a chunk from a base seed.
pub fn seed_for_chunk(base_seed: u64, chunk: IntVector2) -> u64 {
    let cx = chunk.x as i64 as u64;
    let cy = chunk.y as i64 as u64;
    let mixed =
        base_seed ^ cx.wrapping_mul(0x9E3779B97F4A7C15) ^ cy.wrapping_mul(0xBF58476D1CE4E5B9);
    mix_u64(mixed)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
