//! Tile sets and the global tile ID space that partitions them.
//!
//! A [`TileLibrary`] maps global tile IDs (GIDs) onto `(tile set, local index)` pairs.
//! Each registered tile set owns the half-open range `[first_id, first_id + len)`;
//! ranges never overlap and gaps between them are allowed, matching the TMX
//! `firstgid` allocation model.
pub mod animation;
pub mod tile;

use std::fmt;

use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub use animation::TileAnimation;
pub use tile::{PropertyMap, TileFlip, TileGid, TileInfo, TileTransform};

/// Global tile identifier.
pub type TileId = i32;

/// A dense, indexable collection of tiles.
pub trait TileSet {
    type Tile;

    /// Number of local tile indices.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tile at a local index, `None` past the end.
    fn tile(&self, index: usize) -> Option<&Self::Tile>;

    /// Offset added to every tile of this set when placed in map space.
    fn draw_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn name(&self) -> &str {
        ""
    }
}

/// Tile set backed by a `Vec<T>`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct GenericTileSet<T> {
    pub name: String,
    pub tiles: Vec<T>,
    pub draw_offset: Vec2,
}

impl<T> GenericTileSet<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tiles: Vec::new(),
            draw_offset: Vec2::ZERO,
        }
    }

    pub fn from_tiles(name: impl Into<String>, tiles: Vec<T>) -> Self {
        Self {
            name: name.into(),
            tiles,
            draw_offset: Vec2::ZERO,
        }
    }

    pub fn with_draw_offset(mut self, offset: Vec2) -> Self {
        self.draw_offset = offset;
        self
    }

    /// Appends a tile and returns its local index.
    pub fn push(&mut self, tile: T) -> usize {
        self.tiles.push(tile);
        self.tiles.len() - 1
    }
}

impl<T> TileSet for GenericTileSet<T> {
    type Tile = T;

    fn len(&self) -> usize {
        self.tiles.len()
    }

    fn tile(&self, index: usize) -> Option<&T> {
        self.tiles.get(index)
    }

    fn draw_offset(&self) -> Vec2 {
        self.draw_offset
    }

    fn name(&self) -> &str {
        &self.name
    }
}

type BoxedTileSet<T> = Box<dyn TileSet<Tile = T>>;

/// Sorted interval map from first global ID to tile set.
pub struct TileLibrary<T> {
    first_ids: Vec<TileId>,
    sets: Vec<BoxedTileSet<T>>,
}

impl<T> Default for TileLibrary<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TileLibrary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.first_ids
                    .iter()
                    .zip(&self.sets)
                    .map(|(id, set)| (id, (set.name(), set.len()))),
            )
            .finish()
    }
}

fn end_of(first_id: TileId, len: usize) -> i64 {
    first_id as i64 + len as i64
}

impl<T> TileLibrary<T> {
    pub fn new() -> Self {
        Self {
            first_ids: Vec::new(),
            sets: Vec::new(),
        }
    }

    /// Number of registered tile sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// First ID an appended tile set would receive: one past the last range, or 0.
    /// An empty last tile set still holds its first ID.
    pub fn next_first_id(&self) -> i64 {
        match (self.first_ids.last(), self.sets.last()) {
            (Some(&id), Some(set)) => end_of(id, set.len().max(1)),
            _ => 0,
        }
    }

    /// Appends a tile set after the last registered range.
    ///
    /// Fails only when the ID space is exhausted.
    pub fn add_tile_set<S>(&mut self, tile_set: S) -> Result<TileId>
    where
        S: TileSet<Tile = T> + 'static,
    {
        let next = self.next_first_id();
        let first_id = TileId::try_from(next).map_err(|_| Error::TileSetOverlap {
            first_id: TileId::MAX,
            count: tile_set.len(),
        })?;
        debug!(first_id, count = tile_set.len(), "tile set appended");
        self.first_ids.push(first_id);
        self.sets.push(Box::new(tile_set));
        Ok(first_id)
    }

    /// Inserts a tile set at a chosen first ID.
    ///
    /// Rejects negative IDs and any range that would overlap a registered one,
    /// leaving the library untouched.
    pub fn add_tile_set_at<S>(&mut self, tile_set: S, first_id: TileId) -> Result<TileId>
    where
        S: TileSet<Tile = T> + 'static,
    {
        if first_id < 0 {
            return Err(Error::NegativeFirstId { first_id });
        }
        let count = tile_set.len();
        let overlap = Error::TileSetOverlap { first_id, count };

        let slot = match self.first_ids.binary_search(&first_id) {
            Ok(_) => return Err(overlap),
            Err(slot) => slot,
        };
        if let Some(prev) = slot.checked_sub(1) {
            if end_of(self.first_ids[prev], self.sets[prev].len()) > first_id as i64 {
                return Err(overlap);
            }
        }
        if let Some(&next) = self.first_ids.get(slot) {
            if end_of(first_id, count) > next as i64 {
                return Err(overlap);
            }
        }
        if end_of(first_id, count) > TileId::MAX as i64 + 1 {
            return Err(overlap);
        }

        debug!(first_id, count, "tile set inserted");
        self.first_ids.insert(slot, first_id);
        self.sets.insert(slot, Box::new(tile_set));
        Ok(first_id)
    }

    /// Resolves a global ID into its tile set and local index.
    ///
    /// `None` when no range contains `gid`.
    pub fn tile_set_and_id(&self, gid: TileId) -> Option<(&dyn TileSet<Tile = T>, usize)> {
        let index = match self.first_ids.binary_search(&gid) {
            Ok(i) => i,
            Err(0) => return None,
            Err(i) => i - 1,
        };
        let local = (gid - self.first_ids[index]) as usize;
        let set = self.sets[index].as_ref();
        (local < set.len()).then_some((set, local))
    }

    pub fn tile_set(&self, gid: TileId) -> Option<&dyn TileSet<Tile = T>> {
        self.tile_set_and_id(gid).map(|(set, _)| set)
    }

    pub fn tile_info(&self, gid: TileId) -> Option<&T> {
        let (set, local) = self.tile_set_and_id(gid)?;
        set.tile(local)
    }

    /// First ID of the range containing `gid`.
    pub fn first_id_of(&self, gid: TileId) -> Option<TileId> {
        self.tile_set_and_id(gid).map(|(_, local)| gid - local as TileId)
    }

    /// Registered tile sets in ascending first-ID order.
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &dyn TileSet<Tile = T>)> + '_ {
        self.first_ids
            .iter()
            .copied()
            .zip(self.sets.iter().map(|s| s.as_ref()))
    }
}
