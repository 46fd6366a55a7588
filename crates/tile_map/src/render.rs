//! Renderer seam between the controller and whatever produces visuals.
//!
//! [`ChunkRenderer`] is the collaborator the controller calls when a chunk becomes
//! visible. [`InstanceRenderer`] is a pixel-free implementation: it resolves every
//! GID through the library and records where each tile goes, in which order, and
//! with which flips, so an engine can spawn sprites from the result.
use glam::Vec3;
use tracing::warn;

use crate::chunk::Chunk;
use crate::coord::{IntVector2, IntVector3};
use crate::library::{TileAnimation, TileGid, TileId, TileTransform};
use crate::map::TileMap;

/// Read-only view of the map handed to renderers.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub map: &'a TileMap,
}

impl<'a> RenderContext<'a> {
    pub fn new(map: &'a TileMap) -> Self {
        Self { map }
    }
}

/// Produces and tears down the visual representation of chunks.
pub trait ChunkRenderer {
    /// Per-chunk render root; starts out as `Default::default()`.
    type Target: Default;

    /// Renders a loaded chunk into `target`. Returning `false` discards the target
    /// and leaves the chunk unrendered.
    fn render(&mut self, ctx: &RenderContext<'_>, chunk: &Chunk, target: &mut Self::Target)
        -> bool;

    /// Refreshes a single tile after it changed. By default the whole chunk is
    /// rendered again from `chunk`, so `raw_gid` only shows if it was written into
    /// the chunk.
    fn rerender_tile(
        &mut self,
        ctx: &RenderContext<'_>,
        chunk: &Chunk,
        local: IntVector2,
        layer: usize,
        raw_gid: u32,
        target: &mut Self::Target,
    ) -> bool {
        let _ = (local, layer, raw_gid);
        let mut fresh = Self::Target::default();
        if !self.render(ctx, chunk, &mut fresh) {
            return false;
        }
        *target = fresh;
        true
    }

    /// Releases a chunk's render root.
    fn unrender(&mut self, _coord: IntVector3, _target: Self::Target) {}
}

/// A single placed tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TileInstance {
    /// Position inside the chunk.
    pub local: IntVector2,
    /// Position in the map.
    pub tile: IntVector2,
    /// GID without flip flags.
    pub gid: TileId,
    /// First GID of the tile set the tile came from.
    pub first_id: TileId,
    /// Map-space centre including the tile set's draw offset.
    pub position: Vec3,
    pub sorting_order: i32,
    pub sorting_layer: Option<String>,
    pub transform: TileTransform,
    pub alpha: f32,
    pub sprite: String,
    pub animation: Option<TileAnimation>,
}

impl TileInstance {
    /// GID to show `ms` milliseconds into the animation, or `None` when not animated.
    pub fn animated_gid(&self, ms: u64) -> Option<TileId> {
        let frame = self.animation.as_ref()?.frame_at(ms)?;
        Some(self.first_id + frame as TileId)
    }
}

/// Tiles of one layer of a rendered chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerInstances {
    pub name: String,
    pub tiles: Vec<TileInstance>,
}

/// Render root produced by [`InstanceRenderer`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkInstances {
    pub index: IntVector2,
    pub layers: Vec<LayerInstances>,
}

impl ChunkInstances {
    pub fn len(&self) -> usize {
        self.layers.iter().map(|l| l.tiles.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tile(&self, local: IntVector2, layer: usize) -> Option<&TileInstance> {
        self.layers.get(layer)?.tiles.iter().find(|t| t.local == local)
    }

    /// Every tile of every layer sorted by draw order.
    pub fn draw_order(&self) -> Vec<&TileInstance> {
        let mut all: Vec<_> = self.layers.iter().flat_map(|l| &l.tiles).collect();
        all.sort_by_key(|t| t.sorting_order);
        all
    }
}

/// Builds [`ChunkInstances`] from the map's geometry, library and layers.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstanceRenderer {
    /// Reverse draw precedence along X.
    pub flip_x_precedence: bool,
    /// Reverse draw precedence along Y.
    pub flip_y_precedence: bool,
}

impl InstanceRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precedence(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x_precedence = flip_x;
        self.flip_y_precedence = flip_y;
        self
    }

    /// Resolves one cell. `None` for empty cells, unknown GIDs and sprite-less tiles.
    pub fn render_tile(
        &self,
        map: &TileMap,
        chunk_index: IntVector2,
        local: IntVector2,
        layer: usize,
        raw_gid: u32,
    ) -> Option<TileInstance> {
        let TileGid { id, flip } = TileGid::decode(raw_gid);
        let Some((set, local_id)) = map.library.tile_set_and_id(id) else {
            if id != 0 {
                warn!(gid = id, chunk = %chunk_index, %local, layer, "tile id not in library");
            }
            return None;
        };
        let info = set.tile(local_id)?;
        let sprite = info.sprite.clone()?;
        let layer_info = map.layers.get(layer)?;

        let tile = map.layout.tile_of(chunk_index, local);
        let position =
            map.geometry.tile_center_to_map(tile.extend(0)) + set.draw_offset().extend(0.0);
        Some(TileInstance {
            local,
            tile,
            gid: id,
            first_id: id - local_id as TileId,
            position,
            sorting_order: map.geometry.tile_sorting_order(
                tile.x,
                tile.y,
                self.flip_x_precedence,
                self.flip_y_precedence,
            ),
            sorting_layer: layer_info.sorting_layer.clone(),
            transform: flip.transform(),
            alpha: layer_info.default_alpha,
            sprite,
            animation: info.animation.clone().filter(|a| !a.is_empty()),
        })
    }

    fn fits(map: &TileMap, chunk: &Chunk) -> bool {
        if chunk.tile_size() != map.layout.chunk_size {
            warn!(
                chunk = %chunk.index,
                size = %chunk.tile_size(),
                expected = %map.layout.chunk_size,
                "chunk size does not match layout"
            );
            return false;
        }
        if chunk.layers() < map.layer_count() {
            warn!(
                chunk = %chunk.index,
                layers = chunk.layers(),
                expected = map.layer_count(),
                "chunk has fewer layers than the map"
            );
            return false;
        }
        true
    }
}

impl ChunkRenderer for InstanceRenderer {
    type Target = ChunkInstances;

    fn render(&mut self, ctx: &RenderContext<'_>, chunk: &Chunk, target: &mut ChunkInstances) -> bool {
        let map = ctx.map;
        if !Self::fits(map, chunk) {
            return false;
        }
        target.index = chunk.index;
        target.layers = map
            .layers
            .iter()
            .enumerate()
            .map(|(l, info)| {
                let tiles = IntVector2::range(IntVector2::ZERO, chunk.tile_size())
                    .filter_map(|local| {
                        let raw = chunk.get(local, l).ok()?;
                        self.render_tile(map, chunk.index, local, l, raw)
                    })
                    .collect();
                LayerInstances {
                    name: info.name.clone(),
                    tiles,
                }
            })
            .collect();
        true
    }

    fn rerender_tile(
        &mut self,
        ctx: &RenderContext<'_>,
        chunk: &Chunk,
        local: IntVector2,
        layer: usize,
        raw_gid: u32,
        target: &mut ChunkInstances,
    ) -> bool {
        let fresh = self.render_tile(ctx.map, chunk.index, local, layer, raw_gid);
        let Some(layer_tiles) = target.layers.get_mut(layer) else {
            return false;
        };
        let tiles = &mut layer_tiles.tiles;
        let old = tiles.iter().position(|t| t.local == local);
        match (old, fresh) {
            (Some(i), Some(t)) => tiles[i] = t,
            (Some(i), None) => {
                tiles.remove(i);
            }
            (None, Some(t)) => tiles.push(t),
            (None, None) => {}
        }
        true
    }
}
