#![forbid(unsafe_code)]
//! tile_map: Chunked tile maps with tiling geometry, GID tile libraries and a chunk lifecycle.
//!
//! Modules:
//! - math: floor/ceil division, zigzag and Cantor pairing
//! - coord: integer vectors and lazy box iteration
//! - geometry: rectangular, isometric and staggered tilings, space transforms, sorting order
//! - library: tile sets partitioning one global ID space, tile flags and animations
//! - chunk: chunk data, chunk managers (static stores, seeded generation), baking
//! - map: tile map description and configuration
//! - render: renderer seam and a pixel-free instance renderer
//! - controller: chunk load/render state machine, streaming, events
pub mod chunk;
pub mod controller;
pub mod coord;
pub mod error;
pub mod geometry;
pub mod library;
pub mod map;
pub mod math;
pub mod render;

/// Convenient re-exports for common types. Import with `use tile_map::prelude::*;`.
pub mod prelude {
    #[cfg(feature = "ron")]
    pub use crate::chunk::DirChunkStore;
    pub use crate::chunk::{
        bake_chunks, chunk_key, seed_for_chunk, BakedChunks, Chunk, ChunkBounds, ChunkLayout,
        ChunkManager, ChunkStore, MemoryChunkStore, SeededChunkGenerator, StaticChunkManager,
    };
    pub use crate::controller::events::{
        ChunkEvent, ChunkEventKind, EventKinds, EventSink, FnSink, VecSink,
    };
    pub use crate::controller::{StreamUpdate, TileMapController};
    pub use crate::coord::{IntVector2, IntVector3, Interval2, Interval3};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::boundary::{boundary_segments, BoundaryKind, BoundarySegment};
    pub use crate::geometry::{Geometry, Orientation, Tiling};
    pub use crate::library::{
        GenericTileSet, TileAnimation, TileFlip, TileGid, TileId, TileInfo, TileLibrary, TileSet,
    };
    pub use crate::map::{LayerInfo, TileMap, TileMapConfig};
    pub use crate::math::{ceil_divide, floor_divide, floor_mod};
    pub use crate::render::{ChunkInstances, ChunkRenderer, InstanceRenderer, RenderContext, TileInstance};
}
