//! Splits a flat, fully-loaded map into chunks.
use tracing::debug;

use crate::chunk::{Chunk, ChunkBounds};
use crate::coord::{IntVector2, IntVector3};
use crate::error::{Error, Result};
use crate::math::ceil_divide;

/// Output of [`bake_chunks`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BakedChunks {
    pub chunks: Vec<Chunk>,
    /// Inclusive chunk coordinates covering the map.
    pub bounds: ChunkBounds,
}

/// Cuts `layers` (each row-major, `map_size.x * map_size.y` GIDs) into chunks of
/// `chunk_size`, starting at chunk `(0, 0)`. Cells past the map edge are filled with 0.
pub fn bake_chunks(
    map_size: IntVector2,
    layers: &[Vec<u32>],
    chunk_size: IntVector2,
) -> Result<BakedChunks> {
    if map_size.x <= 0 || map_size.y <= 0 {
        return Err(Error::InvalidConfig(format!(
            "map size must be > 0 on both axes (got {map_size})"
        )));
    }
    if chunk_size.x <= 0 || chunk_size.y <= 0 {
        return Err(Error::InvalidConfig(format!(
            "chunk_size must be > 0 on both axes (got {chunk_size})"
        )));
    }
    let area = map_size.area() as usize;
    if let Some((i, layer)) = layers.iter().enumerate().find(|(_, l)| l.len() != area) {
        return Err(Error::InvalidConfig(format!(
            "layer {i} has {} ids, map of size {map_size} needs {area}",
            layer.len()
        )));
    }

    let counts = IntVector2::new(
        ceil_divide(map_size.x, chunk_size.x),
        ceil_divide(map_size.y, chunk_size.y),
    );
    let size = chunk_size.extend(layers.len() as i32);
    let mut chunks = Vec::with_capacity(counts.area() as usize);
    for index in IntVector2::range(IntVector2::ZERO, counts) {
        let origin = index.scale(chunk_size);
        let ids = IntVector3::range(IntVector3::ZERO, size)
            .map(|cell| {
                let tile = origin + cell.truncate();
                if tile.in_range(IntVector2::ZERO, map_size) {
                    layers[cell.z as usize][tile.to_index(map_size)]
                } else {
                    0
                }
            })
            .collect();
        chunks.push(Chunk::from_ids(index, size, ids)?);
    }

    debug!(chunks = chunks.len(), layers = layers.len(), "map baked");
    Ok(BakedChunks {
        chunks,
        bounds: ChunkBounds::new(IntVector2::ZERO, counts - IntVector2::ONE),
    })
}
