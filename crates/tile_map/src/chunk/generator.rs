//! Procedural chunk generation with a resettable cache.
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::chunk::{seed_for_chunk, Chunk, ChunkBounds, ChunkManager};
use crate::coord::{IntVector2, IntVector3};
use crate::error::{Error, Result};

/// Generates 2D chunks deterministically from a base seed and a GID palette.
///
/// Layer 0 is filled entirely from the palette; higher layers are sparse, with
/// roughly one tile in `overlay_density` set. Chunks handed back through
/// [`ChunkManager::unload_chunk`] are cached so edits survive a reload until
/// [`ChunkManager::reset`] discards them.
#[derive(Clone, Debug)]
pub struct SeededChunkGenerator {
    seed: u64,
    size: IntVector3,
    palette: Vec<u32>,
    overlay_density: u32,
    bounds: Option<ChunkBounds>,
    cache: HashMap<IntVector2, Chunk>,
    generated: u64,
}

impl SeededChunkGenerator {
    /// `chunk_size` in tiles and `layers` per chunk. An empty palette yields empty chunks.
    pub fn new(seed: u64, chunk_size: IntVector2, layers: usize, palette: Vec<u32>) -> Result<Self> {
        if chunk_size.x <= 0 || chunk_size.y <= 0 {
            return Err(Error::InvalidConfig(format!(
                "chunk_size must be > 0 on both axes (got {chunk_size})"
            )));
        }
        let layers = i32::try_from(layers)
            .map_err(|_| Error::InvalidConfig(format!("too many layers ({layers})")))?;
        Ok(Self {
            seed,
            size: chunk_size.extend(layers),
            palette,
            overlay_density: 4,
            bounds: None,
            cache: HashMap::new(),
            generated: 0,
        })
    }

    /// Only chunks inside `bounds` exist.
    pub fn with_bounds(mut self, bounds: ChunkBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_overlay_density(mut self, one_in: u32) -> Self {
        self.overlay_density = one_in.max(1);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Chunks generated since construction or the last reset.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn generate(&mut self, index: IntVector2) -> Result<Chunk> {
        let mut rng = StdRng::seed_from_u64(seed_for_chunk(self.seed, index));
        let mut chunk = Chunk::new(index, self.size)?;
        if !self.palette.is_empty() {
            let area = self.size.truncate().area() as usize;
            let n = self.palette.len();
            for (i, id) in chunk.ids.iter_mut().enumerate() {
                let roll = rng.next_u32();
                let base_layer = i < area;
                if base_layer || roll % self.overlay_density == 0 {
                    *id = self.palette[(rng.next_u32() as usize) % n];
                }
            }
        }
        self.generated += 1;
        debug!(chunk = %index, seed = self.seed, "chunk generated");
        Ok(chunk)
    }
}

impl ChunkManager for SeededChunkGenerator {
    fn load_chunk(&mut self, coord: IntVector3) -> Result<Option<Chunk>> {
        let index = coord.truncate();
        if coord.z != 0 || self.bounds.is_some_and(|b| !b.contains(index)) {
            return Ok(None);
        }
        if let Some(chunk) = self.cache.remove(&index) {
            return Ok(Some(chunk));
        }
        self.generate(index).map(Some)
    }

    fn unload_chunk(&mut self, chunk: Chunk, coord: IntVector3) {
        self.cache.insert(coord.truncate(), chunk);
    }

    fn reset(&mut self) {
        debug!(cached = self.cache.len(), generated = self.generated, "generator reset");
        self.cache.clear();
        self.generated = 0;
    }
}
