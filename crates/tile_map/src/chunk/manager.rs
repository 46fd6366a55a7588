use crate::chunk::Chunk;
use crate::coord::IntVector3;
use crate::error::Result;

/// Source of chunk data for a tile map.
///
/// `load_chunk` returning `Ok(None)` means no chunk exists at that coordinate, which
/// is a normal outcome. `Err` is reserved for broken stores.
pub trait ChunkManager {
    fn load_chunk(&mut self, coord: IntVector3) -> Result<Option<Chunk>>;

    /// Hands a chunk back once the controller no longer needs it.
    fn unload_chunk(&mut self, _chunk: Chunk, _coord: IntVector3) {}

    /// Discards every cache. After a reset, loading any coordinate behaves as if it
    /// had never been loaded before.
    fn reset(&mut self) {}
}

impl<M: ChunkManager + ?Sized> ChunkManager for Box<M> {
    fn load_chunk(&mut self, coord: IntVector3) -> Result<Option<Chunk>> {
        (**self).load_chunk(coord)
    }

    fn unload_chunk(&mut self, chunk: Chunk, coord: IntVector3) {
        (**self).unload_chunk(chunk, coord)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
