//! Pre-baked chunk stores and the manager that reads from them.
//!
//! Chunks are addressed by [`chunk_key`], `"chunk_{x}_{y}"`. [`MemoryChunkStore`]
//! keeps them in a map; [`DirChunkStore`] (feature `ron`) keeps one `.ron` file per
//! chunk in a directory.
use std::collections::HashMap;
#[cfg(feature = "ron")]
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::chunk::{Chunk, ChunkManager};
use crate::coord::{IntVector2, IntVector3};
use crate::error::{Error, Result};

/// Storage key of the chunk at `index`.
pub fn chunk_key(index: IntVector2) -> String {
    format!("chunk_{}_{}", index.x, index.y)
}

/// Read-only lookup of baked chunks by key.
pub trait ChunkStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<Chunk>>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryChunkStore {
    chunks: HashMap<String, Chunk>,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a chunk under the key of its own index, replacing any previous one.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk_key(chunk.index), chunk)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl FromIterator<Chunk> for MemoryChunkStore {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        let mut store = Self::new();
        for chunk in iter {
            store.insert(chunk);
        }
        store
    }
}

impl ChunkStore for MemoryChunkStore {
    fn load(&self, key: &str) -> Result<Option<Chunk>> {
        Ok(self.chunks.get(key).cloned())
    }
}

/// Directory of `chunk_{x}_{y}.ron` files.
#[cfg(feature = "ron")]
#[derive(Clone, Debug)]
pub struct DirChunkStore {
    root: PathBuf,
}

#[cfg(feature = "ron")]
impl DirChunkStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.ron"))
    }

    /// Writes a chunk, creating the directory if needed.
    pub fn write(&self, chunk: &Chunk) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let text = ron::ser::to_string_pretty(chunk, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Format(e.to_string()))?;
        let path = self.path_of(&chunk_key(chunk.index));
        std::fs::write(&path, text)?;
        Ok(path)
    }
}

#[cfg(feature = "ron")]
impl ChunkStore for DirChunkStore {
    fn load(&self, key: &str) -> Result<Option<Chunk>> {
        let path = self.path_of(key);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let chunk: Chunk = ron::from_str(&text)
            .map_err(|e| Error::Format(format!("{}: {e}", path.display())))?;
        Ok(Some(chunk))
    }
}

/// Chunk manager over an immutable store of baked 2D chunks.
///
/// Only `z = 0` holds chunks. Unloading is a no-op.
#[derive(Clone, Debug)]
pub struct StaticChunkManager<S: ChunkStore> {
    store: S,
}

impl<S: ChunkStore> StaticChunkManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: ChunkStore> ChunkManager for StaticChunkManager<S> {
    fn load_chunk(&mut self, coord: IntVector3) -> Result<Option<Chunk>> {
        if coord.z != 0 {
            return Ok(None);
        }
        let key = chunk_key(coord.truncate());
        let Some(chunk) = self.store.load(&key)? else {
            debug!(%key, "no chunk stored");
            return Ok(None);
        };
        if chunk.index != coord.truncate() {
            return Err(Error::InvalidChunk(format!(
                "{key} holds chunk {} instead of {}",
                chunk.index,
                coord.truncate()
            )));
        }
        Ok(Some(chunk))
    }
}
