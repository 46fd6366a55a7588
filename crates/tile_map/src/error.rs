//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover caller errors against the chunk lifecycle, tile library conflicts,
//! unsupported geometry values, invalid configuration, and external store failures.
//!
//! Outcomes that are expected during normal operation (a chunk that does not exist,
//! a tile ID outside every tile set) are never errors; they surface as `Ok(false)`
//! or `None` from the respective operations.
use thiserror::Error;

use crate::coord::{IntVector2, IntVector3};
use crate::library::TileId;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("tile map controller was not started; call begin() first")]
    NotStarted,

    #[error("tile map controller already started; end() was never called")]
    AlreadyStarted,

    #[error("chunk {coord} is not loaded")]
    ChunkNotLoaded { coord: IntVector3 },

    #[error("chunk {coord} is still rendered; unrender it before unloading")]
    ChunkStillRendered { coord: IntVector3 },

    #[error("layer {layer} out of range (chunk has {layers} layers)")]
    LayerOutOfRange { layer: usize, layers: usize },

    #[error("invalid chunk: {0}")]
    InvalidChunk(String),

    #[error("tile {local} outside chunk of size {size}")]
    TileOutOfRange { local: IntVector2, size: IntVector2 },

    #[error("first tile id must be >= 0 (got {first_id})")]
    NegativeFirstId { first_id: TileId },

    #[error("tile set of {count} tiles at first id {first_id} overlaps an existing tile set")]
    TileSetOverlap { first_id: TileId, count: usize },

    #[error("unsupported tiling '{0}'")]
    UnsupportedTiling(String),

    #[error("unsupported orientation '{0}'")]
    UnsupportedOrientation(String),

    #[error("chunk store format error: {0}")]
    Format(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
