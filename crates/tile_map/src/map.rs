//! Tile map description: geometry, chunk layout, layers, tile library and chunk source.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, ChunkBounds, ChunkLayout, ChunkManager};
use crate::coord::{IntVector2, IntVector3};
use crate::error::{Error, Result};
use crate::geometry::{Geometry, Orientation, Tiling};
use crate::library::{PropertyMap, TileInfo, TileLibrary};

/// Per-layer display settings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct LayerInfo {
    pub name: String,
    /// Opacity applied to every tile of the layer, in `[0, 1]`.
    pub default_alpha: f32,
    pub properties: PropertyMap,
    /// Name of the renderer-side sorting layer, if any.
    pub sorting_layer: Option<String>,
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            name: "undefined".into(),
            default_alpha: 1.0,
            properties: PropertyMap::new(),
            sorting_layer: None,
        }
    }
}

impl LayerInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.default_alpha = alpha;
        self
    }

    pub fn with_sorting_layer(mut self, name: impl Into<String>) -> Self {
        self.sorting_layer = Some(name.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Serializable settings of a [`TileMap`].
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct TileMapConfig {
    pub geometry: Geometry,
    /// Chunk width and height in tiles.
    pub chunk_size: IntVector2,
    /// Inclusive chunk coordinates that exist; unbounded when `None`.
    pub bounds: Option<ChunkBounds>,
    pub layers: Vec<LayerInfo>,
    pub properties: PropertyMap,
}

impl Default for TileMapConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            chunk_size: IntVector2::new(16, 16),
            bounds: None,
            layers: vec![LayerInfo::default()],
            properties: PropertyMap::new(),
        }
    }
}

impl TileMapConfig {
    pub fn new(geometry: Geometry, chunk_size: IntVector2) -> Self {
        Self {
            geometry,
            chunk_size,
            ..Default::default()
        }
    }

    /// Shorthand for a geometry built from its three fields.
    pub fn with_geometry(mut self, tiling: Tiling, orientation: Orientation, size: Vec3) -> Self {
        self.geometry = Geometry::new(tiling, orientation, size);
        self
    }

    pub fn with_bounds(mut self, least: IntVector2, greatest: IntVector2) -> Self {
        self.bounds = Some(ChunkBounds::new(least, greatest));
        self
    }

    /// Replaces the layer list.
    pub fn with_layers(mut self, layers: Vec<LayerInfo>) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn layout(&self) -> ChunkLayout {
        ChunkLayout {
            chunk_size: self.chunk_size,
            bounds: self.bounds,
        }
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.layout().validate()?;
        if self.layers.is_empty() {
            return Err(Error::InvalidConfig("at least one layer is required".into()));
        }
        if let Some(layer) = self
            .layers
            .iter()
            .find(|l| !(0.0..=1.0).contains(&l.default_alpha))
        {
            return Err(Error::InvalidConfig(format!(
                "layer '{}' alpha must be within [0, 1] (got {})",
                layer.name, layer.default_alpha
            )));
        }
        Ok(())
    }

    /// Parses and validates a RON document.
    #[cfg(feature = "ron")]
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text).map_err(|e| Error::Format(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "ron")]
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Format(e.to_string()))
    }
}

/// A tile map: everything needed to turn chunk coordinates into placed tiles.
pub struct TileMap {
    pub geometry: Geometry,
    pub layout: ChunkLayout,
    pub layers: Vec<LayerInfo>,
    pub properties: PropertyMap,
    pub library: TileLibrary<TileInfo>,
    chunk_manager: Box<dyn ChunkManager>,
}

impl std::fmt::Debug for TileMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileMap")
            .field("geometry", &self.geometry)
            .field("layout", &self.layout)
            .field("layers", &self.layers)
            .field("properties", &self.properties)
            .field("library", &self.library)
            .finish_non_exhaustive()
    }
}

impl TileMap {
    /// Builds a tile map from a validated config.
    pub fn try_new<M>(
        config: TileMapConfig,
        library: TileLibrary<TileInfo>,
        chunk_manager: M,
    ) -> Result<Self>
    where
        M: ChunkManager + 'static,
    {
        config.validate()?;
        Ok(Self {
            layout: config.layout(),
            geometry: config.geometry,
            layers: config.layers,
            properties: config.properties,
            library,
            chunk_manager: Box::new(chunk_manager),
        })
    }

    /// Current settings as a config.
    pub fn config(&self) -> TileMapConfig {
        TileMapConfig {
            geometry: self.geometry,
            chunk_size: self.layout.chunk_size,
            bounds: self.layout.bounds,
            layers: self.layers.clone(),
            properties: self.properties.clone(),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn chunk_manager(&self) -> &dyn ChunkManager {
        self.chunk_manager.as_ref()
    }

    pub fn chunk_manager_mut(&mut self) -> &mut dyn ChunkManager {
        self.chunk_manager.as_mut()
    }

    /// Swaps the chunk source, returning the previous one.
    pub fn replace_chunk_manager<M>(&mut self, chunk_manager: M) -> Box<dyn ChunkManager>
    where
        M: ChunkManager + 'static,
    {
        std::mem::replace(&mut self.chunk_manager, Box::new(chunk_manager))
    }

    /// Requests a chunk from the chunk manager. Chunks outside the layout bounds do not exist.
    pub fn load_chunk(&mut self, coord: IntVector3) -> Result<Option<Chunk>> {
        if !self.layout.contains_chunk(coord.truncate()) {
            return Ok(None);
        }
        self.chunk_manager.load_chunk(coord)
    }

    pub fn unload_chunk(&mut self, chunk: Chunk, coord: IntVector3) {
        self.chunk_manager.unload_chunk(chunk, coord);
    }

    pub fn reset_chunks(&mut self) {
        self.chunk_manager.reset();
    }
}
