//! Per-tile data and the TMX flip flags packed into raw GIDs.
use std::collections::BTreeMap;

use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::library::{TileAnimation, TileId};

/// Free-form string properties attached to tiles, layers and maps.
pub type PropertyMap = BTreeMap<String, String>;

/// What a tile looks like: a sprite key, an optional animation and its properties.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileInfo {
    pub sprite: Option<String>,
    pub animation: Option<TileAnimation>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: PropertyMap,
}

impl TileInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    pub fn with_animation(mut self, animation: TileAnimation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// True when the tile carries an animation with a non-zero length.
    pub fn is_animated(&self) -> bool {
        self.animation.as_ref().is_some_and(|a| !a.is_empty())
    }
}

/// Flip flags stored in the top three bits of a raw GID.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileFlip {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

/// Scale and rotation that realise a [`TileFlip`] on a sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileTransform {
    /// `(±1, ±1)`
    pub scale: Vec2,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f32,
}

impl TileFlip {
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };

    /// Diagonal flips become a 90 degree rotation with the axis flips swapped.
    pub fn transform(self) -> TileTransform {
        let (horizontal, vertical) = if self.diagonal {
            (!self.vertical, self.horizontal)
        } else {
            (self.horizontal, self.vertical)
        };
        TileTransform {
            scale: Vec2::new(
                if horizontal { -1.0 } else { 1.0 },
                if vertical { -1.0 } else { 1.0 },
            ),
            rotation: if self.diagonal { 90.0 } else { 0.0 },
        }
    }
}

/// A raw GID split into tile ID and flip flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileGid {
    pub id: TileId,
    pub flip: TileFlip,
}

impl TileGid {
    pub const FLIP_HORIZONTAL: u32 = 0x8000_0000;
    pub const FLIP_VERTICAL: u32 = 0x4000_0000;
    pub const FLIP_DIAGONAL: u32 = 0x2000_0000;
    pub const ID_MASK: u32 = 0x1FFF_FFFF;

    pub fn new(id: TileId, flip: TileFlip) -> Self {
        Self { id, flip }
    }

    pub fn decode(raw: u32) -> Self {
        Self {
            id: (raw & Self::ID_MASK) as TileId,
            flip: TileFlip {
                horizontal: raw & Self::FLIP_HORIZONTAL != 0,
                vertical: raw & Self::FLIP_VERTICAL != 0,
                diagonal: raw & Self::FLIP_DIAGONAL != 0,
            },
        }
    }

    /// Packs back into a raw GID; bits of `id` above the mask are dropped.
    pub fn encode(self) -> u32 {
        let mut raw = self.id as u32 & Self::ID_MASK;
        if self.flip.horizontal {
            raw |= Self::FLIP_HORIZONTAL;
        }
        if self.flip.vertical {
            raw |= Self::FLIP_VERTICAL;
        }
        if self.flip.diagonal {
            raw |= Self::FLIP_DIAGONAL;
        }
        raw
    }
}

impl From<u32> for TileGid {
    fn from(raw: u32) -> Self {
        Self::decode(raw)
    }
}
