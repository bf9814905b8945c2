//! Tile types are the terrains a user can paint onto cells in the editor.
//! Each one is backed by an image asset, which the engine treats as an
//! opaque blob.

use anyhow::{anyhow, Context};
use derive_more::Display;
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifier for a tile type. Always positive. Ordering of IDs is the
/// display order of tile types.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct TileTypeId(u32);

impl TileTypeId {
    /// Create a new ID. Returns an error if the index is zero.
    pub fn new(index: u32) -> anyhow::Result<Self> {
        if index == 0 {
            Err(anyhow!("tile type index must be positive"))
        } else {
            Ok(Self(index))
        }
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for TileTypeId {
    type Error = anyhow::Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TileTypeId> for u32 {
    fn from(id: TileTypeId) -> Self {
        id.0
    }
}

/// Storage key for a tile type's image asset: `tile_image_<index>`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileImageKey(pub TileTypeId);

impl TileImageKey {
    const PREFIX: &'static str = "tile_image_";
}

impl fmt::Display for TileImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for TileImageKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| anyhow!("missing prefix {:?}", Self::PREFIX))?;
        let index: u32 = index
            .parse()
            .with_context(|| format!("invalid tile index {:?}", index))?;
        Ok(Self(TileTypeId::new(index)?))
    }
}

/// A paintable terrain, with the encoded image used to draw it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileType {
    pub name: String,
    /// Encoded image data. The engine never decodes this.
    pub image: Vec<u8>,
}

/// All tile types available to the editor, in index order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TileTypeRegistry {
    tile_types: IndexMap<TileTypeId, TileType>,
}

impl TileTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from stored assets. Entries with malformed keys
    /// are logged and skipped.
    pub fn from_assets(
        assets: impl IntoIterator<Item = (String, Vec<u8>)>,
    ) -> Self {
        let mut registry = Self::new();
        for (key, image) in assets {
            match key.parse::<TileImageKey>() {
                Ok(TileImageKey(id)) => {
                    registry.tile_types.insert(
                        id,
                        TileType {
                            name: key,
                            image,
                        },
                    );
                }
                Err(err) => {
                    warn!("Skipping tile asset {:?}: {:#}", key, err);
                }
            }
        }
        registry.tile_types.sort_keys();
        registry
    }

    /// Export every tile type's image keyed by its storage key
    pub fn to_assets(&self) -> impl Iterator<Item = (String, &[u8])> {
        self.tile_types.iter().map(|(id, tile_type)| {
            (TileImageKey(*id).to_string(), tile_type.image.as_slice())
        })
    }

    /// Add a new tile type. It gets the next index after the highest one
    /// currently in the registry.
    pub fn add(&mut self, name: impl Into<String>, image: Vec<u8>) -> TileTypeId {
        let index = self
            .tile_types
            .keys()
            .map(|id| id.index())
            .max()
            .unwrap_or(0)
            + 1;
        let id = TileTypeId(index);
        self.tile_types.insert(
            id,
            TileType {
                name: name.into(),
                image,
            },
        );
        id
    }

    pub fn get(&self, id: TileTypeId) -> Option<&TileType> {
        self.tile_types.get(&id)
    }

    pub fn contains(&self, id: TileTypeId) -> bool {
        self.tile_types.contains_key(&id)
    }

    /// Remove a tile type, preserving the order of the rest
    pub fn remove(&mut self, id: TileTypeId) -> Option<TileType> {
        self.tile_types.shift_remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileTypeId, &TileType)> {
        self.tile_types.iter().map(|(id, tile_type)| (*id, tile_type))
    }

    pub fn len(&self) -> usize {
        self.tile_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_types.is_empty()
    }
}
