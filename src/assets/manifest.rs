use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::codec::{MapId, TilesetId};
use crate::state::ConnectionRecord;

/// On-disk description of a world's assets. Paths are relative to the
/// manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub tilesets: Vec<TilesetEntry>,
    #[serde(default)]
    pub maps: Vec<MapEntry>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetEntry {
    pub id: TilesetId,
    pub name: String,
    /// `.2bpp` tile graphics
    #[serde(default)]
    pub tiles: Option<PathBuf>,
    /// `.bst` blockset
    #[serde(default)]
    pub blocks: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub id: MapId,
    pub name: String,
    pub width: u16,
    pub height: u16,
    pub tileset: TilesetId,
    #[serde(default)]
    pub overworld: bool,
    /// `.blk` block grid
    #[serde(default)]
    pub blocks: Option<PathBuf>,
}
