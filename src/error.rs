use pokeworld_gfx::GfxError;

use crate::codec::{BlockIndex, MapId, TilesetId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed tile data in tileset {tileset}, tile {index}: need 16 bytes, have {len}")]
    MalformedTileData { tileset: TilesetId, index: usize, len: usize },

    #[error("malformed block data in tileset {tileset}, block {block}: need 16 bytes, have {len}")]
    MalformedBlockData { tileset: TilesetId, block: usize, len: usize },

    #[error("no image for tileset {tileset}, block {block}, quadrant {quadrant}")]
    MissingQuadrantImage { tileset: TilesetId, block: BlockIndex, quadrant: u8 },

    #[error("unresolvable connection {from} -> {to}: {reason}")]
    UnresolvableConnection { from: MapId, to: MapId, reason: String },

    #[error("map {map} is not reachable from the root map")]
    DisconnectedMap { map: MapId },

    #[error("root map {0} does not exist")]
    UnknownRootMap(MapId),

    #[error("invalid tileset alias {alias} -> {target}: {reason}")]
    InvalidAlias { alias: TilesetId, target: TilesetId, reason: &'static str },

    #[error("invalid map {map}: {reason}")]
    InvalidMap { map: MapId, reason: String },

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialize(e.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialize(e.to_string())
    }
}

impl Error {
    /// Attach the tile set and record index to a graphics error
    pub fn from_gfx(err: &GfxError, tileset: TilesetId, index: usize) -> Self {
        match *err {
            GfxError::MalformedTileData { len } => Error::MalformedTileData { tileset, index, len },
            GfxError::MalformedBlockData { len } => Error::MalformedBlockData { tileset, block: index, len },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
