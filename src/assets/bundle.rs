use indexmap::IndexMap;
use pokeworld_gfx::{BLOCK_BYTES, TILE_BYTES};

use crate::codec::{BinaryReader, MapId, TilesetId};
use crate::state::{ConnectionRecord, MapRecord};

/// Raw graphics of one tile set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilesetAssets {
    pub name: String,
    /// 16-byte 2bpp tiles; the last one may be short
    pub tiles: Vec<Vec<u8>>,
    /// 16-byte blocks of tile indices; the last one may be short
    pub blocks: Vec<Vec<u8>>,
}

impl TilesetAssets {
    /// Split a `.2bpp` tile file and a `.bst` blockset file into records
    pub fn from_raw(name: impl Into<String>, tile_data: &[u8], block_data: &[u8]) -> Self {
        let tiles = BinaryReader::new(tile_data)
            .records(TILE_BYTES)
            .into_iter()
            .map(<[u8]>::to_vec)
            .collect();
        let blocks = BinaryReader::new(block_data)
            .records(BLOCK_BYTES)
            .into_iter()
            .map(<[u8]>::to_vec)
            .collect();
        Self { name: name.into(), tiles, blocks }
    }
}

/// Everything the pipeline consumes
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    pub tilesets: IndexMap<TilesetId, TilesetAssets>,
    pub maps: IndexMap<MapId, MapRecord>,
    pub connections: Vec<ConnectionRecord>,
}

impl AssetBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tileset(&mut self, id: TilesetId, assets: TilesetAssets) -> &mut Self {
        self.tilesets.insert(id, assets);
        self
    }

    pub fn add_map(&mut self, map: MapRecord) -> &mut Self {
        self.maps.insert(map.id, map);
        self
    }

    pub fn connect(&mut self, record: ConnectionRecord) -> &mut Self {
        self.connections.push(record);
        self
    }

    pub fn map_by_name(&self, name: &str) -> Option<&MapRecord> {
        self.maps.values().find(|m| m.name.eq_ignore_ascii_case(name))
    }
}
