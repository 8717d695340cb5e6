use serde::{Deserialize, Serialize};

use crate::codec::{BlockIndex, Extent, MapId, TilesetId};
use crate::error::{Error, Result};

/// One map as produced by asset ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRecord {
    pub id: MapId,
    pub name: String,
    /// Width in blocks
    pub width: u16,
    /// Height in blocks
    pub height: u16,
    pub tileset: TilesetId,
    pub overworld: bool,
    /// Row-major block indices, `width * height` bytes
    #[serde(default)]
    pub blocks: Vec<u8>,
}

impl MapRecord {
    pub fn new(id: MapId, name: impl Into<String>, width: u16, height: u16, tileset: TilesetId) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            tileset,
            overworld: false,
            blocks: vec![0; width as usize * height as usize],
        }
    }

    pub fn overworld(mut self, overworld: bool) -> Self {
        self.overworld = overworld;
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<u8>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Size in tile units (two tiles per block)
    pub fn extent(&self) -> Extent {
        Extent::from_blocks(self.width, self.height)
    }

    pub fn expected_blocks(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Block index at grid position (`bx`, `by`), if the grid has one there
    pub fn block_at(&self, bx: u16, by: u16) -> Option<BlockIndex> {
        if bx >= self.width || by >= self.height {
            return None;
        }
        self.blocks.get(by as usize * self.width as usize + bx as usize).copied()
    }

    /// Structural checks; a map failing these cannot be laid out at all
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidMap { map: self.id, reason: "map has no name".into() });
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidMap {
                map: self.id,
                reason: format!("invalid dimensions {}x{}", self.width, self.height),
            });
        }
        Ok(())
    }

    /// (expected, actual) grid byte counts when they disagree
    pub fn block_count_mismatch(&self) -> Option<(usize, usize)> {
        let expected = self.expected_blocks();
        (self.blocks.len() != expected).then_some((expected, self.blocks.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_at() {
        let map = MapRecord::new(1, "TOWN", 3, 2, 0).with_blocks(vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(map.block_at(0, 0), Some(1));
        assert_eq!(map.block_at(2, 0), Some(3));
        assert_eq!(map.block_at(0, 1), Some(4));
        assert_eq!(map.block_at(3, 0), None);
        assert_eq!(map.extent(), Extent::new(6, 4));
    }

    #[test]
    fn test_short_grid() {
        let map = MapRecord::new(1, "TOWN", 2, 2, 0).with_blocks(vec![9, 9, 9]);
        assert_eq!(map.block_at(1, 1), None);
        assert_eq!(map.block_count_mismatch(), Some((4, 3)));
        map.validate().unwrap();
    }

    #[test]
    fn test_validate_dimensions() {
        let map = MapRecord::new(7, "EMPTY", 0, 4, 0);
        assert!(matches!(map.validate(), Err(Error::InvalidMap { map: 7, .. })));
        let unnamed = MapRecord::new(8, " ", 1, 1, 0);
        assert!(unnamed.validate().is_err());
    }
}
