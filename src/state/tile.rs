use serde::{Deserialize, Serialize};

use crate::codec::{Extent, ImageId, MapId, Offset, TileRect};

/// One 16x16 tile of a map, placed in both local and global space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileInstance {
    pub map: MapId,
    pub local_x: i32,
    pub local_y: i32,
    pub global_x: i32,
    pub global_y: i32,
    pub image: ImageId,
    pub overworld: bool,
}

impl TileInstance {
    /// New tile whose global position starts out equal to its local one
    pub fn new(map: MapId, local_x: i32, local_y: i32, image: ImageId, overworld: bool) -> Self {
        Self {
            map,
            local_x,
            local_y,
            global_x: local_x,
            global_y: local_y,
            image,
            overworld,
        }
    }

    pub fn reset_to_local(&mut self) {
        self.global_x = self.local_x;
        self.global_y = self.local_y;
    }

    /// Global position = local position + `offset`. Never accumulates.
    pub fn place(&mut self, offset: Offset) {
        self.global_x = self.local_x + offset.x;
        self.global_y = self.local_y + offset.y;
    }
}

/// All tiles instantiated for one map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTiles {
    pub map: MapId,
    pub extent: Extent,
    pub overworld: bool,
    pub tiles: Vec<TileInstance>,
}

impl MapTiles {
    pub fn new(map: MapId, extent: Extent, overworld: bool) -> Self {
        Self { map, extent, overworld, tiles: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn reset_to_local(&mut self) {
        for tile in &mut self.tiles {
            tile.reset_to_local();
        }
    }

    /// Reset every tile to local coordinates, then translate by `offset`
    pub fn place(&mut self, offset: Offset) {
        self.reset_to_local();
        for tile in &mut self.tiles {
            tile.place(offset);
        }
    }

    /// Bounding box of the tiles' global positions
    pub fn global_bounds(&self) -> Option<TileRect> {
        let first = self.tiles.first()?;
        let mut rect = TileRect {
            min_x: first.global_x,
            min_y: first.global_y,
            max_x: first.global_x + 1,
            max_y: first.global_y + 1,
        };
        for t in &self.tiles[1..] {
            rect.min_x = rect.min_x.min(t.global_x);
            rect.min_y = rect.min_y.min(t.global_y);
            rect.max_x = rect.max_x.max(t.global_x + 1);
            rect.max_y = rect.max_y.max(t.global_y + 1);
        }
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_is_not_cumulative() {
        let mut map = MapTiles::new(3, Extent::new(2, 2), true);
        map.tiles.push(TileInstance::new(3, 1, 1, 0, true));

        map.place(Offset::new(10, -4));
        map.place(Offset::new(10, -4));
        assert_eq!((map.tiles[0].global_x, map.tiles[0].global_y), (11, -3));

        map.reset_to_local();
        assert_eq!((map.tiles[0].global_x, map.tiles[0].global_y), (1, 1));
    }

    #[test]
    fn test_global_bounds() {
        let mut map = MapTiles::new(1, Extent::new(2, 2), false);
        assert!(map.global_bounds().is_none());
        for y in 0..2 {
            for x in 0..2 {
                map.tiles.push(TileInstance::new(1, x, y, 0, false));
            }
        }
        map.place(Offset::new(4, 6));
        assert_eq!(map.global_bounds(), Some(TileRect { min_x: 4, min_y: 6, max_x: 6, max_y: 8 }));
    }
}
