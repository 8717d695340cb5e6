//! Block assembly
//!
//! A block is 16 tile indices laid out as a 4x4 grid. It renders as four
//! 16x16 quadrant images. Bad or missing input never aborts a quadrant: the
//! affected 8x8 cell is left blank and counted in [`BlockStats`].

use crate::error::GfxError;
use crate::palette::Palette;
use crate::quadrant::{Quadrant, QuadrantImage};
use crate::tile::{decode_2bpp, TilePixels, TILE_SIZE};

/// Bytes in one block record
pub const BLOCK_BYTES: usize = 16;
/// Tiles along each side of a block
pub const BLOCK_TILES: usize = 4;

/// Result of resolving a tile index against a tile set
#[derive(Debug, Clone, Copy)]
pub enum TileLookup<'a> {
    Present(&'a TilePixels),
    /// The raw tile exists but could not be decoded
    Malformed,
    /// No tile with that index
    Missing,
}

/// Resolves tile indices to decoded tiles
pub trait TileSource {
    fn lookup(&self, index: u8) -> TileLookup<'_>;
}

/// All tiles of one tile set, decoded once up front
#[derive(Debug, Clone, Default)]
pub struct DecodedTileset {
    tiles: Vec<Result<TilePixels, GfxError>>,
}

impl DecodedTileset {
    pub fn decode<'a>(raw: impl IntoIterator<Item = &'a [u8]>) -> Self {
        Self {
            tiles: raw.into_iter().map(decode_2bpp).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of raw tiles that failed to decode
    pub fn malformed_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_err()).count()
    }
}

impl TileSource for DecodedTileset {
    fn lookup(&self, index: u8) -> TileLookup<'_> {
        match self.tiles.get(index as usize) {
            Some(Ok(tile)) => TileLookup::Present(tile),
            Some(Err(_)) => TileLookup::Malformed,
            None => TileLookup::Missing,
        }
    }
}

/// Counters for everything that was rendered blank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockStats {
    /// Cell references to tiles that failed to decode
    pub malformed_tiles: usize,
    /// Cell references to tile indices outside the tile set
    pub missing_tiles: usize,
    /// Cells past the end of a short block record
    pub missing_cells: usize,
}

impl BlockStats {
    pub fn merge(&mut self, other: BlockStats) {
        self.malformed_tiles += other.malformed_tiles;
        self.missing_tiles += other.missing_tiles;
        self.missing_cells += other.missing_cells;
    }

    pub fn is_clean(&self) -> bool {
        *self == BlockStats::default()
    }
}

/// The four rendered quadrants of one block
#[derive(Debug, Clone)]
pub struct AssembledBlock {
    pub quadrants: [QuadrantImage; 4],
    pub stats: BlockStats,
    /// Set when the block record itself was short
    pub error: Option<GfxError>,
}

impl AssembledBlock {
    pub fn quadrant(&self, quadrant: Quadrant) -> &QuadrantImage {
        &self.quadrants[quadrant.index() as usize]
    }
}

/// Render a block into its four quadrant images.
pub fn assemble_block(block: &[u8], tiles: &impl TileSource, palette: &Palette) -> AssembledBlock {
    let error = (block.len() < BLOCK_BYTES).then_some(GfxError::MalformedBlockData { len: block.len() });
    let mut stats = BlockStats::default();

    let quadrants = Quadrant::ALL.map(|quadrant| {
        let mut image = QuadrantImage::filled(palette.blank());
        for (i, (row, col)) in quadrant.block_cells().into_iter().enumerate() {
            let x0 = (i % 2) * TILE_SIZE;
            let y0 = (i / 2) * TILE_SIZE;

            let Some(&tile_index) = block.get(row * BLOCK_TILES + col) else {
                stats.missing_cells += 1;
                continue;
            };
            match tiles.lookup(tile_index) {
                TileLookup::Present(tile) => image.draw_tile(x0, y0, tile, palette),
                TileLookup::Malformed => stats.malformed_tiles += 1,
                TileLookup::Missing => stats.missing_tiles += 1,
            }
        }
        image
    });

    AssembledBlock { quadrants, stats, error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TILE_BYTES;

    /// Tile set where tile `n` is solid color `n % 4`
    fn solid_tileset(count: usize) -> DecodedTileset {
        let raw: Vec<Vec<u8>> = (0..count)
            .map(|n| {
                let shade = (n % 4) as u8;
                let lo = if shade & 1 != 0 { 0xFF } else { 0x00 };
                let hi = if shade & 2 != 0 { 0xFF } else { 0x00 };
                [lo, hi].repeat(TILE_BYTES / 2)
            })
            .collect();
        DecodedTileset::decode(raw.iter().map(|t| t.as_slice()))
    }

    #[test]
    fn test_quadrant_layout() {
        let tiles = solid_tileset(4);
        let palette = Palette::default();
        // Rows: 0 1 2 3 / 1 0 3 2 / 2 3 0 1 / 3 2 1 0
        let block = [0, 1, 2, 3, 1, 0, 3, 2, 2, 3, 0, 1, 3, 2, 1, 0];
        let assembled = assemble_block(&block, &tiles, &palette);
        assert!(assembled.stats.is_clean());
        assert!(assembled.error.is_none());

        let tl = assembled.quadrant(Quadrant::TopLeft);
        assert_eq!(tl.pixel(0, 0), palette.color(0));
        assert_eq!(tl.pixel(8, 0), palette.color(1));
        assert_eq!(tl.pixel(0, 8), palette.color(1));
        assert_eq!(tl.pixel(15, 15), palette.color(0));

        let tr = assembled.quadrant(Quadrant::TopRight);
        assert_eq!(tr.pixel(0, 0), palette.color(2));
        assert_eq!(tr.pixel(8, 0), palette.color(3));
        assert_eq!(tr.pixel(0, 8), palette.color(3));
        assert_eq!(tr.pixel(8, 8), palette.color(2));

        let bl = assembled.quadrant(Quadrant::BottomLeft);
        assert_eq!(bl.pixel(0, 0), palette.color(2));
        assert_eq!(bl.pixel(8, 8), palette.color(2));

        let br = assembled.quadrant(Quadrant::BottomRight);
        assert_eq!(br.pixel(0, 0), palette.color(0));
        assert_eq!(br.pixel(8, 0), palette.color(1));
        assert_eq!(br.pixel(0, 8), palette.color(1));
    }

    #[test]
    fn test_missing_tile_renders_blank() {
        let tiles = solid_tileset(4);
        let palette = Palette::default();
        let mut block = [3u8; BLOCK_BYTES];
        block[0] = 200;
        let assembled = assemble_block(&block, &tiles, &palette);
        assert_eq!(assembled.stats.missing_tiles, 1);

        let tl = assembled.quadrant(Quadrant::TopLeft);
        assert_eq!(tl.pixel(0, 0), palette.blank());
        assert_eq!(tl.pixel(8, 0), palette.color(3));
    }

    #[test]
    fn test_malformed_tile_renders_blank() {
        let full = [0xFFu8; TILE_BYTES];
        let short = [0xFFu8; 3];
        let tiles = DecodedTileset::decode([&full[..], &short[..]]);
        assert_eq!(tiles.malformed_count(), 1);

        let assembled = assemble_block(&[1u8; BLOCK_BYTES], &tiles, &Palette::default());
        assert_eq!(assembled.stats.malformed_tiles, 16);
        for quadrant in Quadrant::ALL {
            assert_eq!(assembled.quadrant(quadrant), &QuadrantImage::filled(Palette::default().blank()));
        }
    }

    #[test]
    fn test_short_block() {
        let tiles = solid_tileset(4);
        let palette = Palette::default();
        let assembled = assemble_block(&[3u8; 6], &tiles, &palette);
        assert_eq!(assembled.error, Some(GfxError::MalformedBlockData { len: 6 }));
        assert_eq!(assembled.stats.missing_cells, 10);

        // Row 0 is complete, row 1 only has its first two cells.
        let tl = assembled.quadrant(Quadrant::TopLeft);
        assert_eq!(tl.pixel(0, 8), palette.color(3));
        let tr = assembled.quadrant(Quadrant::TopRight);
        assert_eq!(tr.pixel(0, 0), palette.color(3));
        assert_eq!(tr.pixel(0, 8), palette.blank());
        let br = assembled.quadrant(Quadrant::BottomRight);
        assert_eq!(br.pixel(4, 4), palette.blank());
    }
}
