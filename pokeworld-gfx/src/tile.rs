//! 2bpp tile decoding
//!
//! A tile is 8x8 pixels stored as 8 rows of two bytes. For each pixel the
//! first byte holds the low bit of the color index and the second byte the
//! high bit, most significant bit first.

use crate::error::GfxError;

/// Bytes in one packed tile
pub const TILE_BYTES: usize = 16;
/// Width and height of a tile in pixels
pub const TILE_SIZE: usize = 8;

/// Decoded tile: row-major color indices, each in `0..=3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TilePixels(pub [[u8; TILE_SIZE]; TILE_SIZE]);

impl TilePixels {
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.0[y][x]
    }

    pub fn rows(&self) -> &[[u8; TILE_SIZE]; TILE_SIZE] {
        &self.0
    }
}

/// Decode one packed 2bpp tile.
///
/// Only the first 16 bytes are read; anything shorter is rejected.
pub fn decode_2bpp(data: &[u8]) -> Result<TilePixels, GfxError> {
    if data.len() < TILE_BYTES {
        return Err(GfxError::MalformedTileData { len: data.len() });
    }

    let mut rows = [[0u8; TILE_SIZE]; TILE_SIZE];
    for (row, pair) in data[..TILE_BYTES].chunks_exact(2).enumerate() {
        let (lo, hi) = (pair[0], pair[1]);
        for (col, pixel) in rows[row].iter_mut().enumerate() {
            let bit = 7 - col;
            *pixel = (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1);
        }
    }
    Ok(TilePixels(rows))
}
