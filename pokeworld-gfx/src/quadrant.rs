use crc32fast::Hasher;

use crate::palette::{Palette, Rgb};
use crate::tile::TilePixels;

/// Width and height of a quadrant image in pixels
pub const QUADRANT_SIZE: usize = 16;
/// RGB bytes in one quadrant image
pub const QUADRANT_BYTES: usize = QUADRANT_SIZE * QUADRANT_SIZE * 3;

/// One of the four 2x2-tile regions of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::TopLeft),
            1 => Some(Self::TopRight),
            2 => Some(Self::BottomLeft),
            3 => Some(Self::BottomRight),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Position of this quadrant within its block, in tile units: (`q % 2`, `q / 2`)
    pub fn tile_offset(self) -> (i32, i32) {
        let q = self as i32;
        (q % 2, q / 2)
    }

    /// Block cells (row, column) that make up this quadrant, in the order
    /// they are drawn: top-left, top-right, bottom-left, bottom-right.
    pub fn block_cells(self) -> [(usize, usize); 4] {
        let (col, row) = self.tile_offset();
        let (r, c) = (row as usize * 2, col as usize * 2);
        [(r, c), (r, c + 1), (r + 1, c), (r + 1, c + 1)]
    }
}

/// A rendered 16x16 RGB image
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QuadrantImage {
    pixels: [u8; QUADRANT_BYTES],
}

impl QuadrantImage {
    /// Image filled with a single color
    pub fn filled(color: Rgb) -> Self {
        let mut pixels = [0u8; QUADRANT_BYTES];
        for px in pixels.chunks_exact_mut(3) {
            px.copy_from_slice(&color);
        }
        Self { pixels }
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let pixels: [u8; QUADRANT_BYTES] = bytes.try_into().ok()?;
        Some(Self { pixels })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let i = (y * QUADRANT_SIZE + x) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        let i = (y * QUADRANT_SIZE + x) * 3;
        self.pixels[i..i + 3].copy_from_slice(&color);
    }

    /// Draw a decoded tile with its top-left corner at (`x0`, `y0`)
    pub fn draw_tile(&mut self, x0: usize, y0: usize, tile: &TilePixels, palette: &Palette) {
        for (y, row) in tile.rows().iter().enumerate() {
            for (x, &index) in row.iter().enumerate() {
                self.set_pixel(x0 + x, y0 + y, palette.color(index));
            }
        }
    }

    /// CRC-32 over the raw pixel bytes
    pub fn content_hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&self.pixels);
        hasher.finalize()
    }
}

impl std::fmt::Debug for QuadrantImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadrantImage")
            .field("hash", &format_args!("{:#010x}", self.content_hash()))
            .finish()
    }
}
