//! Game Boy tile graphics for the world builder
//!
//! Architecture:
//! 1. `tile` - Decodes packed 2bpp tiles into 8x8 color index matrices
//! 2. `block` - Assembles a 4x4 block of tiles into four 16x16 quadrant images
//! 3. `quadrant` - The rendered 16x16 image and its fixed block layout
//! 4. `palette` - Maps 2-bit color indices to RGB
//!
//! Everything here is pure: no I/O, no shared state. Decoding and assembly
//! can run on any number of threads at once.

mod error;
mod tile;
mod palette;
mod quadrant;
mod block;

pub use error::GfxError;
pub use tile::{decode_2bpp, TilePixels, TILE_BYTES, TILE_SIZE};
pub use palette::{Palette, Rgb, GAMEBOY_PALETTE};
pub use quadrant::{Quadrant, QuadrantImage, QUADRANT_BYTES, QUADRANT_SIZE};
pub use block::{
    assemble_block, AssembledBlock, BlockStats, DecodedTileset, TileLookup, TileSource,
    BLOCK_BYTES, BLOCK_TILES,
};
