//! Render stage: decode every canonical tile set, assemble its blocks and
//! intern the resulting quadrant images.
//!
//! Decoding and assembly fan out across scoped worker threads, one tile set
//! per task. Interning runs afterwards on the calling thread in ascending
//! tile set order, so image ids do not depend on thread scheduling.

use indexmap::IndexMap;
use pokeworld_gfx::{
    assemble_block, AssembledBlock, BlockStats, DecodedTileset, Palette, Quadrant, TILE_BYTES,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assets::TilesetAssets;
use crate::catalog::store::{ImageCatalog, ImageStore, QuadrantKey};
use crate::codec::TilesetId;
use crate::config::TilesetAliases;
use crate::error::Error;

/// Counters for the render stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    pub tilesets_rendered: usize,
    /// Aliased tile sets, filled in by propagation instead of rendering
    pub tilesets_aliased: usize,
    /// Tile sets with no tiles or no blocks
    pub tilesets_empty: usize,
    pub blocks_rendered: usize,
    /// Blocks past index 255, which no map can reference
    pub blocks_unaddressable: usize,
    pub quadrants_interned: usize,
    pub unique_images: usize,
    /// Raw tiles that failed to decode
    pub malformed_tiles: usize,
    /// Block records shorter than 16 bytes
    pub malformed_blocks: usize,
    /// 8x8 cells rendered blank because of bad or missing input
    pub blank_cells: usize,
}

struct RenderedTileset {
    id: TilesetId,
    blocks: Vec<AssembledBlock>,
    malformed_tiles: usize,
}

fn render_tileset(id: TilesetId, assets: &TilesetAssets, palette: &Palette) -> RenderedTileset {
    let decoded = DecodedTileset::decode(assets.tiles.iter().map(|t| t.as_slice()));
    let blocks = assets
        .blocks
        .iter()
        .map(|block| assemble_block(block, &decoded, palette))
        .collect();
    RenderedTileset {
        id,
        blocks,
        malformed_tiles: decoded.malformed_count(),
    }
}

/// Render all canonical tile sets on up to `workers` threads
fn render_parallel(
    jobs: &[(TilesetId, &TilesetAssets)],
    palette: &Palette,
    workers: usize,
) -> Vec<RenderedTileset> {
    let workers = workers.clamp(1, jobs.len().max(1));
    if workers == 1 {
        return jobs.iter().map(|&(id, assets)| render_tileset(id, assets, palette)).collect();
    }

    let mut rendered: Vec<RenderedTileset> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                s.spawn(move || {
                    jobs.iter()
                        .skip(w)
                        .step_by(workers)
                        .map(|&(id, assets)| render_tileset(id, assets, palette))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });
    rendered.sort_by_key(|r| r.id);
    rendered
}

/// Build the image catalog for every tile set in `tilesets`.
pub fn render_catalog(
    tilesets: &IndexMap<TilesetId, TilesetAssets>,
    aliases: &TilesetAliases,
    palette: &Palette,
    workers: usize,
) -> (ImageCatalog, RenderStats) {
    let mut stats = RenderStats::default();

    let mut jobs: Vec<(TilesetId, &TilesetAssets)> = Vec::new();
    for (&id, assets) in tilesets {
        if aliases.is_alias(id) {
            debug!("tileset {id} ({}) uses tileset {} graphics", assets.name, aliases.resolve(id));
            stats.tilesets_aliased += 1;
        } else if assets.tiles.is_empty() || assets.blocks.is_empty() {
            debug!("tileset {id} ({}) has no tiles or blocks, skipping", assets.name);
            stats.tilesets_empty += 1;
        } else {
            jobs.push((id, assets));
        }
    }
    jobs.sort_by_key(|&(id, _)| id);

    let rendered = render_parallel(&jobs, palette, workers);

    let store = ImageStore::new(aliases.clone());
    for tileset in rendered {
        stats.tilesets_rendered += 1;
        stats.malformed_tiles += tileset.malformed_tiles;

        let mut blank = BlockStats::default();
        let mut new_images = 0;
        for (index, block) in tileset.blocks.iter().enumerate() {
            let Ok(block_index) = u8::try_from(index) else {
                stats.blocks_unaddressable += 1;
                continue;
            };
            if let Some(err) = &block.error {
                warn!("{}", Error::from_gfx(err, tileset.id, index));
                stats.malformed_blocks += 1;
            }
            blank.merge(block.stats);

            for quadrant in Quadrant::ALL {
                let key = QuadrantKey::new(tileset.id, block_index, quadrant);
                if store.intern(block.quadrant(quadrant), key).is_new {
                    new_images += 1;
                }
                stats.quadrants_interned += 1;
            }
            stats.blocks_rendered += 1;
        }

        if tileset.malformed_tiles > 0 {
            if let Some(assets) = tilesets.get(&tileset.id) {
                for (index, tile) in assets.tiles.iter().enumerate().filter(|(_, t)| t.len() < TILE_BYTES) {
                    warn!("{}", Error::MalformedTileData { tileset: tileset.id, index, len: tile.len() });
                }
            }
        }
        stats.blank_cells += blank.malformed_tiles + blank.missing_tiles + blank.missing_cells;
        debug!(
            "tileset {}: {} blocks, {} new images",
            tileset.id,
            tileset.blocks.len(),
            new_images
        );
    }

    let catalog = store.finish();
    stats.unique_images = catalog.len();
    info!(
        "rendered {} tilesets: {} quadrants, {} unique images, {} duplicates",
        stats.tilesets_rendered,
        stats.quadrants_interned,
        stats.unique_images,
        catalog.duplicates()
    );
    (catalog, stats)
}
