//! Tile instantiation: expand each map's block grid into local tile
//! instances resolved against the frozen [`QuadrantIndex`].

use indexmap::IndexMap;
use pokeworld_gfx::Quadrant;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::QuadrantIndex;
use crate::codec::{ImageId, MapId, BLOCK_SIZE};
use crate::config::TilesetAliases;
use crate::error::Error;
use crate::state::{MapRecord, MapTiles, TileInstance};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateStats {
    pub tiles: usize,
    /// Tiles whose block position has no grid byte
    pub skipped_tiles: usize,
    /// Tiles dropped after the quadrant-0 fallback also failed
    pub missing_images: usize,
    /// Tiles that borrowed quadrant 0 of their block
    pub fallbacks: usize,
}

impl InstantiateStats {
    pub fn merge(&mut self, other: InstantiateStats) {
        self.tiles += other.tiles;
        self.skipped_tiles += other.skipped_tiles;
        self.missing_images += other.missing_images;
        self.fallbacks += other.fallbacks;
    }
}

/// Expand one map into tile instances with global = local.
///
/// Overworld maps read block rows bottom to top: output block row `by`
/// comes from source row `height - 1 - by`.
pub fn instantiate_map(
    map: &MapRecord,
    index: &QuadrantIndex,
    aliases: &TilesetAliases,
) -> (MapTiles, InstantiateStats) {
    let lookup = aliases.resolve(map.tileset);
    let mut tiles = MapTiles::new(map.id, map.extent(), map.overworld);
    let mut stats = InstantiateStats::default();

    for by in 0..map.height {
        let source_row = if map.overworld { map.height - 1 - by } else { by };
        for bx in 0..map.width {
            let Some(block) = map.block_at(bx, source_row) else {
                stats.skipped_tiles += Quadrant::ALL.len();
                continue;
            };

            for quadrant in Quadrant::ALL {
                let image: ImageId = match index.get(lookup, block, quadrant) {
                    Some(id) => id,
                    None => match index.get(lookup, block, Quadrant::TopLeft) {
                        Some(id) => {
                            stats.fallbacks += 1;
                            id
                        }
                        None => {
                            let err = Error::MissingQuadrantImage {
                                tileset: lookup,
                                block,
                                quadrant: quadrant.index(),
                            };
                            debug!("map {}: {err}", map.id);
                            stats.missing_images += 1;
                            continue;
                        }
                    },
                };

                let (dx, dy) = quadrant.tile_offset();
                let local_x = i32::from(bx) * BLOCK_SIZE + dx;
                let local_y = i32::from(by) * BLOCK_SIZE + dy;
                tiles
                    .tiles
                    .push(TileInstance::new(map.id, local_x, local_y, image, map.overworld));
            }
        }
    }

    stats.tiles = tiles.len();
    (tiles, stats)
}

/// Instantiate every map on up to `workers` threads. Output keeps the
/// order of `maps`.
pub fn instantiate_all(
    maps: &[&MapRecord],
    index: &QuadrantIndex,
    aliases: &TilesetAliases,
    workers: usize,
) -> (IndexMap<MapId, MapTiles>, InstantiateStats) {
    let workers = workers.clamp(1, maps.len().max(1));
    let chunk = maps.len().div_ceil(workers).max(1);

    let results: Vec<(MapTiles, InstantiateStats)> = if workers == 1 {
        maps.iter().map(|map| instantiate_map(map, index, aliases)).collect()
    } else {
        std::thread::scope(|s| {
            let handles: Vec<_> = maps
                .chunks(chunk)
                .map(|part| {
                    s.spawn(move || {
                        part.iter()
                            .map(|map| instantiate_map(map, index, aliases))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    };

    let mut stats = InstantiateStats::default();
    let mut out = IndexMap::with_capacity(results.len());
    for (tiles, map_stats) in results {
        stats.merge(map_stats);
        out.insert(tiles.map, tiles);
    }
    (out, stats)
}
