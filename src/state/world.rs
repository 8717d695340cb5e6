//! The stitched world: image catalog, per-map tiles and map offsets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::ImageCatalog;
use crate::codec::{BlockIndex, Extent, ImageId, MapId, Offset, TileRect, TilesetId};
use crate::config::{BuildConfig, DisconnectedLayout};
use crate::error::{Error, Result};
use crate::layout::{apply_placement, find_offset_conflicts, grid_layout, ConnectionGraph, CoordinateSolver};
use crate::report::{BuildReport, StitchOutcome};
use crate::state::{ConnectionRecord, MapTiles, TileInstance};

#[derive(Debug, Clone, Default)]
pub struct World {
    pub catalog: ImageCatalog,
    pub maps: IndexMap<MapId, MapTiles>,
    /// Offsets of every map with global coordinates, BFS order then grid
    pub offsets: IndexMap<MapId, Offset>,
    pub connections: Vec<ConnectionRecord>,
    pub report: BuildReport,
}

impl World {
    pub fn map(&self, id: MapId) -> Option<&MapTiles> {
        self.maps.get(&id)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &TileInstance> {
        self.maps.values().flat_map(|m| m.tiles.iter())
    }

    pub fn tile_count(&self) -> usize {
        self.maps.values().map(MapTiles::len).sum()
    }

    /// Bounding box of all tiles in global coordinates
    pub fn global_bounds(&self) -> Option<TileRect> {
        self.maps
            .values()
            .filter_map(MapTiles::global_bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Recompute every map's offset from scratch and reapply it.
    ///
    /// On a graph error all maps are reset to local coordinates, the
    /// report records the failure and the error is returned.
    pub fn restitch(&mut self, config: &BuildConfig) -> Result<()> {
        let report = &mut self.report;
        report.root = config.root_map;
        report.placed_maps = 0;
        report.connections = 0;
        report.implied_connections = 0;
        report.unplaced_maps.clear();
        report.grid_placed.clear();
        report.offset_conflicts.clear();
        self.offsets.clear();

        let extents: IndexMap<MapId, Extent> = self.maps.iter().map(|(&id, m)| (id, m.extent)).collect();
        let solved = ConnectionGraph::build(extents.keys().copied(), &self.connections).and_then(|graph| {
            report.connections = graph.explicit().len();
            report.implied_connections = graph.implied_count();
            let placement = CoordinateSolver::new(&graph, &extents).solve(config.root_map)?;
            report.offset_conflicts = find_offset_conflicts(&graph, &extents, &placement);
            Ok(placement)
        });

        let placement = match solved {
            Ok(placement) => placement,
            Err(e) => {
                apply_placement(&mut self.maps, &self.offsets);
                report.stitch = StitchOutcome::Failed { reason: e.to_string() };
                return Err(e);
            }
        };

        for &map in &placement.unplaced {
            warn!("{}", Error::DisconnectedMap { map });
        }
        report.placed_maps = placement.offsets.len();
        report.unplaced_maps = placement.unplaced.clone();

        let mut offsets = placement.offsets.clone();
        if config.disconnected == DisconnectedLayout::Grid && !placement.unplaced.is_empty() {
            let grid = grid_layout(
                &placement.unplaced,
                &extents,
                placement.bounds(&extents),
                config.grid_gap,
                config.grid_row_width,
            );
            report.grid_placed = grid.keys().copied().collect();
            offsets.extend(grid);
        }

        apply_placement(&mut self.maps, &offsets);
        self.offsets = offsets;
        report.stitch = StitchOutcome::Success;
        info!(
            "stitched {} maps from root {}, {} unreachable, {} offset conflicts",
            report.placed_maps,
            config.root_map,
            report.unplaced_maps.len(),
            report.offset_conflicts.len()
        );
        Ok(())
    }

    /// Owned, serializable copy of the world
    pub fn snapshot(&self) -> WorldSnapshot {
        let images = self
            .catalog
            .images
            .iter()
            .map(|img| ImageRecord {
                id: img.id,
                content_hash: img.content_hash,
                tileset: img.origin.tileset,
                block: img.origin.block,
                quadrant: img.origin.quadrant.index(),
                pixels: img.image.as_bytes().to_vec(),
            })
            .collect();
        let index = self
            .catalog
            .index
            .entries()
            .into_iter()
            .map(|(key, image)| IndexEntry {
                tileset: key.tileset,
                block: key.block,
                quadrant: key.quadrant.index(),
                image,
            })
            .collect();

        WorldSnapshot {
            images,
            index,
            tiles: self.tiles().copied().collect(),
            offsets: self.offsets.clone(),
            report: self.report.clone(),
        }
    }
}

/// A canonical image with the place it first appeared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: ImageId,
    pub content_hash: u32,
    pub tileset: TilesetId,
    pub block: BlockIndex,
    pub quadrant: u8,
    /// 16x16 RGB, row-major; empty when stripped for export
    #[serde(default)]
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub tileset: TilesetId,
    pub block: BlockIndex,
    pub quadrant: u8,
    pub image: ImageId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub images: Vec<ImageRecord>,
    pub index: Vec<IndexEntry>,
    pub tiles: Vec<TileInstance>,
    pub offsets: IndexMap<MapId, Offset>,
    pub report: BuildReport,
}

impl WorldSnapshot {
    /// Drop pixel buffers, keeping only image metadata
    pub fn without_pixels(mut self) -> Self {
        for image in &mut self.images {
            image.pixels.clear();
        }
        self
    }
}
