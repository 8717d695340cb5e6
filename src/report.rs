//! Summary of one build: per-item error counts plus the stitching outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::RenderStats;
use crate::codec::MapId;
use crate::layout::{InstantiateStats, OffsetConflict};

/// Result of the stitching stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StitchOutcome {
    #[default]
    Success,
    /// The connection graph was rejected; every map keeps local coordinates
    Failed { reason: String },
}

impl StitchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub render: RenderStats,
    pub instantiate: InstantiateStats,
    pub maps: usize,
    /// Maps rejected by validation
    pub invalid_maps: Vec<MapId>,
    pub connections: usize,
    pub implied_connections: usize,
    /// Connections discarded because an endpoint map was rejected
    pub dropped_connections: usize,
    pub root: MapId,
    pub placed_maps: usize,
    /// Maps the root cannot reach, whether or not the grid placed them
    pub unplaced_maps: Vec<MapId>,
    pub grid_placed: Vec<MapId>,
    pub offset_conflicts: Vec<OffsetConflict>,
    pub stitch: StitchOutcome,
}

impl BuildReport {
    pub fn skipped_tiles(&self) -> usize {
        self.instantiate.skipped_tiles
    }

    pub fn missing_images(&self) -> usize {
        self.instantiate.missing_images
    }

    /// True when nothing was dropped, skipped or left unplaced
    pub fn is_clean(&self) -> bool {
        self.stitch.is_success()
            && self.invalid_maps.is_empty()
            && self.dropped_connections == 0
            && self.unplaced_maps.is_empty()
            && self.offset_conflicts.is_empty()
            && self.instantiate.skipped_tiles == 0
            && self.instantiate.missing_images == 0
            && self.render.malformed_tiles == 0
            && self.render.malformed_blocks == 0
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "images:       {} unique from {} quadrants ({} tilesets rendered, {} aliased)",
            self.render.unique_images,
            self.render.quadrants_interned,
            self.render.tilesets_rendered,
            self.render.tilesets_aliased
        )?;
        writeln!(
            f,
            "bad input:    {} malformed tiles, {} malformed blocks, {} blank cells",
            self.render.malformed_tiles, self.render.malformed_blocks, self.render.blank_cells
        )?;
        writeln!(
            f,
            "tiles:        {} placed, {} skipped, {} missing images, {} quadrant fallbacks",
            self.instantiate.tiles,
            self.instantiate.skipped_tiles,
            self.instantiate.missing_images,
            self.instantiate.fallbacks
        )?;
        writeln!(
            f,
            "maps:         {} total, {} invalid, {} placed from root {}, {} unreachable ({} on grid)",
            self.maps,
            self.invalid_maps.len(),
            self.placed_maps,
            self.root,
            self.unplaced_maps.len(),
            self.grid_placed.len()
        )?;
        writeln!(
            f,
            "connections:  {} recorded, {} implied, {} dropped, {} offset conflicts",
            self.connections,
            self.implied_connections,
            self.dropped_connections,
            self.offset_conflicts.len()
        )?;
        match &self.stitch {
            StitchOutcome::Success => write!(f, "stitching:    ok"),
            StitchOutcome::Failed { reason } => write!(f, "stitching:    FAILED ({reason})"),
        }
    }
}
