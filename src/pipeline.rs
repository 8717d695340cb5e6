//! `build_world`: assets in, stitched world out.
//!
//! Stages run strictly one after another, each fully materialized before
//! the next starts:
//!
//! 1. validate maps
//! 2. render and intern every canonical tile set (parallel across tile sets)
//! 3. instantiate every map against the frozen quadrant index (parallel across maps)
//! 4. build the connection graph, solve offsets and apply them

use tracing::{info, warn};

use crate::assets::AssetBundle;
use crate::catalog::render_catalog;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::layout::instantiate_all;
use crate::report::BuildReport;
use crate::state::{ConnectionRecord, MapRecord, World};

/// Run the whole pipeline.
///
/// Bad tiles, blocks and quadrants are counted in the report. A malformed
/// connection graph does not fail the build either: the world comes back
/// with local coordinates and `report.stitch` set to `Failed`. Only an
/// invalid configuration is an error.
pub fn build_world(assets: &AssetBundle, config: &BuildConfig) -> Result<World> {
    config.aliases.validate()?;
    let workers = config.worker_count();
    let mut report = BuildReport { maps: assets.maps.len(), ..BuildReport::default() };

    let mut maps: Vec<&MapRecord> = Vec::with_capacity(assets.maps.len());
    for map in assets.maps.values() {
        match map.validate() {
            Ok(()) => maps.push(map),
            Err(e) => {
                warn!("skipping map {} ({}): {e}", map.id, map.name);
                report.invalid_maps.push(map.id);
            }
        }
    }

    let mut connections: Vec<ConnectionRecord> = Vec::with_capacity(assets.connections.len());
    for record in &assets.connections {
        if report.invalid_maps.contains(&record.from) || report.invalid_maps.contains(&record.to) {
            warn!(
                "dropping connection {} -> {} ({}): endpoint map was rejected",
                record.from, record.to, record.direction
            );
            report.dropped_connections += 1;
        } else {
            connections.push(record.clone());
        }
    }

    let (catalog, render) = render_catalog(&assets.tilesets, &config.aliases, &config.palette(), workers);
    report.render = render;

    let (tiles, instantiate) = instantiate_all(&maps, &catalog.index, &config.aliases, workers);
    report.instantiate = instantiate;
    info!(
        "instantiated {} tiles across {} maps ({} skipped, {} missing images)",
        instantiate.tiles,
        tiles.len(),
        instantiate.skipped_tiles,
        instantiate.missing_images
    );

    let mut world = World {
        catalog,
        maps: tiles,
        connections,
        report,
        ..World::default()
    };
    if let Err(e) = world.restitch(config) {
        warn!("stitching failed, maps keep local coordinates: {e}");
    }
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TilesetAssets;
    use crate::codec::{Offset, TileRect};
    use crate::config::TilesetAliases;
    use crate::report::StitchOutcome;
    use pokeworld_gfx::{Quadrant, TILE_BYTES};

    /// Four solid tiles, one per shade, and one block per shade
    fn solid_tileset(name: &str) -> TilesetAssets {
        let tiles = (0u8..4)
            .map(|shade| {
                let lo = if shade & 1 != 0 { 0xFF } else { 0x00 };
                let hi = if shade & 2 != 0 { 0xFF } else { 0x00 };
                [lo, hi].repeat(TILE_BYTES / 2)
            })
            .collect();
        let blocks = (0u8..4).map(|shade| vec![shade; 16]).collect();
        TilesetAssets { name: name.into(), tiles, blocks }
    }

    fn town_and_route() -> AssetBundle {
        let mut assets = AssetBundle::new();
        assets
            .add_tileset(0, solid_tileset("OVERWORLD"))
            .add_map(MapRecord::new(0, "TOWN", 2, 2, 0).overworld(true).with_blocks(vec![0, 1, 2, 3]))
            .add_map(MapRecord::new(1, "ROUTE", 2, 3, 0).overworld(true).with_blocks(vec![1; 6]))
            .connect(ConnectionRecord::new(0, 1, "north", 0));
        assets
    }

    fn rects(world: &World) -> Vec<TileRect> {
        world.maps.values().filter_map(|m| m.global_bounds()).collect()
    }

    #[test]
    fn test_town_route_world() {
        let world = build_world(&town_and_route(), &BuildConfig::default()).unwrap();

        assert_eq!(world.report.stitch, StitchOutcome::Success);
        assert_eq!(world.offsets[&1], Offset::new(0, 4));
        assert_eq!(world.map(0).unwrap().global_bounds(), Some(TileRect { min_x: 0, min_y: 0, max_x: 4, max_y: 4 }));
        assert_eq!(world.map(1).unwrap().global_bounds(), Some(TileRect { min_x: 0, min_y: 4, max_x: 4, max_y: 10 }));
        assert_eq!(world.tile_count(), 40);
        // four solid shades
        assert_eq!(world.catalog.len(), 4);
        assert!(world.report.is_clean());

        let r = rects(&world);
        assert!(!r[0].intersects(&r[1]));
    }

    #[test]
    fn test_overworld_rows_in_world() {
        let world = build_world(&town_and_route(), &BuildConfig::default()).unwrap();
        let image_at = |x: i32, y: i32| world.tiles().find(|t| t.global_x == x && t.global_y == y).unwrap().image;
        let shade = |s: u8| world.catalog.index.get(0, s, Quadrant::TopLeft).unwrap();
        // source row 0 holds blocks 0 and 1 and ends up on top
        assert_eq!(image_at(0, 2), shade(0));
        assert_eq!(image_at(2, 2), shade(1));
        assert_eq!(image_at(0, 0), shade(2));
        assert_eq!(image_at(2, 0), shade(3));
    }

    #[test]
    fn test_alias_world() {
        let mut assets = AssetBundle::new();
        assets
            .add_tileset(6, solid_tileset("POKECENTER"))
            .add_tileset(2, TilesetAssets { name: "MART".into(), ..TilesetAssets::default() })
            .add_map(MapRecord::new(0, "MART", 1, 1, 2).with_blocks(vec![3]));
        let config = BuildConfig::default().with_aliases(TilesetAliases::new().with(2, 6));
        let world = build_world(&assets, &config).unwrap();

        assert_eq!(world.report.render.tilesets_aliased, 1);
        let id = world.catalog.index.get(6, 3, Quadrant::TopRight).unwrap();
        assert_eq!(world.catalog.index.get(2, 3, Quadrant::TopRight), Some(id));
        assert!(world.tiles().all(|t| t.image == id));
        assert_eq!(world.tile_count(), 4);
    }

    #[test]
    fn test_bad_connection_keeps_local_coordinates() {
        let mut assets = town_and_route();
        assets.connect(ConnectionRecord::new(1, 77, "north", 0));
        let world = build_world(&assets, &BuildConfig::default()).unwrap();

        assert!(matches!(world.report.stitch, StitchOutcome::Failed { .. }));
        assert_eq!(world.tile_count(), 40);
        assert!(world.tiles().all(|t| t.global_x == t.local_x && t.global_y == t.local_y));
    }

    #[test]
    fn test_invalid_and_disconnected_maps() {
        let mut assets = town_and_route();
        assets
            .add_map(MapRecord::new(5, "BROKEN", 0, 3, 0))
            .add_map(MapRecord::new(6, "ISLAND", 1, 1, 0).with_blocks(vec![2]));
        let world = build_world(&assets, &BuildConfig::default().with_workers(3)).unwrap();

        assert_eq!(world.report.invalid_maps, vec![5]);
        assert!(world.map(5).is_none());
        assert_eq!(world.report.unplaced_maps, vec![6]);
        assert!(world.report.stitch.is_success());
        assert!(!world.offsets.contains_key(&6));
    }

    #[test]
    fn test_rejected_map_connections_dropped() {
        let mut assets = town_and_route();
        assets
            .add_map(MapRecord::new(2, "", 1, 1, 0).with_blocks(vec![0]))
            .connect(ConnectionRecord::new(1, 2, "north", 0));
        let world = build_world(&assets, &BuildConfig::default()).unwrap();

        assert_eq!(world.report.invalid_maps, vec![2]);
        assert_eq!(world.report.dropped_connections, 1);
        assert_eq!(world.report.stitch, StitchOutcome::Success);
        assert_eq!(world.offsets[&1], Offset::new(0, 4));
        assert_eq!(world.connections.len(), 1);
        assert!(!world.report.is_clean());
    }

    #[test]
    fn test_unknown_root_fails_stitch_only() {
        let world = build_world(&town_and_route(), &BuildConfig::default().with_root(300)).unwrap();
        assert!(!world.report.stitch.is_success());
        assert_eq!(world.catalog.len(), 4);
    }

    #[test]
    fn test_invalid_alias_config() {
        let config = BuildConfig::default().with_aliases(TilesetAliases::new().with(1, 2).with(2, 3));
        assert!(build_world(&town_and_route(), &config).is_err());
    }
}
