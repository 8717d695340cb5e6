//! Loads an [`AssetBundle`] from a JSON manifest and the raw `.2bpp`, `.bst`
//! and `.blk` files it points at.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::assets::bundle::{AssetBundle, TilesetAssets};
use crate::assets::manifest::Manifest;
use crate::error::{Error, Result};
use crate::state::MapRecord;

fn read_file(base: &Path, rel: &Path) -> Result<Vec<u8>> {
    let path = base.join(rel);
    std::fs::read(&path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))
}

fn read_optional(base: &Path, rel: Option<&PathBuf>) -> Result<Vec<u8>> {
    match rel {
        Some(rel) => read_file(base, rel),
        None => Ok(Vec::new()),
    }
}

pub fn parse_manifest(content: &str) -> Result<Manifest> {
    serde_json::from_str(content).map_err(|e| Error::Manifest(e.to_string()))
}

/// Resolve every file in `manifest` against `base`
pub fn load_from_manifest(manifest: &Manifest, base: &Path) -> Result<AssetBundle> {
    let mut bundle = AssetBundle::new();

    for entry in &manifest.tilesets {
        if bundle.tilesets.contains_key(&entry.id) {
            return Err(Error::Manifest(format!("duplicate tileset id {}", entry.id)));
        }
        let tiles = read_optional(base, entry.tiles.as_ref())?;
        let blocks = read_optional(base, entry.blocks.as_ref())?;
        let assets = TilesetAssets::from_raw(entry.name.clone(), &tiles, &blocks);
        debug!(
            "tileset {} ({}): {} tiles, {} blocks",
            entry.id,
            entry.name,
            assets.tiles.len(),
            assets.blocks.len()
        );
        bundle.add_tileset(entry.id, assets);
    }

    for entry in &manifest.maps {
        if bundle.maps.contains_key(&entry.id) {
            return Err(Error::Manifest(format!("duplicate map id {}", entry.id)));
        }
        let blocks = read_optional(base, entry.blocks.as_ref())?;
        let map = MapRecord {
            id: entry.id,
            name: entry.name.clone(),
            width: entry.width,
            height: entry.height,
            tileset: entry.tileset,
            overworld: entry.overworld,
            blocks,
        };
        if let Some((expected, actual)) = map.block_count_mismatch() {
            warn!("map {} ({}): expected {expected} blocks, file has {actual}", map.id, map.name);
        }
        bundle.add_map(map);
    }

    bundle.connections = manifest.connections.clone();

    info!(
        "loaded {} tilesets, {} maps, {} connections",
        bundle.tilesets.len(),
        bundle.maps.len(),
        bundle.connections.len()
    );
    Ok(bundle)
}

/// Load the manifest at `path` and every asset file it references
pub fn load_bundle(path: &Path) -> Result<AssetBundle> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
    let manifest = parse_manifest(&content)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    load_from_manifest(&manifest, base)
}
