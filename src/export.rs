//! Writing a built world to disk: one PNG per canonical image, the world as
//! JSON, and a bincode snapshot that can be read back.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

#[cfg(feature = "png")]
use crate::catalog::ImageCatalog;
use crate::codec::ImageId;
use crate::error::{Error, Result};
use crate::state::{World, WorldSnapshot};

/// File name of a canonical image
pub fn tile_file_name(id: ImageId) -> String {
    format!("tile_{id}.png")
}

/// Encode one 16x16 RGB buffer as PNG
#[cfg(feature = "png")]
pub fn encode_png(pixels: &[u8], size: u32) -> Result<Vec<u8>> {
    use image::ImageEncoder;

    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(pixels, size, size, image::ExtendedColorType::Rgb8)
        .map_err(|e| Error::Image(e.to_string()))?;
    Ok(png)
}

/// Write `tile_{id}.png` for every image in the catalog, returning the
/// number of files written
#[cfg(feature = "png")]
pub fn write_catalog_pngs(catalog: &ImageCatalog, dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(dir)?;
    for img in &catalog.images {
        let png = encode_png(img.image.as_bytes(), pokeworld_gfx::QUADRANT_SIZE as u32)?;
        let path = dir.join(tile_file_name(img.id));
        std::fs::write(&path, png).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
    }
    info!("wrote {} images to {}", catalog.len(), dir.display());
    Ok(catalog.len())
}

/// Write the world as pretty JSON. Pixel buffers are left out unless
/// `with_pixels` is set.
pub fn write_world_json(world: &World, path: &Path, with_pixels: bool) -> Result<()> {
    let snapshot = if with_pixels { world.snapshot() } else { world.snapshot().without_pixels() };
    let mut out = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut out, &snapshot)?;
    out.flush()?;
    info!("wrote {} tiles to {}", snapshot.tiles.len(), path.display());
    Ok(())
}

pub fn write_snapshot(world: &World, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(create(path)?);
    bincode::serialize_into(&mut out, &world.snapshot())?;
    out.flush()?;
    info!("wrote snapshot to {}", path.display());
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<WorldSnapshot> {
    let file = File::open(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
    Ok(bincode::deserialize_from(BufReader::new(file))?)
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))
}

/// Output locations under one directory
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub images: PathBuf,
    pub json: PathBuf,
    pub snapshot: PathBuf,
}

impl OutputPaths {
    pub fn under(dir: &Path) -> Self {
        Self {
            images: dir.join("tiles"),
            json: dir.join("world.json"),
            snapshot: dir.join("world.bin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ImageStore, QuadrantKey};
    use crate::codec::Extent;
    use crate::config::TilesetAliases;
    use crate::state::{MapTiles, TileInstance};
    use pokeworld_gfx::{Quadrant, QuadrantImage};
    use tempfile::TempDir;

    fn small_world() -> World {
        let store = ImageStore::new(TilesetAliases::new());
        store.intern(&QuadrantImage::filled([255, 255, 255]), QuadrantKey::new(0, 0, Quadrant::TopLeft));
        store.intern(&QuadrantImage::filled([0, 0, 0]), QuadrantKey::new(0, 1, Quadrant::TopLeft));

        let mut tiles = MapTiles::new(0, Extent::new(2, 2), false);
        tiles.tiles.push(TileInstance::new(0, 0, 0, 1, false));
        let mut world = World { catalog: store.finish(), ..World::default() };
        world.maps.insert(0, tiles);
        world
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let world = small_world();
        let path = tmp.path().join("out/world.bin");
        write_snapshot(&world, &path).unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), world.snapshot());
    }

    #[test]
    fn test_world_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("world.json");
        write_world_json(&small_world(), &path, false).unwrap();

        let snapshot: WorldSnapshot = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(snapshot.images.len(), 2);
        assert!(snapshot.images.iter().all(|img| img.pixels.is_empty()));
        assert_eq!(snapshot.tiles[0].image, 1);
    }

    #[cfg(feature = "png")]
    #[test]
    fn test_catalog_pngs() {
        let tmp = TempDir::new().unwrap();
        let world = small_world();
        let written = write_catalog_pngs(&world.catalog, tmp.path()).unwrap();
        assert_eq!(written, 2);

        let bytes = std::fs::read(tmp.path().join("tile_1.png")).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
