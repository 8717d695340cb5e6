//! Content-addressed image store
//!
//! Every rendered quadrant goes through [`ImageStore::intern`]. Images with
//! identical pixels share one id for the whole run; the store only grows.
//! All mutation happens behind a single mutex, so any number of threads may
//! intern concurrently.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ahash::AHashMap;
use pokeworld_gfx::{Quadrant, QuadrantImage};

use crate::codec::{BlockIndex, ImageId, TilesetId};
use crate::config::TilesetAliases;

/// Where a quadrant image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadrantKey {
    pub tileset: TilesetId,
    pub block: BlockIndex,
    pub quadrant: Quadrant,
}

impl QuadrantKey {
    pub fn new(tileset: TilesetId, block: BlockIndex, quadrant: Quadrant) -> Self {
        Self { tileset, block, quadrant }
    }
}

/// A deduplicated 16x16 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalImage {
    pub id: ImageId,
    /// CRC-32 of the pixel bytes
    pub content_hash: u32,
    /// First (tileset, block, quadrant) that produced this image
    pub origin: QuadrantKey,
    pub image: QuadrantImage,
}

/// Result of one intern call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interned {
    pub id: ImageId,
    pub is_new: bool,
}

#[derive(Default)]
struct StoreInner {
    images: Vec<CanonicalImage>,
    by_hash: AHashMap<u32, Vec<ImageId>>,
    index: AHashMap<QuadrantKey, ImageId>,
    interned: usize,
}

pub struct ImageStore {
    aliases: TilesetAliases,
    inner: Mutex<StoreInner>,
}

impl ImageStore {
    pub fn new(aliases: TilesetAliases) -> Self {
        Self {
            aliases,
            inner: Mutex::new(StoreInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Every critical section leaves the tables consistent, so a
        // panicked writer does not invalidate them.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Canonicalize `image` and record it under `key`.
    ///
    /// When `key.tileset` is the target of aliases, the same id is recorded
    /// for each aliased tile set as well.
    pub fn intern(&self, image: &QuadrantImage, key: QuadrantKey) -> Interned {
        let hash = image.content_hash();
        let mut inner = self.lock();
        inner.interned += 1;

        let existing = inner.by_hash.get(&hash).and_then(|ids| {
            ids.iter()
                .copied()
                .find(|&id| inner.images[id as usize].image == *image)
        });

        let interned = match existing {
            Some(id) => Interned { id, is_new: false },
            None => {
                let id = inner.images.len() as ImageId;
                inner.images.push(CanonicalImage {
                    id,
                    content_hash: hash,
                    origin: key,
                    image: image.clone(),
                });
                inner.by_hash.entry(hash).or_default().push(id);
                Interned { id, is_new: true }
            }
        };

        inner.index.insert(key, interned.id);
        for alias in self.aliases.aliases_of(key.tileset) {
            inner.index.insert(QuadrantKey { tileset: alias, ..key }, interned.id);
        }
        interned
    }

    pub fn lookup(&self, key: QuadrantKey) -> Option<ImageId> {
        self.lock().index.get(&key).copied()
    }

    /// Number of distinct images
    pub fn len(&self) -> usize {
        self.lock().images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freeze the store into a read-only catalog
    pub fn finish(self) -> ImageCatalog {
        let inner = self.inner.into_inner().unwrap_or_else(PoisonError::into_inner);
        ImageCatalog {
            images: inner.images,
            index: QuadrantIndex { map: inner.index },
            interned: inner.interned,
        }
    }
}

/// (tileset, block, quadrant) -> image id
#[derive(Debug, Clone, Default)]
pub struct QuadrantIndex {
    map: AHashMap<QuadrantKey, ImageId>,
}

impl QuadrantIndex {
    pub fn get(&self, tileset: TilesetId, block: BlockIndex, quadrant: Quadrant) -> Option<ImageId> {
        self.map.get(&QuadrantKey::new(tileset, block, quadrant)).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries sorted by key
    pub fn entries(&self) -> Vec<(QuadrantKey, ImageId)> {
        let mut entries: Vec<_> = self.map.iter().map(|(&k, &v)| (k, v)).collect();
        entries.sort_unstable();
        entries
    }
}

/// Frozen output of the render stage
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    pub images: Vec<CanonicalImage>,
    pub index: QuadrantIndex,
    /// Total intern calls, duplicates included
    pub interned: usize,
}

impl ImageCatalog {
    pub fn get(&self, id: ImageId) -> Option<&CanonicalImage> {
        self.images.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.interned - self.images.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn shade(v: u8) -> QuadrantImage {
        QuadrantImage::filled([v, v, v])
    }

    #[test]
    fn test_identical_pixels_share_id() {
        let store = ImageStore::new(TilesetAliases::new());
        let a = store.intern(&shade(10), QuadrantKey::new(0, 0, Quadrant::TopLeft));
        let b = store.intern(&shade(10), QuadrantKey::new(3, 9, Quadrant::BottomRight));
        let c = store.intern(&shade(11), QuadrantKey::new(0, 0, Quadrant::TopRight));

        assert!(a.is_new);
        assert_eq!(b, Interned { id: a.id, is_new: false });
        assert_ne!(c.id, a.id);
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup(QuadrantKey::new(3, 9, Quadrant::BottomRight)), Some(a.id));
    }

    #[test]
    fn test_k_distinct_contents() {
        let store = ImageStore::new(TilesetAliases::new());
        for n in 0..40u8 {
            store.intern(&shade(n % 7), QuadrantKey::new(1, n, Quadrant::TopLeft));
        }
        let catalog = store.finish();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.interned, 40);
        assert_eq!(catalog.duplicates(), 33);
        assert_eq!(catalog.index.len(), 40);
    }

    #[test]
    fn test_single_pixel_difference() {
        let store = ImageStore::new(TilesetAliases::new());
        let base = shade(255);
        let mut other = base.clone();
        other.set_pixel(7, 3, [254, 255, 255]);
        let a = store.intern(&base, QuadrantKey::new(0, 0, Quadrant::TopLeft));
        let b = store.intern(&other, QuadrantKey::new(0, 0, Quadrant::TopRight));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_first_occurrence_is_origin() {
        let store = ImageStore::new(TilesetAliases::new());
        store.intern(&shade(1), QuadrantKey::new(4, 2, Quadrant::BottomLeft));
        store.intern(&shade(1), QuadrantKey::new(0, 0, Quadrant::TopLeft));
        let catalog = store.finish();
        let image = catalog.get(0).unwrap();
        assert_eq!(image.origin, QuadrantKey::new(4, 2, Quadrant::BottomLeft));
        assert_eq!(image.content_hash, shade(1).content_hash());
    }

    #[test]
    fn test_alias_propagation() {
        // Tile set 2 reuses tile set 6's graphics.
        let store = ImageStore::new(TilesetAliases::new().with(2, 6));
        let interned = store.intern(&shade(42), QuadrantKey::new(6, 3, Quadrant::TopRight));
        let catalog = store.finish();
        assert_eq!(catalog.index.get(2, 3, Quadrant::TopRight), Some(interned.id));
        assert_eq!(catalog.index.get(6, 3, Quadrant::TopRight), Some(interned.id));
        assert_eq!(catalog.index.get(2, 3, Quadrant::TopLeft), None);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_interning_under_alias_does_not_propagate_back() {
        let store = ImageStore::new(TilesetAliases::new().with(2, 6));
        store.intern(&shade(42), QuadrantKey::new(2, 0, Quadrant::TopLeft));
        assert_eq!(store.lookup(QuadrantKey::new(6, 0, Quadrant::TopLeft)), None);
    }

    #[test]
    fn test_concurrent_intern() {
        let store = Arc::new(ImageStore::new(TilesetAliases::new()));
        let handles: Vec<_> = (0..8u8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..50u8 {
                        store.intern(&shade(n % 10), QuadrantKey::new(t, n, Quadrant::TopLeft));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 10);
        let a = store.lookup(QuadrantKey::new(0, 3, Quadrant::TopLeft));
        let b = store.lookup(QuadrantKey::new(7, 13, Quadrant::TopLeft));
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
