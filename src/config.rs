//! Build configuration
//!
//! The alias table, the palette and the root map live in [`BuildConfig`] and
//! are passed explicitly to each stage.

use std::path::Path;

use indexmap::IndexMap;
use pokeworld_gfx::{Palette, Rgb, GAMEBOY_PALETTE};
use serde::{Deserialize, Serialize};

use crate::codec::{MapId, TilesetId};
use crate::error::{Error, Result};

/// Map the stitched world is anchored on (the starting town)
pub const DEFAULT_ROOT_MAP: MapId = 0;

/// Tile sets that reuse another tile set's graphics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TilesetAliases {
    /// alias -> canonical
    map: IndexMap<TilesetId, TilesetId>,
}

impl TilesetAliases {
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    /// DOJO uses the GYM graphics, MART uses the POKECENTER graphics
    pub fn gen1() -> Self {
        Self::new().with(5, 7).with(2, 6)
    }

    pub fn with(mut self, alias: TilesetId, canonical: TilesetId) -> Self {
        self.map.insert(alias, canonical);
        self
    }

    /// Tile set whose graphics `id` uses
    pub fn resolve(&self, id: TilesetId) -> TilesetId {
        self.map.get(&id).copied().unwrap_or(id)
    }

    pub fn is_alias(&self, id: TilesetId) -> bool {
        self.map.contains_key(&id)
    }

    /// All tile sets aliased to `canonical`
    pub fn aliases_of(&self, canonical: TilesetId) -> impl Iterator<Item = TilesetId> + '_ {
        self.map
            .iter()
            .filter(move |&(_, &target)| target == canonical)
            .map(|(&alias, _)| alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TilesetId, TilesetId)> + '_ {
        self.map.iter().map(|(&a, &c)| (a, c))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Aliases resolve in a single hop, so targets must be canonical.
    pub fn validate(&self) -> Result<()> {
        for (&alias, &target) in &self.map {
            if alias == target {
                return Err(Error::InvalidAlias { alias, target, reason: "tileset aliases itself" });
            }
            if self.map.contains_key(&target) {
                return Err(Error::InvalidAlias { alias, target, reason: "target is itself an alias" });
            }
        }
        Ok(())
    }
}

impl Default for TilesetAliases {
    fn default() -> Self {
        Self::gen1()
    }
}

/// What to do with maps the root cannot reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisconnectedLayout {
    /// Keep local coordinates
    #[default]
    Leave,
    /// Pack them in rows beside the stitched world
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub root_map: MapId,
    pub aliases: TilesetAliases,
    pub palette: [Rgb; 4],
    /// Worker threads for rendering and instantiation; 0 means one per core
    pub workers: usize,
    pub disconnected: DisconnectedLayout,
    /// Empty tiles between grid-placed maps
    pub grid_gap: i32,
    /// Maximum row width, in tiles, of the disconnected-map grid
    pub grid_row_width: i32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root_map: DEFAULT_ROOT_MAP,
            aliases: TilesetAliases::default(),
            palette: GAMEBOY_PALETTE,
            workers: 0,
            disconnected: DisconnectedLayout::Leave,
            grid_gap: 4,
            grid_row_width: 256,
        }
    }
}

impl BuildConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.aliases.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    pub fn with_root(mut self, root: MapId) -> Self {
        self.root_map = root;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_aliases(mut self, aliases: TilesetAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_disconnected(mut self, layout: DisconnectedLayout) -> Self {
        self.disconnected = layout;
        self
    }

    pub fn palette(&self) -> Palette {
        Palette::new(self.palette)
    }

    /// Resolved worker count, never zero
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aliases() {
        let aliases = TilesetAliases::default();
        assert_eq!(aliases.resolve(5), 7);
        assert_eq!(aliases.resolve(2), 6);
        assert_eq!(aliases.resolve(7), 7);
        assert_eq!(aliases.aliases_of(6).collect::<Vec<_>>(), vec![2]);
        assert!(aliases.aliases_of(5).next().is_none());
        aliases.validate().unwrap();
    }

    #[test]
    fn test_alias_chain_rejected() {
        let aliases = TilesetAliases::new().with(1, 2).with(2, 3);
        assert!(matches!(aliases.validate(), Err(Error::InvalidAlias { alias: 1, target: 2, .. })));

        let selfish = TilesetAliases::new().with(4, 4);
        assert!(selfish.validate().is_err());
    }

    #[test]
    fn test_config_json_defaults() {
        let config = BuildConfig::from_json_str(r#"{"root_map": 12, "disconnected": "grid"}"#).unwrap();
        assert_eq!(config.root_map, 12);
        assert_eq!(config.disconnected, DisconnectedLayout::Grid);
        assert_eq!(config.aliases, TilesetAliases::gen1());
        assert_eq!(config.palette, GAMEBOY_PALETTE);
    }

    #[test]
    fn test_config_json_aliases() {
        let config = BuildConfig::from_json_str(r#"{"aliases": {"3": 9}}"#).unwrap();
        assert_eq!(config.aliases.resolve(3), 9);
        assert_eq!(config.aliases.resolve(5), 5);

        assert!(BuildConfig::from_json_str(r#"{"aliases": {"3": 9, "9": 1}}"#).is_err());
    }

    #[test]
    fn test_worker_count_never_zero() {
        assert!(BuildConfig::default().worker_count() >= 1);
        assert_eq!(BuildConfig::default().with_workers(3).worker_count(), 3);
    }
}
