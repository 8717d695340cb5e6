//! Pokeworld
//!
//! Turns Game Boy era map assets (2bpp tile graphics, blocksets, per-map
//! block grids and directional map connections) into a deduplicated catalog
//! of 16x16 tile images and one seamless global tile space.
//!
//! ## Architecture
//!
//! - `pokeworld-gfx`: tile decoding, block assembly and quadrant images
//! - `assets`: manifest loading and raw record splitting
//! - `catalog`: render stage and content-addressed image store
//! - `layout`: tile instantiation, connection graph, coordinate solving
//! - `pipeline`: stage-by-stage orchestration into a [`World`]
//! - `export`: PNG, JSON and bincode output

pub mod assets;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod pipeline;
pub mod report;
pub mod state;

pub use pokeworld_gfx as gfx;

pub use assets::{load_bundle, AssetBundle, TilesetAssets};
pub use catalog::{render_catalog, ImageCatalog, ImageStore, QuadrantIndex, QuadrantKey};
pub use codec::{BlockIndex, Direction, Extent, ImageId, MapId, Offset, TileRect, TilesetId, BLOCK_SIZE};
pub use config::{BuildConfig, DisconnectedLayout, TilesetAliases};
pub use error::{Error, Result};
pub use layout::{ConnectionGraph, CoordinateSolver, OffsetConflict, Placement};
pub use pipeline::build_world;
pub use report::{BuildReport, StitchOutcome};
pub use state::{ConnectionRecord, MapConnection, MapRecord, MapTiles, TileInstance, World, WorldSnapshot};
