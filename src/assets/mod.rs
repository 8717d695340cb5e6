pub mod bundle;
pub mod loader;
pub mod manifest;

pub use bundle::{AssetBundle, TilesetAssets};
pub use loader::{load_bundle, load_from_manifest, parse_manifest};
pub use manifest::{MapEntry, Manifest, TilesetEntry};
