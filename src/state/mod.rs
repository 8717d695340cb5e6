pub mod connection;
pub mod map;
pub mod tile;
pub mod world;

pub use connection::{ConnectionRecord, MapConnection};
pub use map::MapRecord;
pub use tile::{MapTiles, TileInstance};
pub use world::{ImageRecord, IndexEntry, World, WorldSnapshot};
