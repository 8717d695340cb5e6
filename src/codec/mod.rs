pub mod reader;
pub mod types;

pub use reader::BinaryReader;
pub use types::*;
