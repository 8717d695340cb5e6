pub mod render;
pub mod store;

pub use render::{render_catalog, RenderStats};
pub use store::{CanonicalImage, ImageCatalog, ImageStore, Interned, QuadrantIndex, QuadrantKey};
