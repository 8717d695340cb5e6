#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GfxError {
    #[error("malformed tile data: need 16 bytes, have {len}")]
    MalformedTileData { len: usize },

    #[error("malformed block data: need 16 bytes, have {len}")]
    MalformedBlockData { len: usize },
}
