use async_trait::async_trait;
use mbtserve_tile_utils::TileData;

use crate::tiles::StoreError;

/// Read-only, exact-key access to stored tile blobs.
///
/// Implementors never convert coordinates: `y` is the row exactly as it is stored.
#[async_trait]
pub trait TileStore: Send + Sync {
    /// Retrieves the blob stored under `z/x/y`, or `None` if there is none.
    async fn get_tile(&self, z: u8, x: u32, y: u32) -> Result<Option<TileData>, StoreError>;

    /// Archive-wide hint whether the stored tiles are gzip-compressed.
    ///
    /// Only used for diagnostics, the actual blob bytes always decide.
    async fn is_compressed(&self) -> Result<bool, StoreError>;
}
