use ::mbtiles::Mbtiles;
use async_trait::async_trait;
use mbtserve_tile_utils::TileData;

use crate::tiles::{StoreError, TileStore};

#[async_trait]
impl TileStore for Mbtiles {
    async fn get_tile(&self, z: u8, x: u32, y: u32) -> Result<Option<TileData>, StoreError> {
        Ok(Mbtiles::get_tile(self, z, x, y).await?)
    }

    async fn is_compressed(&self) -> Result<bool, StoreError> {
        Ok(Mbtiles::is_compressed(self).await?)
    }
}
