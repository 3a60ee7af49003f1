use actix_web::error::ErrorBadRequest;
use actix_web::web::{Data, Path};
use actix_web::{HttpResponse, Result as ActixResult, route};
use mbtiles::Mbtiles;
use mbtserve_core::tiles::{TileLookup, TileResolver};
use serde::Deserialize;

use crate::srv::server::map_internal_error;

#[derive(Deserialize, Clone, Debug)]
pub struct TileRequest {
    pub z: u8,
    pub x: u32,
    /// The row, optionally followed by a file extension such as `.mvt` or `.pbf`.
    pub y: String,
}

/// Parse the tile row from the last path segment, ignoring everything after the first `.`.
#[must_use]
pub fn parse_tile_row(segment: &str) -> Option<u32> {
    segment.split('.').next()?.parse().ok()
}

#[route("/tiles/{z}/{x}/{y}", method = "GET", method = "HEAD")]
pub async fn get_tile(
    path: Path<TileRequest>,
    resolver: Data<TileResolver<Mbtiles>>,
) -> ActixResult<HttpResponse> {
    let y = parse_tile_row(&path.y)
        .ok_or_else(|| ErrorBadRequest(format!("Invalid tile row '{}'", path.y)))?;

    match resolver
        .resolve_tile(path.z, path.x, y)
        .await
        .map_err(map_internal_error)?
    {
        TileLookup::Found(tile) => Ok(HttpResponse::Ok()
            .content_type(tile.content_type())
            .body(tile.data)),
        TileLookup::NotFound(_) => Ok(HttpResponse::NotFound().body("Tile not found")),
    }
}
