use mbtserve_tile_utils::TileCoord;

use crate::tiles::RowCandidate;

/// Failure reported by a [`TileStore`](crate::tiles::TileStore) implementation.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while resolving a tile.
///
/// A tile that does not exist is not an error, see
/// [`TileLookup::NotFound`](crate::tiles::TileLookup::NotFound).
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    /// The stored blob starts with the gzip magic bytes, but does not decompress.
    #[error("Unable to decompress tile {coord} stored at {candidate} row {row}: {source}")]
    Decode {
        /// The requested (XYZ) tile address.
        coord: TileCoord,
        /// Which row candidate the blob was found under.
        candidate: RowCandidate,
        /// The stored row the blob was read from.
        row: u32,
        /// The decompression failure.
        #[source]
        source: std::io::Error,
    },

    /// The storage layer failed to answer the lookup.
    #[error("Unable to read tile {coord}: {source}")]
    Storage {
        /// The requested (XYZ) tile address.
        coord: TileCoord,
        /// The storage failure.
        #[source]
        source: StoreError,
    },
}

/// A convenience [`Result`] for tile resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;
