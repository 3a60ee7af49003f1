//! Tile lookup and decoding for the `mbtserve` tile server.
//!
//! - [`TileStore`] gives raw, exact-key access to stored tile blobs,
//! - [`TileResolver`] maps a public XYZ request onto the store and normalizes the result.

#[cfg(feature = "mbtiles")]
/// Implementation of [`TileStore`] for `MBTiles` archives.
pub mod mbtiles;

mod error;
pub use error::{ResolveError, ResolveResult, StoreError};

mod resolver;
pub use resolver::{ResolvedTile, RowCandidate, TileLookup, TileMiss, TileResolver};

mod store;
pub use store::TileStore;
