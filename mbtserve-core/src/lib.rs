//! Basic building blocks of the `mbtserve` tile server.
//!
//! The [`tiles`] module turns a public XYZ tile request into the decoded bytes
//! stored in an `MBTiles` archive:
//! - [`TileStore`](tiles::TileStore) is the seam to the storage layer
//!   (implemented for [`mbtiles::Mbtiles`] behind the `mbtiles` feature),
//! - [`TileResolver`](tiles::TileResolver) owns the row-convention policy and
//!   the gzip normalization.
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

/// Tile lookup and decoding
pub mod tiles;
