use std::fmt::{Display, Formatter};

use mbtserve_tile_utils::{
    Encoding, MVT_CONTENT_TYPE, TileCoord, TileData, decode_gzip, flip_y,
};
use tracing::{debug, info, warn};

use crate::tiles::{ResolveError, ResolveResult, TileStore};

/// Which interpretation of the requested row matched a stored tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCandidate {
    /// The requested XYZ row converted to the TMS row the archive should store.
    Converted,
    /// The requested row used as is, for archives that store XYZ rows.
    Raw,
}

impl RowCandidate {
    /// Lookup order. The converted row must be tried first: trying the raw row
    /// first would return the wrong tile in archives where both rows exist.
    pub const ORDER: [Self; 2] = [Self::Converted, Self::Raw];

    /// Stored row to look up for a request, or `None` if the candidate does not exist.
    #[must_use]
    pub fn row(self, coord: TileCoord) -> Option<u32> {
        match self {
            Self::Converted => flip_y(coord.z, coord.y),
            Self::Raw => Some(coord.y),
        }
    }
}

impl Display for RowCandidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Converted => "converted",
            Self::Raw => "raw",
        })
    }
}

/// A tile found in the store, with its bytes decompressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTile {
    /// Canonical tile bytes, never gzip-compressed by the archive.
    pub data: TileData,
    /// The requested (XYZ) tile address.
    pub coord: TileCoord,
    /// Which row candidate matched.
    pub candidate: RowCandidate,
    /// The stored row the blob was read from.
    pub row: u32,
    /// How the blob was encoded in the store before decoding.
    pub stored_encoding: Encoding,
}

impl ResolvedTile {
    /// Media type of the tile payload.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        MVT_CONTENT_TYPE
    }
}

/// Neither row candidate matched a stored tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMiss {
    /// The requested (XYZ) tile address. Its `y` is the raw row that was tried.
    pub coord: TileCoord,
    /// The converted row that was tried, `None` if the requested row is outside the zoom's grid.
    pub converted_row: Option<u32>,
}

impl Display for TileMiss {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let TileCoord { z, x, y } = self.coord;
        match self.converted_row {
            Some(row) => write!(f, "tried converted row {z}/{x}/{row} and raw row {z}/{x}/{y}"),
            None => write!(f, "tried raw row {z}/{x}/{y} (no converted row at zoom {z})"),
        }
    }
}

/// Outcome of a tile lookup that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileLookup {
    /// A tile matched one of the row candidates.
    Found(ResolvedTile),
    /// No tile exists for the request.
    NotFound(TileMiss),
}

/// Resolves public XYZ tile requests against a [`TileStore`] holding TMS rows.
///
/// ```no_run
/// # use mbtserve_core::tiles::{TileLookup, TileResolver};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let archive = mbtiles::Mbtiles::open("world.mbtiles")?;
/// let resolver = TileResolver::new(archive).await;
/// match resolver.resolve_tile(4, 5, 6).await? {
///     TileLookup::Found(tile) => println!("{} bytes", tile.data.len()),
///     TileLookup::NotFound(miss) => println!("no tile: {miss}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TileResolver<S> {
    store: S,
    compressed_hint: Option<bool>,
}

impl<S: TileStore> TileResolver<S> {
    /// Creates a resolver, reading the archive-wide compression hint once.
    ///
    /// A failure to read the hint is logged and otherwise ignored.
    pub async fn new(store: S) -> Self {
        let compressed_hint = match store.is_compressed().await {
            Ok(compressed) => {
                info!(
                    "Archive metadata suggests the tiles are {}",
                    if compressed { "gzip-compressed" } else { "uncompressed" }
                );
                Some(compressed)
            }
            Err(e) => {
                warn!("Unable to read the compression hint from the archive metadata: {e}");
                None
            }
        };
        Self::with_compression_hint(store, compressed_hint)
    }

    /// Creates a resolver with an already known compression hint.
    #[must_use]
    pub fn with_compression_hint(store: S, compressed_hint: Option<bool>) -> Self {
        Self {
            store,
            compressed_hint,
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The archive-wide compression hint, if it could be read.
    #[must_use]
    pub fn compressed_hint(&self) -> Option<bool> {
        self.compressed_hint
    }

    /// Finds and decodes the tile for a request in the XYZ row convention.
    ///
    /// The converted (TMS) row is looked up first, then the raw requested row.
    /// Empty blobs count as missing. A blob starting with the gzip magic bytes
    /// is decompressed, anything else is returned unchanged.
    pub async fn resolve_tile(&self, z: u8, x: u32, y: u32) -> ResolveResult<TileLookup> {
        let coord = TileCoord::new(z, x, y);
        let mut looked_up = None;

        for candidate in RowCandidate::ORDER {
            let Some(row) = candidate.row(coord) else {
                continue;
            };
            if looked_up == Some(row) {
                continue;
            }
            looked_up = Some(row);

            let data = self
                .store
                .get_tile(z, x, row)
                .await
                .map_err(|source| ResolveError::Storage { coord, source })?;
            match data {
                Some(data) if !data.is_empty() => {
                    debug!("Found tile {coord} using the {candidate} row {z}/{x}/{row}");
                    return self
                        .decode(coord, candidate, row, data)
                        .map(TileLookup::Found);
                }
                Some(_) => debug!("Ignoring empty tile blob at {candidate} row {z}/{x}/{row}"),
                None => {}
            }
        }

        let miss = TileMiss {
            coord,
            converted_row: RowCandidate::Converted.row(coord),
        };
        debug!("Tile {coord} not found, {miss}");
        Ok(TileLookup::NotFound(miss))
    }

    fn decode(
        &self,
        coord: TileCoord,
        candidate: RowCandidate,
        row: u32,
        data: TileData,
    ) -> ResolveResult<ResolvedTile> {
        let stored_encoding = Encoding::detect(&data);
        if let Some(compressed) = self.compressed_hint
            && compressed != stored_encoding.is_encoded()
        {
            debug!(
                "Archive metadata suggests {} tiles, but tile {coord} is {stored_encoding}",
                if compressed { "compressed" } else { "uncompressed" }
            );
        }

        let data = match stored_encoding {
            Encoding::Gzip => decode_gzip(&data).map_err(|source| ResolveError::Decode {
                coord,
                candidate,
                row,
                source,
            })?,
            Encoding::Uncompressed => data,
        };

        Ok(ResolvedTile {
            data,
            coord,
            candidate,
            row,
            stored_encoding,
        })
    }
}
