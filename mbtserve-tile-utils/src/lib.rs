//! Small helpers shared by the `mbtserve` crates: tile coordinates, the
//! TMS/XYZ row conversion, gzip detection and decoding.

use std::fmt::{Display, Formatter};

mod decoders;
pub use decoders::{decode_gzip, encode_gzip};

/// Highest zoom level for which the row conversion is defined.
pub const MAX_ZOOM: u8 = 30;

/// The two leading bytes of every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Media type of the served tile payloads (vector tiles, not validated).
pub const MVT_CONTENT_TYPE: &str = "application/x-protobuf";

pub type TileData = Vec<u8>;

/// Tile address as `zoom/column/row`.
///
/// Whether `y` is in XYZ or TMS convention depends on the context it is used in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    #[must_use]
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl Display for TileCoord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Largest valid column or row index at the given zoom, i.e. `2^zoom - 1`.
///
/// Returns `None` for zoom levels above [`MAX_ZOOM`].
#[must_use]
pub fn max_tile_index(zoom: u8) -> Option<u32> {
    (zoom <= MAX_ZOOM).then(|| (1_u32 << zoom) - 1)
}

/// Convert a row between the TMS (origin bottom-left) and XYZ (origin top-left)
/// conventions. The conversion is its own inverse.
///
/// Returns `None` if `row` does not exist at `zoom`, or `zoom` is unsupported.
///
/// ```
/// # use mbtserve_tile_utils::flip_y;
/// assert_eq!(flip_y(3, 0), Some(7));
/// assert_eq!(flip_y(3, 7), Some(0));
/// assert_eq!(flip_y(3, 8), None);
/// ```
#[must_use]
pub fn flip_y(zoom: u8, row: u32) -> Option<u32> {
    max_tile_index(zoom)?.checked_sub(row)
}

/// How the bytes of a tile blob are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Uncompressed,
    Gzip,
}

impl Encoding {
    /// Sniff the encoding from the leading bytes of the blob.
    #[must_use]
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(&GZIP_MAGIC) {
            Self::Gzip
        } else {
            Self::Uncompressed
        }
    }

    #[must_use]
    pub fn content_encoding(self) -> Option<&'static str> {
        match self {
            Self::Uncompressed => None,
            Self::Gzip => Some("gzip"),
        }
    }

    #[must_use]
    pub fn is_encoded(self) -> bool {
        self != Self::Uncompressed
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.content_encoding().unwrap_or("uncompressed"))
    }
}
