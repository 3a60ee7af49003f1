#![doc = "Read-only access to a single `MBTiles` file: metadata lookup and raw tile lookup by the exact `zoom_level`, `tile_column`, `tile_row` key of the `tiles` table."]
#![forbid(unsafe_code)]

mod errors;
pub use errors::{MbtError, MbtResult};

mod mbtiles;
pub use mbtiles::Mbtiles;

mod metadata;
pub use metadata::{GENERATOR_OPTIONS, Metadata, is_compressed_hint};
