use std::collections::BTreeMap;

use futures::TryStreamExt as _;
use sqlx::{Connection as _, Row as _, query};
use tracing::debug;

use crate::Mbtiles;
use crate::errors::MbtResult;

/// All `name`/`value` pairs of the `metadata` table.
pub type Metadata = BTreeMap<String, String>;

/// Metadata key holding the options the tileset generator was run with.
pub const GENERATOR_OPTIONS: &str = "generator_options";

/// Guess from the `generator_options` metadata value whether the tiles are gzip-compressed.
///
/// Tiles are assumed compressed unless one of the `;`-separated options contains `-pC`
/// (tippecanoe's "do not compress" flag). This is a hint only: the value is free-form
/// and some archives do not match it.
#[must_use]
pub fn is_compressed_hint(generator_options: &str) -> bool {
    !generator_options.split(';').any(|opt| opt.contains("-pC"))
}

impl Mbtiles {
    /// Read the whole `metadata` table.
    ///
    /// Values are read as text. Rows with a `NULL` name or value are skipped.
    pub async fn get_metadata(&self) -> MbtResult<Metadata> {
        let mut conn = self.connect().await?;
        let mut metadata = Metadata::new();
        {
            let mut rows =
                query("SELECT CAST(name AS TEXT) AS name, CAST(value AS TEXT) AS value FROM metadata")
                    .fetch(&mut conn);
            while let Some(row) = rows.try_next().await? {
                let name: Option<String> = row.try_get("name")?;
                let value: Option<String> = row.try_get("value")?;
                if let (Some(name), Some(value)) = (name, value) {
                    metadata.insert(name, value);
                } else {
                    debug!("Skipping a metadata row with a NULL name or value in {self}");
                }
            }
        }
        conn.close().await?;
        Ok(metadata)
    }

    /// Get a single metadata value, `None` if the key is absent or `NULL`.
    pub async fn get_metadata_value(&self, key: &str) -> MbtResult<Option<String>> {
        let mut conn = self.connect().await?;
        let row = query("SELECT CAST(value AS TEXT) AS value FROM metadata WHERE name = ? LIMIT 1")
            .bind(key)
            .fetch_optional(&mut conn)
            .await?;
        let value = match row {
            Some(row) => row.try_get::<Option<String>, _>("value")?,
            None => None,
        };
        conn.close().await?;
        Ok(value)
    }

    /// Archive-wide compression hint, see [`is_compressed_hint`].
    ///
    /// A missing `generator_options` value counts as "compressed".
    pub async fn is_compressed(&self) -> MbtResult<bool> {
        let options = self.get_metadata_value(GENERATOR_OPTIONS).await?;
        Ok(is_compressed_hint(options.as_deref().unwrap_or_default()))
    }
}
