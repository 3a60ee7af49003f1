use std::ffi::OsStr;
use std::fmt::{Display, Formatter};
use std::path::Path;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection as _, Row as _, SqliteConnection, query};
use tracing::trace;

use crate::errors::{MbtError, MbtResult};

/// Read-only handle to a single `MBTiles` file.
///
/// The handle only remembers the path. Every query opens its own read-only
/// `SQLite` connection and closes it before returning, so a handle can be
/// cloned and shared between any number of concurrent requests.
#[derive(Clone, Debug)]
pub struct Mbtiles {
    filepath: String,
    filename: String,
}

impl Display for Mbtiles {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.filepath)
    }
}

impl Mbtiles {
    /// Create a handle for an existing file.
    ///
    /// Only the existence of the file is checked here. A missing or malformed
    /// schema is reported by the first query that needs it.
    pub fn open<P: AsRef<Path>>(filepath: P) -> MbtResult<Self> {
        let path = filepath.as_ref();
        if !path.is_file() {
            return Err(MbtError::FileNotFound(path.to_path_buf()));
        }
        Ok(Self {
            filepath: path
                .to_str()
                .ok_or_else(|| MbtError::UnsupportedCharsInFilepath(path.to_path_buf()))?
                .to_string(),
            filename: path
                .file_stem()
                .unwrap_or_else(|| OsStr::new("unknown"))
                .to_string_lossy()
                .to_string(),
        })
    }

    #[must_use]
    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub(crate) async fn connect(&self) -> MbtResult<SqliteConnection> {
        trace!("Opening as readonly {self}");
        let opt = SqliteConnectOptions::new()
            .filename(self.filepath())
            .read_only(true);
        Ok(SqliteConnection::connect_with(&opt).await?)
    }

    /// Look up the blob stored under the exact `zoom_level`, `tile_column`, `tile_row` key.
    ///
    /// `y` is used as is, in the TMS row convention of the `tiles` table.
    /// A missing row and a `NULL` blob both return `None`.
    pub async fn get_tile(&self, z: u8, x: u32, y: u32) -> MbtResult<Option<Vec<u8>>> {
        let mut conn = self.connect().await?;
        // The tiles key is not guaranteed to be unique, SQLite decides which duplicate is returned.
        let row = query(
            "SELECT tile_data FROM tiles WHERE zoom_level = ? AND tile_column = ? AND tile_row = ? LIMIT 1",
        )
        .bind(z)
        .bind(x)
        .bind(y)
        .fetch_optional(&mut conn)
        .await?;
        let tile = match row {
            Some(row) => row.try_get::<Option<Vec<u8>>, _>("tile_data")?,
            None => None,
        };
        conn.close().await?;
        Ok(tile)
    }
}
