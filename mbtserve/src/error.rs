use std::io;
use std::path::PathBuf;

use mbtiles::MbtError;

use crate::config::file::ConfigFileError;

/// A convenience [`Result`] for the mbtserve crate.
pub type ServeResult<T> = Result<T, ServeError>;

#[derive(thiserror::Error, Debug)]
pub enum ServeError {
    #[error(
        "The --config and the MBTiles file argument cannot be used together. Please remove '{}' or set `mbtiles` in the config file",
        .0.display()
    )]
    ConfigAndArchiveError(PathBuf),

    #[error(
        "No MBTiles file specified. Pass it as an argument, or set `mbtiles` in the config file."
    )]
    NoArchive,

    #[error("Unable to bind to {1}: {0}")]
    BindingError(#[source] io::Error, String),

    #[error(transparent)]
    MbtilesError(#[from] MbtError),

    #[error(transparent)]
    ConfigFileError(#[from] ConfigFileError),

    #[error(transparent)]
    WebError(#[from] actix_web::Error),

    #[error(transparent)]
    IoError(#[from] io::Error),
}

impl ServeError {
    /// Process exit code for this error.
    ///
    /// A missing archive is a usage error and exits with `2`, everything else with `1`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoArchive => 2,
            _ => 1,
        }
    }
}
