use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum MbtError {
    #[error("MBTiles file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("MBTile filepath contains unsupported characters: {}", .0.display())]
    UnsupportedCharsInFilepath(PathBuf),

    #[error(transparent)]
    SqlxError(#[from] sqlx::Error),
}

pub type MbtResult<T> = Result<T, MbtError>;
