#![doc = "HTTP server for a single `MBTiles` file: XYZ tiles resolved against TMS rows, and the archive metadata as JSON."]
#![forbid(unsafe_code)]

pub mod config;
pub mod logging;
pub mod srv;

mod error;
pub use error::{ServeError, ServeResult};
