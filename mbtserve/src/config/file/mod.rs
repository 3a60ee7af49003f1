mod error;
pub use error::{ConfigFileError, ConfigFileResult};

mod main;
pub use main::*;

pub mod srv;
