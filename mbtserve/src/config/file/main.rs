use std::collections::{BTreeSet, HashMap};
use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use mbtiles::Mbtiles;
use mbtserve_core::tiles::TileResolver;
use serde::{Deserialize, Serialize};
use subst::VariableMap;
use tracing::{info, warn};

use crate::config::file::srv::SrvConfig;
use crate::config::file::{ConfigFileError, ConfigFileResult};
use crate::{ServeError, ServeResult};

pub type UnrecognizedValues = HashMap<String, serde_yaml::Value>;
pub type UnrecognizedKeys = BTreeSet<String>;

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the `MBTiles` file to serve.
    pub mbtiles: Option<PathBuf>,

    #[serde(flatten)]
    pub srv: SrvConfig,

    #[serde(flatten, skip_serializing)]
    pub unrecognized: UnrecognizedValues,
}

impl Config {
    /// Warn about unrecognized keys, and make sure an archive is configured.
    pub fn finalize(&mut self) -> ServeResult<UnrecognizedKeys> {
        let keys: UnrecognizedKeys = self.unrecognized.keys().cloned().collect();
        for key in &keys {
            warn!(
                "Ignoring unrecognized configuration key '{key}'. Please check your configuration file for typos."
            );
        }
        if self.mbtiles.is_none() {
            return Err(ServeError::NoArchive);
        }
        Ok(keys)
    }

    /// Open the configured archive and create the tile resolver for it.
    pub async fn resolve(&self) -> ServeResult<TileResolver<Mbtiles>> {
        let path = self.mbtiles.as_ref().ok_or(ServeError::NoArchive)?;
        let mbt = Mbtiles::open(path)?;
        info!("Serving tiles from {mbt}");
        Ok(TileResolver::new(mbt).await)
    }

    /// Write the config as YAML to a file, or print it to stdout if the file name is `-`.
    pub fn save_to_file(&self, file_name: &Path) -> ConfigFileResult<()> {
        let yaml = serde_yaml::to_string(&self).map_err(ConfigFileError::ConfigSerializeError)?;
        if file_name.as_os_str() == OsStr::new("-") {
            info!("Current system configuration:");
            println!("\n\n{yaml}\n");
            Ok(())
        } else {
            info!(
                "Saving config to {}, use --config to load it",
                file_name.display()
            );
            File::create(file_name)
                .map_err(|e| ConfigFileError::ConfigWriteError(e, file_name.to_path_buf()))?
                .write_all(yaml.as_bytes())
                .map_err(|e| ConfigFileError::ConfigWriteError(e, file_name.to_path_buf()))
        }
    }
}

/// Read a config file, substituting `${VAR}` references from `env`.
pub fn read_config<'a, M>(file_name: &Path, env: &'a M) -> ConfigFileResult<Config>
where
    M: VariableMap<'a>,
    M::Value: AsRef<str>,
{
    let mut file =
        File::open(file_name).map_err(|e| ConfigFileError::ConfigLoadError(e, file_name.into()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| ConfigFileError::ConfigLoadError(e, file_name.into()))?;
    parse_config(&contents, env, file_name)
}

pub fn parse_config<'a, M>(contents: &str, env: &'a M, file_name: &Path) -> ConfigFileResult<Config>
where
    M: VariableMap<'a>,
    M::Value: AsRef<str>,
{
    subst::yaml::from_str(contents, env)
        .map_err(|e| ConfigFileError::ConfigParseError(e, file_name.into()))
}
