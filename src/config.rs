use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const CONFIG_PATH: &str = "refgraph.toml";

/// Run-wide settings loaded from `refgraph.toml`, overridable per-flag on
/// the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the raw source datasets.
    pub data_root: PathBuf,
    /// Directory the generated graph files are written under.
    pub output_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            output_root: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// Load configuration from `refgraph.toml`. A missing file is not an
    /// error; every field has a default.
    pub fn load() -> Result<Self> {
        match fs::read_to_string(CONFIG_PATH) {
            Ok(content) => {
                let config: Config = toml::from_str(&content)?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }
}
