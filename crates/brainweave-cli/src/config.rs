use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brainweave_core::config::BrainConfig;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "brainweave.toml";

fn default_output_directory() -> PathBuf {
    PathBuf::from("public/brain")
}

/// CLI configuration: graph settings plus where to write the pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(flatten)]
    pub brain: BrainConfig,

    /// Directory the JSON pages are written into.
    pub output_directory: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            brain: BrainConfig::default(),
            output_directory: default_output_directory(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from `path`, or from `brainweave.toml` in the
    /// working directory when no path is given.
    ///
    /// A missing file at the default location just means defaults; a
    /// missing file the user named explicitly is an error.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(&path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}
