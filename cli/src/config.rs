//! Configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::formats::OutputFormat;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Defaults {
    /// Output format for `invert` when `--format` is not given
    #[serde(default)]
    pub format: OutputFormat,

    /// Number of random vectors checked by `verify`
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Matrix file used instead of the built-in diffusion layer
    #[serde(default)]
    pub matrix: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            samples: default_samples(),
            matrix: None,
        }
    }
}

fn default_samples() -> usize {
    64
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    fn load_default() -> Result<Self> {
        let config_paths = [
            Some(PathBuf::from("gf2inv.toml")),
            dirs::config_dir().map(|d| d.join("gf2inv").join("config.toml")),
        ];

        for config_path in config_paths.into_iter().flatten() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        log::debug!("loading config from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // relative matrix paths are taken from the config file's directory
        if let (Some(matrix), Some(base)) = (&config.defaults.matrix, path.parent()) {
            if matrix.is_relative() {
                config.defaults.matrix = Some(base.join(matrix));
            }
        }
        Ok(config)
    }
}
