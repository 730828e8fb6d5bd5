use crate::layout::{GridLayout, LayoutError};
use lazyload_config::{ConfigError, LazyLoadConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("Failed to start runtime: {0}")]
    Runtime(std::io::Error),
}

/// Simulator settings: the loader configuration plus the gallery geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimConfig {
    pub loader: LazyLoadConfig,
    pub layout: GridLayout,
    /// Container width to switch to after the first scroll step, to exercise
    /// resize sweeps.
    pub resize_width: Option<f64>,
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|source| SimError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Like [`SimConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, SimError> {
        match Self::load(path) {
            Err(SimError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                warn!("No simulator config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Defaults, with the loader section taken from the user's lazyload
    /// config file when one exists.
    pub fn from_user_config() -> Result<Self, SimError> {
        let loader = match LazyLoadConfig::default_path() {
            Some(path) => LazyLoadConfig::load_or_default(&path)?,
            None => LazyLoadConfig::default(),
        };

        Ok(Self {
            loader,
            ..Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.loader.validate()?;
        self.layout.validate()?;

        if let Some(width) = self.resize_width {
            self.layout.clone().with_container_width(width).validate()?;
        }

        Ok(())
    }
}
