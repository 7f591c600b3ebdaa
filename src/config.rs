//! Visualizer Configuration
//! Input/output locations, cleaning quantiles and figure sizes.

use crate::data::{
    DEFAULT_DATE_COLUMN, DEFAULT_LOWER_QUANTILE, DEFAULT_UPPER_QUANTILE, DEFAULT_VALUE_COLUMN,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory by the binary.
pub const CONFIG_FILE_NAME: &str = "visualizer.json";
pub const DEFAULT_INPUT_FILE: &str = "fcc-forum-pageviews.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Quantiles must satisfy 0 <= lower <= upper <= 1, got {lower} and {upper}")]
    InvalidQuantiles { lower: f64, upper: f64 },
}

/// Pipeline settings. Every field has a default, so a config file only
/// needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub date_column: String,
    pub value_column: String,
    pub lower_quantile: f64,
    pub upper_quantile: f64,
    /// Figure sizes in pixels (width, height).
    pub line_size: (u32, u32),
    pub bar_size: (u32, u32),
    pub box_size: (u32, u32),
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            output_dir: PathBuf::from("."),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
            lower_quantile: DEFAULT_LOWER_QUANTILE,
            upper_quantile: DEFAULT_UPPER_QUANTILE,
            line_size: (1500, 500),
            bar_size: (1000, 600),
            box_size: (1600, 600),
        }
    }
}

impl VisualizerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Read `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_json_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lower, upper) = (self.lower_quantile, self.upper_quantile);
        if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) || lower > upper {
            return Err(ConfigError::InvalidQuantiles { lower, upper });
        }
        Ok(())
    }
}
