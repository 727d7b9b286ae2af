//! Application configuration loaded from `ipl-predictor.toml`.
//!
//! ```toml
//! [artifacts]
//! encoder = "model/one_hot_encoder.bin"
//! scaler = "model/standard_scaler.bin"
//! classifier = "model/random_forest.bin"
//! positive_class = 1
//!
//! [datasets]
//! matches = "data/matches.csv"
//! deliveries = "data/ballbyball.csv"
//! auction = "data/auction.csv"
//! ipl = "data/ipl_data.csv"
//!
//! [validation]
//! reject_score_above_target = false
//! # max_overs = 20.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};
use crate::features::ValidationPolicy;

/// Default config file name looked up by the CLI.
pub const DEFAULT_CONFIG_PATH: &str = "ipl-predictor.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub datasets: DatasetConfig,
    #[serde(default)]
    pub validation: ValidationPolicy,
}

/// Locations of the three fitted artifacts plus the positive-class pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub encoder: PathBuf,
    pub scaler: PathBuf,
    pub classifier: PathBuf,
    /// Class label whose probability is reported as the win probability.
    pub positive_class: i64,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        ArtifactConfig {
            encoder: PathBuf::from("model/one_hot_encoder.bin"),
            scaler: PathBuf::from("model/standard_scaler.bin"),
            classifier: PathBuf::from("model/random_forest.bin"),
            positive_class: 1,
        }
    }
}

/// Locations of the four CSV datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub matches: PathBuf,
    pub deliveries: PathBuf,
    pub auction: PathBuf,
    pub ipl: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            matches: PathBuf::from("data/matches.csv"),
            deliveries: PathBuf::from("data/ballbyball.csv"),
            auction: PathBuf::from("data/auction.csv"),
            ipl: PathBuf::from("data/ipl_data.csv"),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PredictorError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| PredictorError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PredictorError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("{} not found, using default config", path.display());
            Ok(Self::default())
        }
    }
}
