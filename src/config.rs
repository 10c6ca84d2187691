//! Calibration and assistant configuration.
//!
//! Both are read once at startup. Files are TOML or JSON, chosen by extension.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable naming a calibration file.
pub const CALIB_FILE_ENV: &str = "CHEFSENSE_CALIB_FILE";

/// Environment variable naming an assistant config file.
pub const CONFIG_FILE_ENV: &str = "CHEFSENSE_CONFIG";

pub const DEFAULT_PIXELS_PER_CM: f64 = 35.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("Invalid tolerance overrides: {}", .0.join("; "))]
    InvalidTolerances(Vec<String>),
}

/// Bowl size of one measuring spoon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpoonDimensions {
    pub bowl_diameter_cm: f64,
    pub bowl_area_cm2: f64,
}

/// Camera scale and measuring-tool dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub pixels_per_cm: f64,
    /// Keyed by tool name as perception reports it ("teaspoon", "tablespoon").
    pub spoons: BTreeMap<String, SpoonDimensions>,
}

impl Default for Calibration {
    fn default() -> Self {
        let spoons = BTreeMap::from([
            (
                "teaspoon".to_string(),
                SpoonDimensions {
                    bowl_diameter_cm: 3.2,
                    bowl_area_cm2: 8.0,
                },
            ),
            (
                "tablespoon".to_string(),
                SpoonDimensions {
                    bowl_diameter_cm: 3.9,
                    bowl_area_cm2: 12.3,
                },
            ),
        ]);
        Self {
            pixels_per_cm: DEFAULT_PIXELS_PER_CM,
            spoons,
        }
    }
}

impl Calibration {
    /// Load calibration from a TOML or JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let calibration: Calibration = read_document(path)?;
        calibration.check()?;
        Ok(calibration)
    }

    /// Load calibration, falling back to defaults on any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            debug!("No calibration file configured, using defaults");
            return Self::default();
        };
        match Self::load(path) {
            Ok(calibration) => {
                info!(
                    path = %path.display(),
                    pixels_per_cm = calibration.pixels_per_cm,
                    "Loaded calibration"
                );
                calibration
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not load calibration, using defaults"
                );
                Self::default()
            }
        }
    }

    pub fn spoon(&self, name: &str) -> Option<&SpoonDimensions> {
        self.spoons.get(&name.trim().to_lowercase())
    }

    fn check(&self) -> Result<(), ConfigError> {
        if !(self.pixels_per_cm.is_finite() && self.pixels_per_cm > 0.0) {
            return Err(ConfigError::InvalidCalibration(format!(
                "pixels_per_cm must be positive, got {}",
                self.pixels_per_cm
            )));
        }
        Ok(())
    }
}

/// Tolerance overrides: ingredient -> unit name -> tolerance.
pub type ToleranceOverrides = BTreeMap<String, BTreeMap<String, f64>>;

/// Startup configuration for an [`Assistant`](crate::session::Assistant).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub calibration_file: Option<PathBuf>,
    pub tolerance: ToleranceOverrides,
}

impl AssistantConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_document(path)
    }

    /// Build config from the environment.
    ///
    /// `CHEFSENSE_CONFIG` names a config file; `CHEFSENSE_CALIB_FILE`, when set,
    /// takes precedence over the file's calibration path.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_FILE_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(path) = env::var_os(CALIB_FILE_ENV) {
            config.calibration_file = Some(PathBuf::from(path));
        }
        Ok(config)
    }

    pub fn calibration(&self) -> Calibration {
        Calibration::load_or_default(self.calibration_file.as_deref())
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}
