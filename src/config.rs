//! Detection engine configuration.
//!
//! Defaults are embedded; a configuration file and `HEALTHWATCH_`-prefixed
//! environment variables can override them through [`ConfigLoader`].

use crate::detection::DetectionAlgorithm;
use crate::error::{Error, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Default sensitivity multiplier applied to all detection thresholds
pub const DEFAULT_SENSITIVITY: f64 = 0.7;

/// Default minimum history length for decomposition-based detection
pub const DEFAULT_MINIMUM_DATA_POINTS: usize = 100;

/// Default confidence cut-off for reported anomalies
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Detection configuration recognized by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Detection algorithm to dispatch to
    pub algorithm: DetectionAlgorithm,
    /// Multiplier in `(0, 1]` applied to every detection threshold
    pub sensitivity: f64,
    /// Minimum historical points before decomposition-based detection runs
    pub minimum_data_points: usize,
    /// Anomalies below this confidence are dropped from the result
    pub confidence_threshold: f64,
    /// Whether decomposition typing may attribute deviations to seasonality
    pub seasonal_adjustment: bool,
    /// Run the patient-safety assessment when context is supplied
    pub patient_safety_analysis: bool,
    /// Run the compliance assessment when context is supplied
    pub compliance_analysis: bool,
    /// Prepend clinical-review guidance to the recommendations
    pub healthcare_recommendations: bool,
    /// Seed for the isolation-forest PRNG; fixed for reproducibility
    pub random_seed: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            algorithm: DetectionAlgorithm::Hybrid,
            sensitivity: DEFAULT_SENSITIVITY,
            minimum_data_points: DEFAULT_MINIMUM_DATA_POINTS,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            seasonal_adjustment: true,
            patient_safety_analysis: true,
            compliance_analysis: true,
            healthcare_recommendations: true,
            random_seed: 0,
        }
    }
}

impl DetectionConfig {
    /// Sets the algorithm
    pub fn with_algorithm(mut self, algorithm: DetectionAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the sensitivity multiplier
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Sets the minimum data points for decomposition
    pub fn with_minimum_data_points(mut self, points: usize) -> Self {
        self.minimum_data_points = points;
        self
    }

    /// Sets the confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Sets the seasonal-adjustment flag
    pub fn with_seasonal_adjustment(mut self, enabled: bool) -> Self {
        self.seasonal_adjustment = enabled;
        self
    }

    /// Sets the PRNG seed
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Checks the numeric ranges the algorithms rely on
    pub fn validate(&self) -> Result<()> {
        if !(self.sensitivity > 0.0 && self.sensitivity <= 1.0) {
            return Err(Error::Config(format!(
                "sensitivity must be in (0, 1], got {}",
                self.sensitivity
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::Config(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.minimum_data_points == 0 {
            return Err(Error::Config(
                "minimum_data_points must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    config_file: Option<String>,
    load_env: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new() -> Self {
        Self {
            config_file: None,
            load_env: false,
        }
    }

    /// Loads configuration from a file
    pub fn load_from_file(mut self, path: Option<&str>) -> Self {
        self.config_file = path.map(String::from);
        self
    }

    /// Loads configuration overrides from environment variables
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Builds and validates the final configuration
    pub fn build(self) -> Result<DetectionConfig> {
        let defaults = Config::try_from(&DetectionConfig::default())
            .map_err(|e| Error::Config(format!("failed to encode defaults: {}", e)))?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(config_path) = &self.config_file {
            builder = builder.add_source(File::with_name(config_path).required(false));
        } else {
            builder = builder
                .add_source(File::with_name("healthwatch").required(false))
                .add_source(File::with_name("config/healthwatch").required(false));
        }

        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix("HEALTHWATCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let detection_config: DetectionConfig = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| Error::Config(format!("failed to deserialize configuration: {}", e)))?;

        detection_config.validate()?;
        Ok(detection_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
