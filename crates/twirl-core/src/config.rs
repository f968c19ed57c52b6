//! Configuration for twirling set generation and substitution.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with TWIRL_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tunable parameters of the generator and the substitution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwirlConfig {
    /// Equivalence tolerance, relative to the Frobenius norm of the gate.
    pub tolerance: f64,
    /// Absolute tolerance for the unitarity check on input matrices.
    pub unitarity_tolerance: f64,
    /// Evaluate candidates and gates on the rayon thread pool.
    pub parallel: bool,
    /// Seed for substitution; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Registry file; `None` means `~/.twirl/registry.json`.
    pub registry_path: Option<PathBuf>,
}

impl Default for TwirlConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            unitarity_tolerance: 1e-9,
            parallel: true,
            seed: None,
            registry_path: None,
        }
    }
}

impl TwirlConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: TwirlConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => TwirlConfig::default(),
        };

        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Merge environment overrides into this configuration.
    ///
    /// Only variables present in `lookup` override the current values. A
    /// variable that is set but does not parse is an error.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TWIRL_TOLERANCE") {
            self.tolerance = parse_var("TWIRL_TOLERANCE", &v)?;
        }
        if let Some(v) = lookup("TWIRL_UNITARITY_TOLERANCE") {
            self.unitarity_tolerance = parse_var("TWIRL_UNITARITY_TOLERANCE", &v)?;
        }
        if let Some(v) = lookup("TWIRL_PARALLEL") {
            self.parallel = parse_var("TWIRL_PARALLEL", &v)?;
        }
        if let Some(v) = lookup("TWIRL_SEED") {
            self.seed = Some(parse_var("TWIRL_SEED", &v)?);
        }
        if let Some(v) = lookup("TWIRL_REGISTRY") {
            self.registry_path = Some(PathBuf::from(v));
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if !self.unitarity_tolerance.is_finite() || self.unitarity_tolerance <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "unitarity_tolerance must be finite and positive, got {}",
                self.unitarity_tolerance
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}: cannot parse '{value}'")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
