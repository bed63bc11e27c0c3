//! Configuration loading and typed config structures for the Contagion engine.
//!
//! The canonical configuration lives in `contagion-config.yaml`. This module
//! defines strongly-typed structs that mirror the YAML structure and a
//! loader that reads and validates the file. Sections consumed only by the
//! engine binary (such as `queries`) are ignored here.

use std::path::Path;

use contagion_types::Timestamp;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid config value: {reason}")]
    Invalid {
        /// What is wrong with the value.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContagionConfig {
    /// Contact matrix sizing and propagation policy.
    #[serde(default)]
    pub tracer: TracerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where trace records are read from.
    #[serde(default)]
    pub input: InputConfig,
}

impl ContagionConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CONTAGION_TRACES` overrides `input.traces_path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.input.apply_env_overrides();
        config.tracer.validate()?;
        Ok(config)
    }
}

/// Contact matrix sizing and propagation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TracerConfig {
    /// Initial matrix dimension, also used as the growth increment.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,

    /// Added to a qualifying contact time to give the newly infected
    /// entity's own contagion threshold.
    #[serde(default = "default_incubation_offset")]
    pub incubation_offset: Timestamp,
}

impl TracerConfig {
    /// Check that the values describe a usable tracer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `initial_capacity` is zero (the
    /// matrix could never grow) or `incubation_offset` is negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "tracer.initial_capacity must be at least 1".to_owned(),
            });
        }
        if self.incubation_offset < 0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "tracer.incubation_offset must not be negative (got {})",
                    self.incubation_offset
                ),
            });
        }
        Ok(())
    }
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            incubation_offset: default_incubation_offset(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Trace input configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputConfig {
    /// Path to a JSON array of trace records.
    #[serde(default = "default_traces_path")]
    pub traces_path: String,
}

impl InputConfig {
    /// Override the trace path with `CONTAGION_TRACES` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CONTAGION_TRACES") {
            self.traces_path = val;
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            traces_path: default_traces_path(),
        }
    }
}

const fn default_initial_capacity() -> usize {
    50
}

const fn default_incubation_offset() -> Timestamp {
    60
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_traces_path() -> String {
    "traces.json".to_owned()
}
