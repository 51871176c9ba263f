//! Run configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Stock defaults ([`CropConfig::default`])
//! 2. An optional TOML file passed with `--config`
//! 3. Command-line flags
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output = "cropped"        # Output directory
//!
//! [uniform]
//! tolerance = 15.0          # Allowed edge deviation from center brightness (0-100)
//! max_crop = 30.0           # Maximum crop per dimension, in percent (0-100)
//!
//! [corner]
//! corner = "tl"             # tl | tr | bl | br (no default)
//! percent = 10.0            # Crop percentage, exclusive 0-100 (no default)
//!
//! [processing]
//! threads = 4               # Parallel workers (>= 1)
//! ```
//!
//! Unknown keys are rejected so typos fail loudly instead of being ignored.

use crate::imaging::{Corner, CropMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete configuration for one `lumacrop` run.
///
/// All fields have defaults. Config files need only specify the values they
/// want to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    /// Directory that receives the processed images.
    pub output: PathBuf,
    /// Brightness-uniformity search settings.
    pub uniform: UniformConfig,
    /// Fixed corner crop settings.
    pub corner: CornerConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("cropped"),
            uniform: UniformConfig::default(),
            corner: CornerConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniformConfig {
    pub tolerance: f64,
    pub max_crop: f64,
}

impl Default for UniformConfig {
    fn default() -> Self {
        Self {
            tolerance: 15.0,
            max_crop: 30.0,
        }
    }
}

/// Corner crop settings. Both fields must be set, here or on the command
/// line, before a corner run can start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CornerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner: Option<Corner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Number of worker threads. Exactly this many are started.
    pub threads: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { threads: 4 }
    }
}

fn check_percentage(value: f64) -> Result<(), String> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err("must be between 0 and 100".into())
    }
}

fn check_open_percentage(value: f64) -> Result<(), String> {
    if value > 0.0 && value < 100.0 {
        Ok(())
    } else {
        Err("must be greater than 0 and less than 100".into())
    }
}

fn check_threads(value: usize) -> Result<(), String> {
    if value >= 1 {
        Ok(())
    } else {
        Err("must be at least 1".into())
    }
}

impl CropConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, msg: String| ConfigError::Validation(format!("{key} {msg}"));

        check_percentage(self.uniform.tolerance).map_err(|m| invalid("uniform.tolerance", m))?;
        check_percentage(self.uniform.max_crop).map_err(|m| invalid("uniform.max_crop", m))?;
        if let Some(percent) = self.corner.percent {
            check_open_percentage(percent).map_err(|m| invalid("corner.percent", m))?;
        }
        check_threads(self.processing.threads).map_err(|m| invalid("processing.threads", m))?;
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::Validation("output must not be empty".into()));
        }
        Ok(())
    }

    pub fn uniform_mode(&self) -> CropMode {
        CropMode::Uniform {
            tolerance: self.uniform.tolerance,
            max_crop: self.uniform.max_crop,
        }
    }

    /// Corner mode from the resolved settings.
    ///
    /// Fails when the corner or the percentage was never given.
    pub fn corner_mode(&self) -> Result<CropMode, ConfigError> {
        let corner = self.corner.corner.ok_or_else(|| {
            ConfigError::Validation("--corner is required (or corner.corner in config)".into())
        })?;
        let percent = self.corner.percent.ok_or_else(|| {
            ConfigError::Validation("--percent is required (or corner.percent in config)".into())
        })?;
        Ok(CropMode::Corner { corner, percent })
    }
}

/// Load a config file. `None` yields the stock defaults.
///
/// Values are not range-checked here: command-line flags may still replace
/// them, so call [`CropConfig::validate`] once all overrides are applied.
pub fn load_config(path: Option<&Path>) -> Result<CropConfig, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(CropConfig::default()),
    }
}

// =============================================================================
// Command-line value parsers
// =============================================================================

/// `--tolerance` / `--max-crop`: a number in 0-100 inclusive.
pub fn parse_percentage(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    check_percentage(value)?;
    Ok(value)
}

/// `--percent`: a number strictly between 0 and 100.
pub fn parse_open_percentage(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    check_open_percentage(value)?;
    Ok(value)
}

/// `--threads`: a positive integer.
pub fn parse_thread_count(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a whole number"))?;
    check_threads(value)?;
    Ok(value)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# lumacrop Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# Directory that receives processed images (created if missing)
output = "cropped"

# ---------------------------------------------------------------------------
# Brightness-uniformity cropping (`lumacrop uniform`)
# ---------------------------------------------------------------------------
[uniform]
# Allowed deviation of each edge from the center brightness, in percent (0-100).
# Lower values crop more aggressively.
tolerance = 15.0

# Maximum share of the width and of the height that may be removed, in percent
# (0-100). 0 disables cropping entirely.
max_crop = 30.0

# ---------------------------------------------------------------------------
# Fixed corner cropping (`lumacrop corner`)
# ---------------------------------------------------------------------------
[corner]
# Corner to keep anchored: the two edges next to it are trimmed.
# One of "tl", "tr", "bl", "br". No default.
# corner = "tl"

# Percentage of width and height to remove, strictly between 0 and 100.
# No default.
# percent = 10.0

# ---------------------------------------------------------------------------
# Parallelism
# ---------------------------------------------------------------------------
[processing]
# Number of worker threads (at least 1).
threads = 4
"##
}
