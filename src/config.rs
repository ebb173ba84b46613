//! Tool configuration module.
//!
//! Handles loading and validating `picpress.toml`. Config files are
//! sparse — override just the values you want:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [compression]
//! target_kb = 500      # Byte budget in KB (practical minimum ~50)
//! max_attempts = 10    # Downscale cycles after the initial encode
//! min_dimension = 50   # Width/height floor in pixels
//! shrink_factor = 0.9  # Per-step scale factor, in (0, 1)
//!
//! [processing]
//! max_processes = 4    # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early. CLI flags override
//! config values, which override the stock defaults.

use crate::compress::CompressOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
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

/// Tool configuration loaded from `picpress.toml`.
///
/// All fields have sensible defaults. User config files need only
/// specify the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Compression loop settings.
    pub compression: CompressionConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ToolConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `picpress.toml` from the given directory if present,
    /// otherwise return defaults.
    pub fn load_or_default(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join("picpress.toml");
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compression
            .to_options()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

/// Compression loop settings, mirroring [`CompressOptions`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    pub target_kb: u32,
    pub max_attempts: u32,
    pub min_dimension: u32,
    pub shrink_factor: f64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        let opts = CompressOptions::default();
        Self {
            target_kb: opts.target_kb,
            max_attempts: opts.max_attempts,
            min_dimension: opts.min_dimension,
            shrink_factor: opts.shrink_factor,
        }
    }
}

impl CompressionConfig {
    /// Convert to the options struct the compressor consumes.
    pub fn to_options(&self) -> CompressOptions {
        CompressOptions {
            target_kb: self.target_kb,
            max_attempts: self.max_attempts,
            min_dimension: self.min_dimension,
            shrink_factor: self.shrink_factor,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel compression workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Render a stock `picpress.toml` with every option documented.
pub fn stock_config_toml() -> String {
    "\
# picpress configuration. All options are optional; the values below
# are the stock defaults.

[compression]
# Byte budget in kilobytes (1 KB = 1024 bytes). Targets under ~50 KB
# are usually unreachable for photographic content and will come back
# with met_target = false.
target_kb = 500
# Downscale-and-re-encode cycles allowed after the initial encode.
max_attempts = 10
# The loop refuses to shrink either dimension below this floor.
min_dimension = 50
# Per-step scale factor applied to both dimensions, in (0, 1).
shrink_factor = 0.9

[processing]
# Max parallel workers for batch mode. Omit for auto (CPU cores).
# max_processes = 4
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        ToolConfig::default().validate().unwrap();
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let parsed: ToolConfig = toml::from_str(&stock_config_toml()).unwrap();
        assert_eq!(parsed.compression.target_kb, 500);
        assert_eq!(parsed.compression.max_attempts, 10);
        assert_eq!(parsed.compression.min_dimension, 50);
        assert_eq!(parsed.compression.shrink_factor, 0.9);
        assert_eq!(parsed.processing.max_processes, None);
    }

    #[test]
    fn sparse_config_keeps_defaults() {
        let parsed: ToolConfig = toml::from_str("[compression]\ntarget_kb = 200\n").unwrap();
        assert_eq!(parsed.compression.target_kb, 200);
        assert_eq!(parsed.compression.max_attempts, 10);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<ToolConfig, _> = toml::from_str("[compression]\ntarget_size = 200\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_factor_fails_validation() {
        let parsed: ToolConfig = toml::from_str("[compression]\nshrink_factor = 1.5\n").unwrap();
        assert!(matches!(
            parsed.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_or_default_without_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = ToolConfig::load_or_default(tmp.path()).unwrap();
        assert_eq!(config.compression.target_kb, 500);
    }

    #[test]
    fn load_reads_and_validates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("picpress.toml");
        std::fs::write(&path, "[compression]\ntarget_kb = 0\n").unwrap();
        assert!(matches!(
            ToolConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(10_000),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_auto_uses_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }
}
