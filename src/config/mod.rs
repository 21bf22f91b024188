//! Configuration management for sfs-results
//!
//! This module handles loading, validation, and environment overrides of the
//! TOML configuration file.

use crate::error::{Result, SfsError};
use crate::extraction::{FieldExtractor, DEFAULT_BLACKLIST_THRESHOLD_MINUTES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Schema version written by this release
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Field extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// How recent a max-frequency sighting must be to count as blacklisted
    pub blacklist_threshold_minutes: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            blacklist_threshold_minutes: DEFAULT_BLACKLIST_THRESHOLD_MINUTES,
        }
    }
}

/// CLI output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SfsError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SfsError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse, apply environment overrides and validate
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;

        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| SfsError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Build the field extractor this configuration describes
    pub fn field_extractor(&self) -> FieldExtractor {
        FieldExtractor::new(self.extraction.blacklist_threshold_minutes)
    }

    /// Apply environment variable overrides
    /// Environment variables in format: SFS_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("SFS_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "EXTRACTION__BLACKLIST_THRESHOLD_MINUTES" => {
                self.extraction.blacklist_threshold_minutes =
                    value.parse().map_err(|_| SfsError::InvalidConfigValue {
                        path: path.to_string(),
                        message: format!("Cannot parse '{}' as minutes", value),
                    })?;
            }
            "OUTPUT__PRETTY" => {
                self.output.pretty = value.parse().map_err(|_| SfsError::InvalidConfigValue {
                    path: path.to_string(),
                    message: format!("Cannot parse '{}' as boolean", value),
                })?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SfsError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("sfs-results").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}
