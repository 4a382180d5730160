//! Configuration management for the module loader
//!
//! Handles configuration loading (TOML), defaults, and runtime merging of
//! `configure` settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::module::traits::ModuleError;

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Module whose closure is treated as pre-loaded at startup
    #[serde(default = "default_main_module")]
    pub main_module: String,

    /// Module implicitly required by every module; initializers run against
    /// its capabilities only
    #[serde(default = "default_base_module")]
    pub base_module: String,
}

fn default_main_module() -> String {
    "app".to_string()
}

fn default_base_module() -> String {
    "core".to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            main_module: default_main_module(),
            base_module: default_base_module(),
        }
    }
}

impl LoaderConfig {
    /// Merge runtime settings, returning the merged configuration
    pub fn merge(&mut self, settings: ConfigureSettings) -> &Self {
        if let Some(main_module) = settings.main_module {
            self.main_module = main_module;
        }
        self
    }
}

/// Settings accepted by `configure`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureSettings {
    /// Replace the main module
    #[serde(default, alias = "mainModule")]
    pub main_module: Option<String>,
}

impl ConfigureSettings {
    pub fn main_module(name: impl Into<String>) -> Self {
        Self {
            main_module: Some(name.into()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "module_loader=debug"); `RUST_LOG` wins when set
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines (requires the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Loader configuration
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModuleError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ModuleError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ModuleError> {
        Ok(toml::from_str(contents)?)
    }
}
