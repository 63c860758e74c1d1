// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for chordchart.
//!
//! Settings live in a YAML file (API endpoint, default chord
//! simplification, style and view) with environment overrides for the
//! API credentials. A missing API key is reported at start-up, before any
//! job is fetched.

pub mod watcher;

pub use watcher::{validate_config, SettingsEvent, SettingsWatcher};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{ChartSettings, ChordStyle, Simplification, ViewMode};
use crate::source::http::DEFAULT_BASE_URL;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "chordchart.yaml";

/// Environment variable holding the job API key
pub const ENV_API_KEY: &str = "MUSIC_AI_KEY";

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "CHORDCHART_API_URL";

/// Root configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConfigFile {
    /// Job API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Chart display defaults
    #[serde(default)]
    pub chart: ChartConfig,
}

impl ConfigFile {
    /// Load a configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults config
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }
}

/// Job API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the job API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key; `MUSIC_AI_KEY` takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            key: None,
        }
    }
}

/// Chart display defaults
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ChartConfig {
    #[serde(default)]
    pub simplification: Simplification,
    #[serde(default)]
    pub style: ChordStyle,
    #[serde(default)]
    pub view: ViewMode,
}

impl ChartConfig {
    pub fn settings(&self) -> ChartSettings {
        ChartSettings::new(self.simplification, self.style)
    }
}

/// Effective application configuration: file plus environment
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    file: ConfigFile,
    path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `chordchart.yaml` in the
    /// working directory is used if present; otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, path) = match path {
            Some(path) => (ConfigFile::load(path)?, Some(path.to_path_buf())),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    (ConfigFile::load(&default)?, Some(default))
                } else {
                    (ConfigFile::default(), None)
                }
            }
        };

        let mut config = Self { file, path };
        config.apply_overrides(env::var(ENV_API_KEY).ok(), env::var(ENV_API_URL).ok());
        Ok(config)
    }

    /// Build from an already parsed file
    pub fn from_file(file: ConfigFile, path: Option<PathBuf>) -> Self {
        Self { file, path }
    }

    /// Apply environment-style overrides; blank values are ignored
    pub fn apply_overrides(&mut self, api_key: Option<String>, api_url: Option<String>) {
        if let Some(key) = api_key.filter(|value| !value.trim().is_empty()) {
            self.file.api.key = Some(key);
        }
        if let Some(url) = api_url.filter(|value| !value.trim().is_empty()) {
            self.file.api.base_url = url;
        }
    }

    /// The API key, or a start-up error explaining how to provide one
    pub fn require_api_key(&self) -> Result<&str> {
        match self.file.api.key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => bail!(
                "{} is not set; export it (or set api.key in {}) or use --dir to read local jobs",
                ENV_API_KEY,
                DEFAULT_CONFIG_FILE
            ),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.file.api.base_url
    }

    pub fn settings(&self) -> ChartSettings {
        self.file.chart.settings()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.file.chart.view
    }

    /// File the configuration came from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn file(&self) -> &ConfigFile {
        &self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
api:
  base_url: "https://api.example.test/v2"
chart:
  simplification: basic
  style: jazz
  view: chords
"#;

        let config = ConfigFile::from_yaml(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.test/v2");
        assert_eq!(config.chart.simplification, Simplification::Basic);
        assert_eq!(config.chart.style, ChordStyle::Jazz);
        assert_eq!(config.chart.view, ViewMode::Chords);
    }

    #[test]
    fn test_default_values() {
        let yaml = r#"
chart:
  style: jazz
"#;

        let config = ConfigFile::from_yaml(yaml).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.key, None);
        assert_eq!(config.chart.simplification, Simplification::Complex);
        assert_eq!(config.chart.view, ViewMode::Both);

        assert_eq!(ConfigFile::from_yaml("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_invalid_value() {
        let yaml = r#"
chart:
  simplification: extreme
"#;
        assert!(ConfigFile::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chordchart.yaml");

        let mut original = ConfigFile::default();
        original.chart.simplification = Simplification::Simple;
        original.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded, original);
        // Keys are never written back unless configured
        assert!(!loaded.to_yaml().unwrap().contains("key"));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let result = AppConfig::load(Some(dir.path().join("missing.yaml").as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_require_api_key() {
        let mut config = AppConfig::default();
        let err = config.require_api_key().unwrap_err();
        assert!(err.to_string().contains(ENV_API_KEY));

        config.apply_overrides(Some("   ".to_string()), None);
        assert!(config.require_api_key().is_err());

        config.apply_overrides(Some("secret".to_string()), Some("http://localhost:9000".to_string()));
        assert_eq!(config.require_api_key().unwrap(), "secret");
        assert_eq!(config.api_base_url(), "http://localhost:9000");
    }
}
