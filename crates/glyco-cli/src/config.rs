//! Configuration management for the CLI
//!
//! Configuration is resolved from, in increasing precedence:
//! - Default values
//! - A configuration file (YAML, TOML or JSON)
//! - Environment variables
//! - Command-line arguments
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use glyco_structure::Origin;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for the caller context injected into records
    pub ingestion: IngestionConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Reject a whole input if any of its records fails
    pub atomic: bool,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
            progress: true,
        }
    }
}

/// File formats a configuration may be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Toml,
    Json,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&content, FileFormat::of(path))
    }

    fn from_str_with_format(content: &str, format: FileFormat) -> Result<Self> {
        let config = match format {
            FileFormat::Yaml => serde_yaml::from_str(content)?,
            FileFormat::Toml => toml::from_str(content)?,
            FileFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations, then
    /// apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.merge_with_env()?;
        Ok(config)
    }

    /// Apply `GLYCO_ORIGIN` and `GLYCO_OUTPUT_FORMAT`
    pub fn merge_with_env(&mut self) -> Result<()> {
        if let Ok(origin) = std::env::var("GLYCO_ORIGIN") {
            self.ingestion.origin = match origin.to_lowercase().as_str() {
                "external" => Origin::External,
                "internal" => Origin::Internal,
                _ => return Err(Error::config(format!("Invalid GLYCO_ORIGIN: {}", origin))),
            };
        }

        if let Ok(format) = std::env::var("GLYCO_OUTPUT_FORMAT") {
            self.output.format = match format.to_lowercase().as_str() {
                "human" => OutputFormat::Human,
                "json" => OutputFormat::Json,
                "json-pretty" => OutputFormat::JsonPretty,
                "yaml" => OutputFormat::Yaml,
                _ => {
                    return Err(Error::config(format!(
                        "Invalid GLYCO_OUTPUT_FORMAT: {}",
                        format
                    )))
                }
            };
        }

        Ok(())
    }

    /// Default configuration file paths to check, in order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".glyco.yaml"),
            PathBuf::from(".glyco.toml"),
            PathBuf::from(".glyco.json"),
        ];

        if let Some(user_path) = Self::user_config_path() {
            paths.push(user_path.clone());
            paths.push(user_path.with_extension("toml"));
            paths.push(user_path.with_extension("json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".glyco.yaml"));
        }

        paths
    }

    /// `<config dir>/glyco/config.yaml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("glyco").join("config.yaml"))
    }

    /// Render in the format implied by `path`'s extension
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        let content = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        };
        Ok(content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_str_with_format(
            "ingestion:\n  origin: internal\n  user_id: abcdef0123\n",
            FileFormat::Yaml,
        )
        .unwrap();
        assert_eq!(config.ingestion.origin, Origin::Internal);
        assert_eq!(config.ingestion.user_id.as_deref(), Some("abcdef0123"));
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_json_and_toml() {
        let config = Config::from_str_with_format(
            r#"{"output": {"format": "json-pretty", "color": false}}"#,
            FileFormat::Json,
        )
        .unwrap();
        assert_eq!(config.output.format, OutputFormat::JsonPretty);
        assert!(!config.output.color);
        assert!(config.output.progress);

        let config = Config::from_str_with_format(
            "[ingestion]\natomic = true\nupload_id = \"0123456789abcdef0123456789abcdef\"\n",
            FileFormat::Toml,
        )
        .unwrap();
        assert!(config.ingestion.atomic);
        assert_eq!(config.ingestion.origin, Origin::External);
    }

    #[test]
    fn test_unknown_origin_is_rejected() {
        let result = Config::from_str_with_format("ingestion:\n  origin: partner\n", FileFormat::Yaml);
        assert!(matches!(result, Err(Error::Yaml(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.ingestion.group_id = Some("clinic-7".to_string());
        config.output.format = OutputFormat::Yaml;

        for name in ["config.yaml", "config.toml", "config.json"] {
            let path = dir.path().join("nested").join(name);
            config.save(&path).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), config, "{}", name);
        }
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("/nonexistent/glyco.yaml"));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_default_paths_start_in_current_directory() {
        let paths = Config::default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".glyco.yaml"));
        assert!(paths.len() >= 3);
    }
}
