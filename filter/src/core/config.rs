use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILTER_BYTES, DEFAULT_MAX_RULES,
};
use crate::sql::PlaceholderStyle;

// =============================================================================
// Library Configuration
// =============================================================================

/// Input limits applied while parsing and walking a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterLimits {
    /// Maximum size of filter JSON text in bytes
    pub max_filter_bytes: usize,
    /// Maximum number of recognized rules; unknown rule types are not counted
    pub max_rules: usize,
    /// Maximum object nesting above a rule
    pub max_depth: usize,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            max_filter_bytes: DEFAULT_MAX_FILTER_BYTES,
            max_rules: DEFAULT_MAX_RULES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Options controlling how rules are rendered to SQL
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub placeholder: PlaceholderStyle,
    /// Coerce every containment candidate to its string form before nesting it
    pub stringify_candidates: bool,
    pub limits: FilterLimits,
}

// =============================================================================
// File Configuration
// =============================================================================

/// Limits section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LimitsFileConfig {
    pub max_filter_bytes: Option<usize>,
    pub max_rules: Option<usize>,
    pub max_depth: Option<usize>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub placeholder: Option<PlaceholderStyle>,
    pub stringify_candidates: Option<bool>,
    pub limits: Option<LimitsFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

impl CompilerConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. CLI-specified config path OR local directory config
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading compiler configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                config.warn_unknown_fields();
                config
            }
            None => FileConfig::default(),
        };

        let config = Self::layer(file_config, cli);
        tracing::debug!(
            placeholder = %config.placeholder,
            stringify_candidates = config.stringify_candidates,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(file_config: FileConfig, cli: &CliConfig) -> Self {
        let defaults = FilterLimits::default();
        let file_limits = file_config.limits.unwrap_or_default();

        Self {
            placeholder: cli
                .placeholder
                .or(file_config.placeholder)
                .unwrap_or_default(),
            stringify_candidates: cli
                .stringify_candidates
                .or(file_config.stringify_candidates)
                .unwrap_or(false),
            limits: FilterLimits {
                max_filter_bytes: file_limits
                    .max_filter_bytes
                    .unwrap_or(defaults.max_filter_bytes),
                max_rules: file_limits.max_rules.unwrap_or(defaults.max_rules),
                max_depth: file_limits.max_depth.unwrap_or(defaults.max_depth),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.placeholder, PlaceholderStyle::Qmark);
        assert!(!config.stringify_candidates);
        assert_eq!(config.limits.max_filter_bytes, 64 * 1024);
        assert_eq!(config.limits.max_rules, 50);
        assert_eq!(config.limits.max_depth, 32);
    }

    #[test]
    fn test_compiler_config_partial_json() {
        let json = r#"{"placeholder": "dollar", "limits": {"max_rules": 5}}"#;
        let config: CompilerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.placeholder, PlaceholderStyle::Dollar);
        assert_eq!(config.limits.max_rules, 5);
        assert_eq!(config.limits.max_depth, 32);
    }

    #[test]
    fn test_file_config_unknown_fields_collected() {
        let json = r#"{"stringify_candidates": true, "placholder": "dollar"}"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.stringify_candidates, Some(true));
        assert!(config.placeholder.is_none());
        assert!(config.extra.get("placholder").is_some());
    }

    #[test]
    fn test_layer_file_over_defaults() {
        let json = r#"{"stringify_candidates": true, "limits": {"max_depth": 4}}"#;
        let file_config: FileConfig = serde_json::from_str(json).unwrap();
        let config = CompilerConfig::layer(file_config, &CliConfig::default());

        assert_eq!(config.placeholder, PlaceholderStyle::Qmark);
        assert!(config.stringify_candidates);
        assert_eq!(config.limits.max_depth, 4);
        assert_eq!(config.limits.max_rules, 50);
    }

    #[test]
    fn test_layer_cli_over_file() {
        let json = r#"{"placeholder": "format", "stringify_candidates": false}"#;
        let file_config: FileConfig = serde_json::from_str(json).unwrap();
        let cli = CliConfig {
            stringify_candidates: Some(true),
            ..CliConfig::default()
        };
        let config = CompilerConfig::layer(file_config, &cli);

        assert_eq!(config.placeholder, PlaceholderStyle::Format);
        assert!(config.stringify_candidates);
    }

    #[test]
    fn test_load_from_cli_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"placeholder": "dollar"}}"#).unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..CliConfig::default()
        };
        let config = CompilerConfig::load(&cli).unwrap();
        assert_eq!(config.placeholder, PlaceholderStyle::Dollar);
    }

    #[test]
    fn test_load_missing_cli_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliConfig {
            config: Some(dir.path().join("missing.json")),
            ..CliConfig::default()
        };
        let err = CompilerConfig::load(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Config file not found"));
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..CliConfig::default()
        };
        let err = CompilerConfig::load(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }
}
