use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CleaningError, Result};

/// Environment variable overriding the data root from config or defaults.
pub const DATA_ROOT_ENV: &str = "BASIC_CLEANING_DATA_ROOT";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    pub data_root: Option<String>,
}

impl Config {
    /// Load configuration from an explicit path, or from `config.toml` in the
    /// working directory when present. A missing default file is not an error;
    /// the step can run entirely on defaults and overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::read_file(config_path),
            None => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    Self::read_file(default_path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CleaningError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the data root. Precedence: CLI override, then the
    /// `BASIC_CLEANING_DATA_ROOT` environment variable, then the config file,
    /// then `./data`.
    pub fn data_root(&self, cli_override: Option<&str>) -> PathBuf {
        if let Some(root) = cli_override {
            return PathBuf::from(root);
        }
        if let Ok(root) = std::env::var(DATA_ROOT_ENV) {
            if !root.is_empty() {
                return PathBuf::from(root);
            }
        }
        if let Some(root) = &self.storage.data_root {
            return PathBuf::from(root);
        }
        PathBuf::from("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_storage_section() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            data_root = "/var/lib/cleaning"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.storage.data_root.as_deref(),
            Some("/var/lib/cleaning")
        );
    }

    #[test]
    fn cli_override_wins_over_config() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            data_root = "/var/lib/cleaning"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.data_root(Some("/tmp/other")),
            PathBuf::from("/tmp/other")
        );
    }

    #[test]
    fn config_file_used_when_no_override() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            data_root = "/var/lib/cleaning"
            "#,
        )
        .unwrap();
        // Only meaningful when the env override is unset, as in a normal run.
        if std::env::var(DATA_ROOT_ENV).is_err() {
            assert_eq!(config.data_root(None), PathBuf::from("/var/lib/cleaning"));
        }
    }
}
