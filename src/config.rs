use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "assets/imgs/Image-not-found.png";
const CONFIG_FILE: &str = "config.json";

/// Runtime configuration, read from `config.json` and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub items_per_page: u32,
    pub request_timeout_secs: u64,
    pub placeholder_image: String,
    pub log_filter: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            items_per_page: 18,
            request_timeout_secs: 10,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            log_filter: "pokedex_explorer=info".to_string(),
        }
    }
}

/// Platform directories for this application.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("co", "pokeapi", "pokedex-explorer")
}

impl CatalogConfig {
    /// Load from the platform config directory. A missing directory or file
    /// yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let dirs = project_dirs();
        Self::load_in(dirs.as_ref().map(|d| d.config_dir()))
    }

    fn load_in(config_dir: Option<&Path>) -> Result<Self, ConfigError> {
        match config_dir {
            Some(dir) => Self::load_from(&dir.join(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::Invalid(
                "items_per_page must be positive".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Default location of the TUI log file.
    pub fn default_log_path() -> Option<PathBuf> {
        project_dirs().map(|d| d.cache_dir().join("pokedex-explorer.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.items_per_page, 18);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_missing_config_dir_yields_defaults() {
        assert_eq!(CatalogConfig::load_in(None).unwrap(), CatalogConfig::default());
    }

    #[test]
    fn test_config_dir_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"request_timeout_secs": 3}"#).unwrap();
        let config = CatalogConfig::load_in(Some(dir.path())).unwrap();
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.items_per_page, 18);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"items_per_page": 24}}"#).unwrap();
        let config = CatalogConfig::load_from(file.path()).unwrap();
        assert_eq!(config.items_per_page, 24);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = CatalogConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = CatalogConfig {
            items_per_page: 0,
            ..CatalogConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CatalogConfig {
            base_url: "ftp://example.com".to_string(),
            ..CatalogConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CatalogConfig {
            request_timeout_secs: 0,
            ..CatalogConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
