//! Application settings read from a RON file.
//!
//! Lookup order: `--config <path>`, then `./shelfshare.ron`. A missing file
//! means defaults. `SHELFSHARE_API_URL` overrides `api_url` either way.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shelf_core::DEFAULT_PAGE_SIZE;
use shelf_engine::{ApiSettings, DEFAULT_API_URL};
use shelf_logging::{shelf_info, shelf_warn};
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "shelfshare.ron";
pub const API_URL_ENV: &str = "SHELFSHARE_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub page_size: u32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub state_dir: PathBuf,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_response_bytes: 5 * 1024 * 1024,
            state_dir: PathBuf::from(".shelfshare"),
            log_destination: LogDestination::Terminal,
        }
    }
}

impl AppConfig {
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
            ..ApiSettings::default()
        }
    }

    fn apply_api_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.map(|v| v.trim().to_string()) {
            if !url.is_empty() {
                self.api_url = url;
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Where the effective settings came from. Reported once logging is up.
#[derive(Debug)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
    Invalid(ConfigError),
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults => shelf_info!("no config file found, using defaults"),
            ConfigSource::File(path) => shelf_info!("loaded config from {:?}", path),
            ConfigSource::Invalid(err) => shelf_warn!("{}; using defaults", err),
        }
    }
}

pub fn load(explicit: Option<&Path>) -> (AppConfig, ConfigSource) {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let (mut config, source) = match read_config(&path) {
        Ok(Some(config)) => (config, ConfigSource::File(path)),
        Ok(None) => (AppConfig::default(), ConfigSource::Defaults),
        Err(err) => (AppConfig::default(), ConfigSource::Invalid(err)),
    };
    config.apply_api_url_override(std::env::var(API_URL_ENV).ok());
    (config, source)
}

fn read_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse(&text)
        .map(Some)
        .map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
}

fn parse(text: &str) -> Result<AppConfig, String> {
    ron::from_str(text).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = parse(r#"(page_size: 10, log_destination: both)"#).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let found = read_config(&dir.path().join("absent.ron")).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(page_size: \"many\")").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn environment_overrides_api_url() {
        let mut config = AppConfig::default();
        config.apply_api_url_override(Some("http://localhost:3000/api".into()));
        assert_eq!(config.api_url, "http://localhost:3000/api");

        config.apply_api_url_override(Some("  ".into()));
        assert_eq!(config.api_url, "http://localhost:3000/api");
    }

    #[test]
    fn api_settings_carry_timeouts_and_limits() {
        let config = AppConfig {
            connect_timeout_secs: 3,
            request_timeout_secs: 7,
            max_response_bytes: 1024,
            ..AppConfig::default()
        };
        let settings = config.api_settings();
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
        assert_eq!(settings.request_timeout, Duration::from_secs(7));
        assert_eq!(settings.max_bytes, 1024);
        assert_eq!(settings.base_url, DEFAULT_API_URL);
    }
}
