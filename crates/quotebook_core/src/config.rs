//! Application configuration.
//!
//! # Responsibility
//! - Load and save the JSON settings document in the platform config dir.
//! - Resolve the data directory that holds favorites and history.
//!
//! # Invariants
//! - Missing fields fall back to defaults; unknown fields are ignored.
//! - A missing config file is not an error.

use crate::schedule::daily::DailyTime;
use crate::service::library_service::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "quotebook";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DATA_DIR_ENV: &str = "QUOTEBOOK_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "QUOTEBOOK_LOG";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Encode(serde_json::Error),
    /// The platform exposes no data/config directory and none was configured.
    NoPlatformDir(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "config i/o error on `{}`: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "invalid config file `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "cannot encode config: {err}"),
            Self::NoPlatformDir(kind) => write!(f, "no platform {kind} directory available"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::NoPlatformDir(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Replaces the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub notification_time: DailyTime,
    pub history_limit: usize,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            catalog_path: None,
            notification_time: DailyTime::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_level: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push(APP_DIR_NAME);
            path.push(CONFIG_FILE_NAME);
            path
        })
    }

    /// Reads `path`; a missing file yields defaults.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the platform config file, falling back to defaults on any error.
    pub fn load() -> (Self, Option<ConfigError>) {
        match Self::config_path() {
            Some(path) => match Self::load_from(&path) {
                Ok(config) => (config, None),
                Err(err) => (Self::default(), Some(err)),
            },
            None => (Self::default(), None),
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Encode)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> ConfigResult<()> {
        let path = Self::config_path().ok_or(ConfigError::NoPlatformDir("config"))?;
        self.save_to(path)
    }

    /// Data directory: config value, then `QUOTEBOOK_DATA_DIR`, then the
    /// platform data dir.
    pub fn resolve_data_dir(&self) -> ConfigResult<PathBuf> {
        self.resolve_data_dir_with(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn resolve_data_dir_with(&self, env_dir: Option<PathBuf>) -> ConfigResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        if let Some(dir) = env_dir.filter(|dir| !dir.as_os_str().is_empty()) {
            return Ok(dir);
        }
        dirs::data_dir()
            .map(|mut path| {
                path.push(APP_DIR_NAME);
                path
            })
            .ok_or(ConfigError::NoPlatformDir("data"))
    }

    /// Log level: `QUOTEBOOK_LOG`, then config, then the build default.
    pub fn resolve_log_level(&self) -> String {
        std::env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|level| !level.trim().is_empty())
            .or_else(|| self.log_level.clone())
            .unwrap_or_else(|| crate::logging::default_log_level().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::schedule::daily::DailyTime;
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"notification_time":"7:30","unknown":true}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.notification_time, DailyTime::new(7, 30).unwrap());
        assert_eq!(config.history_limit, AppConfig::default().history_limit);
    }

    #[test]
    fn invalid_time_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"notification_time":"25:00"}"#).unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/tmp/quotes")),
            notification_time: DailyTime::new(18, 45).unwrap(),
            history_limit: 20,
            ..AppConfig::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn data_dir_prefers_config_then_env() {
        let configured = AppConfig {
            data_dir: Some(PathBuf::from("/configured")),
            ..AppConfig::default()
        };
        assert_eq!(
            configured
                .resolve_data_dir_with(Some(PathBuf::from("/env")))
                .unwrap(),
            PathBuf::from("/configured")
        );

        let unset = AppConfig::default();
        assert_eq!(
            unset
                .resolve_data_dir_with(Some(PathBuf::from("/env")))
                .unwrap(),
            PathBuf::from("/env")
        );
    }
}
