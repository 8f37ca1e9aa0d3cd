//! Application configuration.
//!
//! # Responsibility
//! - Read the optional TOML config file.
//! - Layer `TASTELIST_*` environment overrides on top.
//! - Resolve the values into a user id, a local store and logging settings.
//!
//! # Invariants
//! - Unknown keys are rejected instead of silently ignored.
//! - Values are validated at resolution time, so a bad override fails the
//!   same way as a bad file entry.

use crate::logging::{default_log_level, LogSettings};
use crate::model::user::UserId;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE: &str = "tastelist.sqlite3";

pub const ENV_LOG_LEVEL: &str = "TASTELIST_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASTELIST_LOG_DIR";
pub const ENV_DB_PATH: &str = "TASTELIST_DB_PATH";
pub const ENV_USER_ID: &str = "TASTELIST_USER_ID";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    /// A value parsed but cannot be used.
    Invalid {
        key: &'static str,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid { key, reason } => write!(f, "invalid config value `{key}`: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    /// File logging stays off when unset.
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    pub user_id: Option<String>,
}

/// Merged file + environment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingSection,
    pub store: StoreSection,
    pub session: SessionSection,
}

impl AppConfig {
    /// Loads `path` (when given) and applies process environment overrides.
    ///
    /// # Errors
    /// - `Read` when the file cannot be read.
    /// - `Parse` for malformed TOML or unknown keys.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Overrides fields from `lookup`; blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.logging.level = Some(level);
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.logging.dir = Some(dir);
        }
        if let Some(db_path) = read(ENV_DB_PATH) {
            self.store.db_path = Some(PathBuf::from(db_path));
        }
        if let Some(user_id) = read(ENV_USER_ID) {
            self.session.user_id = Some(user_id);
        }
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(default_log_level())
    }

    /// Logging settings, or `None` when no log directory is configured.
    pub fn log_settings(&self) -> Result<Option<LogSettings>, ConfigError> {
        let Some(dir) = self.logging.dir.as_deref() else {
            return Ok(None);
        };
        LogSettings::parse(self.log_level(), dir)
            .map(Some)
            .map_err(|err| ConfigError::Invalid {
                key: "logging",
                reason: err.to_string(),
            })
    }

    pub fn db_path(&self) -> PathBuf {
        self.store
            .db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }

    /// Configured user, or the anonymous local user.
    pub fn user_id(&self) -> Result<UserId, ConfigError> {
        match self.session.user_id.as_deref() {
            Some(raw) => UserId::parse(raw).map_err(|err| ConfigError::Invalid {
                key: "session.user_id",
                reason: err.to_string(),
            }),
            None => Ok(UserId::anonymous()),
        }
    }
}
