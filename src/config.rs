//! User configuration.
//!
//! Read from `$TABHOP_CONFIG` when set, otherwise from
//! `<config dir>/tabhop/config.toml`. A missing file means defaults; a file
//! that exists but does not parse is an error.
//!
//! ```toml
//! compaction_interval_ms = 1000
//! max_query_len = 256
//! log_filter = "tabhop=debug"
//!
//! [fuzzy]
//! case_matching = "smart"   # smart | respect | ignore
//! normalize = true
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::query::FuzzyOptions;
use crate::session::{DEFAULT_MAX_QUERY_LEN, SessionOptions};

pub const CONFIG_ENV: &str = "TABHOP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("compaction_interval_ms must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub compaction_interval_ms: u64,
    pub max_query_len: usize,
    pub fuzzy: FuzzyOptions,
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compaction_interval_ms: 1000,
            max_query_len: DEFAULT_MAX_QUERY_LEN,
            fuzzy: FuzzyOptions::default(),
            log_filter: None,
        }
    }
}

impl Config {
    /// Load from the default location
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        Self::parse_at(&content, path)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_at(content, Path::new("<inline>"))
    }

    fn parse_at(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        if config.compaction_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(config)
    }

    pub fn compaction_interval(&self) -> Duration {
        Duration::from_millis(self.compaction_interval_ms)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions { max_query_len: self.max_query_len, fuzzy: self.fuzzy }
    }
}

/// `$TABHOP_CONFIG`, else `<config dir>/tabhop/config.toml`
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("tabhop").join("config.toml"))
}
