//! Repository configuration via `places.toml`
//!
//! All settings have defaults; an empty file is a valid configuration. To
//! change settings, edit the file and rebuild the repository.

use geoplaces_core::MainPlacePolicy;
use geoplaces_storage::MemoryStoreConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "places.toml";

/// Configuration loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("Failed to access config file '{}': {source}", path.display())]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid TOML for this schema
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid config value '{key}': {reason}")]
    Invalid {
        /// Offending key
        key: &'static str,
        /// Human-readable reason
        reason: String,
    },
}

/// Repository configuration loaded from `places.toml`.
///
/// # Example
///
/// ```toml
/// segment_size = 100
/// batch_get_size = 100
/// update_retries = 3
/// # search_timeout_ms = 2000
///
/// [main_places]
/// capital_codes = ["PPLC", "PPLA"]
///
/// [main_places.population_thresholds]
/// PPL = 100000
/// PPLA2 = 100000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Entries requested per index page by segmented scans, capped by the store
    #[serde(default = "default_segment_size")]
    pub segment_size: usize,
    /// Maximum ids per batch fetch request
    #[serde(default = "default_batch_get_size")]
    pub batch_get_size: usize,
    /// Extra attempts for an update whose place changed since it was read
    #[serde(default = "default_update_retries")]
    pub update_retries: usize,
    /// Deadline for each search-store call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_timeout_ms: Option<u64>,
    /// Which populated places get a main-places key
    #[serde(default)]
    pub main_places: MainPlacePolicy,
    /// Settings of the in-memory primary store
    #[serde(default)]
    pub memory_store: MemoryStoreConfig,
}

fn default_segment_size() -> usize {
    100
}

fn default_batch_get_size() -> usize {
    100
}

fn default_update_retries() -> usize {
    3
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            segment_size: default_segment_size(),
            batch_get_size: default_batch_get_size(),
            update_retries: default_update_retries(),
            search_timeout_ms: None,
            main_places: MainPlacePolicy::default(),
            memory_store: MemoryStoreConfig::default(),
        }
    }
}

impl RepositoryConfig {
    /// Search deadline as a duration
    pub fn search_timeout(&self) -> Option<Duration> {
        self.search_timeout_ms.map(Duration::from_millis)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for zero sizes or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_size == 0 {
            return Err(ConfigError::Invalid {
                key: "segment_size",
                reason: "must be positive".to_string(),
            });
        }
        if self.batch_get_size == 0 {
            return Err(ConfigError::Invalid {
                key: "batch_get_size",
                reason: "must be positive".to_string(),
            });
        }
        if self.search_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid {
                key: "search_timeout_ms",
                reason: "must be positive when set".to_string(),
            });
        }
        if self.memory_store.max_page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "memory_store.max_page_size",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Place repository configuration
#
# Entries requested per page when scanning a secondary index (default: 100).
# Scans for more entries than this are split into consecutive pages. Pages
# never exceed the primary store's own page cap.
segment_size = 100

# Maximum ids per batch fetch (default: 100).
# Larger id lists are fetched in consecutive chunks.
batch_get_size = 100

# Extra attempts for an update whose place was modified between the read and
# the conditional write (default: 3, 0 = fail on the first conflict).
update_retries = 3

# Deadline in milliseconds for each search index call.
# An expired call counts as a search failure: the primary write stands and
# the caller gets a partial write failure. Unset = no deadline.
# search_timeout_ms = 2000

# Main places: which populated places (feature class P) are listed as the
# main places of their country.
[main_places]
# Feature codes that always qualify
capital_codes = ["PPLC", "PPLA"]

# Feature codes that qualify at or above a population
[main_places.population_thresholds]
PPL = 100000
PPLA2 = 100000

# In-memory primary store
[memory_store]
# Maximum entries returned by one index page (default: 100)
max_page_size = 100
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RepositoryConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
