use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::container;

/// Reference block size: 2 MB.
pub const DEFAULT_BLOCK_SIZE: u64 = 2_000_000;
/// Largest container (prefix included) a store will allocate: 128 GB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 128_000_000_000;
pub const DEFAULT_ROOT: &str = "Data";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Cannot parse config {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings a [`crate::store::BlobStore`] is constructed with.
///
/// A store must keep the same `block_size` for its whole life: containers do
/// not record it, so reopening with a different value misplaces every block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding data containers and header sidecars.
    pub root: PathBuf,
    pub block_size: u64,
    pub max_file_size: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            block_size: DEFAULT_BLOCK_SIZE,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl StoreConfig {
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into(), ..Self::default() }
    }

    /// Load a JSON config file; absent fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_owned(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::Invalid("block_size must be > 0".into()));
        }
        if self.block_size > u64::from(u32::MAX) {
            return Err(ConfigError::Invalid(format!(
                "block_size must fit in 32 bits, got {}",
                self.block_size
            )));
        }
        if self.max_file_size < container::overhead(0) {
            return Err(ConfigError::Invalid(format!(
                "max_file_size must be at least {} bytes, got {}",
                container::overhead(0),
                self.max_file_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.block_size, 2_000_000);
        assert_eq!(config.max_file_size, 128_000_000_000);
        assert_eq!(config.root, PathBuf::from("Data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"root": "/srv/blobs", "block_size": 4096}}"#).unwrap();

        let config = StoreConfig::load(file.path()).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/blobs"));
        assert_eq!(config.block_size, 4096);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"block_size": 0}}"#).unwrap();
        assert!(matches!(StoreConfig::load(file.path()), Err(ConfigError::Invalid(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "block_size = 3").unwrap();
        assert!(matches!(StoreConfig::load(file.path()), Err(ConfigError::Parse { .. })));

        assert!(matches!(
            StoreConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Read { .. })
        ));
    }
}
