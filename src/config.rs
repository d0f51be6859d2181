//! Configuration loaded from TOML, with command-line overrides applied on top

use crate::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default glob for files worth versioning
pub const DEFAULT_PATTERN: &str = "*.txt";

/// Dependency manifest that never gets versioned
pub const DEFAULT_EXCLUDED: &str = "requirements.txt";

/// Log files are rotated once they grow past this many bytes
pub const DEFAULT_LOG_MAX_BYTES: u64 = 1_000_000;

/// Number of rotated log files to keep
pub const DEFAULT_LOG_BACKUPS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Glob matched against file names
    pub pattern: String,
    /// File names never taken from the scanned directory
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Detailed text log
    pub file: Option<PathBuf>,
    /// Machine-readable JSON audit log
    pub json_file: Option<PathBuf>,
    pub max_bytes: u64,
    pub backups: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Never use colors or box drawing
    pub plain: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            exclude: vec![DEFAULT_EXCLUDED.to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json_file: None,
            max_bytes: DEFAULT_LOG_MAX_BYTES,
            backups: DEFAULT_LOG_BACKUPS,
        }
    }
}

impl Config {
    /// Load from an explicit file, or from the per-user config file when it
    /// exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::user_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Configuration {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;
        let config = toml::from_str(&content).map_err(|e| Error::Configuration {
            reason: format!("Failed to parse {}: {}", path.display(), e),
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Configuration {
            reason: format!("Failed to parse config: {}", e),
        })
    }

    /// `<config dir>/filesync/config.toml` for the current user
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "filesync").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
