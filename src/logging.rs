//! Logging setup: short console output plus optional detailed text and JSON
//! audit files.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Parse a level name such as `info` or `WARN`
pub fn parse_level(level: &str) -> Result<Level> {
    level.parse::<Level>().map_err(|_| Error::Configuration {
        reason: format!("Unknown log level '{}'", level),
    })
}

/// Install the global subscriber. Console verbosity follows `config.level`
/// (or warnings only when `quiet`), and `RUST_LOG` when set. File sinks
/// always record debug events.
pub fn init_logging(config: &LoggingConfig, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::WARN
    } else {
        parse_level(&config.level)?
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(filter);

    let text_file = match &config.file {
        Some(path) => {
            let file = open_log_file(path, config.max_bytes, config.backups)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    let json_file = match &config.json_file {
        Some(path) => {
            let file = open_log_file(path, config.max_bytes, config.backups)?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(text_file)
        .with(json_file)
        .try_init()
        .map_err(|e| Error::Configuration {
            reason: format!("Failed to initialize logging: {}", e),
        })
}

/// Rotate the log if it is already too large, then open it for appending
pub fn open_log_file(path: &Path, max_bytes: u64, backups: usize) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    rotate_if_needed(path, max_bytes, backups)?;

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}

/// Shift `log`, `log.1` ... `log.{backups-1}` up by one once `log` reaches
/// `max_bytes`; the oldest backup is dropped. Returns whether it rotated.
pub fn rotate_if_needed(path: &Path, max_bytes: u64, backups: usize) -> Result<bool> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if size < max_bytes {
        return Ok(false);
    }

    if backups == 0 {
        fs::remove_file(path)?;
        return Ok(true);
    }

    for n in (1..backups).rev() {
        let from = backup_path(path, n);
        if from.exists() {
            fs::rename(&from, backup_path(path, n + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))?;
    Ok(true)
}

fn backup_path(path: &Path, n: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}", n));
    PathBuf::from(name)
}
