//! Command-line interface: arguments, config overrides and the run itself.

use crate::config::Config;
use crate::report::{Presenter, Row};
use crate::scanner::Scanner;
use crate::versioner::diff_and_save;
use crate::{Error, Result};
use crate::record::FileRecord;
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Keep versioned copies of changed files in a `saves` subdirectory
#[derive(Parser, Debug, Clone)]
#[command(name = "filesync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Copy new or changed files into ./saves with an incrementing version suffix")]
pub struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Glob matched against file names (defaults to the configured pattern, *.txt)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Report what would be saved without copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file
    #[arg(long, env = "FILESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Console log level: trace, debug, info, warn or error
    #[arg(long)]
    pub log_level: Option<String>,

    /// Only show warnings and errors on the console
    #[arg(short, long)]
    pub quiet: bool,

    /// Write a detailed text log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write a JSON audit log to this file
    #[arg(long)]
    pub json_log: Option<PathBuf>,

    /// Disable colors and table drawing
    #[arg(long)]
    pub plain: bool,

    /// Also write a JSON report of the run to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Everything a run looked at and did, for the JSON report
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base: PathBuf,
    pub pattern: String,
    pub dry_run: bool,
    pub current: Vec<FileRecord>,
    pub saved: Vec<FileRecord>,
    pub created: Vec<PathBuf>,
}

impl RunReport {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

impl Cli {
    /// Command-line values take precedence over the config file
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(pattern) = &self.pattern {
            config.scan.pattern = pattern.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        if let Some(file) = &self.json_log {
            config.logging.json_file = Some(file.clone());
        }
        if self.plain {
            config.output.plain = true;
        }
    }
}

/// The scan target must be an existing directory
pub fn validate_target(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        Ok(path.to_path_buf())
    } else {
        Err(Error::InvalidPath {
            path: path.to_path_buf(),
        })
    }
}

fn resolved(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Scan, save and print summaries to `out`. The report's `created` holds
/// the created (or, in dry-run mode, would-be-created) paths.
pub fn run(
    base: &Path,
    config: &Config,
    dry_run: bool,
    presenter: &dyn Presenter,
    out: &mut dyn Write,
) -> Result<RunReport> {
    let base = validate_target(base)?;
    let scanner =
        Scanner::new(&config.scan.pattern)?.with_exclusions(config.scan.exclude.clone());

    write!(out, "{}", presenter.section("Scanning for files"))?;
    write!(out, "{}", presenter.kv("base", &resolved(&base).display()))?;
    write!(out, "{}", presenter.kv("pattern", &scanner.pattern()))?;

    let scan = scanner.scan(&base)?;
    write!(out, "{}", presenter.kv("saves dir", &resolved(&scan.saves_dir).display()))?;

    let current_rows: Vec<Row> = scan.current.iter().map(Row::from).collect();
    let saved_rows: Vec<Row> = scan.saved.iter().map(Row::from).collect();
    write!(out, "{}", presenter.table("Current files", &current_rows))?;
    write!(out, "{}", presenter.table("Saved files", &saved_rows))?;

    write!(out, "{}", presenter.section("Computing diff"))?;
    write!(out, "{}", presenter.kv("dry_run", &dry_run))?;

    let created = diff_and_save(&scan.current, &scan.saved, &scan.saves_dir, dry_run)?;

    if created.is_empty() {
        writeln!(out, "Nothing to save, everything up to date.")?;
    } else {
        let rows: Vec<Row> = created.iter().map(|p| Row::target(p)).collect();
        let title = if dry_run { "Would create" } else { "Created" };
        write!(out, "{}", presenter.table(title, &rows))?;
        info!("{} new saves", created.len());
    }

    Ok(RunReport {
        base: resolved(&base),
        pattern: scanner.pattern().to_string(),
        dry_run,
        current: scan.current,
        saved: scan.saved,
        created,
    })
}
