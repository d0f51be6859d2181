//! File records built fresh from a directory listing on every run

use crate::hash::{hash_file, ContentHash};
use crate::Result;
use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A single file on disk: where it is, what it contains, when it last changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path the file was listed under
    pub full_path: PathBuf,
    /// SHA-256 of the file content at scan time
    pub content_hash: ContentHash,
    /// Modification time in local time, with its offset
    pub last_modified: DateTime<FixedOffset>,
}

impl FileRecord {
    /// Hash the file and read its modification time
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        let last_modified = DateTime::<Local>::from(metadata.modified()?).fixed_offset();

        Ok(Self {
            full_path: path.to_path_buf(),
            content_hash: hash_file(path)?,
            last_modified,
        })
    }

    /// File name component, lossily converted for display
    pub fn name(&self) -> String {
        self.full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Modification time as RFC 3339 with seconds precision
    pub fn last_modified_display(&self) -> String {
        self.last_modified.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

impl std::fmt::Display for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "- file: {}", self.full_path.display())?;
        writeln!(f, "- with hash: {},", self.content_hash)?;
        write!(f, "- last updated on: {}", self.last_modified_display())
    }
}
