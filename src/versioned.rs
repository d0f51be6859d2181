//! Parsing and formatting of versioned file names (`{stem}__saved_{NNN}{ext}`)

use std::path::Path;

/// Marker separating the base name from the version index
pub const SAVED_MARKER: &str = "__saved_";

/// Minimum number of digits in a formatted version index
pub const INDEX_WIDTH: usize = 3;

/// A saved file's stem split into its logical base name and version index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedName {
    pub base_name: String,
    pub version: Option<u64>,
}

impl VersionedName {
    /// Split on the last marker occurrence. A suffix that is not an integer
    /// leaves the whole stem as the base name.
    pub fn parse(stem: &str) -> Self {
        if let Some((base, suffix)) = stem.rsplit_once(SAVED_MARKER) {
            if let Ok(version) = suffix.parse::<u64>() {
                return Self {
                    base_name: base.to_string(),
                    version: Some(version),
                };
            }
        }

        Self {
            base_name: stem.to_string(),
            version: None,
        }
    }

    /// Index used for bookkeeping; un-suffixed names count as 0
    pub fn index(&self) -> u64 {
        self.version.unwrap_or(0)
    }
}

/// Compose `{stem}__saved_{index:03}{extension}`
pub fn saved_file_name(stem: &str, index: u64, extension: &str) -> String {
    format!(
        "{stem}{SAVED_MARKER}{index:0width$}{extension}",
        width = INDEX_WIDTH
    )
}

/// Split a path's file name into `(stem, extension)`, the extension keeping
/// its leading dot. Names without an extension (or dotfiles such as `.env`)
/// get an empty extension.
pub fn split_file_name(path: &Path) -> (String, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match path.extension().map(|e| e.to_string_lossy()) {
        Some(ext) if !ext.is_empty() => {
            let stem = name[..name.len() - ext.len() - 1].to_string();
            (stem, format!(".{ext}"))
        }
        _ => (name, String::new()),
    }
}
