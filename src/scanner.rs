//! Directory scanning: list matching files and build records for them

use crate::config::DEFAULT_EXCLUDED;
use crate::record::FileRecord;
use crate::{Error, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, span, Level};
use walkdir::WalkDir;

/// Name of the subdirectory holding versioned copies
pub const SAVES_DIR_NAME: &str = "saves";

/// Records found in the scanned directory and in its saves directory
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub current: Vec<FileRecord>,
    pub saved: Vec<FileRecord>,
    pub saves_dir: PathBuf,
}

/// Lists files directly inside a directory whose names match a glob
#[derive(Debug, Clone)]
pub struct Scanner {
    pattern: Pattern,
    exclude: Vec<String>,
}

impl Scanner {
    /// Create a scanner for `pattern`, excluding the default dependency manifest
    pub fn new(pattern: &str) -> Result<Self> {
        let compiled = Pattern::new(pattern).map_err(|e| Error::Pattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: compiled,
            exclude: vec![DEFAULT_EXCLUDED.to_string()],
        })
    }

    /// Replace the file names skipped in the scanned directory
    pub fn with_exclusions(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Scan `base_dir` and `base_dir/saves`, creating the latter if needed.
    ///
    /// A base directory that does not exist yields empty listings.
    pub fn scan<P: AsRef<Path>>(&self, base_dir: P) -> Result<ScanResult> {
        let base_dir = base_dir.as_ref();
        let saves_dir = base_dir.join(SAVES_DIR_NAME);
        let span = span!(Level::INFO, "scan", base = %base_dir.display());
        let _enter = span.enter();

        if !base_dir.is_dir() {
            debug!("Base directory {} does not exist", base_dir.display());
            return Ok(ScanResult {
                current: Vec::new(),
                saved: Vec::new(),
                saves_dir,
            });
        }

        if !saves_dir.is_dir() {
            fs::create_dir(&saves_dir)?;
            info!("Created saves directory {}", saves_dir.display());
        }

        let current = self
            .list_matching(base_dir)?
            .into_iter()
            .filter(|path| !self.is_excluded(path))
            .map(FileRecord::from_path)
            .collect::<Result<Vec<_>>>()?;

        let saved = self
            .list_matching(&saves_dir)?
            .into_iter()
            .map(FileRecord::from_path)
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Found {} current and {} saved files matching '{}'",
            current.len(),
            saved.len(),
            self.pattern()
        );

        Ok(ScanResult {
            current,
            saved,
            saves_dir,
        })
    }

    /// Files directly inside `dir` whose names match the pattern, in listing
    /// order. A missing directory gives an empty list.
    pub fn list_matching<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = entry?;
            let path = entry.path();

            // Symlinks to regular files count, symlinked directories do not
            if !path.is_file() {
                continue;
            }

            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.pattern.matches(name));
            if matches {
                debug!("Matched {}", path.display());
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let excluded = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.exclude.iter().any(|e| e == name));
        if excluded {
            debug!("Excluding {}", path.display());
        }
        excluded
    }
}

/// Scan `base_dir` with `pattern` and the default exclusions, returning
/// `(current_records, saved_records)`.
pub fn scan<P: AsRef<Path>>(base_dir: P, pattern: &str) -> Result<(Vec<FileRecord>, Vec<FileRecord>)> {
    let result = Scanner::new(pattern)?.scan(base_dir)?;
    Ok((result.current, result.saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn names(records: &[FileRecord]) -> BTreeSet<String> {
        records.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_scan_creates_saves_dir() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let result = Scanner::new("*.txt")?.scan(temp_dir.path())?;

        assert!(temp_dir.path().join("saves").is_dir());
        assert_eq!(result.saves_dir, temp_dir.path().join("saves"));
        assert!(result.current.is_empty());
        assert!(result.saved.is_empty());

        // Second scan with the directory already present
        Scanner::new("*.txt")?.scan(temp_dir.path())?;
        Ok(())
    }

    #[test]
    fn test_scan_filters_by_pattern() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("a.txt"), b"a")?;
        fs::write(temp_dir.path().join("b.md"), b"b")?;
        fs::write(temp_dir.path().join("c.txt"), b"c")?;

        let (current, saved) = scan(temp_dir.path(), "*.txt")?;
        assert_eq!(names(&current), BTreeSet::from(["a.txt".to_string(), "c.txt".to_string()]));
        assert!(saved.is_empty());

        let (current, _) = scan(temp_dir.path(), "*.md")?;
        assert_eq!(names(&current), BTreeSet::from(["b.md".to_string()]));
        Ok(())
    }

    #[test]
    fn test_scan_excludes_dependency_manifest() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("requirements.txt"), b"serde")?;
        fs::write(temp_dir.path().join("notes.txt"), b"hello")?;

        let (current, _) = scan(temp_dir.path(), "*.txt")?;
        assert_eq!(names(&current), BTreeSet::from(["notes.txt".to_string()]));
        Ok(())
    }

    #[test]
    fn test_custom_exclusions() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("requirements.txt"), b"serde")?;
        fs::write(temp_dir.path().join("todo.txt"), b"later")?;

        let result = Scanner::new("*.txt")?
            .with_exclusions(vec!["todo.txt".to_string()])
            .scan(temp_dir.path())?;
        assert_eq!(names(&result.current), BTreeSet::from(["requirements.txt".to_string()]));
        Ok(())
    }

    #[test]
    fn test_exclusion_does_not_apply_to_saves() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let saves = temp_dir.path().join("saves");
        fs::create_dir(&saves)?;
        fs::write(saves.join("requirements.txt"), b"serde")?;

        let (_, saved) = scan(temp_dir.path(), "*.txt")?;
        assert_eq!(names(&saved), BTreeSet::from(["requirements.txt".to_string()]));
        Ok(())
    }

    #[test]
    fn test_scan_is_not_recursive() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested)?;
        fs::write(nested.join("deep.txt"), b"deep")?;
        fs::write(temp_dir.path().join("top.txt"), b"top")?;

        let (current, saved) = scan(temp_dir.path(), "*.txt")?;
        assert_eq!(names(&current), BTreeSet::from(["top.txt".to_string()]));
        assert!(saved.is_empty());
        Ok(())
    }

    #[test]
    fn test_saved_records_are_listed() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let saves = temp_dir.path().join("saves");
        fs::create_dir(&saves)?;
        fs::write(saves.join("notes__saved_001.txt"), b"hello")?;
        fs::write(temp_dir.path().join("notes.txt"), b"hello")?;

        let (current, saved) = scan(temp_dir.path(), "*.txt")?;
        assert_eq!(current.len(), 1);
        assert_eq!(saved.len(), 1);
        assert_eq!(current[0].content_hash, saved[0].content_hash);
        Ok(())
    }

    #[test]
    fn test_missing_base_dir_gives_empty_listing() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let missing = temp_dir.path().join("missing");

        let (current, saved) = scan(&missing, "*.txt")?;
        assert!(current.is_empty());
        assert!(saved.is_empty());
        assert!(!missing.exists());
        Ok(())
    }

    #[test]
    fn test_invalid_pattern() {
        let result = Scanner::new("[*.txt");
        assert!(matches!(result, Err(Error::Pattern { .. })));
    }

    #[test]
    fn test_directories_never_match() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir(temp_dir.path().join("folder.txt"))?;

        let files = Scanner::new("*.txt")?.list_matching(temp_dir.path())?;
        assert!(files.is_empty());
        Ok(())
    }
}
