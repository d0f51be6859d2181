//! Diff-and-version logic: decide which files need a new saved copy and
//! pick a version suffix that never collides with an existing one.

use crate::hash::ContentHash;
use crate::record::FileRecord;
use crate::versioned::{saved_file_name, split_file_name, VersionedName};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, span, Level};

/// Logical file identity: `(stem, extension)`
pub type FamilyKey = (String, String);

/// One copy the versioner decided to make
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSave {
    pub source: PathBuf,
    pub target: PathBuf,
    pub version: u64,
    pub content_hash: ContentHash,
}

/// Outcome of the decision step, before anything is copied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPlan {
    pub saves: Vec<PlannedSave>,
    /// Current files whose content already exists in the saves directory
    pub skipped: Vec<PathBuf>,
}

impl VersionPlan {
    pub fn is_empty(&self) -> bool {
        self.saves.is_empty()
    }

    pub fn targets(&self) -> Vec<PathBuf> {
        self.saves.iter().map(|s| s.target.clone()).collect()
    }
}

/// Map each saved content hash to the saved paths carrying it
pub fn dedup_index(saved: &[FileRecord]) -> HashMap<&ContentHash, Vec<&Path>> {
    let mut index: HashMap<&ContentHash, Vec<&Path>> = HashMap::new();
    for record in saved {
        index
            .entry(&record.content_hash)
            .or_default()
            .push(record.full_path.as_path());
    }
    index
}

/// Highest version index seen per family among saved files. Saved stems are
/// normalized by stripping the version marker; un-suffixed stems count as 0.
pub fn suffix_index(saved: &[FileRecord]) -> HashMap<FamilyKey, u64> {
    let mut index: HashMap<FamilyKey, u64> = HashMap::new();
    for record in saved {
        let (stem, extension) = split_file_name(&record.full_path);
        let parsed = VersionedName::parse(&stem);
        let idx = parsed.index();
        let slot = index.entry((parsed.base_name, extension)).or_insert(0);
        *slot = (*slot).max(idx);
    }
    index
}

/// Decide, in listing order, which current files get a new saved copy.
///
/// The counter key is the current file's own stem, unnormalized. A target
/// that already exists on disk (e.g. a saved file the pattern did not list)
/// is stepped over rather than overwritten.
pub fn plan(current: &[FileRecord], saved: &[FileRecord], saves_dir: &Path) -> Result<VersionPlan> {
    let by_hash = dedup_index(saved);
    let mut next_index = suffix_index(saved);
    let mut plan = VersionPlan::default();

    for record in current {
        if let Some(existing) = by_hash.get(&record.content_hash) {
            debug!(
                "Skipping {}: already saved as {}",
                record.full_path.display(),
                existing[0].display()
            );
            plan.skipped.push(record.full_path.clone());
            continue;
        }

        let (stem, extension) = split_file_name(&record.full_path);
        let counter = next_index.entry((stem.clone(), extension.clone())).or_insert(0);

        let next = |version: u64| {
            version.checked_add(1).ok_or_else(|| Error::VersionOverflow {
                stem: stem.clone(),
                extension: extension.clone(),
            })
        };

        let mut version = next(*counter)?;
        let mut target = saves_dir.join(saved_file_name(&stem, version, &extension));
        while target.exists() {
            debug!("{} already exists, trying next version", target.display());
            version = next(version)?;
            target = saves_dir.join(saved_file_name(&stem, version, &extension));
        }
        *counter = version;

        plan.saves.push(PlannedSave {
            source: record.full_path.clone(),
            target,
            version,
            content_hash: record.content_hash.clone(),
        });
    }

    Ok(plan)
}

/// Carry out a plan. In dry-run mode nothing is touched; the targets are
/// returned either way. Failures are not rolled back.
pub fn apply(plan: &VersionPlan, saves_dir: &Path, dry_run: bool) -> Result<Vec<PathBuf>> {
    if !dry_run && !plan.is_empty() {
        fs::create_dir_all(saves_dir)?;
    }

    let mut created = Vec::with_capacity(plan.saves.len());
    for save in &plan.saves {
        if dry_run {
            info!(
                "Would save {} -> {}",
                save.source.display(),
                save.target.display()
            );
        } else {
            copy_with_metadata(&save.source, &save.target)?;
            info!("Saved {} -> {}", save.source.display(), save.target.display());
        }
        created.push(save.target.clone());
    }

    if created.is_empty() {
        info!("Nothing to save, everything up to date");
    }

    Ok(created)
}

/// Save every current file whose content is not yet in `saves_dir` and
/// return the (possibly hypothetical) target paths in order.
pub fn diff_and_save(
    current: &[FileRecord],
    saved: &[FileRecord],
    saves_dir: &Path,
    dry_run: bool,
) -> Result<Vec<PathBuf>> {
    let span = span!(Level::INFO, "diff_and_save", dry_run);
    let _enter = span.enter();

    let plan = plan(current, saved, saves_dir)?;
    debug!(
        "{} files to save, {} already saved",
        plan.saves.len(),
        plan.skipped.len()
    );
    apply(&plan, saves_dir, dry_run)
}

/// Copy bytes, permissions and access/modification times
pub fn copy_with_metadata(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target)?;

    let metadata = fs::metadata(source)?;
    let atime = filetime::FileTime::from_last_access_time(&metadata);
    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(target, atime, mtime)?;

    Ok(())
}
