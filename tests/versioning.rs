//! End-to-end behavior of scanning and saving against a real directory.

use filesync::{diff_and_save, scan, Result};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Scan with the default pattern and save everything new
fn save_run(base: &Path, dry_run: bool) -> Result<Vec<String>> {
    let (current, saved) = scan(base, "*.txt")?;
    let created = diff_and_save(&current, &saved, &base.join("saves"), dry_run)?;
    Ok(created
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
        .collect())
}

fn saved_names(base: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(base.join("saves"))? {
        names.insert(entry?.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

#[test]
fn test_notes_scenario() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path();
    fs::create_dir(base.join("saves"))?;
    fs::write(base.join("notes.txt"), "hello")?;

    assert_eq!(save_run(base, false)?, vec!["notes__saved_001.txt"]);
    assert_eq!(fs::read(base.join("saves/notes__saved_001.txt"))?, b"hello");

    assert!(save_run(base, false)?.is_empty());

    fs::write(base.join("notes.txt"), "hello world")?;
    assert_eq!(save_run(base, false)?, vec!["notes__saved_002.txt"]);
    assert_eq!(fs::read(base.join("saves/notes__saved_001.txt"))?, b"hello");
    assert_eq!(fs::read(base.join("saves/notes__saved_002.txt"))?, b"hello world");
    Ok(())
}

#[test]
fn test_rerun_without_changes_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path();
    fs::write(base.join("a.txt"), "alpha")?;
    fs::write(base.join("b.txt"), "beta")?;

    assert_eq!(save_run(base, false)?.len(), 2);
    let before = saved_names(base)?;

    assert!(save_run(base, false)?.is_empty());
    assert_eq!(saved_names(base)?, before);
    Ok(())
}

#[test]
fn test_suffixes_increase_across_runs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path();

    let mut seen = Vec::new();
    for round in 0..5 {
        fs::write(base.join("log.txt"), format!("round {}", round))?;
        seen.extend(save_run(base, false)?);
    }

    assert_eq!(
        seen,
        vec![
            "log__saved_001.txt",
            "log__saved_002.txt",
            "log__saved_003.txt",
            "log__saved_004.txt",
            "log__saved_005.txt",
        ]
    );
    Ok(())
}

#[test]
fn test_dedup_by_content_not_name() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path();
    fs::write(base.join("a.txt"), "identical")?;

    assert_eq!(save_run(base, false)?, vec!["a__saved_001.txt"]);

    fs::write(base.join("b.txt"), "identical")?;
    assert!(save_run(base, false)?.is_empty());
    assert_eq!(saved_names(base)?, BTreeSet::from(["a__saved_001.txt".to_string()]));
    Ok(())
}

#[test]
fn test_dry_run_matches_real_run_without_side_effects() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path();
    fs::write(base.join("notes.txt"), "v1")?;
    save_run(base, false)?;
    fs::write(base.join("notes.txt"), "v2")?;
    fs::write(base.join("todo.txt"), "buy milk")?;

    let before = saved_names(base)?;
    let mut planned = save_run(base, true)?;
    assert_eq!(saved_names(base)?, before);

    let mut actual = save_run(base, false)?;
    planned.sort();
    actual.sort();
    assert_eq!(planned, actual);
    assert_eq!(planned, vec!["notes__saved_002.txt", "todo__saved_001.txt"]);
    Ok(())
}

#[test]
fn test_saved_copy_keeps_mtime_and_hash() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path();
    let source = base.join("notes.txt");
    fs::write(&source, "keep me")?;
    let mtime = filetime::FileTime::from_unix_time(1_400_000_000, 0);
    filetime::set_file_mtime(&source, mtime)?;
    let mut permissions = fs::metadata(&source)?.permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&source, permissions)?;

    save_run(base, false)?;

    let copy = base.join("saves/notes__saved_001.txt");
    let metadata = fs::metadata(&copy)?;
    let copied = filetime::FileTime::from_last_modification_time(&metadata);
    assert_eq!(copied, mtime);
    assert!(metadata.permissions().readonly());
    assert_eq!(filesync::hash::hash_file(&source)?, filesync::hash::hash_file(&copy)?);
    Ok(())
}

#[test]
fn test_dependency_manifest_is_never_saved() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path();
    fs::write(base.join("requirements.txt"), "serde==1")?;
    fs::write(base.join("readme.md"), "not matched")?;

    assert!(save_run(base, false)?.is_empty());
    assert!(saved_names(base)?.is_empty());
    Ok(())
}

#[test]
fn test_suffix_beyond_u32_range_keeps_counting() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path();
    fs::create_dir(base.join("saves"))?;
    fs::write(base.join("saves/notes__saved_4294967295.txt"), "old")?;
    fs::write(base.join("notes.txt"), "new")?;

    assert_eq!(save_run(base, true)?, vec!["notes__saved_4294967296.txt"]);
    assert_eq!(save_run(base, false)?, vec!["notes__saved_4294967296.txt"]);
    assert_eq!(
        fs::read(base.join("saves/notes__saved_4294967296.txt"))?,
        b"new"
    );
    Ok(())
}
