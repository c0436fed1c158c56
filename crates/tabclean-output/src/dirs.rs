//! Artifact directory bookkeeping.
//!
//! Artifacts are named `{tag}_{YYYYMMDD_HHMMSS}.{ext}`, so within one
//! directory the lexicographic order of names is the chronological order of
//! runs.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tabclean_model::{format_run_timestamp, parse_run_timestamp};

use crate::error::{OutputError, Result};

/// Create `base/segment/...` and return it.
pub fn ensure_dir(base: &Path, segments: &[&str]) -> Result<PathBuf> {
    let dir = segments.iter().fold(base.to_path_buf(), |dir, segment| dir.join(segment));
    fs::create_dir_all(&dir).map_err(|e| OutputError::Io {
        operation: "create directory",
        path: dir.clone(),
        source: e,
    })?;
    Ok(dir)
}

/// Names of the files in `dir` starting with `tag`, in ascending order.
pub fn select_files(dir: &Path, tag: &str) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| OutputError::Io {
        operation: "list directory",
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| OutputError::Io {
            operation: "list directory",
            path: dir.to_path_buf(),
            source: e,
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(tag) {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// The most recent file starting with `tag`.
pub fn select_recent_file(dir: &Path, tag: &str) -> Result<Option<PathBuf>> {
    Ok(select_files(dir, tag)?.pop().map(|name| dir.join(name)))
}

/// The most recent file starting with `tag` whose name contains `date`
/// (`YYYYMMDD`).
pub fn select_file_by_date(dir: &Path, tag: &str, date: &str) -> Result<Option<PathBuf>> {
    if date.len() != 8 || NaiveDate::parse_from_str(date, "%Y%m%d").is_err() {
        return Err(OutputError::InvalidDate {
            value: date.to_string(),
        });
    }
    Ok(select_files(dir, tag)?
        .into_iter()
        .rev()
        .find(|name| name.contains(date))
        .map(|name| dir.join(name)))
}

/// The latest file starting with `tag` stamped no later than `limit`
/// (`YYYYMMDD_HHMMSS`).
///
/// Files are compared by name against `{tag}_{limit}_{ext}`, which sorts just
/// after an artifact stamped exactly at `limit`.
pub fn select_close_file_by_date(
    dir: &Path,
    tag: &str,
    limit: &str,
    ext: &str,
) -> Result<Option<PathBuf>> {
    let limit = format_run_timestamp(&parse_run_timestamp(limit)?);
    let bound = format!("{tag}_{limit}_{ext}");
    Ok(select_files(dir, tag)?
        .into_iter()
        .rev()
        .find(|name| *name < bound)
        .map(|name| dir.join(name)))
}

/// Run timestamp carried in an artifact name.
pub fn artifact_timestamp(path: &Path, tag: &str) -> Result<NaiveDateTime> {
    let stamp = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.strip_prefix(tag))
        .and_then(|rest| rest.strip_prefix('_'))
        .ok_or_else(|| OutputError::MissingTimestamp {
            path: path.to_path_buf(),
        })?;
    Ok(parse_run_timestamp(stamp)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), "").unwrap();
        }
    }

    #[test]
    fn test_ensure_dir_nested() {
        let dir = tempdir().unwrap();
        let created = ensure_dir(dir.path(), &["master", "clients"]).unwrap();
        assert!(created.is_dir());
        assert_eq!(created, dir.path().join("master").join("clients"));
        // Idempotent.
        ensure_dir(dir.path(), &["master", "clients"]).unwrap();
    }

    #[test]
    fn test_select_recent_file() {
        let dir = tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "clients_20240101_000000.csv",
                "clients_20240301_000000.csv",
                "other_20250101_000000.csv",
            ],
        );
        fs::create_dir(dir.path().join("clients_zzz")).unwrap();

        let recent = select_recent_file(dir.path(), "clients").unwrap().unwrap();
        assert_eq!(recent, dir.path().join("clients_20240301_000000.csv"));
        assert_eq!(select_files(dir.path(), "clients").unwrap().len(), 2);
        assert!(select_recent_file(dir.path(), "none").unwrap().is_none());
    }

    #[test]
    fn test_select_file_by_date() {
        let dir = tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "clients_20240101_080000.csv",
                "clients_20240101_180000.csv",
                "clients_20240102_000000.csv",
            ],
        );
        let found = select_file_by_date(dir.path(), "clients", "20240101").unwrap();
        assert_eq!(found, Some(dir.path().join("clients_20240101_180000.csv")));
        assert!(select_file_by_date(dir.path(), "clients", "2024-01-01").is_err());
        assert!(
            select_file_by_date(dir.path(), "clients", "20240105")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_select_close_file_by_date() {
        let dir = tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "clients_20240101_000000.csv",
                "clients_20240201_000000.csv",
                "clients_20240301_000000.csv",
            ],
        );
        let found = select_close_file_by_date(dir.path(), "clients", "20240215_000000", "csv").unwrap();
        assert_eq!(found, Some(dir.path().join("clients_20240201_000000.csv")));

        let exact = select_close_file_by_date(dir.path(), "clients", "20240301_000000", "csv").unwrap();
        assert_eq!(exact, Some(dir.path().join("clients_20240301_000000.csv")));

        let before = select_close_file_by_date(dir.path(), "clients", "20231231_000000", "csv").unwrap();
        assert!(before.is_none());

        assert!(select_close_file_by_date(dir.path(), "clients", "yesterday", "csv").is_err());
    }

    #[test]
    fn test_artifact_timestamp() {
        let stamp = artifact_timestamp(Path::new("/x/clients_20240301_101500.csv"), "clients").unwrap();
        assert_eq!(format_run_timestamp(&stamp), "20240301_101500");
        assert!(artifact_timestamp(Path::new("/x/clients.csv"), "clients").is_err());
        assert!(artifact_timestamp(Path::new("/x/clients_latest.csv"), "clients").is_err());
    }
}
