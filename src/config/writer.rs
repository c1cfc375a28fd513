use super::{reader, Document};
use crate::SyncError;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Timestamp format used in backup file names (UTC, second resolution)
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What a [`save`] call wrote besides the document itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub backup_path: Option<PathBuf>,
}

/// Write a document, optionally backing up the previous file first
///
/// The backup is a pretty-printed copy of the existing document named
/// `<stem>.backup.<YYYYMMDD_HHMMSS>.json` next to `path`. The document itself
/// replaces the file behind `path` in a single rename, so readers never see a
/// partial file and a symlinked `path` still points at the updated document.
///
/// # Errors
///
/// Returns an error if:
/// - The existing file cannot be read or parsed for the backup
/// - The parent directory cannot be created
/// - Writing or renaming the file fails
pub fn save<P: AsRef<Path>>(
    path: P,
    document: &Document,
    backup: bool,
) -> Result<SaveReport, SyncError> {
    let path_ref = path.as_ref();

    let backup_path = if backup && path_ref.exists() {
        Some(backup_existing(path_ref, Utc::now())?)
    } else {
        None
    };

    write_atomic(path_ref, &to_pretty_json(document)?)?;
    debug!("Wrote {}", path_ref.display());

    Ok(SaveReport { backup_path })
}

/// Path of the backup taken for `path` at `timestamp`
pub fn backup_path_for(path: &Path, timestamp: DateTime<Utc>) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    path.with_file_name(format!(
        "{stem}.backup.{}.json",
        timestamp.format(BACKUP_TIMESTAMP_FORMAT)
    ))
}

fn backup_existing(path: &Path, timestamp: DateTime<Utc>) -> Result<PathBuf, SyncError> {
    let previous = reader::read_document(path, false)?.document;
    let backup_path = backup_path_for(path, timestamp);

    write_atomic(&backup_path, &to_pretty_json(&previous)?)?;
    debug!("Backup of {} written to {}", path.display(), backup_path.display());

    Ok(backup_path)
}

/// Create `path` with `document` unless a file already exists there
///
/// Returns `false` when the file was already present.
pub(crate) fn create_document(path: &Path, document: &Document) -> Result<bool, SyncError> {
    let temp = write_temp_sibling(path, &to_pretty_json(document)?)?;

    match temp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error.into()),
    }
}

/// Two-space indented JSON, matching what the tool has always written
pub fn to_pretty_json(document: &Document) -> Result<String, SyncError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Replace the file behind `path` in one rename
///
/// A symlinked `path` stays a link: the file it points at is the one replaced,
/// and it keeps its permissions.
fn write_atomic(path: &Path, contents: &str) -> Result<(), SyncError> {
    let destination = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e.into()),
    };
    if destination != path {
        debug!("Writing {} through to {}", path.display(), destination.display());
    }

    let temp = write_temp_sibling(&destination, contents)?;
    if let Ok(existing) = fs::metadata(&destination) {
        temp.as_file().set_permissions(existing.permissions())?;
    }
    temp.persist(&destination).map_err(|e| e.error)?;
    Ok(())
}

fn write_temp_sibling(path: &Path, contents: &str) -> Result<NamedTempFile, SyncError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut temp = NamedTempFile::new_in(&parent)?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    Ok(temp)
}
