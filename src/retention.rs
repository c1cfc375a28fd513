//! Listing and purging the timestamped backups written by [`crate::config::save`].

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// A backup file found next to the target document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFile {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size: u64,
}

impl BackupFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().to_string())
    }

    /// `name (size bytes, YYYY-MM-DD HH:MM:SS)` in local time
    pub fn describe(&self) -> String {
        let modified: DateTime<Local> = self.modified.into();
        format!(
            "{} ({} bytes, {})",
            self.file_name(),
            format_size(self.size),
            modified.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Outcome of a purge; every file is attempted
#[derive(Debug, Default)]
pub struct PurgeReport {
    pub deleted: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
}

impl PurgeReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Regex matching backups of `target_path`, e.g. `.claude.backup.20250101_120000.json`
///
/// # Errors
///
/// Returns an error if the target has no usable file name
pub fn backup_pattern(target_path: &Path) -> Result<Regex> {
    let stem = target_path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("No file name in {}", target_path.display()))?;

    Regex::new(&format!(r"^{}\.backup\.\d{{8}}_\d{{6}}\.json$", regex::escape(stem)))
        .context("Failed to build backup file pattern")
}

/// Backups of `target_path` in its directory, newest first
///
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns an error if the directory or a file's metadata cannot be read
pub fn list_backups(target_path: &Path) -> Result<Vec<BackupFile>> {
    let pattern = backup_pattern(target_path)?;
    let dir = match target_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !dir.is_dir() {
        debug!("Backup directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let entries =
        fs::read_dir(&dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let name = entry.file_name();
        if !name.to_str().is_some_and(|n| pattern.is_match(n)) {
            continue;
        }

        let path = entry.path();
        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
        if !metadata.is_file() {
            continue;
        }

        backups.push(BackupFile {
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            size: metadata.len(),
            path,
        });
    }

    backups.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.path.cmp(&a.path)));
    debug!("Found {} backup(s) for {}", backups.len(), target_path.display());
    Ok(backups)
}

/// Delete the given backups, continuing past individual failures
pub fn purge(backups: &[BackupFile]) -> PurgeReport {
    let mut report = PurgeReport::default();

    for backup in backups {
        match fs::remove_file(&backup.path) {
            Ok(()) => report.deleted.push(backup.path.clone()),
            Err(e) => {
                warn!("Failed to delete {}: {e}", backup.path.display());
                report.failures.push((backup.path.clone(), e.to_string()));
            },
        }
    }

    report
}

/// `1,023` below a KiB, `1.5K` from there on
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 {
        return format!("{:.1}K", bytes as f64 / 1024.0);
    }

    let digits = bytes.to_string();
    let mut out = String::with_capacity(digits.len() + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
