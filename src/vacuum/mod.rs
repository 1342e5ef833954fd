//! Multiplayer save vacuum.
//!
//! Every player save lives in a directory named `<server ip>_<port>_<hash>`
//! under `Zomboid/Saves/Multiplayer`. Chunks far from the character go stale
//! quickly and are re-sent by the server anyway, so everything older than the
//! save's freshest file by more than the retention window is dropped.

mod address;
mod remove;

pub use address::is_dotted_quad;
pub use remove::{PROTECTED_FILE, RemoveOptions, remove_files};

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use crate::cli::VacuumCli;
use crate::config::{self, Settings};

/// Smallest retention window, in days.
pub const MIN_DAYS: i64 = 1;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VacuumReport {
    pub saves_processed: usize,
    pub entries_skipped: usize,
    pub files_marked: usize,
    pub bytes_freed: u64,
}

/// A regular file inside a save directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: OsString,
    pub modified: DateTime<Utc>,
}

pub fn run(cli: &VacuumCli) -> Result<VacuumReport> {
    let options = RemoveOptions {
        faster: cli.faster,
        dry_run: cli.dry_run,
    };
    if options.dry_run {
        warn!("--dry-run enabled, files won't be removed");
    }

    let settings = config::load()?;
    let saves_dir = resolve_saves_dir(&settings)?;

    let report = vacuum_saves(&saves_dir, cli.days, options)?;
    info!(
        "{} save(s) processed, {} other entries skipped, {} file(s) marked, {} freed",
        report.saves_processed,
        report.entries_skipped,
        report.files_marked,
        format_mebibytes(report.bytes_freed)
    );
    Ok(report)
}

/// The configured saves directory, or [`default_saves_dir`].
pub fn resolve_saves_dir(settings: &Settings) -> Result<PathBuf> {
    match settings.saves_dir() {
        Some(dir) => Ok(dir.clone()),
        None => default_saves_dir(),
    }
}

/// `<home>/Zomboid/Saves/Multiplayer`.
pub fn default_saves_dir() -> Result<PathBuf> {
    Ok(config::home_dir()?
        .join("Zomboid")
        .join("Saves")
        .join("Multiplayer"))
}

/// Clamp the requested retention to at least [`MIN_DAYS`].
pub fn effective_days(days: i64) -> i64 {
    if days < MIN_DAYS {
        warn!("not safe to preserve less than {MIN_DAYS} day, forcing {MIN_DAYS} day");
        return MIN_DAYS;
    }
    days
}

/// Name segment before the first `_`, which holds the server address for saves.
pub fn save_prefix(name: &str) -> &str {
    name.split_once('_').map_or(name, |(prefix, _)| prefix)
}

/// Prune every save directory directly under `root`.
pub fn vacuum_saves(root: &Path, days: i64, options: RemoveOptions) -> Result<VacuumReport> {
    let window = TimeDelta::try_days(effective_days(days));

    let mut entries = fs::read_dir(root)
        .with_context(|| format!("reading saves directory {}", root.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading saves directory {}", root.display()))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut report = VacuumReport::default();
    for entry in entries {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if !is_dotted_quad(save_prefix(&name)) {
            // Local and dedicated server data live here too.
            warn!("skipping: {name}");
            report.entries_skipped += 1;
            continue;
        }

        info!("processing: {name}");
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        report.saves_processed += 1;

        let files = scan_save(&path)?;
        let expired = expired_files(&files, window);
        if expired.is_empty() {
            debug!("no files to remove");
            continue;
        }

        info!("removing {} / {} files", expired.len(), files.len());
        report.files_marked += expired.len();
        let freed = remove_files(&path, &expired, options);
        if freed > 0 {
            info!("freed {}", format_mebibytes(freed));
            report.bytes_freed += freed;
        }
    }
    Ok(report)
}

/// Regular files directly inside `dir` with their modification times.
pub fn scan_save(dir: &Path) -> Result<Vec<FileEntry>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading save {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading save {}", dir.display()))?;
        let path = entry.path();
        let stat = fs::metadata(&path).and_then(|m| m.modified().map(|t| (m, t)));
        let (metadata, modified) = match stat {
            Ok(found) => found,
            Err(err) => {
                warn!("could not stat {}: {err}", path.display());
                continue;
            }
        };
        // Unlike regular files, nested directories don't move the freshest
        // timestamp and are never removal candidates.
        if !metadata.is_file() {
            debug!("{} is not a file, skipping", path.display());
            continue;
        }
        files.push(FileEntry {
            name: entry.file_name(),
            modified: DateTime::<Utc>::from(modified),
        });
    }
    Ok(files)
}

/// Names of files older than the freshest one by more than `window`.
///
/// `None` stands for a window too large to represent, so nothing expires.
pub fn expired_files(files: &[FileEntry], window: Option<TimeDelta>) -> Vec<OsString> {
    let Some(window) = window else {
        return Vec::new();
    };
    let Some(freshest) = files.iter().map(|file| file.modified).max() else {
        return Vec::new();
    };
    files
        .iter()
        .filter(|file| is_expired(freshest, file.modified, window))
        .map(|file| file.name.clone())
        .collect()
}

/// Strict: a file exactly `window` older than the freshest one is kept.
pub fn is_expired(freshest: DateTime<Utc>, modified: DateTime<Utc>, window: TimeDelta) -> bool {
    modified
        .checked_add_signed(window)
        .is_some_and(|cutoff| freshest > cutoff)
}

pub fn format_mebibytes(bytes: u64) -> String {
    format!("{:.2} MiB", bytes as f64 / 1024.0 / 1024.0)
}
