//! Backup copies taken before any file is overwritten.
//!
//! A backup is a sibling of the target with `.bak` appended to its file name, e.g.
//! `cashbook.csv` -> `cashbook.csv.bak`. Each run replaces the previous backup.

use crate::{utils, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix appended to the file name of a backup copy.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Returns the path of the backup copy for `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copies `path` to its backup path and returns the backup path.
///
/// Returns `Ok(None)` when `path` does not exist yet, since there is nothing to protect. Any other
/// failure to copy is an `Io` error, and callers must not go on to overwrite `path`.
pub fn save(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        debug!("No backup needed, {} does not exist yet", path.display());
        return Ok(None);
    }
    let bak = backup_path(path);
    utils::copy(path, &bak)?;
    debug!("Saved backup of {} to {}", path.display(), bak.display());
    Ok(Some(bak))
}
