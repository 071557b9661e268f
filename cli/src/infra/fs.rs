//! Filesystem infrastructure: publishing downloaded files.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

/// Create `path` with contents produced by `fill`, never replacing an
/// existing file.
///
/// The contents are written to a hidden temporary file in the same directory
/// and moved into place only once `fill` succeeds, so `path` either does not
/// exist or is complete. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if `path` already exists, if `fill` fails, or if the
/// temporary file cannot be created, synced or renamed. On error nothing is
/// left at `path` that was not there before.
pub fn write_new_file(path: &Path, fill: impl FnOnce(&mut File) -> Result<u64>) -> Result<u64> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;
    anyhow::ensure!(!path.exists(), "{} already exists", path.display());

    let mut tmp = tempfile::Builder::new()
        .prefix(".log-bundle-")
        .suffix(".part")
        .tempfile_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    let bytes = fill(tmp.as_file_mut())?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("syncing {}", tmp.path().display()))?;

    tmp.persist_noclobber(path)
        .map_err(|e| e.error)
        .with_context(|| format!("finalizing {}", path.display()))?;
    Ok(bytes)
}
