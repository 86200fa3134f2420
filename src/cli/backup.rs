use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `<path>.bak`, next to the original.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Copies `path` to `<path>.bak` and returns where the copy went.
///
/// The original is only ever read here. If the copy fails the original is untouched and no
/// corruption should be attempted.
pub fn save_original(path: &Path) -> io::Result<PathBuf> {
    let target = backup_path(path);
    if target.exists() {
        tracing::warn!(event = "backup_overwrite", backup = %target.display(), "overwriting existing backup");
    }
    let copied = fs::copy(path, &target)?;
    tracing::info!(event = "backup_saved", source = %path.display(), backup = %target.display(), bytes = copied, "original saved");
    Ok(target)
}
