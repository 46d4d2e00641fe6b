//! Atomic file and symlink operations

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Sibling path used to stage a write before renaming it into place.
///
/// Lives in the same directory so the rename never crosses filesystems.
fn staging_path(target: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        target
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    target.with_file_name(temp_name)
}

/// Write content atomically to a file with locking.
///
/// Writes to a temp file in the same directory, syncs it, then renames it
/// over the target, so readers see either the old or the new content. The
/// temp file is removed again if any step fails.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = staging_path(&native_path);

    if let Err(e) = stage_and_rename(&temp_path, &native_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    tracing::debug!(path = %path, bytes = content.len(), "Wrote file atomically");
    Ok(())
}

fn stage_and_rename(temp_path: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;
    drop(temp_file);

    fs::rename(temp_path, target).map_err(|e| Error::io(target, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, returning `None` when the file does not exist.
///
/// Any other failure (permissions, invalid UTF-8, a directory in the way)
/// is still an error.
pub fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    let native_path = path.to_native();
    match fs::read_to_string(&native_path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Make sure a directory exists.
///
/// Returns `true` when the directory had to be created. An existing
/// directory is success; an existing non-directory is an error.
pub fn ensure_dir(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    if native_path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))?;
    tracing::info!(path = %path, "Created directory");
    Ok(true)
}

/// Point `link` at `target`, replacing whatever link or file is there.
///
/// The new link is created under a temporary sibling name and renamed over
/// `link`, so the old link stays in place until the new one exists. Stale
/// and dangling links are replaced like any other. A real directory at
/// `link` is refused with [`Error::NotALink`].
pub fn replace_symlink(link: &NormalizedPath, target: &NormalizedPath) -> Result<()> {
    let native_link = link.to_native();

    if let Ok(meta) = fs::symlink_metadata(&native_link)
        && meta.is_dir()
    {
        return Err(Error::NotALink { path: native_link });
    }

    if let Some(parent) = native_link.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_link = staging_path(&native_link);
    match fs::remove_file(&temp_link) {
        Ok(()) => tracing::debug!(path = %temp_link.display(), "Removed leftover staging link"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io(&temp_link, e)),
    }

    create_symlink(&target.to_native(), &temp_link).map_err(|e| Error::io(&temp_link, e))?;

    if let Err(e) = fs::rename(&temp_link, &native_link) {
        let _ = fs::remove_file(&temp_link);
        return Err(Error::io(&native_link, e));
    }

    tracing::debug!(link = %link, target = %target, "Replaced symlink");
    Ok(())
}

/// Read the target of a symlink, returning `None` when nothing is at `link`.
pub fn read_link_if_exists(link: &NormalizedPath) -> Result<Option<NormalizedPath>> {
    let native_link = link.to_native();
    match fs::read_link(&native_link) {
        Ok(target) => Ok(Some(NormalizedPath::new(target))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(&native_link, e)),
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
