//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Remove a file, if it exists.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        fs::remove_file(path)
            .with_context(|| format!("failed to remove file: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Copy `src` over `dst` so readers never observe a partially written file.
///
/// The data is staged in a temporary file next to `dst` (same filesystem),
/// given the source's permissions, then renamed into place.
pub fn atomic_copy(src: &Path, dst: &Path) -> Result<()> {
    let dir = dst
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;

    let mut reader = fs::File::open(src)
        .with_context(|| format!("failed to open {}", src.display()))?;
    std::io::copy(&mut reader, staged.as_file_mut())
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    staged
        .as_file()
        .sync_all()
        .with_context(|| format!("failed to flush staged copy of {}", src.display()))?;

    let permissions = fs::metadata(src)
        .with_context(|| format!("failed to stat {}", src.display()))?
        .permissions();
    fs::set_permissions(staged.path(), permissions).with_context(|| {
        format!("failed to set permissions on {}", staged.path().display())
    })?;

    staged
        .persist(dst)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to move artifact into {}", dst.display()))?;

    Ok(())
}
