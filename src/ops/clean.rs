//! Removal of build outputs.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::context::BuildContext;
use crate::core::platform::PlatformKind;
use crate::util::fs::{remove_dir_all_if_exists, remove_file_if_exists};

/// Options for [`clean`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// Also remove the installed copy from the target directory
    pub installed: bool,
}

/// Remove the CMake staging directory and any library left in the FFI
/// directory by a POSIX build. Returns the paths that were removed.
pub fn clean(ctx: &BuildContext, opts: CleanOptions) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    let staging = ctx.staging_dir();
    if staging.is_dir() {
        remove_dir_all_if_exists(&staging)?;
        removed.push(staging);
    }

    // One of each library name; FreeBSD shares Linux's.
    for platform in [PlatformKind::Linux, PlatformKind::Darwin, PlatformKind::Windows] {
        let name = platform.library_file_name();
        let local = ctx.ffi_dir.join(&name);
        if local.is_file() {
            remove_file_if_exists(&local)?;
            removed.push(local);
        }

        if opts.installed {
            let installed = ctx.target_dir.join(&name);
            if installed.is_file() {
                remove_file_if_exists(&installed)?;
                removed.push(installed);
            }
        }
    }

    for path in &removed {
        tracing::debug!("removed {}", path.display());
    }
    Ok(removed)
}
