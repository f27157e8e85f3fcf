//! Artifact installation.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::context::{BuildContext, WINDOWS_BUILD_CONFIG};
use crate::core::platform::PlatformKind;
use crate::error::BuildError;
use crate::util::fs::atomic_copy;

/// Where the native build leaves the library for `platform`.
///
/// POSIX builds produce it next to the Makefiles; CMake puts it in the
/// configuration subdirectory of the staging directory.
pub fn built_artifact_path(ctx: &BuildContext, platform: PlatformKind) -> PathBuf {
    let name = platform.library_file_name();
    if platform.is_windows() {
        ctx.staging_dir().join(WINDOWS_BUILD_CONFIG).join(name)
    } else {
        ctx.ffi_dir.join(name)
    }
}

/// Copy the built library into the target directory, replacing any previous
/// copy atomically. Returns the installed path.
pub fn install_artifact(ctx: &BuildContext, platform: PlatformKind) -> Result<PathBuf> {
    let source = built_artifact_path(ctx, platform);
    if !source.is_file() {
        return Err(BuildError::ArtifactNotFound { path: source }.into());
    }
    if !ctx.target_dir.is_dir() {
        return Err(BuildError::TargetDirNotFound {
            path: ctx.target_dir.clone(),
        }
        .into());
    }

    let dest = ctx.target_dir.join(platform.library_file_name());
    tracing::info!("Installing {} -> {}", source.display(), dest.display());
    atomic_copy(&source, &dest)?;

    Ok(dest)
}
