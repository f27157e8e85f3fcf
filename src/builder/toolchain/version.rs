//! LLVM version gate.

use crate::error::BuildError;

/// The only LLVM release series the bridge compiles against.
pub const SUPPORTED_VERSION_PREFIX: &str = "6.0.";

/// Accept `version` only if it starts with [`SUPPORTED_VERSION_PREFIX`].
pub fn check_version(version: &str) -> Result<(), BuildError> {
    if version.starts_with(SUPPORTED_VERSION_PREFIX) {
        return Ok(());
    }

    Err(BuildError::UnsupportedToolchainVersion {
        found: version.trim_end().to_string(),
        required: SUPPORTED_VERSION_PREFIX.to_string(),
    })
}
