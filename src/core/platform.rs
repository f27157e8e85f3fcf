//! Host platform identification.

use std::fmt;

use serde::Serialize;

use crate::error::BuildError;

/// Base name of the bridging library, without prefix or extension.
pub const LIBRARY_NAME: &str = "llvmlite";

/// The platforms the bridge can be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Linux,
    FreeBsd,
    Darwin,
    Windows,
}

impl PlatformKind {
    /// The platform this binary was compiled for.
    pub fn host() -> Result<Self, BuildError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Identify a platform from an OS identifier.
    ///
    /// Accepts Rust's `std::env::consts::OS` values as well as the
    /// `sys.platform`-style names (`linux2`, `freebsd12`, `darwin`, `win32`).
    pub fn from_os(os: &str) -> Result<Self, BuildError> {
        let os_lower = os.to_ascii_lowercase();
        let kind = if os_lower == "windows" || os_lower == "win32" {
            PlatformKind::Windows
        } else if os_lower.starts_with("linux") {
            PlatformKind::Linux
        } else if os_lower.starts_with("freebsd") {
            PlatformKind::FreeBsd
        } else if os_lower == "macos" || os_lower == "darwin" {
            PlatformKind::Darwin
        } else {
            return Err(BuildError::UnsupportedPlatform { os: os.to_string() });
        };
        Ok(kind)
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, PlatformKind::Windows)
    }

    /// Suffix of the Makefile driving the POSIX build (`Makefile.<tag>`).
    pub fn makefile_tag(&self) -> &'static str {
        match self {
            PlatformKind::Linux => "linux",
            PlatformKind::FreeBsd => "freebsd",
            PlatformKind::Darwin => "osx",
            PlatformKind::Windows => "windows",
        }
    }

    /// Shared library extension, including the dot.
    pub fn library_ext(&self) -> &'static str {
        match self {
            PlatformKind::Linux | PlatformKind::FreeBsd => ".so",
            PlatformKind::Darwin => ".dylib",
            PlatformKind::Windows => ".dll",
        }
    }

    /// File name of the built library.
    pub fn library_file_name(&self) -> String {
        match self {
            PlatformKind::Windows => format!("{}{}", LIBRARY_NAME, self.library_ext()),
            _ => format!("lib{}{}", LIBRARY_NAME, self.library_ext()),
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformKind::Linux => "linux",
            PlatformKind::FreeBsd => "freebsd",
            PlatformKind::Darwin => "darwin",
            PlatformKind::Windows => "windows",
        };
        f.write_str(name)
    }
}
