//! LLVM toolchain discovery.
//!
//! The toolchain is described by `llvm-config`, which is queried for its
//! version and for the flags needed to compile and link against LLVM.
//!
//! llvm-config location priority:
//! 1. `LLVM_CONFIG` environment variable
//! 2. Config file (`toolchain.llvm-config`)
//! 3. `llvm-config` on PATH

use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::util::process::{decode_latin1, run_checked, ProcessBuilder, ProcessExecutor};

mod version;

pub use version::{check_version, SUPPORTED_VERSION_PREFIX};

/// Default llvm-config executable name.
pub const DEFAULT_LLVM_CONFIG: &str = "llvm-config";

/// Arguments for each llvm-config query.
pub const VERSION_ARGS: &[&str] = &["--version"];
pub const LIBS_ARGS: &[&str] = &["--system-libs", "--libs", "all"];
pub const CXXFLAGS_ARGS: &[&str] = &["--cxxflags"];
pub const LDFLAGS_ARGS: &[&str] = &["--ldflags"];

/// Everything llvm-config reported for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainInfo {
    /// Raw `--version` output (latin-1 decoded)
    pub version: String,
    /// System libraries LLVM links against. llvm-config reports these in the
    /// same query as the LLVM libraries, so this holds that combined output.
    pub system_libs: String,
    /// Raw `--system-libs --libs all` output
    pub libs: String,
    /// `--cxxflags` output, split into tokens
    pub cxxflags: Vec<String>,
    /// Raw `--ldflags` output
    pub ldflags: String,
}

/// Runs llvm-config queries.
pub struct ToolchainProbe<'a> {
    llvm_config: PathBuf,
    executor: &'a dyn ProcessExecutor,
}

impl<'a> ToolchainProbe<'a> {
    pub fn new(llvm_config: impl Into<PathBuf>, executor: &'a dyn ProcessExecutor) -> Self {
        ToolchainProbe {
            llvm_config: llvm_config.into(),
            executor,
        }
    }

    /// Path of the llvm-config being queried.
    pub fn llvm_config(&self) -> &Path {
        &self.llvm_config
    }

    /// Query `llvm-config --version`.
    ///
    /// The output is decoded byte-for-byte (latin-1) so odd locales never
    /// cause a decoding failure.
    pub fn probe_version(&self) -> Result<String, BuildError> {
        let output = self.query(VERSION_ARGS)?;
        let version = decode_latin1(&output);
        tracing::debug!("llvm-config reports version {}", version.trim_end());
        Ok(version)
    }

    /// Query llvm-config with an arbitrary argument list, returning stdout.
    pub fn probe_flags(&self, args: &[&str]) -> Result<String, BuildError> {
        let output = self.query(args)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Run the three flag queries for an already-validated version.
    pub fn probe_all(&self, version: String) -> Result<ToolchainInfo, BuildError> {
        let libs = self.probe_flags(LIBS_ARGS)?;
        let cxxflags = self.probe_flags(CXXFLAGS_ARGS)?;
        let ldflags = self.probe_flags(LDFLAGS_ARGS)?;

        Ok(ToolchainInfo {
            version,
            system_libs: libs.clone(),
            libs,
            cxxflags: cxxflags.split_whitespace().map(str::to_string).collect(),
            ldflags,
        })
    }

    fn query(&self, args: &[&str]) -> Result<Vec<u8>, BuildError> {
        let cmd = ProcessBuilder::new(&self.llvm_config).args(args);
        let output = run_checked(self.executor, &cmd, |failure| {
            BuildError::ToolchainNotFound {
                detail: failure.describe(),
                command: failure.command,
            }
        })?;
        Ok(output.stdout)
    }
}
