//! Build context - directory layout, tool paths and build options.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::generator::host_is_64bit;
use crate::builder::toolchain::DEFAULT_LLVM_CONFIG;
use crate::util::config::Config;
use crate::util::process::{is_bare_name, resolve_tool};

/// Staging directory for the CMake build, relative to the FFI directory.
pub const STAGING_DIR_NAME: &str = "build";

/// Minimal CMake project used to probe generators.
pub const PROBE_PROJECT_DIR_NAME: &str = "dummy";

/// Multi-config build configuration used on Windows.
pub const WINDOWS_BUILD_CONFIG: &str = "Release";

/// Everything a pipeline needs to know about where and how to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Directory holding the bridge sources, Makefiles and CMake project
    pub ffi_dir: PathBuf,

    /// Directory the built library is installed into
    pub target_dir: PathBuf,

    pub llvm_config: PathBuf,
    pub make: PathBuf,
    pub cmake: PathBuf,

    /// Link libstdc++ statically (POSIX only)
    pub cxx_static_link: bool,

    /// CMake generators to try, before the 64-bit suffix is applied
    pub generators: Vec<String>,

    /// Whether to probe the 64-bit generator variants
    pub is_64bit: bool,

    /// Where generator probes create their scratch directories
    pub scratch_root: PathBuf,
}

impl BuildContext {
    /// Default context for an FFI directory.
    pub fn new(ffi_dir: impl Into<PathBuf>) -> Self {
        let ffi_dir = ffi_dir.into();
        let target_dir = default_target_dir(&ffi_dir);

        BuildContext {
            ffi_dir,
            target_dir,
            llvm_config: PathBuf::from(DEFAULT_LLVM_CONFIG),
            make: PathBuf::from("make"),
            cmake: PathBuf::from("cmake"),
            cxx_static_link: false,
            generators: Vec::new(),
            is_64bit: host_is_64bit(),
            scratch_root: std::env::temp_dir(),
        }
    }

    /// Context for an FFI directory with configuration applied.
    pub fn from_config(ffi_dir: impl Into<PathBuf>, config: &Config) -> Self {
        let mut ctx = Self::new(ffi_dir);

        if let Some(ref path) = config.toolchain.llvm_config {
            ctx.llvm_config = path.clone();
        }
        if let Some(enabled) = config.toolchain.cxx_static_link {
            ctx.cxx_static_link = enabled;
        }
        if let Some(ref make) = config.tools.make {
            ctx.make = make.clone();
        }
        if let Some(ref cmake) = config.tools.cmake {
            ctx.cmake = cmake.clone();
        }
        if !config.windows.generators.is_empty() {
            ctx.generators = config.windows.generators.clone();
        }
        if let Some(ref target_dir) = config.paths.target_dir {
            ctx.target_dir = if target_dir.is_relative() {
                ctx.ffi_dir.join(target_dir)
            } else {
                target_dir.clone()
            };
        }

        ctx
    }

    /// Resolve bare tool names against PATH.
    pub fn resolve_tools(mut self) -> Self {
        self.llvm_config = resolve_tool(&self.llvm_config);
        self.make = resolve_tool(&self.make);
        self.cmake = resolve_tool(&self.cmake);
        self
    }

    /// Make every relative path absolute against `base`.
    ///
    /// make runs inside the FFI directory and cmake inside the staging and
    /// scratch directories, so paths handed to them must not depend on the
    /// working directory. Bare tool names are left for PATH lookup.
    pub fn anchored_at(mut self, base: &Path) -> Self {
        self.ffi_dir = anchor(base, &self.ffi_dir);
        self.target_dir = anchor(base, &self.target_dir);
        self.scratch_root = anchor(base, &self.scratch_root);
        for tool in [&mut self.llvm_config, &mut self.make, &mut self.cmake] {
            if !is_bare_name(tool) {
                *tool = anchor(base, tool);
            }
        }
        self
    }

    /// Anchor relative paths at the current directory, then resolve bare
    /// tool names against PATH.
    pub fn resolve(self) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read the current directory")?;
        Ok(self.anchored_at(&cwd).resolve_tools())
    }

    /// Directory the CMake build runs in.
    pub fn staging_dir(&self) -> PathBuf {
        self.ffi_dir.join(STAGING_DIR_NAME)
    }

    /// CMake project used for generator probing.
    pub fn probe_project_dir(&self) -> PathBuf {
        self.ffi_dir.join(PROBE_PROJECT_DIR_NAME)
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// `<ffi dir>/../llvmlite/binding`, where the Python package loads the
/// library from.
pub fn default_target_dir(ffi_dir: &Path) -> PathBuf {
    let base = match ffi_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => ffi_dir.join(".."),
    };
    base.join("llvmlite").join("binding")
}
