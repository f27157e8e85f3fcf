//! llvmlite-build - builds and installs llvmlite's native LLVM bridge
//!
//! This crate probes the LLVM toolchain through `llvm-config`, checks that it
//! is a supported release, assembles compiler and linker flags, drives the
//! platform's native build (make on POSIX, CMake on Windows) and installs the
//! resulting shared library next to the Python bindings.

pub mod builder;
pub mod core;
pub mod error;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a mock process executor and checkout fixtures.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildContext, BuildEnvironment, ToolchainInfo};
pub use core::PlatformKind;
pub use error::BuildError;
pub use ops::{BuildPipeline, BuildPlan, BuildReport};
