//! Build failure taxonomy.
//!
//! Every variant is fatal: the pipeline never retries, since each one is a
//! configuration or environment problem rather than a transient fault.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error raised by a pipeline stage.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("unsupported platform: `{os}`")]
    #[diagnostic(
        code(llvmlite_build::platform::unsupported),
        help("supported platforms are linux, freebsd, macos and windows")
    )]
    UnsupportedPlatform { os: String },

    #[error("`{command}` failed executing: {detail}")]
    #[diagnostic(
        code(llvmlite_build::toolchain::not_found),
        help("point LLVM_CONFIG to the path for llvm-config")
    )]
    ToolchainNotFound { command: String, detail: String },

    #[error("building llvmlite requires LLVM {required}x, found `{found}`")]
    #[diagnostic(
        code(llvmlite_build::toolchain::version),
        help(
            "be sure to set LLVM_CONFIG to the right executable path; \
             see http://llvmlite.pydata.org/ for more information about building llvmlite"
        )
    )]
    UnsupportedToolchainVersion { found: String, required: String },

    #[error(
        "no compatible cmake generator installed on this machine (tried: {})",
        .tried.join(", ")
    )]
    #[diagnostic(
        code(llvmlite_build::generator::none),
        help("install a Visual Studio release matching the one LLVM was built with")
    )]
    NoCompatibleGenerator { tried: Vec<String> },

    #[error("{step} failed: `{command}`\n{stderr}")]
    #[diagnostic(code(llvmlite_build::build::failed))]
    CompilationFailed {
        step: String,
        command: String,
        stderr: String,
    },

    #[error("build finished but `{}` was not produced", .path.display())]
    #[diagnostic(
        code(llvmlite_build::install::missing_artifact),
        help("the build description and the expected artifact name disagree")
    )]
    ArtifactNotFound { path: PathBuf },

    #[error("target directory `{}` does not exist", .path.display())]
    #[diagnostic(
        code(llvmlite_build::install::missing_target),
        help("pass --target-dir or create the directory first")
    )]
    TargetDirNotFound { path: PathBuf },

    #[error("invalid value `{value}` for {name}")]
    #[diagnostic(
        code(llvmlite_build::config::invalid_override),
        help("use an integer (0 disables) or one of true/false/yes/no/on/off")
    )]
    InvalidOverride { name: String, value: String },
}

impl BuildError {
    /// Short name of the failing stage, used in status output.
    pub fn stage(&self) -> &'static str {
        match self {
            BuildError::UnsupportedPlatform { .. } => "platform detection",
            BuildError::ToolchainNotFound { .. } => "toolchain probe",
            BuildError::UnsupportedToolchainVersion { .. } => "version check",
            BuildError::NoCompatibleGenerator { .. } => "generator probe",
            BuildError::CompilationFailed { .. } => "compilation",
            BuildError::ArtifactNotFound { .. } | BuildError::TargetDirNotFound { .. } => {
                "installation"
            }
            BuildError::InvalidOverride { .. } => "configuration",
        }
    }
}
