//! CMake generator discovery (Windows).
//!
//! CMake cannot tell which Visual Studio release LLVM was compiled with, so
//! candidates are tried in priority order against a tiny probe project until
//! one configures successfully.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::BuildError;
use crate::util::process::{run_checked, ProcessBuilder, ProcessExecutor};

/// Generators tried when none are configured. LLVM 4.0+ needs VS 2015.
pub const DEFAULT_GENERATORS: &[&str] = &["Visual Studio 14 2015"];

/// Suffix selecting the 64-bit variant of a Visual Studio generator.
pub const WIN64_SUFFIX: &str = " Win64";

/// Whether the host is 64-bit.
pub fn host_is_64bit() -> bool {
    cfg!(target_pointer_width = "64")
}

/// Build the candidate list, widened to the 64-bit variants when needed.
pub fn candidate_generators(configured: &[String], is_64bit: bool) -> Vec<String> {
    let base: Vec<String> = if configured.is_empty() {
        DEFAULT_GENERATORS.iter().map(|g| g.to_string()).collect()
    } else {
        configured.to_vec()
    };

    base.into_iter()
        .map(|g| if is_64bit { format!("{}{}", g, WIN64_SUFFIX) } else { g })
        .collect()
}

/// Trial-configures a probe project with each candidate generator.
pub struct GeneratorProbe<'a> {
    cmake: PathBuf,
    probe_project: PathBuf,
    scratch_root: PathBuf,
    executor: &'a dyn ProcessExecutor,
}

impl<'a> GeneratorProbe<'a> {
    pub fn new(
        cmake: impl Into<PathBuf>,
        probe_project: impl Into<PathBuf>,
        executor: &'a dyn ProcessExecutor,
    ) -> Self {
        GeneratorProbe {
            cmake: cmake.into(),
            probe_project: probe_project.into(),
            scratch_root: std::env::temp_dir(),
            executor,
        }
    }

    /// Create the scratch directories under `root` instead of the system
    /// temp directory.
    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    /// Return the first candidate that configures successfully.
    ///
    /// Each attempt owns a fresh temporary directory that is removed before
    /// the next attempt starts, whatever the outcome.
    pub fn find(&self, candidates: &[String]) -> anyhow::Result<String> {
        for generator in candidates {
            tracing::info!("Trying generator {:?}", generator);

            let scratch = tempfile::Builder::new()
                .prefix("llvmlite-generator-")
                .tempdir_in(&self.scratch_root)?;

            let outcome = self.try_generator(generator, scratch.path());
            discard(scratch);

            if outcome? {
                return Ok(generator.clone());
            }
        }

        Err(BuildError::NoCompatibleGenerator {
            tried: candidates.to_vec(),
        }
        .into())
    }

    /// `Ok(false)` when cmake ran and rejected the generator. A cmake that
    /// cannot be started at all is an error, not a rejection.
    fn try_generator(&self, generator: &str, build_dir: &Path) -> Result<bool, BuildError> {
        let cmd = ProcessBuilder::new(&self.cmake)
            .arg("-G")
            .arg(generator)
            .arg(&self.probe_project)
            .cwd(build_dir);

        let mut not_started = false;
        let result = run_checked(self.executor, &cmd, |failure| {
            not_started = failure.spawn_error.is_some();
            BuildError::CompilationFailed {
                step: "generator probe".to_string(),
                stderr: failure.describe(),
                command: failure.command,
            }
        });

        match result {
            Ok(_) => Ok(true),
            Err(e) if not_started => Err(e),
            Err(e) => {
                tracing::debug!("generator {:?} rejected: {}", generator, e);
                Ok(false)
            }
        }
    }
}

fn discard(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        tracing::warn!("failed to remove {}: {}", path.display(), e);
    }
}
