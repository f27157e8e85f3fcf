//! Native build invocation.

use anyhow::Result;

use crate::builder::context::{BuildContext, WINDOWS_BUILD_CONFIG};
use crate::builder::flags::BuildEnvironment;
use crate::core::platform::PlatformKind;
use crate::error::BuildError;
use crate::util::fs::ensure_dir;
use crate::util::process::{run_checked, ProcessBuilder, ProcessExecutor};

/// Drives make (POSIX) or cmake (Windows).
pub struct BuildExecutor<'a> {
    ctx: &'a BuildContext,
    executor: &'a dyn ProcessExecutor,
}

impl<'a> BuildExecutor<'a> {
    pub fn new(ctx: &'a BuildContext, executor: &'a dyn ProcessExecutor) -> Self {
        BuildExecutor { ctx, executor }
    }

    /// `make -f Makefile.<tag>` in the FFI directory with the flags exported
    /// to the child.
    pub fn make_command(&self, platform: PlatformKind, env: &BuildEnvironment) -> ProcessBuilder {
        let makefile = format!("Makefile.{}", platform.makefile_tag());
        let mut cmd = ProcessBuilder::new(&self.ctx.make)
            .arg("-f")
            .arg(makefile)
            .cwd(&self.ctx.ffi_dir);

        for (key, value) in env.vars() {
            cmd = cmd.env(key, value);
        }
        cmd
    }

    /// Run the POSIX build.
    pub fn build_posix(&self, platform: PlatformKind, env: &BuildEnvironment) -> Result<(), BuildError> {
        let cmd = self.make_command(platform, env);
        self.run("make", &cmd)
    }

    /// `cmake -G <generator> <ffi dir>`, run inside the staging directory.
    pub fn configure_command(&self, generator: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.ctx.cmake)
            .arg("-G")
            .arg(generator)
            .arg(&self.ctx.ffi_dir)
            .cwd(self.ctx.staging_dir())
    }

    /// `cmake --build <staging> --config Release`.
    pub fn cmake_build_command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.ctx.cmake)
            .arg("--build")
            .arg(self.ctx.staging_dir())
            .arg("--config")
            .arg(WINDOWS_BUILD_CONFIG)
    }

    /// Configure the CMake project into the staging directory, creating it
    /// if needed.
    pub fn configure_windows(&self, generator: &str) -> Result<()> {
        ensure_dir(&self.ctx.staging_dir())?;
        self.run("cmake configure", &self.configure_command(generator))?;
        Ok(())
    }

    /// Build the configured project in Release.
    pub fn compile_windows(&self) -> Result<(), BuildError> {
        self.run("cmake build", &self.cmake_build_command())
    }

    fn run(&self, step: &str, cmd: &ProcessBuilder) -> Result<(), BuildError> {
        let output = run_checked(self.executor, cmd, |failure| {
            BuildError::CompilationFailed {
                step: step.to_string(),
                stderr: if failure.stderr.is_empty() {
                    failure.describe()
                } else {
                    failure.stderr.clone()
                },
                command: failure.command,
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!("{} output:\n{}", step, stdout.trim_end());
        }
        Ok(())
    }
}
