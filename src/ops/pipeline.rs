//! Build pipelines and platform dispatch.
//!
//! Every platform runs the same sequence:
//! `probe -> validate -> assemble -> build -> install`. Each stage must
//! complete before the next one starts; [`BuildPipeline::run`] is the only
//! place that sequencing is written down.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::builder::context::{BuildContext, WINDOWS_BUILD_CONFIG};
use crate::builder::executor::BuildExecutor;
use crate::builder::flags::{assemble_from, BuildEnvironment};
use crate::builder::generator::{candidate_generators, GeneratorProbe};
use crate::builder::install::install_artifact;
use crate::builder::toolchain::{check_version, ToolchainProbe};
use crate::core::platform::PlatformKind;
use crate::error::BuildError;
use crate::ops::plan::BuildPlan;
use crate::util::process::ProcessExecutor;
use crate::util::shell::{format_duration, Shell, Status};

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub platform: PlatformKind,
    /// Where the library was installed
    pub artifact: PathBuf,
    /// llvm-config's version (POSIX)
    pub llvm_version: Option<String>,
    /// CMake generator used (Windows)
    pub generator: Option<String>,
}

/// One platform's way of building the bridge.
pub trait BuildPipeline {
    fn platform(&self) -> PlatformKind;

    /// Discover the external tooling.
    fn probe(&mut self, shell: &Shell) -> Result<()>;

    /// Reject tooling the bridge cannot be built with.
    fn validate(&self) -> Result<()>;

    /// Derive the inputs of the native build.
    fn assemble(&mut self, shell: &Shell) -> Result<()>;

    /// Run the native build.
    fn build(&self, shell: &Shell) -> Result<()>;

    /// Install the artifact, returning its installed path.
    fn install(&self) -> Result<PathBuf>;

    /// Describe what `build` and `install` will do. Valid after `prepare`.
    fn plan(&self) -> BuildPlan;

    fn report(&self, artifact: PathBuf) -> BuildReport;

    /// Run every stage up to, but not including, the native build.
    fn prepare(&mut self, shell: &Shell) -> Result<()> {
        self.probe(shell)?;
        self.validate()?;
        self.assemble(shell)?;
        Ok(())
    }

    /// Run the whole pipeline.
    fn run(&mut self, shell: &Shell) -> Result<BuildReport> {
        self.prepare(shell)?;
        self.build(shell)?;
        let artifact = self.install()?;
        shell.status(Status::Installed, artifact.display());
        Ok(self.report(artifact))
    }
}

fn out_of_order(stage: &str) -> anyhow::Error {
    anyhow!("pipeline stage `{}` ran before its prerequisites", stage)
}

/// Build with llvm-config and make (Linux, FreeBSD, macOS).
pub struct PosixPipeline<'a> {
    platform: PlatformKind,
    ctx: &'a BuildContext,
    executor: &'a dyn ProcessExecutor,
    version: Option<String>,
    env: Option<BuildEnvironment>,
}

impl<'a> PosixPipeline<'a> {
    pub fn new(platform: PlatformKind, ctx: &'a BuildContext, executor: &'a dyn ProcessExecutor) -> Self {
        PosixPipeline {
            platform,
            ctx,
            executor,
            version: None,
            env: None,
        }
    }

    fn toolchain(&self) -> ToolchainProbe<'a> {
        ToolchainProbe::new(&self.ctx.llvm_config, self.executor)
    }

    /// The flags handed to make, once assembled.
    pub fn environment(&self) -> Option<&BuildEnvironment> {
        self.env.as_ref()
    }
}

impl BuildPipeline for PosixPipeline<'_> {
    fn platform(&self) -> PlatformKind {
        self.platform
    }

    fn probe(&mut self, shell: &Shell) -> Result<()> {
        shell.status(Status::Probing, format!("{} --version", self.ctx.llvm_config.display()));
        let version = self.toolchain().probe_version()?;
        tracing::info!("LLVM version... {}", version.trim_end());
        self.version = Some(version);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let version = self.version.as_deref().ok_or_else(|| out_of_order("validate"))?;
        check_version(version)?;
        Ok(())
    }

    fn assemble(&mut self, shell: &Shell) -> Result<()> {
        let version = self.version.clone().ok_or_else(|| out_of_order("assemble"))?;
        shell.status(Status::Checking, format!("LLVM {} flags", version.trim_end()));

        let info = self.toolchain().probe_all(version)?;
        let env = assemble_from(&info, self.ctx.cxx_static_link);
        for (key, value) in env.vars() {
            tracing::debug!("{}={}", key, value);
        }
        self.env = Some(env);
        Ok(())
    }

    fn build(&self, shell: &Shell) -> Result<()> {
        let env = self.env.as_ref().ok_or_else(|| out_of_order("build"))?;
        let spinner = shell.spinner(
            Status::Building,
            format!("{} (Makefile.{})", self.platform.library_file_name(), self.platform.makefile_tag()),
        );
        BuildExecutor::new(self.ctx, self.executor).build_posix(self.platform, env)?;
        let elapsed = spinner.finish();
        shell.status(Status::Finished, format!("make in {}", format_duration(elapsed)));
        Ok(())
    }

    fn install(&self) -> Result<PathBuf> {
        install_artifact(self.ctx, self.platform)
    }

    fn plan(&self) -> BuildPlan {
        let mut plan = BuildPlan::new(self.platform, self.ctx);
        plan.llvm_config = Some(self.ctx.llvm_config.clone());
        plan.llvm_version = self.version.as_ref().map(|v| v.trim_end().to_string());
        if let Some(ref env) = self.env {
            let cmd = BuildExecutor::new(self.ctx, self.executor).make_command(self.platform, env);
            plan.commands.push(cmd.display_command());
            plan.environment = Some(env.clone());
        }
        plan
    }

    fn report(&self, artifact: PathBuf) -> BuildReport {
        BuildReport {
            platform: self.platform,
            artifact,
            llvm_version: self.version.as_ref().map(|v| v.trim_end().to_string()),
            generator: None,
        }
    }
}

/// Build with CMake and Visual Studio.
pub struct WindowsPipeline<'a> {
    ctx: &'a BuildContext,
    executor: &'a dyn ProcessExecutor,
    generator: Option<String>,
}

impl<'a> WindowsPipeline<'a> {
    pub fn new(ctx: &'a BuildContext, executor: &'a dyn ProcessExecutor) -> Self {
        WindowsPipeline {
            ctx,
            executor,
            generator: None,
        }
    }

    /// The generator chosen by the probe.
    pub fn generator(&self) -> Option<&str> {
        self.generator.as_deref()
    }
}

impl BuildPipeline for WindowsPipeline<'_> {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Windows
    }

    fn probe(&mut self, shell: &Shell) -> Result<()> {
        let candidates = candidate_generators(&self.ctx.generators, self.ctx.is_64bit);
        shell.status(Status::Probing, format!("{} cmake generator(s)", candidates.len()));

        let generator = GeneratorProbe::new(&self.ctx.cmake, self.ctx.probe_project_dir(), self.executor)
            .scratch_root(&self.ctx.scratch_root)
            .find(&candidates)?;
        tracing::info!("Using generator {:?}", generator);
        self.generator = Some(generator);
        Ok(())
    }

    // The CMake project finds LLVM itself; there is no version to check or
    // flags to assemble.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn assemble(&mut self, shell: &Shell) -> Result<()> {
        if self.ctx.cxx_static_link {
            shell.warn("static linking of the C++ runtime is not supported by the CMake build; ignoring");
        }
        Ok(())
    }

    fn build(&self, shell: &Shell) -> Result<()> {
        let generator = self.generator.as_deref().ok_or_else(|| out_of_order("build"))?;
        let executor = BuildExecutor::new(self.ctx, self.executor);

        let spinner = shell.spinner(Status::Configuring, format!("{} ({})", self.ctx.ffi_dir.display(), generator));
        executor.configure_windows(generator)?;
        let configured = spinner.finish();

        let spinner = shell.spinner(Status::Building, format!("llvmlite.dll ({})", WINDOWS_BUILD_CONFIG));
        executor.compile_windows()?;
        let elapsed = configured + spinner.finish();
        shell.status(Status::Finished, format!("cmake in {}", format_duration(elapsed)));
        Ok(())
    }

    fn install(&self) -> Result<PathBuf> {
        install_artifact(self.ctx, PlatformKind::Windows)
    }

    fn plan(&self) -> BuildPlan {
        let mut plan = BuildPlan::new(PlatformKind::Windows, self.ctx);
        plan.generator = self.generator.clone();
        if let Some(ref generator) = self.generator {
            let executor = BuildExecutor::new(self.ctx, self.executor);
            plan.commands.push(executor.configure_command(generator).display_command());
            plan.commands.push(executor.cmake_build_command().display_command());
        }
        plan
    }

    fn report(&self, artifact: PathBuf) -> BuildReport {
        BuildReport {
            platform: PlatformKind::Windows,
            artifact,
            llvm_version: None,
            generator: self.generator.clone(),
        }
    }
}

/// Pick the pipeline for an OS identifier.
///
/// Nothing is spawned or touched on disk before a pipeline is selected, so an
/// unsupported platform fails without side effects.
pub fn select_pipeline<'a>(
    os: &str,
    ctx: &'a BuildContext,
    executor: &'a dyn ProcessExecutor,
) -> Result<Box<dyn BuildPipeline + 'a>, BuildError> {
    let platform = PlatformKind::from_os(os)?;
    tracing::debug!("selected {} pipeline", platform);

    Ok(match platform {
        PlatformKind::Windows => Box::new(WindowsPipeline::new(ctx, executor)),
        _ => Box::new(PosixPipeline::new(platform, ctx, executor)),
    })
}

/// Build and install the bridge for the host platform.
pub fn build(ctx: &BuildContext, executor: &dyn ProcessExecutor, shell: &Shell) -> Result<BuildReport> {
    let mut pipeline = select_pipeline(std::env::consts::OS, ctx, executor)?;
    pipeline.run(shell)
}

/// Run the preparatory stages for the host platform and describe the build.
pub fn plan(ctx: &BuildContext, executor: &dyn ProcessExecutor, shell: &Shell) -> Result<BuildPlan> {
    let mut pipeline = select_pipeline(std::env::consts::OS, ctx, executor)?;
    pipeline.prepare(shell)?;
    Ok(pipeline.plan())
}
