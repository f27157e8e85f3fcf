//! Build plan reporting.
//!
//! A BuildPlan describes what `build` would run once the toolchain has been
//! probed and validated: the platform, the directories involved, the exact
//! commands and the environment handed to them.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::builder::context::BuildContext;
use crate::builder::flags::BuildEnvironment;
use crate::builder::install::built_artifact_path;
use crate::core::platform::PlatformKind;

/// A complete build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub platform: PlatformKind,

    /// Directory holding the bridge sources
    pub ffi_dir: PathBuf,

    /// Directory the library is installed into
    pub target_dir: PathBuf,

    /// llvm-config used (POSIX)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llvm_config: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub llvm_version: Option<String>,

    /// Flags exported to make (POSIX)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<BuildEnvironment>,

    /// Generator selected by probing (Windows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,

    /// Native build commands in execution order
    pub commands: Vec<String>,

    /// Where the native build leaves the library
    pub artifact: PathBuf,

    /// Where the library is installed
    pub installed: PathBuf,
}

impl BuildPlan {
    /// An empty plan for `platform`; pipelines fill in what they learned.
    pub fn new(platform: PlatformKind, ctx: &BuildContext) -> Self {
        BuildPlan {
            platform,
            ffi_dir: ctx.ffi_dir.clone(),
            target_dir: ctx.target_dir.clone(),
            llvm_config: None,
            llvm_version: None,
            environment: None,
            generator: None,
            commands: Vec::new(),
            artifact: built_artifact_path(ctx, platform),
            installed: ctx.target_dir.join(platform.library_file_name()),
        }
    }

    /// Render the plan for a terminal.
    pub fn to_human(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "platform:    {}", self.platform);
        let _ = writeln!(out, "ffi dir:     {}", self.ffi_dir.display());
        let _ = writeln!(out, "target dir:  {}", self.target_dir.display());
        if let Some(ref llvm_config) = self.llvm_config {
            let _ = writeln!(out, "llvm-config: {}", llvm_config.display());
        }
        if let Some(ref version) = self.llvm_version {
            let _ = writeln!(out, "LLVM:        {}", version);
        }
        if let Some(ref generator) = self.generator {
            let _ = writeln!(out, "generator:   {}", generator);
        }

        if let Some(ref env) = self.environment {
            out.push_str("\nenvironment:\n");
            for (key, value) in env.vars() {
                let _ = writeln!(out, "  {}={}", key, value);
            }
        }

        out.push_str("\ncommands:\n");
        for cmd in &self.commands {
            let _ = writeln!(out, "  {}", cmd);
        }

        let _ = write!(
            out,
            "\ninstall:\n  {} -> {}\n",
            self.artifact.display(),
            self.installed.display()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::flags::assemble;

    fn posix_plan() -> BuildPlan {
        let ctx = BuildContext::new("/src/ffi");
        let mut plan = BuildPlan::new(PlatformKind::Linux, &ctx);
        plan.llvm_config = Some(PathBuf::from("/usr/bin/llvm-config"));
        plan.llvm_version = Some("6.0.0".to_string());
        plan.environment = Some(assemble("-lLLVM", "-O2", "-L/lib", false));
        plan.commands.push("make -f Makefile.linux".to_string());
        plan
    }

    #[test]
    fn test_new_plan_paths() {
        let ctx = BuildContext::new("/src/ffi");
        let plan = BuildPlan::new(PlatformKind::Windows, &ctx);

        assert_eq!(plan.artifact, PathBuf::from("/src/ffi/build/Release/llvmlite.dll"));
        assert_eq!(plan.installed, PathBuf::from("/src/llvmlite/binding/llvmlite.dll"));
        assert!(plan.commands.is_empty());
    }

    #[test]
    fn test_human_rendering() {
        let text = posix_plan().to_human();

        assert!(text.contains("platform:    linux"));
        assert!(text.contains("LLVM:        6.0.0"));
        assert!(text.contains("  LLVM_CXXFLAGS=-O2 -fno-rtti -g"));
        assert!(text.contains("  make -f Makefile.linux"));
        assert!(text.contains("/src/ffi/libllvmlite.so -> /src/llvmlite/binding/libllvmlite.so"));
        assert!(!text.contains("generator:"));
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let ctx = BuildContext::new("/src/ffi");
        let mut plan = BuildPlan::new(PlatformKind::Windows, &ctx);
        plan.generator = Some("Visual Studio 14 2015 Win64".to_string());

        let json: serde_json::Value = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["platform"], "windows");
        assert_eq!(json["generator"], "Visual Studio 14 2015 Win64");
        assert!(json.get("environment").is_none());
        assert!(json.get("llvm_version").is_none());
    }

    #[test]
    fn test_json_environment() {
        let json: serde_json::Value = serde_json::to_value(posix_plan()).unwrap();

        assert_eq!(json["environment"]["llvm_libs"], "-lLLVM");
        assert_eq!(json["environment"]["llvm_cxxflags"][2], "-g");
        assert!(json["environment"]["cxx_static_link"].is_null());
    }
}
