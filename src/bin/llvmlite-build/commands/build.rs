//! `llvmlite-build build` command

use anyhow::Result;

use llvmlite_build::ops;
use llvmlite_build::util::shell::Status;
use llvmlite_build::util::{Shell, SystemExecutor};

use super::build_context;
use crate::cli::BuildArgs;

pub fn execute(args: BuildArgs, shell: &Shell) -> Result<()> {
    let ctx = build_context(&args.common)?;

    let report = ops::build(&ctx, &SystemExecutor, shell)?;

    let detail = match (report.llvm_version.as_deref(), report.generator.as_deref()) {
        (Some(version), _) => format!("LLVM {}", version),
        (None, Some(generator)) => generator.to_string(),
        (None, None) => report.platform.to_string(),
    };
    shell.status(
        Status::Finished,
        format!("{} for {} ({})", report.platform.library_file_name(), report.platform, detail),
    );
    Ok(())
}
