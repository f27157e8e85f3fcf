//! `llvmlite-build clean` command

use anyhow::Result;

use llvmlite_build::ops::{clean, CleanOptions};
use llvmlite_build::util::shell::Status;
use llvmlite_build::util::Shell;

use super::build_context;
use crate::cli::CleanArgs;

pub fn execute(args: CleanArgs, shell: &Shell) -> Result<()> {
    let ctx = build_context(&args.common)?;

    let removed = clean(
        &ctx,
        CleanOptions {
            installed: args.installed,
        },
    )?;

    if removed.is_empty() {
        shell.status(Status::Info, "nothing to clean");
    }
    for path in removed {
        shell.status(Status::Removed, path.display());
    }
    Ok(())
}
