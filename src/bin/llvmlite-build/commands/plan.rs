//! `llvmlite-build plan` command
//!
//! Runs the probing stages only; nothing is compiled or installed.

use anyhow::Result;

use llvmlite_build::ops;
use llvmlite_build::util::{Shell, SystemExecutor};

use super::build_context;
use crate::cli::PlanArgs;

pub fn execute(args: PlanArgs, shell: &Shell) -> Result<()> {
    let ctx = build_context(&args.common)?;

    let plan = ops::plan(&ctx, &SystemExecutor, shell)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", plan.to_human());
    }
    Ok(())
}
