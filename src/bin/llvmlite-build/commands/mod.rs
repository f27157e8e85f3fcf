//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod plan;

use anyhow::{Context, Result};

use llvmlite_build::util::config::{global_config_path, load_config, project_config_path};
use llvmlite_build::util::EnvOverrides;
use llvmlite_build::BuildContext;

use crate::cli::CommonArgs;

/// Build the context for a command.
///
/// Precedence, lowest to highest: global config, project config,
/// environment, command line.
pub fn build_context(args: &CommonArgs) -> Result<BuildContext> {
    let ffi_dir = match args.ffi_dir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir().context("failed to read the current directory")?,
    };

    let global = global_config_path();
    let mut config = load_config(global.as_deref(), &project_config_path(&ffi_dir));
    config.apply_env(&EnvOverrides::from_env())?;

    let mut ctx = BuildContext::from_config(ffi_dir, &config);

    if let Some(ref target_dir) = args.target_dir {
        ctx.target_dir = target_dir.clone();
    }
    if let Some(ref llvm_config) = args.llvm_config {
        ctx.llvm_config = llvm_config.clone();
    }
    if let Some(ref make) = args.make {
        ctx.make = make.clone();
    }
    if let Some(ref cmake) = args.cmake {
        ctx.cmake = cmake.clone();
    }
    if args.static_link {
        ctx.cxx_static_link = true;
    }

    // make and cmake run in other directories; relative paths given on the
    // command line are relative to where the user ran us.
    let ctx = ctx.resolve()?;
    tracing::debug!("build context: {:?}", ctx);
    Ok(ctx)
}
