//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use llvmlite_build::util::shell::ColorChoice;

/// Build and install llvmlite's native LLVM bridge
#[derive(Parser)]
#[command(name = "llvmlite-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe LLVM, build the bridge and install it
    Build(BuildArgs),

    /// Probe and validate LLVM, then show what `build` would run
    Plan(PlanArgs),

    /// Remove build outputs
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that works on a checkout.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Directory holding the bridge sources (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    pub ffi_dir: Option<PathBuf>,

    /// Directory to install the library into
    /// (defaults to <ffi-dir>/../llvmlite/binding)
    #[arg(long, value_name = "DIR")]
    pub target_dir: Option<PathBuf>,

    /// llvm-config executable (overrides LLVM_CONFIG)
    #[arg(long, value_name = "PATH")]
    pub llvm_config: Option<PathBuf>,

    /// make executable
    #[arg(long, value_name = "PATH")]
    pub make: Option<PathBuf>,

    /// cmake executable
    #[arg(long, value_name = "PATH")]
    pub cmake: Option<PathBuf>,

    /// Link the C++ runtime statically (overrides LLVMLITE_CXX_STATIC_LINK)
    #[arg(long)]
    pub static_link: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Also remove the installed library from the target directory
    #[arg(long)]
    pub installed: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build_options() {
        let cli = Cli::try_parse_from([
            "llvmlite-build",
            "build",
            "--ffi-dir",
            "ffi",
            "--llvm-config",
            "/opt/llvm/bin/llvm-config",
            "--static-link",
        ])
        .unwrap();

        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.common.ffi_dir, Some(PathBuf::from("ffi")));
                assert_eq!(
                    args.common.llvm_config,
                    Some(PathBuf::from("/opt/llvm/bin/llvm-config"))
                );
                assert!(args.common.static_link);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["llvmlite-build", "-q", "-v", "plan"]).is_err());
    }
}
