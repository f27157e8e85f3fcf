//! Bridge build stages.
//!
//! Each stage is usable on its own; `ops::pipeline` sequences them.

pub mod context;
pub mod executor;
pub mod flags;
pub mod generator;
pub mod install;
pub mod toolchain;

pub use context::BuildContext;
pub use executor::BuildExecutor;
pub use flags::{assemble, BuildEnvironment};
pub use generator::GeneratorProbe;
pub use install::install_artifact;
pub use toolchain::{check_version, ToolchainInfo, ToolchainProbe};
