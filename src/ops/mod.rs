//! High-level operations.
//!
//! These are the entry points used by the CLI commands.

pub mod clean;
pub mod pipeline;
pub mod plan;

pub use clean::{clean, CleanOptions};
pub use pipeline::{
    build, plan, select_pipeline, BuildPipeline, BuildReport, PosixPipeline, WindowsPipeline,
};
pub use plan::BuildPlan;
