//! Shared utilities

pub mod config;
pub mod fs;
pub mod process;
pub mod shell;

pub use config::{Config, EnvOverrides};
pub use process::{ProcessBuilder, ProcessExecutor, SystemExecutor};
pub use shell::Shell;
