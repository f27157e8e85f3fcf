//! Subprocess execution utilities.
//!
//! Every external tool invocation (llvm-config queries, make, cmake) goes
//! through [`ProcessBuilder`] and a [`ProcessExecutor`], and failures are
//! turned into a [`BuildError`] by [`run_checked`] so all stages report
//! failures the same way.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::error::BuildError;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable for the child only.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the extra environment passed to the child.
    pub fn get_env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and wait for completion, capturing both streams.
    pub fn exec(&self) -> io::Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.output()
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Runs a prepared [`ProcessBuilder`].
///
/// The system implementation spawns real processes; tests substitute a mock.
/// An `Err` means the process could not be started at all.
pub trait ProcessExecutor {
    fn exec(&self, cmd: &ProcessBuilder) -> io::Result<Output>;
}

/// Executor that spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn exec(&self, cmd: &ProcessBuilder) -> io::Result<Output> {
        cmd.exec()
    }
}

/// Why a checked invocation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessFailure {
    /// The command line, for display.
    pub command: String,
    /// Exit code, when the process ran and exited with one.
    pub code: Option<i32>,
    /// Captured standard error (empty if the process never started).
    pub stderr: String,
    /// Spawn error, when the process could not be started.
    pub spawn_error: Option<String>,
}

impl ProcessFailure {
    /// One-line-plus-stderr description used in error messages.
    pub fn describe(&self) -> String {
        if let Some(ref err) = self.spawn_error {
            return err.clone();
        }
        let code = match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        if self.stderr.trim().is_empty() {
            code
        } else {
            format!("{}; stderr follows:\n{}", code, self.stderr.trim_end())
        }
    }
}

/// Run a command and require a zero exit status.
///
/// `on_failure` decides which [`BuildError`] a failure becomes, so each call
/// site names its own stage while the capture logic stays in one place.
pub fn run_checked<F>(
    executor: &dyn ProcessExecutor,
    cmd: &ProcessBuilder,
    on_failure: F,
) -> Result<Output, BuildError>
where
    F: FnOnce(ProcessFailure) -> BuildError,
{
    let command = cmd.display_command();
    tracing::debug!("running `{}`", command);

    let output = match executor.exec(cmd) {
        Ok(output) => output,
        Err(e) => {
            return Err(on_failure(ProcessFailure {
                command,
                code: None,
                stderr: String::new(),
                spawn_error: Some(format!("failed to spawn: {}", e)),
            }))
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::debug!("`{}` exited with {:?}", command, output.status.code());
        return Err(on_failure(ProcessFailure {
            command,
            code: output.status.code(),
            stderr,
            spawn_error: None,
        }));
    }

    Ok(output)
}

/// Decode bytes as latin-1, mapping each byte to the code point of equal
/// value. Never fails, whatever the tool's locale.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Whether `tool` is a plain program name (`make`) rather than a path.
pub fn is_bare_name(tool: &Path) -> bool {
    tool.components().count() == 1 && !tool.has_root()
}

/// Resolve a tool given by name or path.
///
/// Bare names are looked up on PATH; if the lookup fails the name is returned
/// unchanged so the spawn error surfaces at the stage that needs the tool.
pub fn resolve_tool(tool: &Path) -> PathBuf {
    if !is_bare_name(tool) {
        return tool.to_path_buf();
    }
    tool.to_str()
        .and_then(find_executable)
        .unwrap_or_else(|| tool.to_path_buf())
}
