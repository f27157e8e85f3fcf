//! Test utilities and mocks for unit tests.
//!
//! [`MockExecutor`] stands in for real child processes so every pipeline,
//! including the Windows one, can be exercised on any host.
//!
//! # Example
//!
//! ```rust,ignore
//! let exec = MockExecutor::new();
//! exec.expect("llvm-config --version", MockProcessOutput::success("6.0.0"));
//! let probe = ToolchainProbe::new("llvm-config", &exec);
//! ```

pub mod fixtures;

use std::io;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use crate::util::process::{ProcessBuilder, ProcessExecutor};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: Vec<u8>,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into().into_bytes(),
            stderr: String::new(),
        }
    }

    /// Create a successful output with raw stdout bytes.
    pub fn success_bytes(stdout: impl Into<Vec<u8>>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    fn to_output(&self) -> Output {
        Output {
            status: exit_status(self.status),
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone().into_bytes(),
        }
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

type Effect = Arc<dyn Fn(&ProcessBuilder) + Send + Sync>;

struct CommandExpectation {
    pattern: CommandPattern,
    output: MockProcessOutput,
    effect: Option<Effect>,
}

#[derive(Default)]
struct MockState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<ProcessBuilder>,
    default_output: Option<MockProcessOutput>,
}

/// Mock process executor.
///
/// Commands are matched against expectations in the order they were added.
/// A command matching nothing (and no default) fails to spawn, which is how
/// a missing tool looks to the caller.
#[derive(Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl MockExecutor {
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output, None)
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), output, None)
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Contains(substring.to_string()), output, None)
    }

    /// Add an expectation that also runs `effect` when matched, e.g. to
    /// create the file a build tool would have produced.
    pub fn expect_with<F>(&self, pattern: CommandPattern, output: MockProcessOutput, effect: F) -> &Self
    where
        F: Fn(&ProcessBuilder) + Send + Sync + 'static,
    {
        self.push(pattern, output, Some(Arc::new(effect)))
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.lock().default_output = Some(output);
        self
    }

    /// All commands that were run, in order.
    pub fn calls(&self) -> Vec<ProcessBuilder> {
        self.lock().calls.clone()
    }

    /// All commands that were run, as display strings.
    pub fn call_lines(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .map(ProcessBuilder::display_command)
            .collect()
    }

    fn push(&self, pattern: CommandPattern, output: MockProcessOutput, effect: Option<Effect>) -> &Self {
        self.lock().expectations.push(CommandExpectation {
            pattern,
            output,
            effect,
        });
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProcessExecutor for MockExecutor {
    fn exec(&self, cmd: &ProcessBuilder) -> io::Result<Output> {
        let line = cmd.display_command();

        let (output, effect) = {
            let mut state = self.lock();
            state.calls.push(cmd.clone());

            let matched = state
                .expectations
                .iter()
                .find(|exp| exp.pattern.matches(&line))
                .map(|exp| (exp.output.clone(), exp.effect.clone()));

            match matched {
                Some(found) => found,
                None => match state.default_output {
                    Some(ref default) => (default.clone(), None),
                    None => {
                        return Err(io::Error::new(
                            io::ErrorKind::NotFound,
                            format!("no such program: {}", cmd.get_program().display()),
                        ))
                    }
                },
            }
        };

        if let Some(effect) = effect {
            effect(cmd);
        }
        Ok(output.to_output())
    }
}
