//! External process execution.
//!
//! Stages never spawn processes directly. They describe the command as an
//! [`Invocation`] and hand it to a [`CommandRunner`], which blocks (awaits)
//! until the process exits. [`SystemRunner`] inherits stdio so tool
//! diagnostics reach the operator unmodified.

use super::{
    error::{Error, Result},
    tool_detection,
};
use std::{
    fmt,
    path::{Path, PathBuf},
    process::Stdio,
};

/// A command line to run in a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
}

impl Invocation {
    /// Creates an invocation with no arguments.
    pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Exit status of a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    code: Option<i32>,
}

impl CommandOutcome {
    /// Exit code 0.
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    /// Exited with `code`.
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Terminated without an exit code (e.g. killed by a signal).
    pub fn terminated() -> Self {
        Self { code: None }
    }

    /// Exit code, if the process exited normally.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Whether the process exited with code 0.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for CommandOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exited with code {code}"),
            None => write!(f, "was terminated by a signal"),
        }
    }
}

/// Runs external processes for the pipeline.
///
/// Implementations must not return before the process has exited.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Resolve an executable on PATH.
    fn locate(&self, program: &str) -> Option<PathBuf> {
        tool_detection::locate(program)
    }

    /// Run `invocation` to completion and report its exit status.
    ///
    /// A non-zero exit is not an error at this level; stages decide what it means.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome>;
}

impl<R: CommandRunner> CommandRunner for &R {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        (**self).locate(program)
    }

    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
        (**self).run(invocation).await
    }
}

/// Spawns real processes with inherited stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
        let program = self
            .locate(&invocation.program)
            .ok_or_else(|| Error::ToolNotFound {
                tool: invocation.program.clone(),
                hint: tool_detection::install_hint(&invocation.program),
            })?;

        log::debug!("Running in {}: {}", invocation.cwd.display(), invocation);

        let status = tokio::process::Command::new(&program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|error| Error::CommandFailed {
                command: invocation.to_string(),
                error,
            })?;

        Ok(status.into())
    }
}
