//! Core domain types shared by the execution unit and the batch driver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Exit status of a fully successful run.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status used for every fatal error of the executor itself.
pub const EXIT_FAILURE: i32 = 1;

/// Human-facing position of a command within its source.
///
/// Only used in progress messages; it carries no meaning for execution.
///
/// # Example
/// ```
/// use seqexec_common::CommandIndex;
///
/// let index = CommandIndex::first();
/// assert_eq!(index.get(), 1);
/// assert_eq!(index.next().to_string(), "2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandIndex(usize);

impl CommandIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Index of the first command in a source.
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for CommandIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for CommandIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal state of a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitDisposition {
    /// Normal exit with the given code.
    Exited(i32),
    /// Terminated by the given signal number.
    Signaled(i32),
}

impl ExitDisposition {
    /// True only for a normal exit with code 0.
    pub fn is_success(&self) -> bool {
        matches!(self, ExitDisposition::Exited(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitDisposition::Exited(code) => Some(*code),
            ExitDisposition::Signaled(_) => None,
        }
    }
}

impl fmt::Display for ExitDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitDisposition::Exited(code) => write!(f, "exited with exitcode = {}", code),
            ExitDisposition::Signaled(signal) => write!(f, "killed with signal {}", signal),
        }
    }
}

/// What the batch does when a child exits with a non-zero code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChildFailurePolicy {
    /// Abandon the remaining commands and exit with the child's code.
    #[default]
    Abort,
    /// Report the failure and carry on with the next command.
    Continue,
}

impl ChildFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChildFailurePolicy::Abort => "abort",
            ChildFailurePolicy::Continue => "continue",
        }
    }
}

impl fmt::Display for ChildFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record of one finished invocation.
///
/// Built once the child has been reaped; the sinks it names have already
/// been released by the time the caller sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitOutcome {
    pub index: CommandIndex,
    /// Program name for display; non-UTF-8 bytes are replaced.
    pub program: String,
    pub child_pid: i32,
    pub parent_pid: i32,
    pub disposition: ExitDisposition,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
    pub elapsed: Duration,
}
