//! Error types for seqexec.
//!
//! Everything that can go wrong *before* a child has a disposition lives
//! here. A child that exits non-zero or dies by a signal is not an error of
//! the execution unit: it is reported as an
//! [`ExitDisposition`](crate::types::ExitDisposition) and the batch decides
//! what to do with it.
//!
//! ```rust
//! use seqexec_common::{ExecError, ExecResult};
//!
//! fn parse(line: &str) -> ExecResult<Vec<String>> {
//!     let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
//!     if tokens.is_empty() {
//!         return Err(ExecError::malformed_command(line));
//!     }
//!     Ok(tokens)
//! }
//!
//! assert!(parse("   ").is_err());
//! ```

use crate::types::EXIT_FAILURE;
use nix::errno::Errno;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for execution-unit operations.
pub type ExecResult<T> = std::result::Result<T, ExecError>;

/// Failures of a single invocation.
///
/// Every variant is fatal to the batch. The resource variants
/// (`SinkOpen`, `Spawn`, `Wait`) correspond to the C-era `perror` + `exit`
/// paths; the command variants are caught before anything is allocated.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The command line tokenized to nothing.
    #[error("Malformed command: {line:?} contains no program name")]
    MalformedCommand { line: String },

    /// More tokens than the configured argument limit.
    #[error("Too many arguments: {count} (limit: {limit})")]
    TooManyArguments { count: usize, limit: usize },

    /// An argument cannot be passed to exec (interior NUL byte).
    #[error("Invalid argument for exec: {arg:?}")]
    InvalidArgument { arg: String },

    /// A capture file could not be opened.
    #[error("Failed to open output sink {}: {source}", path.display())]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Process creation failed.
    #[error("Failed to fork process for {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: Errno,
    },

    /// The command input could not be read.
    #[error("Failed to read command input from {source_name}: {source}")]
    InputRead {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child failed.
    #[error("Failed to wait for child process {pid}: {source}")]
    Wait {
        pid: i32,
        #[source]
        source: Errno,
    },
}

impl ExecError {
    pub fn malformed_command(line: impl Into<String>) -> Self {
        Self::MalformedCommand { line: line.into() }
    }

    pub fn too_many_arguments(count: usize, limit: usize) -> Self {
        Self::TooManyArguments { count, limit }
    }

    pub fn invalid_argument(arg: impl Into<String>) -> Self {
        Self::InvalidArgument { arg: arg.into() }
    }

    pub fn sink_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SinkOpen {
            path: path.into(),
            source,
        }
    }

    pub fn spawn(program: impl Into<String>, source: Errno) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    pub fn input_read(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::InputRead {
            source_name: source_name.into(),
            source,
        }
    }

    pub fn wait(pid: i32, source: Errno) -> Self {
        Self::Wait { pid, source }
    }

    /// True for failures to acquire an OS resource (file, process, wait).
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            Self::SinkOpen { .. } | Self::Spawn { .. } | Self::Wait { .. } | Self::InputRead { .. }
        )
    }

    /// Process exit status the program terminates with for this error.
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}
