//! Process execution primitives.
//!
//! Spawning is done with `fork` + `execvp` rather than `std::process::Command`:
//! when exec fails the child reports it on its own (redirected) stderr and
//! exits with `EXIT_FAILURE`, so the parent sees an ordinary exit status and
//! cannot tell "program not found" from "program ran and failed".

use crate::report::{write_outcome, write_started};
use crate::sinks::OutputSinks;
use crate::tokenize::{ArgumentVector, DEFAULT_MAX_ARGS};
use nix::errno::Errno;
use nix::libc;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{dup2, fork, getpid, write, ForkResult, Pid};
use seqexec_common::{
    CommandIndex, ExecError, ExecResult, ExitDisposition, ExitOutcome, EXIT_FAILURE,
};
use std::ffi::{CString, OsStr};
use std::fmt;
use std::io::{self, Write};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::ptr;
use std::time::Instant;
use tracing::{debug, warn};

/// Message the child writes to its stderr sink when exec fails.
const EXEC_FAILURE_PREFIX: &[u8] = b"Failed to execute command: ";

/// Message the child writes to its stderr sink when redirection fails.
const REDIRECT_FAILURE_PREFIX: &[u8] = b"Failed to redirect output: ";

/// Lifecycle of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Tokenizing,
    SinksOpening,
    Spawned,
    Waiting,
    Reported,
    SinksReleased,
    FatalAbort,
}

impl InvocationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationState::Tokenizing => "tokenizing",
            InvocationState::SinksOpening => "sinks_opening",
            InvocationState::Spawned => "spawned",
            InvocationState::Waiting => "waiting",
            InvocationState::Reported => "reported",
            InvocationState::SinksReleased => "sinks_released",
            InvocationState::FatalAbort => "fatal_abort",
        }
    }
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn enter(index: CommandIndex, state: InvocationState) {
    debug!(command = %index, state = %state, "Invocation state");
}

/// Runs command lines one at a time, capturing output into `<pid>.out` and
/// `<pid>.err` under `output_dir`.
#[derive(Debug, Clone)]
pub struct Executor {
    output_dir: PathBuf,
    max_args: usize,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Executor {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_args: DEFAULT_MAX_ARGS,
        }
    }

    pub fn with_max_args(mut self, max_args: usize) -> Self {
        self.max_args = max_args;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn max_args(&self) -> usize {
        self.max_args
    }

    /// Execute `line`, printing progress to this process's stdout.
    pub fn execute<S: AsRef<OsStr> + ?Sized>(
        &self,
        line: &S,
        index: CommandIndex,
    ) -> ExecResult<ExitOutcome> {
        self.execute_with_console(line, index, &mut io::stdout())
    }

    /// Execute `line`, printing progress to `console`.
    ///
    /// Blocks until the child has exited or been killed. Returns `Err` only
    /// for malformed commands and resource failures; a non-zero exit or a
    /// signal is an `Ok` outcome for the caller to act on.
    pub fn execute_with_console<S: AsRef<OsStr> + ?Sized, W: Write>(
        &self,
        line: &S,
        index: CommandIndex,
        console: &mut W,
    ) -> ExecResult<ExitOutcome> {
        self.run_invocation(line, index, console).map_err(|e| {
            enter(index, InvocationState::FatalAbort);
            e
        })
    }

    fn run_invocation<S: AsRef<OsStr> + ?Sized, W: Write>(
        &self,
        line: &S,
        index: CommandIndex,
        console: &mut W,
    ) -> ExecResult<ExitOutcome> {
        enter(index, InvocationState::Tokenizing);
        let argv = ArgumentVector::parse(line, self.max_args)?;
        let c_args = argv.to_c_args()?;
        let program = argv.program().to_string_lossy().into_owned();

        enter(index, InvocationState::SinksOpening);
        let parent = getpid();
        let sinks = OutputSinks::open(&self.output_dir, parent.as_raw())?;

        // Anything still buffered would otherwise be flushed twice.
        if let Err(e) = console.flush() {
            warn!("Failed to flush console before spawn: {}", e);
        }

        let started_at = Instant::now();
        let child = spawn(&program, &c_args, &sinks)?;
        enter(index, InvocationState::Spawned);
        if let Err(e) = write_started(console, index, child.as_raw(), parent.as_raw()) {
            warn!("Failed to write progress line: {}", e);
        }

        enter(index, InvocationState::Waiting);
        let disposition = wait_for_child(child)?;

        let outcome = ExitOutcome {
            index,
            program,
            child_pid: child.as_raw(),
            parent_pid: parent.as_raw(),
            disposition,
            stdout_path: sinks.stdout_path().to_path_buf(),
            stderr_path: sinks.stderr_path().to_path_buf(),
            elapsed: started_at.elapsed(),
        };
        if let Err(e) = write_outcome(console, &outcome) {
            warn!("Failed to write completion lines: {}", e);
        }
        enter(index, InvocationState::Reported);

        sinks.release();
        enter(index, InvocationState::SinksReleased);

        debug!(
            command = %index,
            program = %outcome.program,
            pid = outcome.child_pid,
            success = outcome.disposition.is_success(),
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "Invocation {}",
            outcome.disposition
        );
        Ok(outcome)
    }
}

/// NULL-terminated pointer array over `c_args`, for `execvp`.
fn exec_argv(c_args: &[CString]) -> Vec<*const libc::c_char> {
    c_args
        .iter()
        .map(|arg| arg.as_ptr())
        .chain(std::iter::once(ptr::null()))
        .collect()
}

/// Fork a child that runs `c_args` with stdout/stderr redirected to `sinks`.
fn spawn(program: &str, c_args: &[CString], sinks: &OutputSinks) -> ExecResult<Pid> {
    let argv = exec_argv(c_args);

    // SAFETY: between fork and exec the child only calls dup2, execvp, write
    // and _exit, and does not allocate: `argv` and the strings it points into
    // are built before the fork.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => Ok(child),
        Ok(ForkResult::Child) => exec_child(&argv, sinks),
        Err(errno) => Err(ExecError::spawn(program, errno)),
    }
}

fn exec_child(argv: &[*const libc::c_char], sinks: &OutputSinks) -> ! {
    let redirected = dup2(sinks.stdout().as_raw_fd(), libc::STDOUT_FILENO)
        .and_then(|_| dup2(sinks.stderr().as_raw_fd(), libc::STDERR_FILENO));
    if let Err(errno) = redirected {
        child_fail(sinks, REDIRECT_FAILURE_PREFIX, errno);
    }

    // SAFETY: `argv` is NULL-terminated and points into CStrings owned by the
    // caller, which outlive this call. execvp only returns on failure.
    unsafe { libc::execvp(argv[0], argv.as_ptr()) };
    child_fail(sinks, EXEC_FAILURE_PREFIX, Errno::last())
}

/// Report `errno` on the stderr sink and leave the child with `EXIT_FAILURE`.
fn child_fail(sinks: &OutputSinks, prefix: &[u8], errno: Errno) -> ! {
    let _ = write(sinks.stderr(), prefix);
    let _ = write(sinks.stderr(), errno.desc().as_bytes());
    let _ = write(sinks.stderr(), b"\n");

    // SAFETY: _exit skips atexit handlers and stdio flushing, which must not
    // run in a forked copy of the parent.
    unsafe { libc::_exit(EXIT_FAILURE) }
}

/// Block until `child` exits or is killed by a signal.
///
/// Only `child` is reaped. Interrupted waits are retried.
pub fn wait_for_child(child: Pid) -> ExecResult<ExitDisposition> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ExitDisposition::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                return Ok(ExitDisposition::Signaled(signal as i32))
            }
            Ok(status) => {
                debug!(pid = child.as_raw(), ?status, "Ignoring non-terminal wait status");
            }
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(ExecError::wait(child.as_raw(), errno)),
        }
    }
}
