//! Capture files for a child's stdout and stderr.

use seqexec_common::{ExecError, ExecResult};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Creation mode for sink files, before the umask is applied.
pub const SINK_MODE: u32 = 0o777;

/// Paths of the stdout and stderr sinks for process `pid` inside `dir`.
///
/// ```
/// use seqexec_process::sink_paths;
/// use std::path::Path;
///
/// let (out, err) = sink_paths(Path::new("/tmp"), 4242);
/// assert_eq!(out, Path::new("/tmp/4242.out"));
/// assert_eq!(err, Path::new("/tmp/4242.err"));
/// ```
pub fn sink_paths(dir: &Path, pid: i32) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{}.out", pid)),
        dir.join(format!("{}.err", pid)),
    )
}

/// The pair of append-mode files one invocation redirects its child into.
///
/// Named after the *spawning* process, so every invocation of a run lands in
/// the same pair. Both files close when the value is released or dropped.
#[derive(Debug)]
pub struct OutputSinks {
    stdout: File,
    stderr: File,
    stdout_path: PathBuf,
    stderr_path: PathBuf,
}

impl OutputSinks {
    /// Open (creating if needed) `<pid>.out` and `<pid>.err` in `dir`.
    ///
    /// Existing content is kept; new output is appended.
    pub fn open(dir: &Path, pid: i32) -> ExecResult<Self> {
        let (stdout_path, stderr_path) = sink_paths(dir, pid);

        let stdout = open_sink(&stdout_path)?;
        let stderr = open_sink(&stderr_path)?;

        debug!(
            stdout = %stdout_path.display(),
            stderr = %stderr_path.display(),
            "Output sinks opened"
        );

        Ok(Self {
            stdout,
            stderr,
            stdout_path,
            stderr_path,
        })
    }

    pub fn stdout(&self) -> &File {
        &self.stdout
    }

    pub fn stderr(&self) -> &File {
        &self.stderr
    }

    pub fn stdout_path(&self) -> &Path {
        &self.stdout_path
    }

    pub fn stderr_path(&self) -> &Path {
        &self.stderr_path
    }

    /// Close both files, returning their paths.
    pub fn release(self) -> (PathBuf, PathBuf) {
        let Self {
            stdout,
            stderr,
            stdout_path,
            stderr_path,
        } = self;
        drop(stdout);
        drop(stderr);
        debug!(stdout = %stdout_path.display(), "Output sinks released");
        (stdout_path, stderr_path)
    }
}

fn open_sink(path: &Path) -> ExecResult<File> {
    OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .mode(SINK_MODE)
        .open(path)
        .map_err(|e| ExecError::sink_open(path, e))
}
