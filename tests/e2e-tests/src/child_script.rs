//! Scripted child processes for E2E tests
//!
//! The executor only splits on whitespace, so a child with non-trivial
//! behaviour is written out as a shell script and run as `sh <path>`.

use std::fs;
use std::path::{Path, PathBuf};

/// A `/bin/sh` script stored in a test directory.
pub struct ChildScript {
    path: PathBuf,
}

impl ChildScript {
    /// Write `body` to `<dir>/<name>.sh`.
    pub fn new(dir: &Path, name: &str, body: &str) -> Self {
        let scripts = dir.join("scripts");
        fs::create_dir_all(&scripts).expect("Failed to create scripts dir");
        let path = scripts.join(format!("{}.sh", name));
        fs::write(&path, format!("{}\n", body)).expect("Failed to write child script");
        Self { path }
    }

    /// Writes `stdout`/`stderr` verbatim, then exits with `code`.
    pub fn output(dir: &Path, name: &str, stdout: &str, stderr: &str, code: i32) -> Self {
        Self::new(
            dir,
            name,
            &format!(
                "printf '%s' '{}'\nprintf '%s' '{}' >&2\nexit {}",
                stdout, stderr, code
            ),
        )
    }

    /// Writes `stdout`, then kills itself with `signal` (e.g. `TERM`).
    pub fn self_signal(dir: &Path, name: &str, stdout: &str, signal: &str) -> Self {
        Self::new(
            dir,
            name,
            &format!("printf '%s' '{}'\nkill -{} $$", stdout, signal),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The command line that runs this script.
    pub fn command(&self) -> String {
        format!("sh {}", self.path.display())
    }
}
