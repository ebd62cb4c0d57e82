//! One-shot wrapper around the seqexec binary for E2E testing

use std::fs::{self, File};
use std::io::Write;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default upper bound on a single run, so a hung child fails the test
/// instead of the whole suite.
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for a seqexec invocation.
///
/// The binary runs with `<test_dir>/work` as its working directory, so the
/// capture files land there; its own stdout and stderr go to
/// `<test_dir>/console.log` and `<test_dir>/diagnostics.log`.
pub struct SeqexecRun {
    test_dir: PathBuf,
    args: Vec<String>,
    stdin: String,
    timeout: Duration,
}

/// Everything observable about a finished run.
#[derive(Debug)]
pub struct RunOutput {
    /// Exit code, `None` if seqexec itself was killed.
    pub code: Option<i32>,
    pub signal: Option<i32>,
    /// PID of seqexec, which names the capture files.
    pub pid: u32,
    pub console: String,
    pub diagnostics: String,
    pub work_dir: PathBuf,
}

impl SeqexecRun {
    pub fn new(test_dir: impl Into<PathBuf>) -> Self {
        Self {
            test_dir: test_dir.into(),
            args: Vec::new(),
            stdin: String::new(),
            timeout: DEFAULT_RUN_TIMEOUT,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Command lines fed on stdin, one per line.
    pub fn commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for command in commands {
            self.stdin.push_str(command.as_ref());
            self.stdin.push('\n');
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn run(self, seqexec_path: &Path) -> Result<RunOutput, String> {
        let work_dir = self.test_dir.join("work");
        fs::create_dir_all(&work_dir)
            .map_err(|e| format!("Failed to create work dir: {}", e))?;

        let console_path = self.test_dir.join("console.log");
        let diagnostics_path = self.test_dir.join("diagnostics.log");
        let console = File::create(&console_path)
            .map_err(|e| format!("Failed to create console log: {}", e))?;
        let diagnostics = File::create(&diagnostics_path)
            .map_err(|e| format!("Failed to create diagnostics log: {}", e))?;

        let mut child = Command::new(seqexec_path)
            .args(&self.args)
            .current_dir(&work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::from(console))
            .stderr(Stdio::from(diagnostics))
            .spawn()
            .map_err(|e| format!("Failed to spawn seqexec: {}", e))?;
        let pid = child.id();

        if let Some(mut stdin) = child.stdin.take() {
            // seqexec may exit before reading everything (e.g. bad config).
            if let Err(e) = stdin.write_all(self.stdin.as_bytes()) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(format!("Failed to write stdin: {}", e));
                }
            }
            // Dropping stdin sends EOF.
        }

        let status = match child
            .wait_timeout(self.timeout)
            .map_err(|e| format!("Failed to wait for seqexec: {}", e))?
        {
            Some(status) => status,
            None => {
                child.kill().ok();
                child.wait().ok();
                return Err(format!("seqexec did not finish within {:?}", self.timeout));
            }
        };

        Ok(RunOutput {
            code: status.code(),
            signal: status.signal(),
            pid,
            console: fs::read_to_string(&console_path).unwrap_or_default(),
            diagnostics: fs::read_to_string(&diagnostics_path).unwrap_or_default(),
            work_dir,
        })
    }
}

impl RunOutput {
    pub fn console_lines(&self) -> Vec<&str> {
        self.console.lines().collect()
    }

    pub fn stdout_sink(&self) -> PathBuf {
        self.work_dir.join(format!("{}.out", self.pid))
    }

    pub fn stderr_sink(&self) -> PathBuf {
        self.work_dir.join(format!("{}.err", self.pid))
    }

    pub fn read_stdout_sink(&self) -> String {
        fs::read_to_string(self.stdout_sink()).unwrap_or_default()
    }

    pub fn read_stderr_sink(&self) -> String {
        fs::read_to_string(self.stderr_sink()).unwrap_or_default()
    }

    /// Number of `Starting command` lines, i.e. children spawned.
    pub fn started_count(&self) -> usize {
        self.console
            .lines()
            .filter(|line| line.starts_with("Starting command "))
            .count()
    }
}
