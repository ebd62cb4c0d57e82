//! The sequential batch loop.

use crate::config::BatchConfig;
use crate::source::CommandSource;
use seqexec_common::{
    ChildFailurePolicy, CommandIndex, ExecResult, ExitDisposition, ExitOutcome, EXIT_SUCCESS,
};
use seqexec_process::Executor;
use std::io::{self, Write};
use std::ops::ControlFlow;
use tracing::{error, info, warn};

/// Tally of a finished (or aborted) batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Commands that were spawned and reaped.
    pub executed: usize,
    /// Of those, how many exited non-zero.
    pub failed: usize,
    /// Of those, how many were killed by a signal.
    pub signaled: usize,
    /// True when a non-zero exit cut the batch short.
    pub aborted: bool,
    /// Status the program should exit with: 0, or the first non-zero child
    /// exit code.
    pub exit_status: i32,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.exit_status == EXIT_SUCCESS
    }

    fn record(&mut self, outcome: &ExitOutcome) {
        self.executed += 1;
        match outcome.disposition {
            ExitDisposition::Exited(0) => {}
            ExitDisposition::Exited(code) => {
                self.failed += 1;
                if self.exit_status == EXIT_SUCCESS {
                    self.exit_status = code;
                }
            }
            ExitDisposition::Signaled(_) => self.signaled += 1,
        }
    }
}

/// Feeds command sources through one [`Executor`], in order, one command
/// at a time.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    executor: Executor,
    policy: ChildFailurePolicy,
}

impl BatchRunner {
    pub fn new(executor: Executor, policy: ChildFailurePolicy) -> Self {
        Self { executor, policy }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        let executor = Executor::new(&config.output_dir).with_max_args(config.max_args);
        Self::new(executor, config.on_child_failure)
    }

    /// Run every source to exhaustion, printing progress to stdout.
    pub fn run(&self, sources: &mut [Box<dyn CommandSource + '_>]) -> ExecResult<BatchSummary> {
        self.run_with_console(sources, &mut io::stdout())
    }

    /// Run every source to exhaustion, printing progress to `console`.
    ///
    /// Each source numbers its commands from 1. Under
    /// [`ChildFailurePolicy::Abort`] the first non-zero exit stops the batch;
    /// a signal never does. Malformed commands and resource failures end the
    /// batch with `Err`.
    pub fn run_with_console<W: Write>(
        &self,
        sources: &mut [Box<dyn CommandSource + '_>],
        console: &mut W,
    ) -> ExecResult<BatchSummary> {
        let mut summary = BatchSummary::default();
        info!(
            sources = sources.len(),
            policy = %self.policy,
            output_dir = %self.executor.output_dir().display(),
            max_args = self.executor.max_args(),
            "Batch started"
        );

        for source in sources.iter_mut() {
            let flow = self
                .run_source(source.as_mut(), &mut summary, console)
                .map_err(|e| {
                    error!(source = source.name(), "Fatal error, abandoning batch: {}", e);
                    e
                })?;
            if flow.is_break() {
                summary.aborted = true;
                break;
            }
        }

        info!(
            executed = summary.executed,
            failed = summary.failed,
            signaled = summary.signaled,
            exit_status = summary.exit_status,
            "Batch finished"
        );
        Ok(summary)
    }

    fn run_source<W: Write>(
        &self,
        source: &mut dyn CommandSource,
        summary: &mut BatchSummary,
        console: &mut W,
    ) -> ExecResult<ControlFlow<()>> {
        let mut index = CommandIndex::first();

        while let Some(line) = source.next_command()? {
            let outcome = self.executor.execute_with_console(&line, index, console)?;
            summary.record(&outcome);

            if let Some(code) = outcome.disposition.code() {
                if code != EXIT_SUCCESS {
                    match self.policy {
                        ChildFailurePolicy::Abort => {
                            info!(
                                source = source.name(),
                                command = %index,
                                exit_code = code,
                                "Aborting batch after failed command"
                            );
                            return Ok(ControlFlow::Break(()));
                        }
                        ChildFailurePolicy::Continue => {
                            warn!(
                                source = source.name(),
                                command = %index,
                                program = %outcome.program,
                                exit_code = code,
                                "Command failed, continuing"
                            );
                        }
                    }
                }
            }

            index = index.next();
        }

        Ok(ControlFlow::Continue(()))
    }
}
