//! Console progress lines.
//!
//! These go to the executor's own stdout and are meant for people, not
//! parsers.

use seqexec_common::{CommandIndex, ExitDisposition, ExitOutcome};
use std::io::{self, Write};

/// `Starting command <index>: child <child> pid of parent <parent>`
pub fn write_started<W: Write>(
    console: &mut W,
    index: CommandIndex,
    child_pid: i32,
    parent_pid: i32,
) -> io::Result<()> {
    writeln!(
        console,
        "Starting command {}: child {} pid of parent {}",
        index, child_pid, parent_pid
    )?;
    console.flush()
}

/// Completion lines for a reaped child.
pub fn write_outcome<W: Write>(console: &mut W, outcome: &ExitOutcome) -> io::Result<()> {
    match outcome.disposition {
        ExitDisposition::Exited(code) => {
            writeln!(
                console,
                "Finished child {} pid of parent {}",
                outcome.child_pid, outcome.parent_pid
            )?;
            writeln!(console, "Exited with exitcode = {}", code)?;
        }
        ExitDisposition::Signaled(signal) => {
            writeln!(console, "Killed with signal {}", signal)?;
        }
    }
    console.flush()
}
