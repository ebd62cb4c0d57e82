//! Custom assertions for E2E tests

use crate::seqexec_run::RunOutput;
use std::fs;

/// Assert that seqexec exited normally with `expected`
pub fn assert_exit_code(output: &RunOutput, expected: i32) -> Result<(), String> {
    if output.code == Some(expected) {
        Ok(())
    } else {
        Err(format!(
            "Expected exit code {}, got {:?} (signal {:?}).\nConsole:\n{}\nDiagnostics:\n{}",
            expected, output.code, output.signal, output.console, output.diagnostics
        ))
    }
}

/// Assert that exactly `expected` children were started
pub fn assert_started_count(output: &RunOutput, expected: usize) -> Result<(), String> {
    let started = output.started_count();
    if started == expected {
        Ok(())
    } else {
        Err(format!(
            "Expected {} commands started, got {}. Console:\n{}",
            expected, started, output.console
        ))
    }
}

/// Assert the console holds a well-formed report for command `index` that
/// exited with `code`
pub fn assert_exited_report(output: &RunOutput, index: usize, code: i32) -> Result<(), String> {
    let lines = output.console_lines();
    let prefix = format!("Starting command {}: child ", index);
    let parent_suffix = format!(" pid of parent {}", output.pid);

    for (i, line) in lines.iter().enumerate() {
        let Some(rest) = line.strip_prefix(&prefix) else {
            continue;
        };
        let Some(child) = rest.strip_suffix(&parent_suffix) else {
            continue;
        };
        let finished = format!("Finished child {} pid of parent {}", child, output.pid);
        let exited = format!("Exited with exitcode = {}", code);
        if lines.get(i + 1) == Some(&finished.as_str()) && lines.get(i + 2) == Some(&exited.as_str()) {
            return Ok(());
        }
    }

    Err(format!(
        "No exit report for command {} with code {}. Console:\n{}",
        index, code, output.console
    ))
}

/// Assert the console reports a signal termination with `signal`
pub fn assert_signaled_report(output: &RunOutput, signal: i32) -> Result<(), String> {
    let expected = format!("Killed with signal {}", signal);
    if output.console_lines().contains(&expected.as_str()) {
        Ok(())
    } else {
        Err(format!("Missing '{}'. Console:\n{}", expected, output.console))
    }
}

/// Assert that the work directory holds no files at all
pub fn assert_work_dir_empty(output: &RunOutput) -> Result<(), String> {
    let entries: Vec<_> = fs::read_dir(&output.work_dir)
        .map_err(|e| format!("Failed to read work dir: {}", e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name())
        .collect();

    if entries.is_empty() {
        Ok(())
    } else {
        Err(format!("Work dir not empty: {:?}", entries))
    }
}

/// Assert that both capture files exist
pub fn assert_sinks_exist(output: &RunOutput) -> Result<(), String> {
    for path in [output.stdout_sink(), output.stderr_sink()] {
        if !path.exists() {
            return Err(format!("Capture file missing: {}", path.display()));
        }
    }
    Ok(())
}
