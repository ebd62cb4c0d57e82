use super::*;
use anyhow::{anyhow, Result};
use seqexec_process::tokenize;

/// Largest accepted `max_args`.
pub const MAX_ARGS_CEILING: usize = 4096;

/// Validate the complete configuration
pub fn validate_config(config: &BatchConfig) -> Result<()> {
    validate_output_dir(&config.output_dir)?;
    validate_max_args(config.max_args)?;
    validate_log_level(&config.log_level)?;

    if config.run_builtin {
        validate_builtin_commands(&config.builtin_commands, config.max_args)?;
    }

    Ok(())
}

fn validate_output_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(anyhow!("Output directory cannot be empty"));
    }
    Ok(())
}

fn validate_max_args(max_args: usize) -> Result<()> {
    if max_args == 0 || max_args > MAX_ARGS_CEILING {
        return Err(anyhow!(
            "max_args must be between 1 and {}, got: {}",
            MAX_ARGS_CEILING,
            max_args
        ));
    }
    Ok(())
}

fn validate_log_level(level: &str) -> Result<()> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(anyhow!(
            "Invalid log level: {}, must be one of: trace, debug, info, warn, error",
            level
        )),
    }
}

/// Built-in commands are known up front, so reject bad ones at load time
/// instead of halfway through a batch.
fn validate_builtin_commands(commands: &[String], max_args: usize) -> Result<()> {
    for (i, command) in commands.iter().enumerate() {
        let tokens = tokenize(command);
        if tokens.is_empty() {
            return Err(anyhow!("Built-in command #{} is empty", i + 1));
        }
        if tokens.len() > max_args {
            return Err(anyhow!(
                "Built-in command #{} has {} arguments (limit: {})",
                i + 1,
                tokens.len(),
                max_args
            ));
        }
    }
    Ok(())
}
