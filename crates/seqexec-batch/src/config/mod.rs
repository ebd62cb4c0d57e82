use crate::source::DEFAULT_BUILTIN_COMMANDS;
use anyhow::{Context, Result};
use seqexec_common::ChildFailurePolicy;
use seqexec_process::DEFAULT_MAX_ARGS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validation;

/// Batch configuration, loadable from YAML.
///
/// Every key is optional; a missing file section means defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchConfig {
    /// Directory receiving `<pid>.out` and `<pid>.err`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Upper bound on tokens per command line.
    #[serde(default = "default_max_args")]
    pub max_args: usize,

    #[serde(default)]
    pub on_child_failure: ChildFailurePolicy,

    /// Read commands from stdin before the built-in list.
    #[serde(default = "default_read_stdin")]
    pub read_stdin: bool,

    /// Run `builtin_commands` after the input is exhausted.
    #[serde(default)]
    pub run_builtin: bool,

    #[serde(default = "default_builtin_commands")]
    pub builtin_commands: Vec<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_args() -> usize {
    DEFAULT_MAX_ARGS
}

fn default_read_stdin() -> bool {
    true
}

fn default_builtin_commands() -> Vec<String> {
    DEFAULT_BUILTIN_COMMANDS
        .iter()
        .map(|command| command.to_string())
        .collect()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_args: default_max_args(),
            on_child_failure: ChildFailurePolicy::default(),
            read_stdin: default_read_stdin(),
            run_builtin: false,
            builtin_commands: default_builtin_commands(),
            log_level: default_log_level(),
        }
    }
}

impl BatchConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::load_from_string(&content)
    }

    /// Load configuration from a YAML string
    pub fn load_from_string(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map of defaults.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: BatchConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
