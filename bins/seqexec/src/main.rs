use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use seqexec_batch::{BatchConfig, BatchRunner, BuiltinSource, CommandSource, LineSource};
use seqexec_common::{ChildFailurePolicy, EXIT_FAILURE};

/// Run command lines one after another, capturing each child's stdout and
/// stderr into <pid>.out and <pid>.err.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the capture files (overrides config)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Run the built-in command list after standard input
    #[arg(long)]
    builtin: bool,

    /// Do not read commands from standard input
    #[arg(long)]
    no_stdin: bool,

    /// Keep going after a command exits non-zero
    #[arg(short, long)]
    keep_going: bool,

    /// Maximum number of tokens per command (overrides config)
    #[arg(long, value_name = "N")]
    max_args: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    let status = match run(args) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("seqexec: {:#}", e);
            EXIT_FAILURE
        }
    };

    let _ = io::stdout().flush();
    std::process::exit(status);
}

/// Returns the process exit status for a completed batch.
fn run(args: Args) -> Result<i32> {
    let config = load_config(&args)?;
    initialize_logging(&config.log_level, args.debug);
    debug!(?config, "Effective configuration");

    let runner = BatchRunner::from_config(&config);

    let mut sources: Vec<Box<dyn CommandSource>> = Vec::new();
    if config.read_stdin {
        sources.push(Box::new(LineSource::new(io::stdin().lock(), "stdin")));
    }
    if config.run_builtin {
        sources.push(Box::new(BuiltinSource::new(config.builtin_commands.clone())));
    }

    match runner.run(&mut sources) {
        Ok(summary) => {
            info!(
                executed = summary.executed,
                success = summary.is_success(),
                exit_status = summary.exit_status,
                "Run complete"
            );
            Ok(summary.exit_status)
        }
        Err(e) => {
            debug!(resource_error = e.is_resource_error(), "Batch aborted: {:?}", e);
            eprintln!("seqexec: {}", e);
            Ok(e.exit_code())
        }
    }
}

/// Config file first, then command-line overrides.
fn load_config(args: &Args) -> Result<BatchConfig> {
    let mut config = match &args.config {
        Some(path) => BatchConfig::load_from_file(path)?,
        None => BatchConfig::default(),
    };

    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(max_args) = args.max_args {
        config.max_args = max_args;
    }
    if args.builtin {
        config.run_builtin = true;
    }
    if args.no_stdin {
        config.read_stdin = false;
    }
    if args.keep_going {
        config.on_child_failure = ChildFailurePolicy::Continue;
    }

    config.validate()?;
    Ok(config)
}

fn initialize_logging(config_level: &str, debug: bool) {
    let level = if debug { "debug" } else { config_level };

    // stdout is reserved for progress lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
