//! # seqexec Batch
//!
//! Drives the execution unit over an ordered batch of command lines:
//! lines read from an input stream first, then an optional built-in list.
//! Commands run strictly one after another.

pub mod batch;
pub mod config;
pub mod source;

pub use batch::{BatchRunner, BatchSummary};
pub use config::BatchConfig;
pub use source::{BuiltinSource, CommandSource, LineSource, DEFAULT_BUILTIN_COMMANDS};
