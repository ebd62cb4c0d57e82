//! # seqexec Common
//!
//! Error taxonomy and shared domain types for the sequential command
//! executor. Every other seqexec crate builds on these.

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::{ExecError, ExecResult};
pub use types::{
    ChildFailurePolicy, CommandIndex, ExitDisposition, ExitOutcome, EXIT_FAILURE, EXIT_SUCCESS,
};
