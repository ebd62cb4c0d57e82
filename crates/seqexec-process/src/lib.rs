//! # seqexec Process
//!
//! The command execution unit. One call to [`Executor::execute`] takes a
//! command line through its whole lifecycle:
//!
//! 1. tokenize into an [`ArgumentVector`]
//! 2. open the [`OutputSinks`] named after the calling process
//! 3. fork, redirect stdout/stderr of the child onto the sinks, exec
//! 4. wait for exactly that child
//! 5. report the [`ExitDisposition`](seqexec_common::ExitDisposition)
//! 6. release the sinks
//!
//! Unix only: spawning goes through `fork`/`execvp` so that an exec failure
//! stays inside the child and surfaces only as its exit status.

pub mod execute;
pub mod report;
pub mod sinks;
pub mod tokenize;

// Re-export main types
pub use execute::*;
pub use report::*;
pub use sinks::*;
pub use tokenize::*;
