// E2E Test Framework for seqexec
//
// The tests themselves live with the binary (bins/seqexec/tests) so Cargo
// builds the executable and exposes its path as CARGO_BIN_EXE_seqexec.

pub mod assertions;
pub mod child_script;
pub mod seqexec_run;

pub use child_script::ChildScript;
pub use seqexec_run::{RunOutput, SeqexecRun};

use std::env;
use std::path::PathBuf;

/// Create a fresh test directory under target/tmp
///
/// Directories are left in place after the run so artifacts can be
/// inspected; each test wipes its own directory on start.
pub fn create_test_dir(test_name: &str) -> PathBuf {
    let mut target_dir = env::current_exe()
        .expect("Failed to get current exe path")
        .parent()
        .expect("Failed to get parent dir")
        .to_path_buf();

    // target/<profile>/deps -> target
    if target_dir.ends_with("deps") {
        target_dir.pop();
    }
    target_dir.pop();

    let temp_dir = target_dir
        .join("tmp")
        .join(format!("e2e-test-{}", test_name));

    if temp_dir.exists() {
        std::fs::remove_dir_all(&temp_dir).ok();
    }
    std::fs::create_dir_all(&temp_dir).expect("Failed to create test directory");
    temp_dir
}

