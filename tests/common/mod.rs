// Shared test helpers for integration tests
#![allow(dead_code)]

use env_matrix::core::config::CaseSpec;
use env_matrix::core::execution::RunOptions;
use tempfile::{tempdir, TempDir};

/// A sandboxed environment root for one test.
pub fn sandbox() -> TempDir {
    tempdir().expect("Failed to create temporary directory")
}

/// Run options pointing into the sandbox, with the default excerpt cap.
pub fn options(root: &TempDir) -> RunOptions {
    RunOptions::new(root.path().to_path_buf(), 500)
}

/// Builds a case from shell command lines.
pub fn case(name: &str, setup: &[&str], verify: &str) -> CaseSpec {
    CaseSpec {
        name: name.to_string(),
        setup: setup.iter().map(|s| s.to_string()).collect(),
        verify: verify.to_string(),
        ..CaseSpec::default()
    }
}
