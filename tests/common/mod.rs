//! Shared test infrastructure for integration tests.
//!
//! Drives the built `infograph` binary directly so the tests cover the CLI
//! surface, not just the library internals.

use std::path::Path;
use std::process::{Command, Output};

/// Run the binary with `args`, returning the raw output.
pub fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_infograph"))
        .args(args)
        .output()
        .expect("run infograph binary")
}

/// Run the binary and require success, returning stdout.
pub fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "infograph {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is UTF-8")
}

/// Read and parse a document file written by the binary.
pub fn read_doc(path: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(path).expect("read document file");
    serde_json::from_str(&raw).expect("parse document file")
}
