//! Shared test harness for grit integration tests.
//!
//! Provides a binary runner with pinned author environment so commit ids
//! are deterministic across machines.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Discover the path to the compiled `grit` binary.
pub fn grit_bin() -> PathBuf {
    let mut path = std::env::current_exe()
        .unwrap()
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    path.push("grit");
    path
}

/// Run the grit binary in `dir` with the given arguments.
pub fn grit(dir: &Path, args: &[&str]) -> CommandResult {
    let mut cmd = Command::new(grit_bin());
    cmd.args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "author@example.com")
        .env("GIT_AUTHOR_DATE", "1234567890 +0000")
        .env("GIT_COMMITTER_NAME", "Test Committer")
        .env("GIT_COMMITTER_EMAIL", "committer@example.com")
        .env("GIT_COMMITTER_DATE", "1234567890 +0000");
    let output = cmd.output().expect("failed to run grit");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Assert the command succeeded and return its stdout.
pub fn grit_ok(dir: &Path, args: &[&str]) -> String {
    let result = grit(dir, args);
    assert_eq!(
        result.exit_code, 0,
        "grit {:?} failed\nstdout: {}\nstderr: {}",
        args, result.stdout, result.stderr
    );
    result.stdout
}
