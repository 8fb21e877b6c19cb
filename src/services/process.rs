//! Subprocess boundary.
//!
//! Every external tool (devenv, robocopy) is invoked through a shell so their
//! own argument parsing sees exactly the command lines they expect. Combined
//! stdout/stderr is captured as text alongside the exit code; the caller blocks
//! until the process exits. There is no timeout and no cancellation.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::time::Instant;
use tokio::process::Command;

/// Parallelism degree handed to robocopy's /MT flag. Internal to robocopy;
/// the orchestrator only ever observes the final exit code.
pub const ROBOCOPY_THREADS: u32 = 8;

/// Robocopy exit codes at or above this value indicate failure.
/// Codes 0-7 are informational (files copied, extras, mismatches).
pub const ROBOCOPY_FAILURE_THRESHOLD: i32 = 8;

/// Result of a single subprocess invocation
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub exit_code: i32,
    pub output: String,
}

impl StepOutput {
    /// Generic zero-means-success convention.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Robocopy's asymmetric success convention, isolated here so orchestration
/// code only ever sees a boolean.
pub fn robocopy_succeeded(exit_code: i32) -> bool {
    (0..ROBOCOPY_FAILURE_THRESHOLD).contains(&exit_code)
}

/// Build a robocopy command for a full recursive tree copy (no purge),
/// structure preserved. Paths are quoted for the shell.
pub fn robocopy_tree_command(source: &Utf8Path, dest: &Utf8Path) -> String {
    format!(
        "robocopy \"{}\" \"{}\" /E /MT:{}",
        source, dest, ROBOCOPY_THREADS
    )
}

/// Execute a command line through the platform shell and capture its output.
///
/// # Returns
/// The process exit code and combined stdout/stderr text. Exit code is -1 if
/// the process was terminated by a signal.
pub async fn run_shell(command: &str) -> Result<StepOutput> {
    tracing::info!("Executing: {}", command);

    let start = Instant::now();

    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", command]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", command]);
        c
    };

    let output = cmd
        .output()
        .await
        .with_context(|| format!("Failed to spawn process: {}", command))?;

    let exit_code = output.status.code().unwrap_or(-1);

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    tracing::info!(
        "Process completed in {:.2}s with exit code {}",
        start.elapsed().as_secs_f32(),
        exit_code
    );

    Ok(StepOutput {
        exit_code,
        output: text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_robocopy_informational_codes_succeed() {
        for code in 0..8 {
            assert!(robocopy_succeeded(code), "code {} should succeed", code);
        }
    }

    #[test]
    fn test_robocopy_failure_codes() {
        for code in [8, 9, 16, 255] {
            assert!(!robocopy_succeeded(code), "code {} should fail", code);
        }
    }

    #[test]
    fn test_robocopy_negative_code_fails() {
        // -1 means the process never reported an exit code
        assert!(!robocopy_succeeded(-1));
    }

    #[test]
    fn test_robocopy_tree_command_quotes_paths() {
        let source = Utf8PathBuf::from("C:/My Project/Data");
        let dest = Utf8PathBuf::from("C:/My Project/Build/_artifacts/Data");
        let cmd = robocopy_tree_command(&source, &dest);

        assert!(cmd.starts_with("robocopy "));
        assert!(cmd.contains("\"C:/My Project/Data\""));
        assert!(cmd.contains("\"C:/My Project/Build/_artifacts/Data\""));
        assert!(cmd.contains("/E"));
        assert!(cmd.contains("/MT:8"));
        // Tree copies preserve structure; never purge destination extras
        assert!(!cmd.contains("/PURGE"));
        assert!(!cmd.contains("/MIR"));
    }

    #[tokio::test]
    async fn test_run_shell_captures_exit_code() {
        let result = run_shell("exit 3").await.unwrap();
        assert_eq!(result.exit_code, 3);
        assert!(!result.succeeded());
    }

    #[tokio::test]
    async fn test_run_shell_captures_output() {
        let result = run_shell("echo hello").await.unwrap();
        assert!(result.succeeded());
        assert!(result.output.contains("hello"));
    }
}
