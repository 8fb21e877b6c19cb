//! Build sequencing: Clean -> Build -> Package.
//!
//! Each step maps to one external operation and reports success or failure;
//! the first failure aborts the remaining steps with a step-named diagnostic.
//! There is no rollback: a directory removed by Clean stays removed even when
//! Build fails afterwards.

use crate::config::BuildConfig;
use crate::services::packager::{self, PackagingError};
use crate::services::process::run_shell;
use crate::toolchain::ToolchainPaths;
use camino::Utf8Path;
use regex::Regex;
use std::fs;
use thiserror::Error;

/// Errors from the build sequence
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Clean failed for {path}: {source}")]
    CleanFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Build failed with exit code {exit_code}, see {log}")]
    BuildFailed { exit_code: i32, log: String },

    #[error("Failed to launch devenv: {0}")]
    BuildLaunchFailed(String),

    #[error("Packaging failed: {0}")]
    Packaging(#[from] PackagingError),
}

/// Error/warning counts parsed from a devenv build log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub errors: usize,
    pub warnings: usize,
}

/// Sequences the clean, build, and package steps against a located toolchain.
///
/// Log-summary regexes are pre-compiled at construction time; devenv prints
/// per-project summary lines like `========== Build: 5 succeeded, 0 failed`
/// and `0 Error(s)` / `3 Warning(s)` totals from the MSBuild engine.
pub struct BuildOrchestrator {
    toolchain: ToolchainPaths,
    config: BuildConfig,

    /// Matches MSBuild's "N Error(s)" summary lines
    error_pattern: Regex,

    /// Matches MSBuild's "N Warning(s)" summary lines
    warning_pattern: Regex,
}

impl BuildOrchestrator {
    pub fn new(toolchain: ToolchainPaths, config: BuildConfig) -> Self {
        Self {
            toolchain,
            config,
            error_pattern: Regex::new(r"(\d+) Error\(s\)").expect("Invalid error regex"),
            warning_pattern: Regex::new(r"(\d+) Warning\(s\)").expect("Invalid warning regex"),
        }
    }

    /// Run the full sequence, aborting on the first failed step.
    pub async fn run(&self) -> Result<(), BuildError> {
        if let Err(e) = self.clean() {
            tracing::error!("Clean step failed, aborting before build");
            return Err(e);
        }

        if let Err(e) = self.build().await {
            tracing::error!("Build step failed, aborting before packaging");
            return Err(e);
        }

        if let Err(e) = self.package().await {
            tracing::error!("Packaging step failed");
            return Err(e);
        }

        tracing::info!("Build pipeline complete: {}", self.config.artifacts_dir);
        Ok(())
    }

    /// Remove the build output directory. A directory that is already gone
    /// counts as clean.
    pub fn clean(&self) -> Result<(), BuildError> {
        clean_output_dir(&self.config.build_dir)
    }

    /// Invoke devenv's command-line build action against the solution with the
    /// configured configuration, output redirected to the build log.
    pub async fn build(&self) -> Result<(), BuildError> {
        let command = self.build_command();

        let result = run_shell(&command)
            .await
            .map_err(|e| BuildError::BuildLaunchFailed(e.to_string()))?;

        if !result.succeeded() {
            return Err(BuildError::BuildFailed {
                exit_code: result.exit_code,
                log: self.config.build_log.to_string(),
            });
        }

        match self.parse_build_log(&self.config.build_log) {
            Ok(stats) => {
                tracing::info!(
                    "Build succeeded: {} error(s), {} warning(s)",
                    stats.errors,
                    stats.warnings
                );
            }
            Err(e) => {
                // The build already succeeded; a missing log only costs the summary
                tracing::warn!("Could not read build log {}: {}", self.config.build_log, e);
            }
        }

        Ok(())
    }

    /// Copy binaries and auxiliary trees into the artifacts directory.
    pub async fn package(&self) -> Result<(), BuildError> {
        packager::package(&self.config).await?;
        Ok(())
    }

    /// The exact devenv command line. Paths are quoted for the shell.
    pub fn build_command(&self) -> String {
        format!(
            "\"{}\" \"{}\" /Build {} /Out \"{}\"",
            self.toolchain.devenv_exe,
            self.config.solution,
            self.config.configuration,
            self.config.build_log
        )
    }

    /// Sum error/warning counts across the per-project summary lines.
    pub fn parse_build_log(&self, log_path: &Utf8Path) -> std::io::Result<BuildStats> {
        let content = fs::read_to_string(log_path)?;

        let mut stats = BuildStats::default();
        for cap in self.error_pattern.captures_iter(&content) {
            stats.errors += cap[1].parse::<usize>().unwrap_or(0);
        }
        for cap in self.warning_pattern.captures_iter(&content) {
            stats.warnings += cap[1].parse::<usize>().unwrap_or(0);
        }

        Ok(stats)
    }
}

/// Recursively delete a build output directory.
///
/// Success means the directory does not exist afterwards, so a missing
/// directory is already clean.
pub fn clean_output_dir(dir: &Utf8Path) -> Result<(), BuildError> {
    if !dir.exists() {
        tracing::info!("Nothing to clean, {} does not exist", dir);
        return Ok(());
    }

    tracing::info!("Removing build output: {}", dir);
    fs::remove_dir_all(dir).map_err(|source| BuildError::CleanFailed {
        path: dir.to_string(),
        source,
    })
}
