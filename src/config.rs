use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

/// Name of the optional configuration file, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "BuildTools.yaml";

/// Build configuration for the orchestrator.
///
/// Every field has a default matching the VDemo project layout, so running
/// without a `BuildTools.yaml` behaves exactly like the stock setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Solution file handed to devenv
    #[serde(default = "default_solution")]
    pub solution: String,

    /// Build configuration name passed to `/Build`
    #[serde(default = "default_configuration")]
    pub configuration: String,

    /// Build output root, removed by the clean step and walked by the packager
    #[serde(default = "default_build_dir")]
    pub build_dir: Utf8PathBuf,

    /// Artifacts directory the packager assembles; lives inside `build_dir`
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: Utf8PathBuf,

    /// Data tree copied into the artifacts directory, structure preserved
    #[serde(default = "default_data_dir")]
    pub data_dir: Utf8PathBuf,

    /// Shader source tree copied into the artifacts directory, structure preserved
    #[serde(default = "default_shaders_dir")]
    pub shaders_dir: Utf8PathBuf,

    /// Path devenv redirects its build output to
    #[serde(default = "default_build_log")]
    pub build_log: Utf8PathBuf,
}

fn default_solution() -> String {
    "VDemo.sln".to_string()
}

fn default_configuration() -> String {
    "Release".to_string()
}

fn default_build_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("Build")
}

fn default_artifacts_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("Build/_artifacts")
}

fn default_data_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("Data")
}

fn default_shaders_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("Source/Shaders")
}

fn default_build_log() -> Utf8PathBuf {
    Utf8PathBuf::from("Build/build.log")
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            solution: default_solution(),
            configuration: default_configuration(),
            build_dir: default_build_dir(),
            artifacts_dir: default_artifacts_dir(),
            data_dir: default_data_dir(),
            shaders_dir: default_shaders_dir(),
            build_log: default_build_log(),
        }
    }
}

impl BuildConfig {
    /// Load the configuration file, falling back to defaults when it is absent.
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let file_contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path))?;

        let config: BuildConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse config: {}", path))?;

        tracing::info!("Loaded config from {}", path);
        Ok(config)
    }
}
