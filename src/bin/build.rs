//! vdemo-build - clean, build, and package the VDemo solution.
//!
//! Fixed, parameterless entry point. Execution flow:
//!
//! 1. Initialize logging (logs/vdemo-build.<date> + console)
//! 2. Load BuildTools.yaml if present, defaults otherwise
//! 3. Locate the VS2017 toolchain (registry or VDEMO_VS_ROOT override)
//! 4. Clean -> Build -> Package, aborting on the first failed step
//!
//! An unresolvable toolchain aborts before any step runs, so the failure path
//! touches nothing on disk. A hung external process hangs the pipeline; there
//! is deliberately no timeout.

use anyhow::Result;
use vdemo_tools::{APP_NAME, BuildConfig, BuildOrchestrator, ToolchainPaths, VERSION, config};

fn main() -> Result<()> {
    let _guard = vdemo_tools::logging::init("vdemo-build", false)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    // Tokio runtime for subprocess execution
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("vdemo-build-worker")
        .build()?;

    let build_config = BuildConfig::load(config::CONFIG_FILE_NAME)?;

    // The locator gates everything: no toolchain, no side effects.
    let toolchain = match ToolchainPaths::locate() {
        Ok(toolchain) => toolchain,
        Err(e) => {
            tracing::error!("Cannot find Visual Studio. Compilation aborted: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("VS Path:          {}", toolchain.vs_root);
    tracing::info!("devenv.exe Path:  {}", toolchain.devenv_exe);
    tracing::info!("MSBuild.exe Path: {}", toolchain.msbuild_exe);

    let orchestrator = BuildOrchestrator::new(toolchain, build_config);
    let result = runtime.block_on(orchestrator.run());

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    result.map_err(|e| {
        tracing::error!("{}", e);
        anyhow::Error::from(e)
    })
}
