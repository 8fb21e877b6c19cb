// VDemo Tools - build orchestration and source maintenance for the VDemo renderer
//
// This is the library crate containing the orchestration logic.
// The binary crates (src/bin/) provide the fixed, parameterless entry points.

pub mod config;
pub mod headers;
pub mod logging;
pub mod services;
pub mod toolchain;

// Re-export commonly used types for convenience
pub use config::BuildConfig;
pub use services::{BuildOrchestrator, StepOutput};
pub use toolchain::ToolchainPaths;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
