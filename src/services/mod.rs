//! Services module - the orchestration logic behind the build pipeline.
//!
//! The services are framework-agnostic and take all inputs as explicit
//! parameters, which keeps them testable without a toolchain installed.
//!
//! # Components
//!
//! - [`process`]: the subprocess boundary. Shell invocation with combined
//!   output capture, plus the robocopy exit-code adapter (codes 0-7 succeed,
//!   8 and above fail) so the rest of the crate only sees booleans.
//!
//! - [`BuildOrchestrator`]: sequences Clean -> Build -> Package against a
//!   located toolchain, aborting on the first failed step. Parses the devenv
//!   build log for error/warning totals after a successful build.
//!
//! - [`packager`]: assembles the runnable artifacts directory: flattened
//!   .exe/.dll collection plus structure-preserving Data/ and Shaders/ tree
//!   copies.

pub mod orchestrator;
pub mod packager;
pub mod process;

pub use orchestrator::{BuildError, BuildOrchestrator, BuildStats, clean_output_dir};
pub use packager::{ARTIFACT_EXTENSIONS, PackagingError, collect_binaries, package};
pub use process::{StepOutput, robocopy_succeeded, robocopy_tree_command, run_shell};
