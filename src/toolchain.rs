//! Visual Studio toolchain discovery.
//!
//! Resolves the VS2017 install root and derives the devenv / MSBuild executable
//! paths from it. Resolution order is the `VDEMO_VS_ROOT` environment override
//! first (useful on build agents and in tests), then the registry key VS2017
//! publishes under `HKLM\SOFTWARE\WOW6432Node\Microsoft\VisualStudio\SxS\VS7`.
//!
//! The locator gates the whole orchestration: if it fails, nothing else runs
//! and nothing on disk is touched.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Environment variable overriding registry discovery of the VS root.
pub const VS_ROOT_ENV_VAR: &str = "VDEMO_VS_ROOT";

/// Registry value name for the VS2017 install root under the SxS\VS7 key.
pub const VS_REGISTRY_VALUE: &str = "15.0";

/// Errors from toolchain discovery
#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("Visual Studio install root not found (no VDEMO_VS_ROOT override, no registry entry)")]
    RootNotFound,

    #[error("devenv.exe not found at {0}")]
    DevenvMissing(Utf8PathBuf),

    #[error("MSBuild.exe not found at {0}")]
    MsBuildMissing(Utf8PathBuf),
}

/// Resolved toolchain locations, read-only after discovery.
#[derive(Debug, Clone)]
pub struct ToolchainPaths {
    pub vs_root: Utf8PathBuf,
    pub devenv_exe: Utf8PathBuf,
    pub msbuild_exe: Utf8PathBuf,
}

impl ToolchainPaths {
    /// Discover the toolchain from the environment override or the registry.
    pub fn locate() -> Result<Self, ToolchainError> {
        let root = resolve_vs_root().ok_or(ToolchainError::RootNotFound)?;
        Self::from_root(root)
    }

    /// Derive and validate the executable paths under a known install root.
    ///
    /// Both executables must exist on disk or the toolchain is invalid.
    pub fn from_root(vs_root: Utf8PathBuf) -> Result<Self, ToolchainError> {
        let devenv_exe = vs_root.join("Common7").join("IDE").join("devenv.exe");
        let msbuild_exe = vs_root
            .join("MSBuild")
            .join("15.0")
            .join("Bin")
            .join("MSBuild.exe");

        if !devenv_exe.is_file() {
            return Err(ToolchainError::DevenvMissing(devenv_exe));
        }
        if !msbuild_exe.is_file() {
            return Err(ToolchainError::MsBuildMissing(msbuild_exe));
        }

        Ok(Self {
            vs_root,
            devenv_exe,
            msbuild_exe,
        })
    }
}

fn resolve_vs_root() -> Option<Utf8PathBuf> {
    if let Ok(root) = std::env::var(VS_ROOT_ENV_VAR) {
        if !root.is_empty() {
            tracing::info!("Using VS root from {}: {}", VS_ROOT_ENV_VAR, root);
            return Some(Utf8PathBuf::from(root));
        }
    }

    query_vs_registry()
}

/// Read the VS2017 install root from the registry.
///
/// https://developercommunity.visualstudio.com/content/problem/2813/cant-find-registry-entries-for-visual-studio-2017.html
#[cfg(windows)]
fn query_vs_registry() -> Option<Utf8PathBuf> {
    use windows::Win32::System::Registry::{HKEY_LOCAL_MACHINE, RRF_RT_REG_SZ, RegGetValueW};
    use windows::core::w;

    let subkey = w!(r"SOFTWARE\WOW6432Node\Microsoft\VisualStudio\SxS\VS7");
    let value = w!("15.0");

    // First call sizes the buffer, second call fills it.
    let mut size: u32 = 0;
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            subkey,
            value,
            RRF_RT_REG_SZ,
            None,
            None,
            Some(&mut size),
        )
    };
    if status.is_err() || size == 0 {
        tracing::debug!("VS2017 registry value not found");
        return None;
    }

    let mut buf = vec![0u16; size.div_ceil(2) as usize];
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            subkey,
            value,
            RRF_RT_REG_SZ,
            None,
            Some(buf.as_mut_ptr().cast()),
            Some(&mut size),
        )
    };
    if status.is_err() {
        return None;
    }

    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    let root = String::from_utf16_lossy(&buf[..len]);
    if root.is_empty() {
        None
    } else {
        tracing::info!("Found VS root in registry: {}", root);
        Some(Utf8PathBuf::from(root))
    }
}

#[cfg(not(windows))]
fn query_vs_registry() -> Option<Utf8PathBuf> {
    // No registry off Windows; only the environment override applies.
    None
}
