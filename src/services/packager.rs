//! Artifact packaging.
//!
//! Assembles a single runnable artifacts directory from a finished build:
//! every .exe/.dll found under the build output root is copied flat into the
//! artifacts root (no subdirectories, last copy of a duplicate name wins),
//! then the Data/ and Source/Shaders/ trees are copied in with their internal
//! structure preserved.

use crate::config::BuildConfig;
use crate::services::process::{robocopy_succeeded, robocopy_tree_command, run_shell};
use camino::Utf8Path;
use std::fs;
use thiserror::Error;
use walkdir::WalkDir;

/// Lowercase extensions collected into the artifacts root.
pub const ARTIFACT_EXTENSIONS: [&str; 2] = ["exe", "dll"];

/// Errors from the packaging step
#[derive(Error, Debug)]
pub enum PackagingError {
    #[error("Failed to clear artifacts directory {path}: {source}")]
    ClearFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to collect binaries into {path}: {source}")]
    CollectFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to copy {name} tree into artifacts (robocopy exit code {exit_code})")]
    SubtreeFailed { name: String, exit_code: i32 },

    #[error("Walk error under build output: {0}")]
    WalkFailed(#[from] walkdir::Error),
}

/// Package the build output into the artifacts directory.
///
/// The destination is removed wholesale if it already exists, then recreated.
/// Aborts with a named diagnostic if either auxiliary tree copy fails.
pub async fn package(config: &BuildConfig) -> Result<(), PackagingError> {
    let dest = &config.artifacts_dir;

    if dest.exists() {
        tracing::info!("Clearing existing artifacts directory: {}", dest);
        fs::remove_dir_all(dest).map_err(|source| PackagingError::ClearFailed {
            path: dest.to_string(),
            source,
        })?;
    }

    fs::create_dir_all(dest).map_err(|source| PackagingError::ClearFailed {
        path: dest.to_string(),
        source,
    })?;

    let collected = collect_binaries(&config.build_dir, dest)?;
    tracing::info!("Collected {} binaries into {}", collected, dest);

    copy_aux_tree("Data", &config.data_dir, &dest.join("Data")).await?;
    copy_aux_tree(
        "Shaders",
        &config.shaders_dir,
        &dest.join("Source").join("Shaders"),
    )
    .await?;

    Ok(())
}

/// Copy every .exe/.dll under `build_root` flat into `dest`.
///
/// Directory structure is not preserved: a same-named file in two
/// subdirectories silently overwrites. The destination directory itself is
/// pruned from the walk so artifacts are never re-copied onto themselves.
pub fn collect_binaries(build_root: &Utf8Path, dest: &Utf8Path) -> Result<usize, PackagingError> {
    let dest_std = dest.as_std_path();
    let mut collected = 0;

    let walker = WalkDir::new(build_root.as_std_path())
        .into_iter()
        .filter_entry(|e| e.path() != dest_std);

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_artifact = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ARTIFACT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if !is_artifact {
            continue;
        }

        // file_name is present for every file entry walkdir yields
        let file_name = entry.file_name();
        let target = dest_std.join(file_name);

        fs::copy(path, &target).map_err(|source| PackagingError::CollectFailed {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Collected {}", path.display());
        collected += 1;
    }

    Ok(collected)
}

/// Copy one auxiliary tree (structure preserved) via robocopy.
async fn copy_aux_tree(
    name: &str,
    source: &Utf8Path,
    dest: &Utf8Path,
) -> Result<(), PackagingError> {
    tracing::info!("Copying {} tree: {} -> {}", name, source, dest);

    let command = robocopy_tree_command(source, dest);
    let result = match run_shell(&command).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("{} tree copy failed to launch: {}", name, e);
            return Err(PackagingError::SubtreeFailed {
                name: name.to_string(),
                exit_code: -1,
            });
        }
    };

    if !robocopy_succeeded(result.exit_code) {
        tracing::error!(
            "{} tree copy failed with exit code {}",
            name,
            result.exit_code
        );
        return Err(PackagingError::SubtreeFailed {
            name: name.to_string(),
            exit_code: result.exit_code,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn utf8_root(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_collect_flattens_and_filters() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let build = root.join("Build");
        fs::create_dir_all(build.join("x64")).unwrap();
        fs::write(build.join("x64").join("VDemo.exe"), b"exe").unwrap();
        fs::write(build.join("d3dcompiler.dll"), b"dll").unwrap();
        fs::write(build.join("VDemo.pdb"), b"pdb").unwrap();

        let dest = build.join("_artifacts");
        fs::create_dir_all(&dest).unwrap();

        let collected = collect_binaries(&build, &dest).unwrap();
        assert_eq!(collected, 2);
        assert!(dest.join("VDemo.exe").is_file());
        assert!(dest.join("d3dcompiler.dll").is_file());
        assert!(!dest.join("VDemo.pdb").exists());
        // Flattened: no subdirectories from the binary pass
        assert!(!dest.join("x64").exists());
    }

    #[test]
    fn test_collect_duplicate_names_last_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let build = root.join("Build");
        fs::create_dir_all(build.join("a")).unwrap();
        fs::create_dir_all(build.join("b")).unwrap();
        fs::write(build.join("a").join("app.exe"), b"from a").unwrap();
        fs::write(build.join("b").join("app.exe"), b"from b").unwrap();
        fs::write(build.join("lib.dll"), b"lib").unwrap();

        let dest = build.join("_artifacts");
        fs::create_dir_all(&dest).unwrap();

        collect_binaries(&build, &dest).unwrap();

        // Exactly one app.exe and one lib.dll at the artifacts root
        let entries: Vec<_> = fs::read_dir(dest.as_std_path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&"app.exe".to_string()));
        assert!(entries.contains(&"lib.dll".to_string()));
    }

    #[test]
    fn test_collect_matches_uppercase_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let build = root.join("Build");
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("VDemo.EXE"), b"exe").unwrap();

        let dest = root.join("out");
        fs::create_dir_all(&dest).unwrap();

        assert_eq!(collect_binaries(&build, &dest).unwrap(), 1);
        assert!(dest.join("VDemo.EXE").is_file());
    }

    #[test]
    fn test_collect_skips_destination_itself() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let build = root.join("Build");
        let dest = build.join("_artifacts");
        fs::create_dir_all(&dest).unwrap();
        // A stale binary already inside the destination must not be re-copied
        fs::write(dest.join("stale.exe"), b"stale").unwrap();
        fs::write(build.join("fresh.exe"), b"fresh").unwrap();

        let collected = collect_binaries(&build, &dest).unwrap();
        assert_eq!(collected, 1);
    }
}
