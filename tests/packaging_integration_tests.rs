//! Integration tests for the clean and packaging steps
//!
//! These tests verify:
//! - The flattening contract of the binary pass (last duplicate wins)
//! - The destination directory is pruned from the walk
//! - Clean leaves the build output directory nonexistent
//! - The toolchain gate aborts before any filesystem mutation

use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;
use vdemo_tools::services::{clean_output_dir, collect_binaries};
use vdemo_tools::toolchain::ToolchainPaths;

fn utf8_root(temp_dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
}

#[test]
fn test_flattening_duplicate_binaries() {
    let temp_dir = TempDir::new().unwrap();
    let root = utf8_root(&temp_dir);
    let build = root.join("Build");
    fs::create_dir_all(build.join("a")).unwrap();
    fs::create_dir_all(build.join("b")).unwrap();
    fs::write(build.join("a").join("app.exe"), b"a").unwrap();
    fs::write(build.join("b").join("app.exe"), b"b").unwrap();
    fs::write(build.join("lib.dll"), b"lib").unwrap();

    let dest = build.join("_artifacts");
    fs::create_dir_all(&dest).unwrap();

    collect_binaries(&build, &dest).unwrap();

    // Exactly one app.exe (last copy wins) and one lib.dll, no subdirectories
    let mut names: Vec<String> = fs::read_dir(dest.as_std_path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["app.exe", "lib.dll"]);
    assert!(!dest.join("a").exists());
    assert!(!dest.join("b").exists());
}

#[test]
fn test_destination_not_walked() {
    let temp_dir = TempDir::new().unwrap();
    let root = utf8_root(&temp_dir);
    let build = root.join("Build");
    let dest = build.join("_artifacts");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("old.dll"), b"old").unwrap();
    fs::write(build.join("new.exe"), b"new").unwrap();

    let collected = collect_binaries(&build, &dest).unwrap();

    // Only the fresh binary was collected; the stale one inside the
    // destination was neither re-copied nor counted
    assert_eq!(collected, 1);
    assert!(dest.join("new.exe").is_file());
    assert_eq!(fs::read(dest.join("old.dll")).unwrap(), b"old");
}

#[test]
fn test_clean_then_collect_sequence() {
    let temp_dir = TempDir::new().unwrap();
    let root = utf8_root(&temp_dir);
    let build = root.join("Build");
    fs::create_dir_all(build.join("obj")).unwrap();
    fs::write(build.join("obj").join("stale.obj"), b"stale").unwrap();

    clean_output_dir(&build).unwrap();
    assert!(!build.exists());

    // A fresh build would recreate the tree; simulate it and package
    fs::create_dir_all(&build).unwrap();
    fs::write(build.join("VDemo.exe"), b"exe").unwrap();
    let dest = build.join("_artifacts");
    fs::create_dir_all(&dest).unwrap();
    assert_eq!(collect_binaries(&build, &dest).unwrap(), 1);
}

#[test]
fn test_invalid_toolchain_means_no_side_effects() {
    let temp_dir = TempDir::new().unwrap();
    let root = utf8_root(&temp_dir);

    // A build tree that must survive the aborted run untouched
    let build = root.join("Build");
    fs::create_dir_all(&build).unwrap();
    fs::write(build.join("precious.exe"), b"precious").unwrap();

    // The locator gate: an install root without executables is invalid,
    // so the orchestrator is never constructed and never runs a step
    let result = ToolchainPaths::from_root(root.join("no-such-vs"));
    assert!(result.is_err());

    assert!(build.join("precious.exe").is_file());
    assert_eq!(fs::read(build.join("precious.exe")).unwrap(), b"precious");
}
