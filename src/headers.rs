//! License banner insertion for the source tree.
//!
//! Walks a directory tree and prepends the project's GPL notice to every
//! eligible source file that does not already start with a comment. The
//! "already has a banner" check is deliberately crude - it only looks at the
//! first character - so a file opening with a blank line or a preprocessor
//! directive gets stamped again on top.
//!
//! Run this on a backup and diff the result before trusting it on a tree
//! with local modifications.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Directories never descended into, at any depth.
pub const EXCLUDED_DIRS: [&str; 1] = ["3rdParty"];

/// Extensions of files that receive the banner. Matched exactly, not
/// case-folded.
pub const SOURCE_EXTENSIONS: [&str; 3] = ["cpp", "h", "hlsl"];

/// The copyright notice written to the top of each source file.
pub const LICENSE_BANNER: &str = "\
//\tDX11Renderer - VDemo | DirectX11 Renderer
//\tCopyright(C) 2016  - Volkan Ilbeyli
//
//\tThis program is free software : you can redistribute it and / or modify
//\tit under the terms of the GNU General Public License as published by
//\tthe Free Software Foundation, either version 3 of the License, or
//\t(at your option) any later version.
//
//\tThis program is distributed in the hope that it will be useful,
//\tbut WITHOUT ANY WARRANTY; without even the implied warranty of
//\tMERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.See the
//\tGNU General Public License for more details.
//
//\tYou should have received a copy of the GNU General Public License
//\talong with this program.If not, see <http://www.gnu.org/licenses/>.
//
//\tContact: volkanilbeyli@gmail.com";

/// Outcome of a full traversal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    /// Files rewritten with the banner prepended
    pub stamped: usize,
    /// Eligible files left untouched (first character was already `/`)
    pub unchanged: usize,
}

/// A file is eligible only as `basename.extension` - exactly one dot - with a
/// recognized source extension.
pub fn is_eligible(file_name: &str) -> bool {
    let parts: Vec<&str> = file_name.split('.').collect();
    parts.len() == 2 && SOURCE_EXTENSIONS.contains(&parts[1])
}

fn descend_into(name: &str) -> bool {
    !EXCLUDED_DIRS.contains(&name) && !name.starts_with('.')
}

/// Walk `root` and stamp every eligible source file lacking a banner.
///
/// Traversal takes each directory as an explicit path argument; nothing
/// depends on or mutates the process working directory. Visit order within a
/// directory is whatever the OS listing returns.
pub fn insert_headers(root: &Utf8Path) -> Result<InsertReport> {
    let mut report = InsertReport::default();

    let walker = WalkDir::new(root.as_std_path()).into_iter().filter_entry(|e| {
        if e.depth() == 0 || !e.file_type().is_dir() {
            return true;
        }
        e.file_name()
            .to_str()
            .map(descend_into)
            .unwrap_or(false)
    });

    for entry in walker {
        let entry = entry.context("Failed to read directory entry")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if !is_eligible(file_name) {
            continue;
        }

        if stamp_file(entry.path())? {
            tracing::info!("Stamped {}", entry.path().display());
            report.stamped += 1;
        } else {
            report.unchanged += 1;
        }
    }

    tracing::info!(
        "Header pass complete: {} stamped, {} already had a banner",
        report.stamped,
        report.unchanged
    );

    Ok(report)
}

/// Prepend the banner to one file unless its first character is `/`.
///
/// The rewrite goes through a temporary file in the same directory followed
/// by an atomic rename, so an interrupted run never leaves a truncated file.
///
/// # Returns
/// `true` if the file was rewritten, `false` if it was left untouched.
pub fn stamp_file(path: &Path) -> Result<bool> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    // First character of the first line doubles as the banner heuristic
    if contents.starts_with('/') {
        return Ok(false);
    }

    let parent = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?;

    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file next to {}", path.display()))?;
    write!(temp_file, "{}\n\n{}", LICENSE_BANNER, contents)
        .with_context(|| format!("Failed to write banner for {}", path.display()))?;
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(true)
}
