//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Find files under `root` whose file name matches `pattern`.
///
/// The pattern is matched against the file name only, at any depth.
/// Results are sorted.
pub fn find_by_file_name(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern =
        Pattern::new(pattern).with_context(|| format!("invalid glob pattern: {}", pattern))?;

    let mut results = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("walk error: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file()
            && pattern.matches(&entry.file_name().to_string_lossy())
        {
            results.push(entry.into_path());
        }
    }

    results.sort();
    Ok(results)
}

/// Copy a file into `dir`, keeping its file name. Returns the destination.
pub fn copy_into(file: &Path, dir: &Path) -> Result<PathBuf> {
    let name = file
        .file_name()
        .with_context(|| format!("not a file: {}", file.display()))?;
    let dst = dir.join(name);

    ensure_dir(dir)?;
    fs::copy(file, &dst).with_context(|| {
        format!("failed to copy {} to {}", file.display(), dst.display())
    })?;

    Ok(dst)
}
