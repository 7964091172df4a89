//! Package version discovery.
//!
//! The package version is not a resolution input; it only decorates the
//! output as `name/version`. It normally comes from the `project()` call in
//! the top-level `CMakeLists.txt`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::util::fs::read_to_string;

/// Where a package version comes from.
pub trait VersionSource {
    fn version(&self) -> Result<String>;
}

/// A fixed version.
#[derive(Debug, Clone)]
pub struct StaticVersion(pub String);

impl VersionSource for StaticVersion {
    fn version(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Reads `VERSION` from the `project()` command of a CMake file.
#[derive(Debug, Clone)]
pub struct CMakeProjectVersion {
    pub path: PathBuf,
}

impl CMakeProjectVersion {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CMakeProjectVersion { path: path.into() }
    }

    /// `CMakeLists.txt` in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("CMakeLists.txt"))
    }
}

impl VersionSource for CMakeProjectVersion {
    fn version(&self) -> Result<String> {
        let contents = read_to_string(&self.path)?;
        parse_project_version(&contents).with_context(|| {
            format!(
                "no `project(<name> VERSION <x.y.z>)` in {}",
                self.path.display()
            )
        })
    }
}

/// `project(<name> ... VERSION <x.y.z> ...)`, across lines.
static PROJECT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bproject\s*\(\s*[\w-]+\s+(?:[^)]*?\s)?VERSION\s+([0-9][0-9A-Za-z.\-]*)")
        .unwrap()
});

/// Extract the version from the first `project()` call that declares one.
pub fn parse_project_version(contents: &str) -> Option<String> {
    let text: String = contents
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");

    PROJECT_VERSION.captures(&text).map(|c| c[1].to_string())
}
