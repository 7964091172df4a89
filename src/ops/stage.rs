//! Staging of runtime libraries.
//!
//! Staging instructions come out of resolution; this module executes them
//! against dependency install trees on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::builder::staging::StagingInstruction;
use crate::util::diagnostic::suggestions;
use crate::util::fs::{copy_into, ensure_dir, find_by_file_name};

/// A file copied (or, in a dry run, to be copied) by a stager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedFile {
    pub dependency: String,
    pub component_name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Executes staging instructions into a runtime directory.
pub trait ArtifactStager {
    fn stage(&self, instructions: &[StagingInstruction], dest: &Path) -> Result<Vec<StagedFile>>;
}

/// Stager that copies from install trees on the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsStager {
    roots: BTreeMap<String, PathBuf>,
    dry_run: bool,
}

impl FsStager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the install root of a dependency.
    pub fn with_root(mut self, dependency: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.roots.insert(dependency.into(), root.into());
        self
    }

    /// Register a root from a `name=dir` argument.
    pub fn with_root_arg(self, arg: &str) -> Result<Self> {
        let Some((name, dir)) = arg.split_once('=') else {
            bail!("expected `<dependency>=<dir>`, got `{}`", arg);
        };
        let (name, dir) = (name.trim(), dir.trim());
        if name.is_empty() || dir.is_empty() {
            bail!("expected `<dependency>=<dir>`, got `{}`", arg);
        }
        Ok(self.with_root(name, dir))
    }

    /// Only report what would be copied.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn root_for(&self, dependency: &str) -> Result<&Path> {
        let Some(root) = self.roots.get(dependency) else {
            bail!(
                "no install root given for dependency `{}`\n\
                 help: {}",
                dependency,
                suggestions::MISSING_STAGE_ROOT
            );
        };
        if !root.is_dir() {
            bail!(
                "install root for `{}` is not a directory: {}",
                dependency,
                root.display()
            );
        }
        Ok(root)
    }
}

impl ArtifactStager for FsStager {
    fn stage(&self, instructions: &[StagingInstruction], dest: &Path) -> Result<Vec<StagedFile>> {
        // Check every root up front so a bad invocation copies nothing.
        for instruction in instructions {
            self.root_for(&instruction.dependency)?;
        }

        let mut planned = Vec::new();
        for instruction in instructions {
            let root = self.root_for(&instruction.dependency)?;
            let sources = find_by_file_name(root, &instruction.source_glob)?;

            if sources.is_empty() {
                tracing::warn!(
                    "No files matching `{}` for {} component `{}` under {}",
                    instruction.source_glob,
                    instruction.dependency,
                    instruction.component_name,
                    root.display()
                );
            }

            for source in sources {
                let destination = source
                    .file_name()
                    .map(|name| dest.join(name))
                    .with_context(|| format!("not a file: {}", source.display()))?;

                planned.push(StagedFile {
                    dependency: instruction.dependency.clone(),
                    component_name: instruction.component_name.clone(),
                    source,
                    destination,
                });
            }
        }

        check_collisions(&planned)?;

        if !self.dry_run {
            if !instructions.is_empty() {
                ensure_dir(dest)?;
            }
            for file in &planned {
                tracing::debug!("Staging {} into {}", file.source.display(), dest.display());
                copy_into(&file.source, dest)?;
            }
        }

        Ok(planned)
    }
}

/// Fail if two different source files would land on the same destination.
///
/// Install trees often hold one folder per target with identically named
/// libraries; the runtime directory is flat.
fn check_collisions(planned: &[StagedFile]) -> Result<()> {
    let mut by_destination: BTreeMap<&Path, Vec<&Path>> = BTreeMap::new();
    for file in planned {
        let sources = by_destination.entry(&file.destination).or_default();
        if !sources.contains(&file.source.as_path()) {
            sources.push(&file.source);
        }
    }

    for (destination, sources) in by_destination {
        if sources.len() > 1 {
            let listed: Vec<String> = sources
                .iter()
                .map(|s| format!("  {}", s.display()))
                .collect();
            bail!(
                "{} files would be staged as {}:\n{}\n\
                 help: point `--dep` at the library directory for this platform",
                sources.len(),
                destination.display(),
                listed.join("\n")
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Recipe;
    use crate::resolver::resolve;
    use crate::test_support::{android, linux, raw, InstallTreeFixture};
    use tempfile::TempDir;

    fn qnn_instructions() -> Vec<StagingInstruction> {
        resolve(&Recipe::edgerunner(), &raw(&[("with_npu", true)]), &linux())
            .unwrap()
            .staging_instructions
    }

    fn file_names(staged: &[StagedFile]) -> Vec<String> {
        staged
            .iter()
            .map(|f| f.destination.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_stage_qnn_backends() {
        let sdk = InstallTreeFixture::qnn_linux();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("bin");

        let stager = FsStager::new().with_root("qnn", sdk.root());
        let staged = stager.stage(&qnn_instructions(), &dest).unwrap();

        assert_eq!(
            file_names(&staged),
            vec![
                "libQnnCpu.so",
                "libQnnGpu.so",
                "libQnnHtp.so",
                "libQnnHtpPrepare.so",
                "libQnnHtpV73Stub.so",
                "libQnnSystem.so",
            ]
        );
        assert!(dest.join("libQnnHtpV73Stub.so").is_file());
        assert!(!dest.join("libQnnSaver.so").exists());
        assert!(!dest.join("README.txt").exists());
        assert_eq!(staged[2].component_name, "htp");
    }

    #[test]
    fn test_dry_run_copies_nothing() {
        let sdk = InstallTreeFixture::qnn_linux();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("bin");

        let staged = FsStager::new()
            .with_root("qnn", sdk.lib_dir())
            .dry_run(true)
            .stage(&qnn_instructions(), &dest)
            .unwrap();

        assert_eq!(staged.len(), 6);
        assert!(!dest.exists());
    }

    #[test]
    fn test_missing_root_fails_before_copying() {
        let out = TempDir::new().unwrap();
        let dest = out.path().join("bin");

        let err = FsStager::new()
            .stage(&qnn_instructions(), &dest)
            .unwrap_err();

        assert!(err.to_string().contains("no install root given for dependency `qnn`"));
        assert!(err.to_string().contains("--dep"));
        assert!(!dest.exists());
    }

    #[test]
    fn test_no_instructions_is_noop() {
        let out = TempDir::new().unwrap();
        let staged = FsStager::new().stage(&[], out.path()).unwrap();
        assert!(staged.is_empty());
    }

    #[test]
    fn test_root_arg_parsing() {
        assert!(FsStager::new().with_root_arg("qnn=/opt/qnn").is_ok());
        assert!(FsStager::new().with_root_arg("qnn").is_err());
        assert!(FsStager::new().with_root_arg("=/opt/qnn").is_err());
    }

    #[test]
    fn test_same_name_in_two_target_folders_fails() {
        let sdk = InstallTreeFixture::with_libs(&[
            "aarch64-android/libQnnHtp.so",
            "x86_64-linux-clang/libQnnHtp.so",
        ]);
        let out = TempDir::new().unwrap();
        let dest = out.path().join("bin");

        let instructions =
            resolve(&Recipe::edgerunner(), &raw(&[("with_npu", true)]), &android())
                .unwrap()
                .staging_instructions;

        let err = FsStager::new()
            .with_root("qnn", sdk.root())
            .stage(&instructions, &dest)
            .unwrap_err()
            .to_string();

        assert!(err.contains("2 files would be staged as"));
        assert!(err.contains("aarch64-android"));
        assert!(err.contains("x86_64-linux-clang"));
        assert!(!dest.exists());

        // Pointing at one target folder stages cleanly.
        let staged = FsStager::new()
            .with_root("qnn", sdk.lib_dir().join("aarch64-android"))
            .stage(&instructions, &dest)
            .unwrap();
        assert_eq!(staged.len(), 1);
        assert_eq!(
            std::fs::read_to_string(dest.join("libQnnHtp.so")).unwrap(),
            "fake library aarch64-android/libQnnHtp.so"
        );
    }
}
