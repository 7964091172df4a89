//! On-disk fixtures for staging tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A fake dependency install tree with a `lib/` directory of library files.
pub struct InstallTreeFixture {
    dir: TempDir,
}

impl InstallTreeFixture {
    /// Create an install tree containing the given files under `lib/`.
    ///
    /// Names may contain subdirectories (`hexagon-v73/libQnnHtpV73Skel.so`).
    pub fn with_libs(files: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join("lib").join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, format!("fake library {}", file)).unwrap();
        }
        InstallTreeFixture { dir }
    }

    /// A QNN SDK layout for Linux.
    pub fn qnn_linux() -> Self {
        Self::with_libs(&[
            "libQnnCpu.so",
            "libQnnGpu.so",
            "libQnnHtp.so",
            "libQnnHtpPrepare.so",
            "libQnnHtpV73Stub.so",
            "libQnnSystem.so",
            "libQnnSaver.so",
            "README.txt",
        ])
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.dir.path().join("lib")
    }
}
