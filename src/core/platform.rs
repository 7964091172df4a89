//! Platform settings a variant is resolved for.
//!
//! Values follow the recipe ecosystem's spelling (`Linux`, `Windows`, `Macos`,
//! `x86_64`, `armv8`) rather than Rust's target triple components.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating system, compiler, architecture and build type of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Platform {
    pub os: String,
    pub compiler: String,
    pub arch: String,
    pub build_type: String,
}

impl Platform {
    /// Create a new platform.
    pub fn new(os: &str, compiler: &str, arch: &str, build_type: &str) -> Self {
        Platform {
            os: os.to_string(),
            compiler: compiler.to_string(),
            arch: arch.to_string(),
            build_type: build_type.to_string(),
        }
    }

    /// Detect the host platform.
    pub fn host() -> Self {
        let os = match std::env::consts::OS {
            "linux" => "Linux",
            "windows" => "Windows",
            "macos" => "Macos",
            "android" => "Android",
            "ios" => "iOS",
            "freebsd" => "FreeBSD",
            other => other,
        };

        let arch = match std::env::consts::ARCH {
            "aarch64" => "armv8",
            "arm" => "armv7",
            "x86" => "x86",
            other => other,
        };

        Platform::new(os, Self::default_compiler(os), arch, "Release")
    }

    /// The usual compiler for an OS.
    pub fn default_compiler(os: &str) -> &'static str {
        match os {
            "Windows" => "msvc",
            "Macos" | "iOS" => "apple-clang",
            "Android" => "clang",
            _ => "gcc",
        }
    }

    /// This platform retargeted to another OS, with that OS's usual compiler.
    pub fn with_os(&self, os: &str) -> Self {
        if self.is_os(os) {
            return self.clone();
        }
        Platform {
            os: os.to_string(),
            compiler: Self::default_compiler(os).to_string(),
            arch: self.arch.clone(),
            build_type: self.build_type.clone(),
        }
    }

    /// Whether the OS matches `os`, ignoring ASCII case.
    pub fn is_os(&self, os: &str) -> bool {
        self.os.eq_ignore_ascii_case(os)
    }

    pub fn is_windows(&self) -> bool {
        self.is_os("Windows")
    }

    pub fn is_apple(&self) -> bool {
        self.is_os("Macos") || self.is_os("iOS")
    }

    /// Shared library file name prefix and suffix for this OS.
    pub fn shared_lib_affixes(&self) -> (&'static str, &'static str) {
        if self.is_windows() {
            ("", ".dll")
        } else if self.is_apple() {
            ("lib", ".dylib")
        } else {
            ("lib", ".so")
        }
    }

    /// Glob matching a shared library stem and any versioned or suffixed
    /// siblings (`libQnnHtp*.so` matches `libQnnHtpV73Stub.so`).
    pub fn library_glob(&self, stem: &str) -> String {
        let (prefix, suffix) = self.shared_lib_affixes();
        format!("{}{}*{}", prefix, stem, suffix)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::host()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.os, self.arch, self.compiler, self.build_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_glob_per_os() {
        let linux = Platform::new("Linux", "gcc", "x86_64", "Release");
        let windows = Platform::new("Windows", "msvc", "x86_64", "Release");
        let macos = Platform::new("Macos", "apple-clang", "armv8", "Release");
        let android = Platform::new("Android", "clang", "armv8", "Release");

        assert_eq!(linux.library_glob("QnnHtp"), "libQnnHtp*.so");
        assert_eq!(windows.library_glob("QnnHtp"), "QnnHtp*.dll");
        assert_eq!(macos.library_glob("QnnHtp"), "libQnnHtp*.dylib");
        assert_eq!(android.library_glob("QnnCpu"), "libQnnCpu*.so");
    }

    #[test]
    fn test_is_os_ignores_case() {
        let p = Platform::new("windows", "msvc", "x86_64", "Debug");
        assert!(p.is_windows());
        assert!(!p.is_apple());
    }

    #[test]
    fn test_with_os_switches_compiler() {
        let linux = Platform::new("Linux", "clang", "armv8", "Debug");
        let windows = linux.with_os("Windows");
        assert_eq!(windows.compiler, "msvc");
        assert_eq!(windows.arch, "armv8");
        assert_eq!(windows.build_type, "Debug");

        assert_eq!(linux.with_os("Linux"), linux);
    }

    #[test]
    fn test_host_uses_recipe_spelling() {
        let host = Platform::host();
        assert!(!host.os.is_empty());
        assert_ne!(host.arch, "aarch64");
    }
}
