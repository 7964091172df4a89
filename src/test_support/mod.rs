//! Test utilities for edgerecipe unit tests.
//!
//! Platform and option fixtures shared by the resolver, builder and ops
//! tests, plus on-disk install-tree fixtures for staging tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use edgerecipe::test_support::{linux, raw};
//!
//! let res = resolve(&Recipe::edgerunner(), &raw(&[("with_gpu", true)]), &linux())?;
//! ```

pub mod fixtures;

use crate::core::flag::RawOptions;
use crate::core::platform::Platform;

pub use fixtures::*;

/// A platform with default compiler and `Release` build type for its OS.
pub fn platform(os: &str, arch: &str) -> Platform {
    Platform::new(os, Platform::default_compiler(os), arch, "Release")
}

pub fn linux() -> Platform {
    platform("Linux", "x86_64")
}

pub fn windows() -> Platform {
    platform("Windows", "x86_64")
}

pub fn macos() -> Platform {
    platform("Macos", "armv8")
}

pub fn android() -> Platform {
    platform("Android", "armv8")
}

/// Raw options from `(name, value)` pairs.
pub fn raw(pairs: &[(&str, bool)]) -> RawOptions {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}
