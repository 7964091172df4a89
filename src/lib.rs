//! edgerecipe - build-variant resolution for the edgerunner inference library
//!
//! This crate turns a platform and a set of requested feature flags into one
//! fully resolved build variant: validated options, the dependency set with
//! propagated sub-options, toolchain variables, exported compile metadata
//! and runtime staging instructions.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test fixtures for edgerecipe unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides platform and option fixtures and fake
/// dependency install trees.
#[cfg(test)]
pub mod test_support;

pub use core::{
    flag::RawOptions, platform::Platform, recipe::Recipe, variant::BuildVariant,
};

pub use resolver::{resolve, Resolution, ResolveError};
