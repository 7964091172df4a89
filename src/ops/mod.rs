//! High-level operations.
//!
//! This module contains the implementation of edgerecipe commands: loading
//! inputs from disk, resolving single variants and matrices, staging
//! runtime libraries, and reading the package version.

pub mod matrix;
pub mod resolve;
pub mod stage;
pub mod version;

pub use matrix::{expand, resolve_matrix, MatrixEntry, MatrixOptions, MatrixOutcome};
pub use resolve::{resolve_variant, ResolveInput, ResolveOptions};
pub use stage::{ArtifactStager, FsStager, StagedFile};
pub use version::{CMakeProjectVersion, StaticVersion, VersionSource};
