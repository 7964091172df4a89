//! Core data structures.
//!
//! This module contains the declarative inputs of resolution and its outputs:
//! - Platforms and feature flags
//! - Predicates and platform constraints
//! - Dependency declarations and the recipe that holds them
//! - Resolved build variants

pub mod dependency;
pub mod flag;
pub mod platform;
pub mod predicate;
pub mod recipe;
pub mod variant;

pub use dependency::{DependencyDecl, DependencyKind, PropagationRule, RuleValue, StagingRule};
pub use flag::{Adjustment, AdjustmentKind, FlagDecl, RawOptions, ValidatedOptions};
pub use platform::Platform;
pub use predicate::{FlagSource, Predicate};
pub use recipe::{Constraint, Recipe, TOOLCHAIN_SCHEMA_VERSION};
pub use variant::{BuildVariant, ResolvedDependency, SubOptions};
