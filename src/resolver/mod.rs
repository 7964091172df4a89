//! Build-variant resolution.
//!
//! This module turns `{raw options, platform}` into one resolved variant.
//! The resolver is pure and deterministic - all I/O happens before or after
//! resolution, in `ops`.
//!
//! Stages run strictly in order and never read back from a later stage:
//! constraints → dependency graph → sub-option propagation → staging plan →
//! toolchain variables and exported metadata.

pub mod constraints;
pub mod errors;
pub mod graph;
pub mod propagate;

pub use constraints::resolve_options;
pub use errors::ResolveError;
pub use graph::{build_graph, DependencyGraph};
pub use propagate::{propagate, PropagatedGraph};

use serde::Serialize;

use crate::builder::package_info::{emit_metadata, ExportedMetadata};
use crate::builder::staging::{plan_staging, StagingInstruction};
use crate::builder::toolchain::{self, ToolchainVariables};
use crate::core::flag::{Adjustment, RawOptions, ValidatedOptions};
use crate::core::platform::Platform;
use crate::core::recipe::Recipe;
use crate::core::variant::BuildVariant;
use crate::util::hash::Fingerprint;

/// A resolved variant together with its derived views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Fingerprint of settings and validated options
    pub package_id: String,

    /// `name/version` of the package itself, when a version is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    pub adjustments: Vec<Adjustment>,

    #[serde(flatten)]
    pub variant: BuildVariant,

    pub toolchain_variables: ToolchainVariables,
    pub exported_metadata: ExportedMetadata,
    pub staging_instructions: Vec<StagingInstruction>,
}

impl Resolution {
    /// Attach the package reference, e.g. `edgerunner/0.3.1`.
    pub fn with_reference(mut self, name: &str, version: &str) -> Self {
        self.reference = Some(format!("{}/{}", name, version));
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Resolve one build variant.
///
/// Every validation runs before any output is produced; on error nothing
/// partial is returned.
pub fn resolve(
    recipe: &Recipe,
    raw: &RawOptions,
    platform: &Platform,
) -> Result<Resolution, ResolveError> {
    let options = resolve_options(recipe, raw, platform)?;
    let graph = build_graph(recipe, &options, platform)?;
    let propagated = propagate(&options, &graph);
    let staging_instructions = plan_staging(recipe, &propagated.requires, platform)?;

    let toolchain_variables = toolchain::emit(recipe, &options);
    let exported_metadata = emit_metadata(recipe, &options);
    let package_id = package_id(platform, &options);
    let adjustments = options.adjustments().to_vec();

    tracing::info!(
        "Resolved {} for {} ({} dependencies, package id {})",
        recipe.name,
        platform,
        propagated.requires.len(),
        package_id
    );

    Ok(Resolution {
        package_id,
        reference: None,
        adjustments,
        variant: BuildVariant {
            platform: platform.clone(),
            options,
            dependencies: propagated.requires,
            test_dependencies: propagated.test_requires,
        },
        toolchain_variables,
        exported_metadata,
        staging_instructions,
    })
}

/// Fingerprint identifying a variant's binary configuration.
fn package_id(platform: &Platform, options: &ValidatedOptions) -> String {
    let mut fp = Fingerprint::new();
    fp.update_pair("os", &platform.os)
        .update_pair("compiler", &platform.compiler)
        .update_pair("arch", &platform.arch)
        .update_pair("build_type", &platform.build_type);

    for flag in options.iter() {
        fp.update_str(&flag.name).update_bool(flag.value);
    }

    fp.finish_short()
}
