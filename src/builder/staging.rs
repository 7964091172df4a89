//! Staging instructions for runtime libraries.
//!
//! The resolver only describes what must be copied. Copying is done by an
//! `ArtifactStager` outside the core (see `ops::stage`).

use serde::Serialize;

use crate::core::platform::Platform;
use crate::core::recipe::Recipe;
use crate::core::variant::ResolvedDependency;
use crate::resolver::errors::ResolveError;

/// Copy the libraries matching `source_glob` from a dependency's install tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingInstruction {
    pub dependency: String,
    pub component_name: String,
    pub source_glob: String,
}

/// Plan staging for the included dependencies.
///
/// Fails if a staging rule names a component its dependency does not declare.
pub fn plan_staging(
    recipe: &Recipe,
    included: &[ResolvedDependency],
    platform: &Platform,
) -> Result<Vec<StagingInstruction>, ResolveError> {
    let mut instructions = Vec::new();

    for dep in included {
        let Some(decl) = recipe.dependencies.iter().find(|d| d.name == dep.name) else {
            continue;
        };

        for rule in &decl.staging {
            if !decl.declares_component(&rule.component) {
                return Err(ResolveError::MissingDependencyComponent {
                    package: decl.name.clone(),
                    component: rule.component.clone(),
                    declared: decl.components.clone(),
                });
            }

            instructions.push(StagingInstruction {
                dependency: decl.name.clone(),
                component_name: rule.component.clone(),
                source_glob: platform.library_glob(&rule.library),
            });
        }
    }

    Ok(instructions)
}
