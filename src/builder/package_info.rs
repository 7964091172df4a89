//! Consumer metadata: exported defines and published libraries.

use serde::Serialize;

use crate::core::flag::ValidatedOptions;
use crate::core::recipe::Recipe;

/// What consumers of the built library need to compile and link against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportedMetadata {
    /// Preprocessor defines, in flag-declaration order
    pub defines: Vec<String>,
    /// Library names to link
    pub libs: Vec<String>,
}

impl ExportedMetadata {
    /// Compiler flags for the defines, e.g. `-DEDGERUNNER_GPU`.
    pub fn define_flags(&self) -> Vec<String> {
        self.defines.iter().map(|d| format!("-D{}", d)).collect()
    }

    /// Linker flags for the libraries, e.g. `-ledgerunner`.
    pub fn lib_flags(&self) -> Vec<String> {
        self.libs.iter().map(|l| format!("-l{}", l)).collect()
    }
}

/// Emit consumer metadata.
///
/// One define per enabled flag that declares one, walked in declaration
/// order. `libs` is the recipe's published list, independent of flags.
pub fn emit_metadata(recipe: &Recipe, options: &ValidatedOptions) -> ExportedMetadata {
    let defines = recipe
        .flags
        .iter()
        .filter(|flag| options.is_enabled(&flag.name))
        .filter_map(|flag| flag.define.clone())
        .collect();

    ExportedMetadata {
        defines,
        libs: recipe.libs.clone(),
    }
}
