//! Toolchain variable emission.
//!
//! Produces the boolean cache variables the native build reads, one per
//! flag that declares a toolchain variable. The key set is fixed by the
//! recipe and versioned by `TOOLCHAIN_SCHEMA_VERSION`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::core::flag::ValidatedOptions;
use crate::core::recipe::{Recipe, TOOLCHAIN_SCHEMA_VERSION};

/// A single toolchain variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainVariable {
    pub name: String,
    pub value: bool,
}

impl ToolchainVariable {
    /// Render as a CMake cache definition, e.g. `-Dedgerunner_ENABLE_GPU=ON`.
    pub fn to_cmake_arg(&self) -> String {
        format!("-D{}={}", self.name, if self.value { "ON" } else { "OFF" })
    }
}

/// Ordered toolchain variables of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainVariables {
    schema_version: u32,
    variables: Vec<ToolchainVariable>,
}

impl ToolchainVariables {
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolchainVariable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// CMake `-D` arguments for every variable.
    pub fn to_cmake_args(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.to_cmake_arg()).collect()
    }
}

impl Serialize for ToolchainVariables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.variables.len()))?;
        for v in &self.variables {
            map.serialize_entry(&v.name, &v.value)?;
        }
        map.end()
    }
}

/// Emit toolchain variables for validated options.
///
/// Total: every declared variable is present. Removed or disabled flags
/// emit `false`.
pub fn emit(recipe: &Recipe, options: &ValidatedOptions) -> ToolchainVariables {
    let variables = recipe
        .flags
        .iter()
        .filter_map(|flag| {
            flag.toolchain_variable.as_ref().map(|name| ToolchainVariable {
                name: name.clone(),
                value: options.is_enabled(&flag.name),
            })
        })
        .collect();

    ToolchainVariables {
        schema_version: TOOLCHAIN_SCHEMA_VERSION,
        variables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flag::FlagDecl;
    use crate::resolver::constraints::resolve_options;
    use crate::test_support::{linux, macos, raw};

    #[test]
    fn test_gpu_scenario() {
        let recipe = Recipe::edgerunner();
        let options = resolve_options(
            &recipe,
            &raw(&[
                ("with_gpu", true),
                ("with_npu", false),
                ("with_tflite", true),
                ("examples", false),
            ]),
            &linux(),
        )
        .unwrap();

        let vars = emit(&recipe, &options);
        let pairs: Vec<_> = vars.iter().map(|v| (v.name.as_str(), v.value)).collect();
        assert_eq!(
            pairs,
            vec![
                ("edgerunner_ENABLE_GPU", true),
                ("edgerunner_ENABLE_NPU", false),
                ("edgerunner_ENABLE_TFLITE", true),
                ("edgerunner_BUILD_EXAMPLES", false),
            ]
        );
        assert_eq!(vars.schema_version(), TOOLCHAIN_SCHEMA_VERSION);
    }

    #[test]
    fn test_forced_flag_emits_false() {
        let recipe = Recipe::edgerunner();
        let options = resolve_options(&recipe, &raw(&[("with_npu", true)]), &macos()).unwrap();

        let vars = emit(&recipe, &options);
        assert_eq!(vars.get("edgerunner_ENABLE_NPU"), Some(false));
        assert_eq!(vars.len(), 4);
    }

    #[test]
    fn test_removed_flag_emits_false() {
        let mut recipe = Recipe::edgerunner();
        recipe.flags[1] =
            FlagDecl::new("fPIC", true).with_toolchain_variable("CMAKE_POSITION_INDEPENDENT_CODE");

        let options = resolve_options(&recipe, &raw(&[("shared", true)]), &linux()).unwrap();
        let vars = emit(&recipe, &options);
        assert_eq!(vars.get("CMAKE_POSITION_INDEPENDENT_CODE"), Some(false));
    }

    #[test]
    fn test_cmake_args_and_json() {
        let recipe = Recipe::edgerunner();
        let options = resolve_options(&recipe, &raw(&[("examples", true)]), &linux()).unwrap();
        let vars = emit(&recipe, &options);

        assert_eq!(
            vars.to_cmake_args(),
            vec![
                "-Dedgerunner_ENABLE_GPU=OFF",
                "-Dedgerunner_ENABLE_NPU=OFF",
                "-Dedgerunner_ENABLE_TFLITE=ON",
                "-Dedgerunner_BUILD_EXAMPLES=ON",
            ]
        );
        assert_eq!(
            serde_json::to_string(&vars).unwrap(),
            r#"{"edgerunner_ENABLE_GPU":false,"edgerunner_ENABLE_NPU":false,"edgerunner_ENABLE_TFLITE":true,"edgerunner_BUILD_EXAMPLES":true}"#
        );
    }
}
