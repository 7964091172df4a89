//! Recipe declarations.
//!
//! A Recipe is the full declarative input of the resolver: flags, platform
//! constraints, dependencies with their propagation rules, and the libraries
//! the package publishes. `Recipe::edgerunner()` is the built-in table; other
//! recipes can be loaded from TOML with the same schema.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::dependency::{DependencyDecl, RuleValue};
use crate::core::flag::FlagDecl;
use crate::core::predicate::Predicate;

/// Version of the toolchain variable key set emitted for a recipe.
pub const TOOLCHAIN_SCHEMA_VERSION: u32 = 1;

/// A platform constraint on one flag.
///
/// Constraints are applied by kind: every `remove`, then every `force`, then
/// every `reject`, each group in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Drop the flag from the snapshot.
    Remove {
        flag: String,
        when: Predicate,
        reason: String,
    },
    /// Set the flag to a platform-safe value.
    Force {
        flag: String,
        value: bool,
        when: Predicate,
        reason: String,
    },
    /// Fail the resolution if the flag is still enabled.
    Reject {
        flag: String,
        when: Predicate,
        reason: String,
    },
}

impl Constraint {
    pub fn flag(&self) -> &str {
        match self {
            Constraint::Remove { flag, .. }
            | Constraint::Force { flag, .. }
            | Constraint::Reject { flag, .. } => flag,
        }
    }

    pub fn when(&self) -> &Predicate {
        match self {
            Constraint::Remove { when, .. }
            | Constraint::Force { when, .. }
            | Constraint::Reject { when, .. } => when,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Constraint::Remove { reason, .. }
            | Constraint::Force { reason, .. }
            | Constraint::Reject { reason, .. } => reason,
        }
    }
}

/// Declarative recipe for one library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,

    #[serde(default)]
    pub flags: Vec<FlagDecl>,

    #[serde(default)]
    pub constraints: Vec<Constraint>,

    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,

    /// Published library names
    #[serde(default)]
    pub libs: Vec<String>,
}

impl Recipe {
    /// The built-in edgerunner recipe.
    pub fn edgerunner() -> Self {
        let flags = vec![
            FlagDecl::new("shared", false).with_description("Build a shared library"),
            FlagDecl::new("fPIC", true).with_description("Position-independent static library"),
            FlagDecl::new("with_gpu", false)
                .with_define("EDGERUNNER_GPU")
                .with_toolchain_variable("edgerunner_ENABLE_GPU")
                .with_description("GPU delegate support"),
            FlagDecl::new("with_npu", false)
                .with_define("EDGERUNNER_QNN")
                .with_toolchain_variable("edgerunner_ENABLE_NPU")
                .with_description("Qualcomm NPU backend (QNN)"),
            FlagDecl::new("with_tflite", true)
                .with_define("EDGERUNNER_TFLITE")
                .with_toolchain_variable("edgerunner_ENABLE_TFLITE")
                .with_description("TensorFlow Lite inference backend"),
            FlagDecl::new("examples", false)
                .with_toolchain_variable("edgerunner_BUILD_EXAMPLES")
                .with_description("Build the example applications"),
        ];

        let constraints = vec![
            Constraint::Remove {
                flag: "fPIC".into(),
                when: Predicate::os("Windows"),
                reason: "position-independent code is not an option on Windows".into(),
            },
            Constraint::Remove {
                flag: "fPIC".into(),
                when: Predicate::flag("shared"),
                reason: "shared libraries are always position-independent".into(),
            },
            Constraint::Force {
                flag: "with_npu".into(),
                value: false,
                when: Predicate::Any(vec![Predicate::os("Macos"), Predicate::os("iOS")]),
                reason: "no QNN runtime is published for Apple platforms".into(),
            },
            Constraint::Reject {
                flag: "with_npu".into(),
                when: Predicate::not(Predicate::Any(vec![
                    Predicate::arch("x86_64"),
                    Predicate::arch("armv8"),
                ])),
                reason: "the QNN runtime is only published for x86_64 and armv8".into(),
            },
        ];

        let opencv_bundle = [
            ("with_quirc", false),
            ("with_ffmpeg", false),
            ("with_tesseract", false),
            ("with_openexr", false),
            ("with_tiff", false),
            ("with_webp", false),
            ("with_msmf", false),
            ("with_eigen", true),
        ];
        let opencv = opencv_bundle.iter().fold(
            DependencyDecl::new("opencv", "4.9.0").when(Predicate::flag("examples")),
            |dep, (option, value)| dep.rule(*option, RuleValue::Const(*value)),
        );

        let dependencies = vec![
            DependencyDecl::new("fmt", "10.2.1"),
            DependencyDecl::new("span-lite", "0.11.0").transitive_headers(true),
            DependencyDecl::new("tensorflow-lite", "2.12.0")
                .when(Predicate::flag("with_tflite"))
                .rule("with_gpu", RuleValue::flag("with_gpu")),
            DependencyDecl::new("qnn", "2.23.0.24.06.24")
                .when(Predicate::flag("with_npu"))
                .rule(
                    "with_tflite",
                    RuleValue::flag_if_included("with_tflite", "tensorflow-lite"),
                )
                .components(["cpu", "gpu", "htp", "system"])
                .stage("cpu", "QnnCpu")
                .stage("gpu", "QnnGpu")
                .stage("htp", "QnnHtp")
                .stage("system", "QnnSystem"),
            opencv,
            DependencyDecl::new("catch2", "3.6.0").test_requires(),
        ];

        Recipe {
            name: "edgerunner".to_string(),
            flags,
            constraints,
            dependencies,
            libs: vec!["edgerunner".to_string()],
        }
    }

    /// Parse a recipe from TOML and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let recipe: Recipe = toml::from_str(s).context("failed to parse recipe")?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Load and validate a recipe file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid recipe: {}", path.display()))
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize recipe")
    }

    /// Look up a declared flag.
    pub fn flag(&self, name: &str) -> Option<&FlagDecl> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.flag(name).is_some()
    }

    /// Declared flag names, in declaration order.
    pub fn flag_names(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|f| f.name.as_str())
    }

    /// Check that every name the recipe references is declared.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for flag in &self.flags {
            if !seen.insert(flag.name.as_str()) {
                bail!("flag `{}` is declared more than once", flag.name);
            }
        }

        let dep_names: HashSet<&str> = self.dependencies.iter().map(|d| d.name.as_str()).collect();

        let check_flag = |name: &str, context: &str| -> Result<()> {
            if !self.is_declared(name) {
                bail!("{} references undeclared flag `{}`", context, name);
            }
            Ok(())
        };

        for constraint in &self.constraints {
            let context = format!("constraint on `{}`", constraint.flag());
            check_flag(constraint.flag(), &context)?;
            for name in constraint.when().referenced_flags() {
                check_flag(name, &context)?;
            }
        }

        for dep in &self.dependencies {
            let context = format!("dependency `{}`", dep.name);
            if dep.version.trim().is_empty() {
                bail!("{} has an empty version", context);
            }
            for name in dep.when.referenced_flags() {
                check_flag(name, &context)?;
            }
            for rule in &dep.rules {
                match &rule.value {
                    RuleValue::Const(_) => {}
                    RuleValue::Flag(flag) => check_flag(flag, &context)?,
                    RuleValue::FlagIfIncluded { flag, dependency } => {
                        check_flag(flag, &context)?;
                        if !dep_names.contains(dependency.as_str()) {
                            bail!(
                                "{} rule `{}` references undeclared dependency `{}`",
                                context,
                                rule.option,
                                dependency
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
