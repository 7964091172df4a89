//! Dependency declarations.
//!
//! A DependencyDecl describes one requirement of the recipe: its version pin,
//! the predicate deciding whether it is included, the rules assigning its
//! sub-options, and the runtime components that must be staged with it.

use serde::{Deserialize, Serialize};

use crate::core::predicate::Predicate;

/// How a dependency is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Regular requirement of the library
    #[default]
    Requires,
    /// Only needed to build and run the test suite
    TestRequires,
}

/// A declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDecl {
    pub name: String,

    /// Version pin, e.g. `2.12.0` or `2.23.0.24.06.24`
    pub version: String,

    #[serde(default)]
    pub kind: DependencyKind,

    /// Whether the dependency's headers are exposed to our consumers
    #[serde(default)]
    pub transitive_headers: bool,

    /// Inclusion predicate
    #[serde(default)]
    pub when: Predicate,

    /// Sub-option propagation rules, applied in order
    #[serde(default)]
    pub rules: Vec<PropagationRule>,

    /// Components the dependency's package declares
    #[serde(default)]
    pub components: Vec<String>,

    /// Runtime libraries to stage when the dependency is included
    #[serde(default)]
    pub staging: Vec<StagingRule>,
}

impl DependencyDecl {
    /// An unconditional requirement.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        DependencyDecl {
            name: name.into(),
            version: version.into(),
            kind: DependencyKind::Requires,
            transitive_headers: false,
            when: Predicate::Always,
            rules: Vec::new(),
            components: Vec::new(),
            staging: Vec::new(),
        }
    }

    pub fn test_requires(mut self) -> Self {
        self.kind = DependencyKind::TestRequires;
        self
    }

    pub fn transitive_headers(mut self, enabled: bool) -> Self {
        self.transitive_headers = enabled;
        self
    }

    pub fn when(mut self, predicate: Predicate) -> Self {
        self.when = predicate;
        self
    }

    pub fn rule(mut self, option: impl Into<String>, value: RuleValue) -> Self {
        self.rules.push(PropagationRule {
            option: option.into(),
            value,
        });
        self
    }

    pub fn components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components.extend(components.into_iter().map(Into::into));
        self
    }

    pub fn stage(mut self, component: impl Into<String>, library: impl Into<String>) -> Self {
        self.staging.push(StagingRule {
            component: component.into(),
            library: library.into(),
        });
        self
    }

    /// Reference string, e.g. `fmt/10.2.1`.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    pub fn declares_component(&self, component: &str) -> bool {
        self.components.iter().any(|c| c == component)
    }
}

/// Assigns one sub-option of the owning dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationRule {
    pub option: String,
    pub value: RuleValue,
}

/// Source of a propagated sub-option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleValue {
    /// Fixed value, independent of flags
    Const(bool),
    /// Mirrors a validated flag
    Flag(String),
    /// Mirrors a flag, but only while another dependency is included
    FlagIfIncluded { flag: String, dependency: String },
}

impl RuleValue {
    pub fn flag(name: impl Into<String>) -> Self {
        RuleValue::Flag(name.into())
    }

    pub fn flag_if_included(flag: impl Into<String>, dependency: impl Into<String>) -> Self {
        RuleValue::FlagIfIncluded {
            flag: flag.into(),
            dependency: dependency.into(),
        }
    }
}

/// A runtime library to copy out of a dependency's install tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingRule {
    pub component: String,
    /// Library stem without platform prefix or suffix, e.g. `QnnHtp`
    pub library: String,
}

/// Whether two version pins denote the same version.
///
/// Equal text always matches; otherwise both must parse as semver and compare
/// equal, so `v2.12.0` and `2.12.0` agree while `2.12.0` and `2.13.0` do not.
pub fn versions_agree(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    let parse = |s: &str| semver::Version::parse(s.trim().trim_start_matches('v')).ok();
    match (parse(a), parse(b)) {
        (Some(va), Some(vb)) => va == vb,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let dep = DependencyDecl::new("qnn", "2.23.0.24.06.24")
            .when(Predicate::flag("with_npu"))
            .rule("with_tflite", RuleValue::flag_if_included("with_tflite", "tensorflow-lite"))
            .components(["cpu", "htp"])
            .stage("htp", "QnnHtp");

        assert_eq!(dep.reference(), "qnn/2.23.0.24.06.24");
        assert_eq!(dep.kind, DependencyKind::Requires);
        assert!(dep.declares_component("htp"));
        assert!(!dep.declares_component("dsp"));
        assert_eq!(dep.rules.len(), 1);
        assert_eq!(dep.staging[0].library, "QnnHtp");
    }

    #[test]
    fn test_versions_agree() {
        assert!(versions_agree("2.23.0.24.06.24", "2.23.0.24.06.24"));
        assert!(versions_agree("v2.12.0", "2.12.0"));
        assert!(!versions_agree("2.12.0", "2.13.0"));
        assert!(!versions_agree("2.23.0.24.06.24", "2.23.0"));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let dep: DependencyDecl = toml::from_str(
            r#"
            name = "tensorflow-lite"
            version = "2.12.0"
            when = { flag = "with_tflite" }
            rules = [{ option = "with_gpu", value = { flag = "with_gpu" } }]
            "#,
        )
        .unwrap();

        assert_eq!(dep.when, Predicate::flag("with_tflite"));
        assert_eq!(dep.rules[0].value, RuleValue::flag("with_gpu"));
        assert!(dep.staging.is_empty());
    }
}
