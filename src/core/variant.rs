//! Resolved build variants.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::core::dependency::DependencyKind;
use crate::core::flag::ValidatedOptions;
use crate::core::platform::Platform;

/// Ordered sub-option bundle of one dependency.
///
/// Keys keep the position of their first assignment; reassigning a key
/// overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubOptions {
    entries: Vec<(String, bool)>,
}

impl SubOptions {
    pub fn new() -> Self {
        SubOptions::default()
    }

    pub fn set(&mut self, name: &str, value: bool) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Serialize for SubOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// An included dependency with its assigned sub-options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDependency {
    pub name: String,
    pub version: String,
    #[serde(skip)]
    pub kind: DependencyKind,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub transitive_headers: bool,
    pub sub_options: SubOptions,
}

impl ResolvedDependency {
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

/// One fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildVariant {
    pub platform: Platform,
    pub options: ValidatedOptions,
    pub dependencies: Vec<ResolvedDependency>,
    pub test_dependencies: Vec<ResolvedDependency>,
}

impl BuildVariant {
    /// Included dependency by name, regular or test.
    pub fn dependency(&self, name: &str) -> Option<&ResolvedDependency> {
        self.dependencies
            .iter()
            .chain(&self.test_dependencies)
            .find(|d| d.name == name)
    }

    pub fn includes(&self, name: &str) -> bool {
        self.dependency(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_options_overwrite_in_place() {
        let mut opts = SubOptions::new();
        opts.set("with_gpu", false);
        opts.set("with_nnapi", true);
        opts.set("with_gpu", true);

        let keys: Vec<_> = opts.iter().collect();
        assert_eq!(keys, vec![("with_gpu", true), ("with_nnapi", true)]);
        assert_eq!(opts.len(), 2);
    }

    #[test]
    fn test_resolved_dependency_json() {
        let mut sub_options = SubOptions::new();
        sub_options.set("with_gpu", true);

        let dep = ResolvedDependency {
            name: "tensorflow-lite".into(),
            version: "2.12.0".into(),
            kind: DependencyKind::Requires,
            transitive_headers: false,
            sub_options,
        };

        let json = serde_json::to_string(&dep).unwrap();
        assert_eq!(
            json,
            r#"{"name":"tensorflow-lite","version":"2.12.0","subOptions":{"with_gpu":true}}"#
        );
        assert_eq!(dep.reference(), "tensorflow-lite/2.12.0");
    }
}
