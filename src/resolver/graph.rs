//! Dependency list construction.
//!
//! One pass over the declared dependency table: each inclusion predicate is
//! evaluated against the validated options, duplicates collapse onto their
//! first included declaration, and disagreeing versions fail.

use std::collections::HashMap;

use crate::core::dependency::{versions_agree, DependencyDecl, DependencyKind};
use crate::core::flag::ValidatedOptions;
use crate::core::platform::Platform;
use crate::core::recipe::Recipe;
use crate::resolver::errors::ResolveError;

/// Included dependencies, in declaration order.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'r> {
    requires: Vec<&'r DependencyDecl>,
    test_requires: Vec<&'r DependencyDecl>,
}

impl<'r> DependencyGraph<'r> {
    pub fn requires(&self) -> &[&'r DependencyDecl] {
        &self.requires
    }

    pub fn test_requires(&self) -> &[&'r DependencyDecl] {
        &self.test_requires
    }

    /// All included declarations, regular requirements first.
    pub fn iter(&self) -> impl Iterator<Item = &'r DependencyDecl> + '_ {
        self.requires.iter().chain(&self.test_requires).copied()
    }

    pub fn includes(&self, name: &str) -> bool {
        self.iter().any(|d| d.name == name)
    }
}

/// Evaluate the recipe's inclusion predicates.
pub fn build_graph<'r>(
    recipe: &'r Recipe,
    options: &ValidatedOptions,
    platform: &Platform,
) -> Result<DependencyGraph<'r>, ResolveError> {
    let mut graph = DependencyGraph {
        requires: Vec::new(),
        test_requires: Vec::new(),
    };
    let mut included: HashMap<&str, &DependencyDecl> = HashMap::new();

    for decl in &recipe.dependencies {
        if !decl.when.eval(options, platform) {
            tracing::debug!("Skipping `{}`: predicate not satisfied", decl.reference());
            continue;
        }

        if let Some(first) = included.get(decl.name.as_str()) {
            if !versions_agree(&first.version, &decl.version) {
                return Err(ResolveError::DependencyConflict {
                    package: decl.name.clone(),
                    first: first.version.clone(),
                    second: decl.version.clone(),
                });
            }
            tracing::debug!(
                "Collapsing duplicate `{}` onto {}",
                decl.reference(),
                first.reference()
            );
            continue;
        }

        tracing::debug!("Including `{}`", decl.reference());
        included.insert(decl.name.as_str(), decl);
        match decl.kind {
            DependencyKind::Requires => graph.requires.push(decl),
            DependencyKind::TestRequires => graph.test_requires.push(decl),
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::predicate::Predicate;
    use crate::resolver::constraints::resolve_options;
    use crate::test_support::{linux, raw};

    fn names(deps: &[&DependencyDecl]) -> Vec<String> {
        deps.iter().map(|d| d.name.clone()).collect()
    }

    fn graph_for(recipe: &Recipe, pairs: &[(&str, bool)]) -> Result<Vec<String>, ResolveError> {
        let options = resolve_options(recipe, &raw(pairs), &linux())?;
        let graph = build_graph(recipe, &options, &linux())?;
        Ok(names(graph.requires()))
    }

    #[test]
    fn test_default_graph() {
        let recipe = Recipe::edgerunner();
        assert_eq!(
            graph_for(&recipe, &[]).unwrap(),
            vec!["fmt", "span-lite", "tensorflow-lite"]
        );
    }

    #[test]
    fn test_every_backend_enabled() {
        let recipe = Recipe::edgerunner();
        let deps = graph_for(
            &recipe,
            &[("with_npu", true), ("with_gpu", true), ("examples", true)],
        )
        .unwrap();

        assert_eq!(
            deps,
            vec!["fmt", "span-lite", "tensorflow-lite", "qnn", "opencv"]
        );
    }

    #[test]
    fn test_tflite_disabled_drops_backend() {
        let recipe = Recipe::edgerunner();
        let deps = graph_for(&recipe, &[("with_tflite", false), ("with_gpu", true)]).unwrap();
        assert_eq!(deps, vec!["fmt", "span-lite"]);
    }

    #[test]
    fn test_test_requirements_are_separate() {
        let recipe = Recipe::edgerunner();
        let options = resolve_options(&recipe, &raw(&[]), &linux()).unwrap();
        let graph = build_graph(&recipe, &options, &linux()).unwrap();

        assert_eq!(names(graph.test_requires()), vec!["catch2"]);
        assert!(graph.includes("catch2"));
        assert!(!graph.includes("qnn"));
    }

    #[test]
    fn test_duplicate_with_same_version_collapses() {
        let mut recipe = Recipe::edgerunner();
        recipe.dependencies.push(
            DependencyDecl::new("fmt", "10.2.1").when(Predicate::flag("examples")),
        );

        let deps = graph_for(&recipe, &[("examples", true)]).unwrap();
        assert_eq!(deps.iter().filter(|n| *n == "fmt").count(), 1);
        assert_eq!(deps[0], "fmt");
    }

    #[test]
    fn test_duplicate_with_other_version_conflicts() {
        let mut recipe = Recipe::edgerunner();
        recipe.dependencies.push(
            DependencyDecl::new("opencv", "4.5.5").when(Predicate::flag("with_gpu")),
        );

        let err = graph_for(&recipe, &[("examples", true), ("with_gpu", true)]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::DependencyConflict {
                package: "opencv".into(),
                first: "4.9.0".into(),
                second: "4.5.5".into(),
            }
        );
    }

    #[test]
    fn test_excluded_duplicate_does_not_conflict() {
        let mut recipe = Recipe::edgerunner();
        recipe.dependencies.push(
            DependencyDecl::new("opencv", "4.5.5").when(Predicate::flag("with_gpu")),
        );

        let deps = graph_for(&recipe, &[("examples", true)]).unwrap();
        assert!(deps.contains(&"opencv".to_string()));
    }
}
