//! Sub-option propagation.
//!
//! Each included dependency gets a fresh bundle built from its own rules.
//! A rule may read flags and, through `flag_if_included`, the presence of
//! another dependency; it never reads another bundle.

use crate::core::dependency::{DependencyDecl, RuleValue};
use crate::core::flag::ValidatedOptions;
use crate::core::variant::{ResolvedDependency, SubOptions};
use crate::resolver::graph::DependencyGraph;

/// Dependencies with their assigned sub-options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagatedGraph {
    pub requires: Vec<ResolvedDependency>,
    pub test_requires: Vec<ResolvedDependency>,
}

/// Evaluate one rule value.
pub fn rule_value(value: &RuleValue, options: &ValidatedOptions, graph: &DependencyGraph) -> bool {
    match value {
        RuleValue::Const(v) => *v,
        RuleValue::Flag(flag) => options.is_enabled(flag),
        RuleValue::FlagIfIncluded { flag, dependency } => {
            options.is_enabled(flag) && graph.includes(dependency)
        }
    }
}

/// Build the sub-option bundle of one dependency.
pub fn bundle_for(
    decl: &DependencyDecl,
    options: &ValidatedOptions,
    graph: &DependencyGraph,
) -> SubOptions {
    let mut bundle = SubOptions::new();
    for rule in &decl.rules {
        let value = rule_value(&rule.value, options, graph);
        tracing::debug!("Setting `{}:{}` = {}", decl.name, rule.option, value);
        bundle.set(&rule.option, value);
    }
    bundle
}

/// Assign sub-options to every included dependency, in declaration order.
pub fn propagate(options: &ValidatedOptions, graph: &DependencyGraph) -> PropagatedGraph {
    let resolve = |decl: &DependencyDecl| ResolvedDependency {
        name: decl.name.clone(),
        version: decl.version.clone(),
        kind: decl.kind,
        transitive_headers: decl.transitive_headers,
        sub_options: bundle_for(decl, options, graph),
    };

    PropagatedGraph {
        requires: graph.requires().iter().map(|&d| resolve(d)).collect(),
        test_requires: graph.test_requires().iter().map(|&d| resolve(d)).collect(),
    }
}
