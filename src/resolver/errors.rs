//! Resolution error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during variant resolution.
///
/// Every kind is terminal for the resolution call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("unknown option `{name}`")]
    #[diagnostic(code(edgerecipe::resolve::unknown_option))]
    UnknownOption {
        name: String,
        known: Vec<String>,
    },

    #[error("option `{flag}` is not supported on {platform}")]
    #[diagnostic(code(edgerecipe::resolve::unsupported_on_platform))]
    UnsupportedOnPlatform {
        flag: String,
        platform: String,
        reason: String,
    },

    #[error("conflicting versions for `{package}`")]
    #[diagnostic(code(edgerecipe::resolve::dependency_conflict))]
    DependencyConflict {
        package: String,
        first: String,
        second: String,
    },

    #[error("`{package}` does not declare component `{component}`")]
    #[diagnostic(code(edgerecipe::resolve::missing_component))]
    MissingDependencyComponent {
        package: String,
        component: String,
        declared: Vec<String>,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::UnknownOption { name, known } => {
                let mut diag = Diagnostic::error(format!("unknown option `{}`", name));

                if let Some(close) = closest_match(name, known) {
                    diag = diag.with_context(format!("did you mean `{}`?", close));
                }

                diag.with_context(format!("declared options: {}", known.join(", ")))
                    .with_suggestion(suggestions::LIST_OPTIONS)
            }

            ResolveError::UnsupportedOnPlatform {
                flag,
                platform,
                reason,
            } => Diagnostic::error(format!("`{}` cannot be enabled on {}", flag, platform))
                .with_context(reason.clone())
                .with_suggestion(format!("Disable it with `-o {}=False`", flag))
                .with_suggestion("Resolve for a supported platform with `-s os=... -s arch=...`"),

            ResolveError::DependencyConflict {
                package,
                first,
                second,
            } => Diagnostic::error(format!("version conflict for `{}`", package))
                .with_context(format!("first requested as {}/{}", package, first))
                .with_context(format!("later requested as {}/{}", package, second))
                .with_suggestion(format!(
                    "Pin `{}` to a single version in the recipe",
                    package
                )),

            ResolveError::MissingDependencyComponent {
                package,
                component,
                declared,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "staging rule references component `{}` not declared by `{}`",
                    component, package
                ));

                if declared.is_empty() {
                    diag = diag.with_context(format!("`{}` declares no components", package));
                } else {
                    diag = diag.with_context(format!("declared components: {}", declared.join(", ")));
                }

                diag.with_suggestion(format!(
                    "Add `{}` to the components of `{}` or remove the staging rule",
                    component, package
                ))
            }
        }
    }
}

/// Closest known name by edit distance, if it is close enough to be a typo.
fn closest_match<'a>(name: &str, known: &'a [String]) -> Option<&'a str> {
    known
        .iter()
        .map(|k| (edit_distance(&name.to_ascii_lowercase(), &k.to_ascii_lowercase()), k))
        .filter(|(d, _)| *d <= 3)
        .min_by_key(|(d, _)| *d)
        .map(|(_, k)| k.as_str())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut cur = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        prev = cur;
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        ["shared", "fPIC", "with_gpu", "with_npu", "with_tflite", "examples"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_unknown_option_diagnostic_suggests_close_name() {
        let err = ResolveError::UnknownOption {
            name: "with_gpus".to_string(),
            known: known(),
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("unknown option `with_gpus`"));
        assert!(output.contains("did you mean `with_gpu`?"));
        assert!(output.contains("help: consider:"));
    }

    #[test]
    fn test_unknown_option_without_close_name() {
        let err = ResolveError::UnknownOption {
            name: "telemetry_endpoint".to_string(),
            known: known(),
        };

        let output = err.to_diagnostic().format(false);
        assert!(!output.contains("did you mean"));
        assert!(output.contains("declared options: shared, fPIC"));
    }

    #[test]
    fn test_dependency_conflict_diagnostic() {
        let err = ResolveError::DependencyConflict {
            package: "opencv".to_string(),
            first: "4.9.0".to_string(),
            second: "4.5.5".to_string(),
        };

        assert_eq!(err.to_string(), "conflicting versions for `opencv`");
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("opencv/4.9.0"));
        assert!(output.contains("opencv/4.5.5"));
    }

    #[test]
    fn test_missing_component_diagnostic() {
        let err = ResolveError::MissingDependencyComponent {
            package: "qnn".to_string(),
            component: "dsp".to_string(),
            declared: vec!["cpu".to_string(), "htp".to_string()],
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("component `dsp`"));
        assert!(output.contains("declared components: cpu, htp"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("fpic", "fpic"), 0);
        assert_eq!(edit_distance("with_gpus", "with_gpu"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
    }
}
