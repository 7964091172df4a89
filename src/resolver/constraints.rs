//! Option validation and platform constraint enforcement.
//!
//! This module handles:
//! - Rejecting option names the recipe does not declare
//! - Overlaying raw values onto declared defaults
//! - Removing flags that are meaningless on the platform
//! - Forcing flags to platform-safe values
//! - Rejecting flags that remain unsupported after forcing

use crate::core::flag::{Adjustment, AdjustmentKind, FlagValue, RawOptions, ValidatedOptions};
use crate::core::platform::Platform;
use crate::core::predicate::FlagSource;
use crate::core::recipe::{Constraint, Recipe};
use crate::resolver::errors::ResolveError;

/// Working flag set while constraints are applied.
///
/// Entries keep declaration order; a removed flag becomes `None`.
struct WorkingSet {
    values: Vec<(String, Option<bool>)>,
}

impl WorkingSet {
    fn get(&self, name: &str) -> Option<bool> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| *v)
    }

    fn slot(&mut self, name: &str) -> Option<&mut Option<bool>> {
        self.values
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl FlagSource for WorkingSet {
    fn flag(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }
}

/// Validate raw options and apply the recipe's platform constraints.
///
/// # Algorithm
///
/// 1. Fail on the first raw name (in sorted order) that is not declared.
/// 2. Start from declared defaults, overlaid with raw values.
/// 3. Apply every `remove` constraint whose predicate holds.
/// 4. Apply every `force` constraint whose predicate holds and whose flag
///    is still present with a different value.
/// 5. Fail on the first `reject` constraint whose predicate holds while its
///    flag is still enabled.
///
/// Predicates in later steps see the working set as left by earlier steps.
pub fn resolve_options(
    recipe: &Recipe,
    raw: &RawOptions,
    platform: &Platform,
) -> Result<ValidatedOptions, ResolveError> {
    if let Some(unknown) = raw.keys().find(|name| !recipe.is_declared(name)) {
        return Err(ResolveError::UnknownOption {
            name: unknown.clone(),
            known: recipe.flag_names().map(str::to_string).collect(),
        });
    }

    let mut working = WorkingSet {
        values: recipe
            .flags
            .iter()
            .map(|decl| {
                let value = raw.get(&decl.name).copied().unwrap_or(decl.default);
                (decl.name.clone(), Some(value))
            })
            .collect(),
    };

    let mut adjustments = Vec::new();

    for constraint in &recipe.constraints {
        let Constraint::Remove { flag, when, reason } = constraint else {
            continue;
        };
        let Some(current) = working.get(flag) else {
            continue;
        };
        if !when.eval(&working, platform) {
            continue;
        }

        tracing::debug!("Removing option `{}` on {}: {}", flag, platform, reason);
        if let Some(slot) = working.slot(flag) {
            *slot = None;
        }
        adjustments.push(Adjustment {
            flag: flag.clone(),
            kind: AdjustmentKind::Removed { was: current },
            reason: reason.clone(),
        });
    }

    for constraint in &recipe.constraints {
        let Constraint::Force {
            flag,
            value,
            when,
            reason,
        } = constraint
        else {
            continue;
        };
        let Some(current) = working.get(flag) else {
            continue;
        };
        if current == *value || !when.eval(&working, platform) {
            continue;
        }

        tracing::debug!(
            "Forcing option `{}` to {} on {}: {}",
            flag,
            value,
            platform,
            reason
        );
        if let Some(slot) = working.slot(flag) {
            *slot = Some(*value);
        }
        adjustments.push(Adjustment {
            flag: flag.clone(),
            kind: AdjustmentKind::Forced {
                from: current,
                to: *value,
            },
            reason: reason.clone(),
        });
    }

    for constraint in &recipe.constraints {
        let Constraint::Reject { flag, when, reason } = constraint else {
            continue;
        };
        if working.flag(flag) && when.eval(&working, platform) {
            return Err(ResolveError::UnsupportedOnPlatform {
                flag: flag.clone(),
                platform: platform.to_string(),
                reason: reason.clone(),
            });
        }
    }

    let values = working
        .values
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| FlagValue { name, value }))
        .collect();

    Ok(ValidatedOptions::new(values, adjustments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{linux, macos, platform, raw, windows};

    #[test]
    fn test_defaults_without_input() {
        let opts = resolve_options(&Recipe::edgerunner(), &RawOptions::new(), &linux()).unwrap();

        let values: Vec<_> = opts.iter().map(|v| (v.name.as_str(), v.value)).collect();
        assert_eq!(
            values,
            vec![
                ("shared", false),
                ("fPIC", true),
                ("with_gpu", false),
                ("with_npu", false),
                ("with_tflite", true),
                ("examples", false),
            ]
        );
        assert!(opts.adjustments().is_empty());
    }

    #[test]
    fn test_unknown_option_fails() {
        let err = resolve_options(
            &Recipe::edgerunner(),
            &raw(&[("with_gpu", true), ("with_cuda", true)]),
            &linux(),
        )
        .unwrap_err();

        match err {
            ResolveError::UnknownOption { name, known } => {
                assert_eq!(name, "with_cuda");
                assert_eq!(known.len(), 6);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_fpic_removed_on_windows() {
        let input = raw(&[("fPIC", true)]);
        let opts = resolve_options(&Recipe::edgerunner(), &input, &windows()).unwrap();

        assert!(!opts.contains("fPIC"));
        assert_eq!(opts.adjustments().len(), 1);
        assert_eq!(opts.adjustments()[0].flag, "fPIC");
        assert_eq!(
            opts.adjustments()[0].kind,
            AdjustmentKind::Removed { was: true }
        );
        // Raw input is left untouched.
        assert_eq!(input.get("fPIC"), Some(&true));
    }

    #[test]
    fn test_fpic_removed_once_for_shared_on_windows() {
        let opts = resolve_options(
            &Recipe::edgerunner(),
            &raw(&[("shared", true)]),
            &windows(),
        )
        .unwrap();

        assert!(!opts.contains("fPIC"));
        assert_eq!(opts.adjustments().len(), 1);
    }

    #[test]
    fn test_fpic_removed_for_shared_builds() {
        let opts =
            resolve_options(&Recipe::edgerunner(), &raw(&[("shared", true)]), &linux()).unwrap();
        assert!(!opts.contains("fPIC"));
        assert!(opts.is_enabled("shared"));
    }

    #[test]
    fn test_npu_forced_off_on_apple() {
        let opts =
            resolve_options(&Recipe::edgerunner(), &raw(&[("with_npu", true)]), &macos()).unwrap();

        assert_eq!(opts.get("with_npu"), Some(false));
        assert!(opts.adjustments().iter().any(|a| a.flag == "with_npu"
            && a.kind == AdjustmentKind::Forced {
                from: true,
                to: false
            }));
    }

    #[test]
    fn test_force_not_recorded_when_value_already_safe() {
        let opts = resolve_options(&Recipe::edgerunner(), &RawOptions::new(), &macos()).unwrap();
        assert!(opts.adjustments().iter().all(|a| a.flag != "with_npu"));
    }

    #[test]
    fn test_npu_rejected_on_unsupported_arch() {
        let err = resolve_options(
            &Recipe::edgerunner(),
            &raw(&[("with_npu", true)]),
            &platform("Linux", "armv7"),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::UnsupportedOnPlatform { ref flag, .. } if flag == "with_npu"
        ));
    }

    #[test]
    fn test_npu_disabled_is_fine_on_unsupported_arch() {
        let opts = resolve_options(
            &Recipe::edgerunner(),
            &RawOptions::new(),
            &platform("Linux", "armv7"),
        )
        .unwrap();
        assert_eq!(opts.get("with_npu"), Some(false));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let input = raw(&[("with_gpu", true), ("shared", true), ("with_npu", true)]);
        let a = resolve_options(&Recipe::edgerunner(), &input, &windows()).unwrap();
        let b = resolve_options(&Recipe::edgerunner(), &input, &windows()).unwrap();
        assert_eq!(a, b);
    }
}
