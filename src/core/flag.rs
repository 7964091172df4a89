//! Feature flags and the validated option snapshot.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{bail, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::predicate::FlagSource;

/// Raw option input, keyed by flag name.
///
/// A `BTreeMap` so unknown-name reporting is deterministic.
pub type RawOptions = BTreeMap<String, bool>;

/// A declared boolean build option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDecl {
    pub name: String,

    #[serde(default)]
    pub default: bool,

    /// Preprocessor define exported to consumers while the flag is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub define: Option<String>,

    /// Toolchain variable mirroring the flag value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolchain_variable: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FlagDecl {
    pub fn new(name: impl Into<String>, default: bool) -> Self {
        FlagDecl {
            name: name.into(),
            default,
            define: None,
            toolchain_variable: None,
            description: None,
        }
    }

    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.define = Some(define.into());
        self
    }

    pub fn with_toolchain_variable(mut self, variable: impl Into<String>) -> Self {
        self.toolchain_variable = Some(variable.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A flag name with its resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValue {
    pub name: String,
    pub value: bool,
}

/// What a constraint did to a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdjustmentKind {
    Removed { was: bool },
    Forced { from: bool, to: bool },
}

/// A recorded platform adjustment, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Adjustment {
    pub flag: String,
    #[serde(flatten)]
    pub kind: AdjustmentKind,
    pub reason: String,
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AdjustmentKind::Removed { .. } => write!(f, "removed `{}`: {}", self.flag, self.reason),
            AdjustmentKind::Forced { from, to } => write!(
                f,
                "forced `{}` {} -> {}: {}",
                self.flag, from, to, self.reason
            ),
        }
    }
}

/// Immutable snapshot of flag values after platform constraints.
///
/// Values are stored in flag-declaration order. Removed flags are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOptions {
    values: Vec<FlagValue>,
    adjustments: Vec<Adjustment>,
}

impl ValidatedOptions {
    pub(crate) fn new(values: Vec<FlagValue>, adjustments: Vec<Adjustment>) -> Self {
        ValidatedOptions {
            values,
            adjustments,
        }
    }

    /// Value of a flag, or `None` if it was removed or never declared.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    /// Whether the flag is present and enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Flag values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FlagValue> {
        self.values.iter()
    }

    pub fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }
}

impl FlagSource for ValidatedOptions {
    fn flag(&self, name: &str) -> bool {
        self.is_enabled(name)
    }
}

impl Serialize for ValidatedOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for v in &self.values {
            map.serialize_entry(&v.name, &v.value)?;
        }
        map.end()
    }
}

/// Parse an option value as written on the command line or in a profile.
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => bail!(
            "invalid option value `{}`\n\
             help: use True or False",
            value
        ),
    }
}

/// Parse a `name=value` option assignment.
pub fn parse_assignment(s: &str) -> Result<(String, bool)> {
    let Some((name, value)) = s.split_once('=') else {
        bail!("expected `name=value`, got `{}`", s);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("missing option name in `{}`", s);
    }
    Ok((name.to_string(), parse_bool(value)?))
}
