//! Profile files: the settings and option values a variant is resolved for.
//!
//! A profile is TOML:
//!
//! ```toml
//! [settings]
//! os = "Android"
//! arch = "armv8"
//!
//! [options]
//! with_npu = true
//! with_gpu = "False"
//! ```
//!
//! Profiles merge left to right (later wins). Command-line `-s` and `-o`
//! assignments are merged last. Settings a profile leaves unset fall back to
//! the host platform.
//!
//! The default profile lives at `<config dir>/profiles/default.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::flag::{parse_assignment, parse_bool, RawOptions};
use crate::core::platform::Platform;
use crate::util::diagnostic::suggestions;

/// Settings section of a profile. Unset fields keep the host value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileSettings {
    pub os: Option<String>,
    pub compiler: Option<String>,
    pub arch: Option<String>,
    pub build_type: Option<String>,
}

/// An option value as written in a profile: a TOML bool or a string like `"True"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Bool(bool),
    Text(String),
}

impl ProfileValue {
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            ProfileValue::Bool(b) => Ok(*b),
            ProfileValue::Text(s) => parse_bool(s),
        }
    }
}

/// A resolution profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub settings: ProfileSettings,
    pub options: BTreeMap<String, ProfileValue>,
}

impl Profile {
    /// Parse a profile from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let profile: Profile = toml::from_str(s).context("failed to parse profile")?;
        for (name, value) in &profile.options {
            value
                .as_bool()
                .with_context(|| format!("invalid value for option `{}`", name))?;
        }
        Ok(profile)
    }

    /// Load a profile file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile: {}", path.display()))?;

        Self::from_toml_str(&contents).with_context(|| {
            format!(
                "invalid profile: {}\nhelp: {}",
                path.display(),
                suggestions::CHECK_PROFILE
            )
        })
    }

    /// Load a profile with fallback to an empty profile if the file doesn't exist
    /// or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load profile from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another profile into this one (other takes precedence).
    pub fn merge(&mut self, other: Profile) {
        if other.settings.os.is_some() {
            self.settings.os = other.settings.os;
        }
        if other.settings.compiler.is_some() {
            self.settings.compiler = other.settings.compiler;
        }
        if other.settings.arch.is_some() {
            self.settings.arch = other.settings.arch;
        }
        if other.settings.build_type.is_some() {
            self.settings.build_type = other.settings.build_type;
        }
        self.options.extend(other.options);
    }

    /// Apply a `name=value` option assignment.
    pub fn set_option(&mut self, assignment: &str) -> Result<()> {
        let (name, value) = parse_assignment(assignment)?;
        self.options.insert(name, ProfileValue::Bool(value));
        Ok(())
    }

    /// Apply a `key=value` setting assignment.
    pub fn set_setting(&mut self, assignment: &str) -> Result<()> {
        let Some((key, value)) = assignment.split_once('=') else {
            anyhow::bail!("expected `key=value`, got `{}`", assignment);
        };
        let value = Some(value.trim().to_string());
        match key.trim() {
            "os" => self.settings.os = value,
            "compiler" => self.settings.compiler = value,
            "arch" => self.settings.arch = value,
            "build_type" => self.settings.build_type = value,
            other => anyhow::bail!(
                "unknown setting `{}`\n\
                 help: valid settings are os, compiler, arch, build_type",
                other
            ),
        }
        Ok(())
    }

    /// Platform described by this profile, starting from `base`.
    ///
    /// Changing the OS without naming a compiler picks that OS's usual compiler.
    pub fn platform(&self, base: &Platform) -> Platform {
        let mut platform = match &self.settings.os {
            Some(os) => base.with_os(os),
            None => base.clone(),
        };
        if let Some(compiler) = &self.settings.compiler {
            platform.compiler = compiler.clone();
        }
        if let Some(arch) = &self.settings.arch {
            platform.arch = arch.clone();
        }
        if let Some(build_type) = &self.settings.build_type {
            platform.build_type = build_type.clone();
        }
        platform
    }

    /// Raw options described by this profile.
    pub fn raw_options(&self) -> Result<RawOptions> {
        self.options
            .iter()
            .map(|(name, value)| -> Result<(String, bool)> {
                let value = value
                    .as_bool()
                    .with_context(|| format!("invalid value for option `{}`", name))?;
                Ok((name.clone(), value))
            })
            .collect()
    }
}

/// Get the edgerecipe config directory.
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "edgerecipe").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the default profile path (`<config dir>/profiles/default.toml`).
pub fn default_profile_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("profiles").join("default.toml"))
}

/// Load and merge profiles.
///
/// Order of precedence (highest to lowest):
/// 1. Explicit profiles, later ones first
/// 2. The default profile, if `default` is given and the file exists
/// 3. Host platform and recipe defaults
pub fn load_profiles(default: Option<&Path>, explicit: &[PathBuf]) -> Result<Profile> {
    let mut profile = Profile::default();

    if let Some(path) = default {
        profile.merge(Profile::load_or_default(path));
    }

    for path in explicit {
        profile.merge(Profile::load(path)?);
    }

    Ok(profile)
}
