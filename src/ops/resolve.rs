//! Resolution from on-disk inputs.
//!
//! Gathers the recipe, profiles and command-line assignments into one
//! `ResolveInput`, then runs the pure resolver on it.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::flag::RawOptions;
use crate::core::platform::Platform;
use crate::core::recipe::Recipe;
use crate::ops::version::VersionSource;
use crate::resolver::{self, Resolution};
use crate::util::config::{default_profile_path, load_profiles};

/// Where resolution inputs come from.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Recipe file; the built-in edgerunner recipe when `None`
    pub recipe: Option<PathBuf>,

    /// Profiles, merged in order
    pub profiles: Vec<PathBuf>,

    /// Skip `<config dir>/profiles/default.toml`
    pub no_default_profile: bool,

    /// `key=value` setting overrides
    pub settings: Vec<String>,

    /// `name=value` option overrides
    pub options: Vec<String>,
}

/// Fully gathered resolution input.
#[derive(Debug, Clone)]
pub struct ResolveInput {
    pub recipe: Recipe,
    pub platform: Platform,
    pub raw: RawOptions,
}

impl ResolveOptions {
    /// Load the recipe and merge profiles and overrides.
    pub fn load(&self) -> Result<ResolveInput> {
        let recipe = match &self.recipe {
            Some(path) => Recipe::load(path)?,
            None => Recipe::edgerunner(),
        };

        let default = if self.no_default_profile {
            None
        } else {
            default_profile_path()
        };

        let mut profile = load_profiles(default.as_deref(), &self.profiles)?;
        for setting in &self.settings {
            profile
                .set_setting(setting)
                .with_context(|| format!("invalid setting `{}`", setting))?;
        }
        for option in &self.options {
            profile
                .set_option(option)
                .with_context(|| format!("invalid option assignment `{}`", option))?;
        }

        let platform = profile.platform(&Platform::host());
        let raw = profile.raw_options()?;

        tracing::debug!(
            "Resolving {} for {} with {} explicit options",
            recipe.name,
            platform,
            raw.len()
        );

        Ok(ResolveInput {
            recipe,
            platform,
            raw,
        })
    }
}

/// Resolve one variant and, if a version source is given, attach the
/// package reference.
///
/// Resolution failures are returned as `ResolveError` inside the `anyhow`
/// error so callers can downcast them for rendering.
pub fn resolve_variant(
    input: &ResolveInput,
    version: Option<&dyn VersionSource>,
) -> Result<Resolution> {
    let resolution = resolver::resolve(&input.recipe, &input.raw, &input.platform)?;

    match version {
        Some(source) => {
            let version = source.version()?;
            Ok(resolution.with_reference(&input.recipe.name, &version))
        }
        None => Ok(resolution),
    }
}
