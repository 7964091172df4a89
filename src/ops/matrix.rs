//! Variant matrices.
//!
//! Resolves every combination of target OS and toggled flags. Variants are
//! independent, so they resolve in parallel; results come back in matrix
//! order regardless of scheduling.

use rayon::prelude::*;
use serde::Serialize;

use crate::core::flag::RawOptions;
use crate::core::platform::Platform;
use crate::core::recipe::Recipe;
use crate::resolver::{self, Resolution, ResolveError};

/// Largest number of flags a matrix may vary (2^8 variants per OS).
pub const MAX_VARIED_FLAGS: usize = 8;

/// Matrix dimensions.
#[derive(Debug, Clone, Default)]
pub struct MatrixOptions {
    /// Target OSes; the base platform's OS when empty
    pub oses: Vec<String>,

    /// Flags toggled on and off in every combination
    pub vary: Vec<String>,

    /// Stop at the first failing variant
    pub fail_fast: bool,
}

/// One cell of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixEntry {
    pub platform: Platform,

    /// Raw options of this cell (base options plus the varied flags)
    pub options: RawOptions,

    #[serde(flatten)]
    pub outcome: MatrixOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatrixOutcome {
    Resolved(Box<Resolution>),
    Failed(String),
}

impl MatrixOptions {
    /// Varied flags in first-mention order, repeats dropped.
    pub fn varied_flags(&self) -> Vec<&String> {
        let mut seen = Vec::with_capacity(self.vary.len());
        for flag in &self.vary {
            if !seen.contains(&flag) {
                seen.push(flag);
            }
        }
        seen
    }
}

impl MatrixEntry {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, MatrixOutcome::Resolved(_))
    }
}

/// Inputs of every matrix cell, in matrix order: OS-major, then the varied
/// flags counted in binary with the first flag as the high bit.
pub fn expand(
    base_platform: &Platform,
    base_raw: &RawOptions,
    opts: &MatrixOptions,
) -> Vec<(Platform, RawOptions)> {
    let platforms: Vec<Platform> = if opts.oses.is_empty() {
        vec![base_platform.clone()]
    } else {
        opts.oses.iter().map(|os| base_platform.with_os(os)).collect()
    };

    let vary = opts.varied_flags();
    let n = vary.len();
    let mut cells = Vec::with_capacity(platforms.len() << n);

    for platform in &platforms {
        for mask in 0..(1usize << n) {
            let mut raw = base_raw.clone();
            for (i, flag) in vary.iter().enumerate() {
                let on = mask & (1 << (n - 1 - i)) != 0;
                raw.insert((*flag).clone(), on);
            }
            cells.push((platform.clone(), raw));
        }
    }

    cells
}

/// Resolve every cell of the matrix.
///
/// Varied flags must be declared. With `fail_fast`, the first failing cell
/// in matrix order is returned as the error; otherwise failures are kept in
/// their cells.
pub fn resolve_matrix(
    recipe: &Recipe,
    base_platform: &Platform,
    base_raw: &RawOptions,
    opts: &MatrixOptions,
) -> anyhow::Result<Vec<MatrixEntry>> {
    let vary = opts.varied_flags();
    for flag in &vary {
        if !recipe.is_declared(flag) {
            return Err(ResolveError::UnknownOption {
                name: (*flag).clone(),
                known: recipe.flag_names().map(String::from).collect(),
            }
            .into());
        }
    }
    if vary.len() > MAX_VARIED_FLAGS {
        anyhow::bail!(
            "cannot vary {} flags at once (at most {})",
            vary.len(),
            MAX_VARIED_FLAGS
        );
    }

    let cells = expand(base_platform, base_raw, opts);
    tracing::info!("Resolving {} variants", cells.len());

    let results: Vec<(Platform, RawOptions, Result<Resolution, ResolveError>)> = cells
        .into_par_iter()
        .map(|(platform, raw)| {
            let result = resolver::resolve(recipe, &raw, &platform);
            (platform, raw, result)
        })
        .collect();

    let mut entries = Vec::with_capacity(results.len());
    for (platform, options, result) in results {
        let outcome = match result {
            Ok(resolution) => MatrixOutcome::Resolved(Box::new(resolution)),
            Err(err) if opts.fail_fast => return Err(err.into()),
            Err(err) => {
                tracing::warn!("Variant {} failed: {}", platform, err);
                MatrixOutcome::Failed(err.to_string())
            }
        };
        entries.push(MatrixEntry {
            platform,
            options,
            outcome,
        });
    }

    Ok(entries)
}
