//! `edgerecipe matrix` command

use anyhow::{bail, Result};

use crate::cli::MatrixArgs;
use edgerecipe::ops::{resolve_matrix, MatrixOptions, MatrixOutcome};
use edgerecipe::util::diagnostic::{self, Diagnostic};

pub fn execute(args: MatrixArgs, color: bool) -> Result<()> {
    let input = args.input.into_options().load()?;
    let opts = MatrixOptions {
        oses: args.oses,
        vary: args.vary,
        fail_fast: args.fail_fast,
    };

    let entries = resolve_matrix(&input.recipe, &input.platform, &input.raw, &opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            let varied: Vec<String> = opts
                .varied_flags()
                .into_iter()
                .filter_map(|flag| entry.options.get(flag).map(|v| format!("{}={}", flag, v)))
                .collect();

            match &entry.outcome {
                MatrixOutcome::Resolved(res) => {
                    let deps: Vec<String> =
                        res.variant.dependencies.iter().map(|d| d.reference()).collect();
                    println!(
                        "{}  {}  [{}]  {}",
                        res.package_id,
                        entry.platform,
                        varied.join(" "),
                        deps.join(" ")
                    );
                }
                MatrixOutcome::Failed(message) => {
                    let diag = Diagnostic::warning(format!(
                        "variant {} [{}] failed",
                        entry.platform,
                        varied.join(" ")
                    ))
                    .with_context(message.clone());
                    diagnostic::emit(&diag, color);
                }
            }
        }
    }

    let failed = entries.iter().filter(|e| !e.is_ok()).count();
    if failed > 0 {
        bail!("{} of {} variants failed to resolve", failed, entries.len());
    }

    Ok(())
}
