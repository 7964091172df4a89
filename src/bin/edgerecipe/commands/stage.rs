//! `edgerecipe stage` command

use anyhow::Result;

use crate::cli::StageArgs;
use edgerecipe::ops::{resolve_variant, ArtifactStager, FsStager};

pub fn execute(args: StageArgs) -> Result<()> {
    let input = args.input.into_options().load()?;
    let resolution = resolve_variant(&input, None)?;

    if resolution.staging_instructions.is_empty() {
        println!("nothing to stage for {}", resolution.variant.platform);
        return Ok(());
    }

    let mut stager = FsStager::new().dry_run(args.dry_run);
    for dep in &args.deps {
        stager = stager.with_root_arg(dep)?;
    }

    let staged = stager.stage(&resolution.staging_instructions, &args.to)?;

    let verb = if args.dry_run { "Would stage" } else { "Staged" };
    for file in &staged {
        println!(
            "{} {} ({}:{}) -> {}",
            verb,
            file.source.display(),
            file.dependency,
            file.component_name,
            file.destination.display()
        );
    }
    tracing::info!("{} {} files into {}", verb, staged.len(), args.to.display());

    Ok(())
}
