//! `edgerecipe resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use edgerecipe::ops::{resolve_variant, CMakeProjectVersion, VersionSource};
use edgerecipe::Resolution;

pub fn execute(args: ResolveArgs) -> Result<()> {
    let input = args.input.into_options().load()?;

    let version = args.cmake.map(CMakeProjectVersion::new);
    let resolution = resolve_variant(&input, version.as_ref().map(|v| v as &dyn VersionSource))?;

    if args.json {
        println!("{}", resolution.to_json()?);
    } else if args.cmake_args {
        for arg in resolution.toolchain_variables.to_cmake_args() {
            println!("{}", arg);
        }
    } else {
        print_summary(&resolution);
    }

    Ok(())
}

pub fn print_summary(res: &Resolution) {
    match &res.reference {
        Some(reference) => println!("{} ({})", reference, res.variant.platform),
        None => println!("{}", res.variant.platform),
    }
    println!("package id: {}", res.package_id);

    println!("\noptions:");
    for flag in res.variant.options.iter() {
        println!("  {} = {}", flag.name, flag.value);
    }
    for adjustment in &res.adjustments {
        println!("  # {}", adjustment);
    }

    println!("\nrequires:");
    for dep in &res.variant.dependencies {
        let headers = if dep.transitive_headers {
            " (transitive headers)"
        } else {
            ""
        };
        println!("  {}{}", dep.reference(), headers);
        for (option, value) in dep.sub_options.iter() {
            println!("    {}:{} = {}", dep.name, option, value);
        }
    }

    if !res.variant.test_dependencies.is_empty() {
        println!("\ntest requires:");
        for dep in &res.variant.test_dependencies {
            println!("  {}", dep.reference());
        }
    }

    println!("\ntoolchain:");
    for var in res.toolchain_variables.iter() {
        println!("  {}", var.to_cmake_arg());
    }

    println!("\npackage info:");
    println!("  libs: {}", res.exported_metadata.lib_flags().join(" "));
    if !res.exported_metadata.defines.is_empty() {
        println!("  defines: {}", res.exported_metadata.define_flags().join(" "));
    }

    if !res.staging_instructions.is_empty() {
        println!("\nstaging:");
        for step in &res.staging_instructions {
            println!(
                "  {}:{} <- {}",
                step.dependency, step.component_name, step.source_glob
            );
        }
    }
}
