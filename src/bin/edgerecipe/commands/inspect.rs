//! `edgerecipe inspect` command

use anyhow::Result;

use crate::cli::InspectArgs;
use edgerecipe::core::{Constraint, DependencyKind, Predicate, Recipe, RuleValue};

pub fn execute(args: InspectArgs) -> Result<()> {
    let recipe = match &args.recipe {
        Some(path) => Recipe::load(path)?,
        None => Recipe::edgerunner(),
    };

    if args.toml {
        print!("{}", recipe.to_toml_string()?);
        return Ok(());
    }

    println!("recipe: {}", recipe.name);

    println!("\noptions:");
    for flag in &recipe.flags {
        let mut line = format!("  {} = {}", flag.name, flag.default);
        if let Some(var) = &flag.toolchain_variable {
            line.push_str(&format!("  [{}]", var));
        }
        if let Some(define) = &flag.define {
            line.push_str(&format!("  -D{}", define));
        }
        if let Some(description) = &flag.description {
            line.push_str(&format!("  # {}", description));
        }
        println!("{}", line);
    }

    println!("\nconstraints:");
    for constraint in &recipe.constraints {
        let action = match constraint {
            Constraint::Remove { flag, .. } => format!("remove {}", flag),
            Constraint::Force { flag, value, .. } => format!("force {} = {}", flag, value),
            Constraint::Reject { flag, .. } => format!("reject {}", flag),
        };
        println!(
            "  {} when {}  # {}",
            action,
            constraint.when(),
            constraint.reason()
        );
    }

    println!("\ndependencies:");
    for dep in &recipe.dependencies {
        let kind = match dep.kind {
            DependencyKind::Requires => "requires",
            DependencyKind::TestRequires => "test_requires",
        };
        let when = if dep.when == Predicate::Always {
            String::new()
        } else {
            format!(" when {}", dep.when)
        };
        println!("  {} {}{}", kind, dep.reference(), when);

        for rule in &dep.rules {
            let value = match &rule.value {
                RuleValue::Const(v) => v.to_string(),
                RuleValue::Flag(flag) => flag.clone(),
                RuleValue::FlagIfIncluded { flag, dependency } => {
                    format!("{} if {} is included", flag, dependency)
                }
            };
            println!("    {}:{} <- {}", dep.name, rule.option, value);
        }
        for stage in &dep.staging {
            println!("    stage {} ({})", stage.component, stage.library);
        }
    }

    println!("\nlibs: {}", recipe.libs.join(", "));

    Ok(())
}
