//! `edgerecipe version` command

use anyhow::Result;

use crate::cli::VersionArgs;
use edgerecipe::ops::{CMakeProjectVersion, VersionSource};

pub fn execute(args: VersionArgs) -> Result<()> {
    let version = CMakeProjectVersion::new(args.cmake).version()?;
    println!("{}", version);
    Ok(())
}
