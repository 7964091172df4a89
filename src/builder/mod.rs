//! Output emitters.
//!
//! Everything here is a pure view over a resolved variant:
//! - `toolchain`: boolean variables for the native build
//! - `package_info`: defines and libraries exported to consumers
//! - `staging`: runtime libraries to copy out of dependency install trees

pub mod package_info;
pub mod staging;
pub mod toolchain;

pub use package_info::{emit_metadata, ExportedMetadata};
pub use staging::{plan_staging, StagingInstruction};
pub use toolchain::{ToolchainVariable, ToolchainVariables};
