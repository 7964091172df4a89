//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use edgerecipe::ops::ResolveOptions;

/// edgerecipe - resolve edgerunner build variants
#[derive(Parser)]
#[command(name = "edgerecipe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve one build variant
    Resolve(ResolveArgs),

    /// Resolve every combination of target OSes and toggled flags
    Matrix(MatrixArgs),

    /// Copy a variant's runtime libraries out of dependency install trees
    Stage(StageArgs),

    /// Show the recipe's options, constraints and dependencies
    Inspect(InspectArgs),

    /// Print the package version declared in CMakeLists.txt
    Version(VersionArgs),
}

/// Inputs shared by every command that resolves a variant.
#[derive(Args)]
pub struct InputArgs {
    /// Recipe file (defaults to the built-in edgerunner recipe)
    #[arg(long, env = "EDGERECIPE_RECIPE")]
    pub recipe: Option<PathBuf>,

    /// Profile file; may be repeated, later profiles win
    #[arg(long = "profile", short = 'p')]
    pub profiles: Vec<PathBuf>,

    /// Ignore the default profile in the config directory
    #[arg(long)]
    pub no_default_profile: bool,

    /// Setting override, e.g. `-s os=Android`
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Option override, e.g. `-o with_gpu=True`
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Read the package version from this CMake file
    #[arg(long, value_name = "CMAKELISTS")]
    pub cmake: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print CMake `-D` arguments only
    #[arg(long, conflicts_with = "json")]
    pub cmake_args: bool,
}

#[derive(Args)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Target OS; may be repeated (defaults to the resolved OS)
    #[arg(long = "os")]
    pub oses: Vec<String>,

    /// Flag to toggle on and off; may be repeated
    #[arg(long)]
    pub vary: Vec<String>,

    /// Stop at the first failing variant
    #[arg(long)]
    pub fail_fast: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct StageArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Install root of a dependency, e.g. `--dep qnn=/opt/qnn`; may be repeated
    #[arg(long = "dep", value_name = "NAME=DIR")]
    pub deps: Vec<String>,

    /// Runtime directory to copy into
    #[arg(long, default_value = "bin")]
    pub to: PathBuf,

    /// List what would be copied without copying
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Recipe file (defaults to the built-in edgerunner recipe)
    #[arg(long, env = "EDGERECIPE_RECIPE")]
    pub recipe: Option<PathBuf>,

    /// Print the recipe as TOML
    #[arg(long)]
    pub toml: bool,
}

#[derive(Args)]
pub struct VersionArgs {
    /// CMake file declaring the project version
    #[arg(long, default_value = "CMakeLists.txt")]
    pub cmake: PathBuf,
}

impl InputArgs {
    pub fn into_options(self) -> ResolveOptions {
        ResolveOptions {
            recipe: self.recipe,
            profiles: self.profiles,
            no_default_profile: self.no_default_profile,
            settings: self.settings,
            options: self.options,
        }
    }
}
