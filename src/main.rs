/// The Big IDEA:
/// Every repository ends up with a pile of pre-commit checks, each one
/// implemented by some external tool pinned to some version, and the only
/// thing holding it all together is one declarative manifest file.
/// When that file rots - a typo'd field, a pattern that is not a valid
/// regex, a "pin" that actually tracks a branch - nobody notices until
/// the runner blows up on someone else's machine.
/// This tool owns that manifest: it loads it, validates it, shows which
/// tracked files each hook would touch, and never runs any of the tools
/// itself.
use anyhow::Result;
use clap::{Parser, Subcommand};

use git_hook_manifest::utils;

#[derive(Parser)]
#[command(name = "git-hook-manifest")]
#[command(about = "Manage the declarative hook manifest consumed by an external hook runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter hook manifest for this repository
    Init,
    /// Load the manifest and report structural and semantic problems
    Validate,
    /// List the repository entries and their hook activations
    List,
    /// Show how many tracked files each hook activation selects
    Status {
        /// Also print each hook's filter patterns and arguments
        #[arg(long)]
        verbose: bool,
    },
    /// Re-serialize the manifest to another format
    Export {
        /// Path of the file to write
        output: String,
        /// Output format: yaml, json, or toml
        #[arg(long, default_value = "yaml")]
        format: String,
    },
    /// Install git hooks that re-validate the manifest before commit and push
    InstallHooks,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => utils::initialize_repository(),
        Commands::Validate => utils::validate_manifest(),
        Commands::List => utils::list_hooks(),
        Commands::Status { verbose } => utils::show_status(verbose),
        Commands::Export { output, format } => utils::export_manifest(&output, &format),
        Commands::InstallHooks => utils::install_hooks(),
    }
}
