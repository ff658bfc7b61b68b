use anyhow::Result;
use colored::Colorize;

use crate::builders::hooks;
use crate::builders::reporter::{ConsoleReporter, StatusReporter};
use crate::builders::validator::{ManifestValidator, StandardValidator};
use crate::core::git::{Git2Client, GitClient};
use crate::core::manifest::{ManifestManager, ManifestProvider};

pub fn initialize_repository() -> Result<()> {
    let manager = ManifestManager::new()?;
    manager.initialize()?;
    println!(
        "✓ Wrote starter manifest to {}",
        manager.manifest_path().display()
    );
    println!("Run 'git-hook-manifest install-hooks' to re-check it before every commit");
    Ok(())
}

pub fn install_hooks() -> Result<()> {
    let manager = ManifestManager::new()?;
    hooks::install_git_hooks(manager.get_repo_root())?;
    println!("✓ Installed Git hooks that validate the manifest");
    Ok(())
}

pub fn validate_manifest() -> Result<()> {
    let manager = ManifestManager::new()?;
    let manifest = manager.load_manifest()?;

    let validator = StandardValidator::new();
    let issues = validator.validate_manifest(&manifest)?;

    if issues.is_empty() {
        println!(
            "✓ Manifest is valid ({} hooks across {} repository entries)",
            manifest.total_hooks(),
            manifest.repos.len()
        );
        Ok(())
    } else {
        println!("⚠️  Found issues in manifest:");
        for issue in issues {
            println!("  - {issue}");
        }
        anyhow::bail!("Manifest validation failed.");
    }
}

pub fn list_hooks() -> Result<()> {
    let manager = ManifestManager::new()?;
    let manifest = manager.load_manifest()?;

    if manifest.is_empty() {
        println!("No repository entries in the manifest.");
        return Ok(());
    }

    for source in &manifest.repos {
        println!("\n📦 {} @ {}", source.repo.bold(), source.rev.bright_yellow());
        for hook in &source.hooks {
            if hook.args.is_empty() {
                println!("  🔍 {} ({})", hook.display_name(), hook.id);
            } else {
                println!(
                    "  🔍 {} ({}) args: {}",
                    hook.display_name(),
                    hook.id,
                    hook.args.join(" ")
                );
            }
        }
    }
    Ok(())
}

pub fn show_status(verbose: bool) -> Result<()> {
    let manager = ManifestManager::new()?;
    let manifest = manager.load_manifest()?;

    let git = Git2Client::new(manager.get_repo_root())?;
    let tracked_files = git.get_tracked_files()?;
    let staged_files = git.get_staged_files()?;

    let reporter = ConsoleReporter::new();
    reporter.generate_status_report(&manifest, &tracked_files, &staged_files, verbose)
}

pub fn export_manifest(output_path: &str, format: &str) -> Result<()> {
    let manager = ManifestManager::new()?;
    manager.export(output_path, format)?;
    println!("✓ Exported manifest to {output_path} ({format})");
    Ok(())
}
