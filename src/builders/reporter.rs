use anyhow::Result;
use colored::Colorize;

use crate::builders::filters::{FileFilter, PathSelector};
use crate::core::manifest::{HookActivation, Manifest};

/// Classification summary for a single hook activation.
#[derive(Debug)]
pub struct HookStatus {
    /// Number of tracked files the hook's filters select.
    pub selected: usize,
    /// Total number of tracked files the filters were evaluated against.
    pub total: usize,
}

pub trait StatusReporter {
    fn generate_status_report(
        &self,
        manifest: &Manifest,
        tracked_files: &[String],
        staged_files: &[String],
        verbose: bool,
    ) -> Result<()>;
}

/// A concrete implementation of `StatusReporter` that prints the report to
/// the console. This is the primary reporter used by the `status` command.
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Constructs a new `ConsoleReporter` instance.
    pub fn new() -> Self {
        Self
    }

    /// Classifies the tracked files for one activation.
    fn hook_status(&self, hook: &HookActivation, tracked_files: &[String]) -> Result<HookStatus> {
        let filter = FileFilter::for_hook(hook)?;
        let selected = tracked_files.iter().filter(|p| filter.selects(p)).count();
        Ok(HookStatus {
            selected,
            total: tracked_files.len(),
        })
    }

    /// Formats the status line for a single hook.
    ///
    /// 🟢: the hook selects at least one tracked file.
    /// 🟡: the hook selects nothing (filters probably too narrow).
    fn format_hook_status(&self, hook: &HookActivation, status: &HookStatus) -> String {
        let status_icon = if status.selected > 0 { "🟢" } else { "🟡" };

        let percentage = if status.total > 0 {
            (status.selected as f64 / status.total as f64) * 100.0
        } else {
            0.0
        };

        format!(
            "  {} {} ({}/{} files, {:.1}%)",
            status_icon,
            hook.display_name(),
            status.selected,
            status.total,
            percentage
        )
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter for ConsoleReporter {
    /// Generates and prints the full status report to standard output.
    fn generate_status_report(
        &self,
        manifest: &Manifest,
        tracked_files: &[String],
        staged_files: &[String],
        verbose: bool,
    ) -> Result<()> {
        println!("{}", "📊 Hook Manifest Status".cyan().bold());
        println!("=======================");

        if manifest.is_empty() {
            println!("No repository entries in the manifest.");
            return Ok(());
        }

        let mut idle_hooks = 0;

        for source in &manifest.repos {
            println!(
                "\n📦 {} @ {}",
                source.repo.bold(),
                source.rev.bright_yellow()
            );

            for hook in &source.hooks {
                let status = self.hook_status(hook, tracked_files)?;
                if status.selected == 0 {
                    idle_hooks += 1;
                }

                println!("{}", self.format_hook_status(hook, &status));

                if verbose {
                    if let Some(files) = &hook.files {
                        println!("     └─ files: {files}");
                    }
                    if let Some(exclude) = &hook.exclude {
                        println!("     └─ exclude: {exclude}");
                    }
                    if !hook.args.is_empty() {
                        println!("     └─ args: {}", hook.args.join(" "));
                    }
                }
            }
        }

        println!("\n{}", "📈 Summary:".cyan().bold());
        println!("  Repository entries: {}", manifest.repos.len());
        println!("  Hook activations: {}", manifest.total_hooks());
        println!("  Tracked files: {}", tracked_files.len());
        println!("  Currently staged: {}", staged_files.len());
        println!("  Hooks selecting no files: {idle_hooks}");

        if idle_hooks > 0 {
            println!("\n⚠️  Run with --verbose to see each hook's filter patterns");
        }

        Ok(())
    }
}
