use anyhow::Result;
use std::collections::HashSet;

use crate::builders::filters::FileFilter;
use crate::core::manifest::{HookActivation, Manifest};

/// The `ManifestValidator` trait defines the public interface for the
/// semantic validation pass that runs after a manifest has loaded.
///
/// Structural problems (missing fields, uncompilable patterns) are already
/// hard errors at load time; the checks here catch manifests that are
/// well-formed but probably not what the author meant.
pub trait ManifestValidator {
    /// Performs a full validation of the manifest and returns a list of
    /// issues found. An empty list means the manifest is clean.
    fn validate_manifest(&self, manifest: &Manifest) -> Result<Vec<String>>;

    /// Validates a single hook activation and returns its issues.
    fn validate_hook(&self, hook: &HookActivation) -> Result<Vec<String>>;
}

/// The `StandardValidator` is a concrete implementation of
/// `ManifestValidator` with the default rule set.
pub struct StandardValidator;

/// Revision names that track a moving branch rather than pinning a snapshot.
/// A rev must uniquely resolve to an immutable state of the hook source, so
/// these get flagged.
const MOVING_REFS: &[&str] = &["main", "master", "HEAD", "latest", "trunk"];

impl StandardValidator {
    /// Creates a new instance of `StandardValidator`.
    pub fn new() -> Self {
        Self
    }

    /// Checks for duplicate hook ids within a single repository entry.
    /// Activating the same hook twice from one source is almost always a
    /// copy-paste mistake.
    fn check_duplicate_ids(&self, hooks: &[HookActivation]) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for hook in hooks {
            if !seen.insert(hook.id.as_str()) {
                warnings.push(format!("Duplicate hook id '{}'", hook.id));
            }
        }
        warnings
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestValidator for StandardValidator {
    /// The main public method for validating the entire manifest.
    ///
    /// It checks, per repository entry:
    /// - whether the pinned revision is actually a moving ref,
    /// - duplicate hook ids among the entry's activations,
    /// - each individual activation (see `validate_hook`).
    fn validate_manifest(&self, manifest: &Manifest) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        for source in &manifest.repos {
            if MOVING_REFS.contains(&source.rev.as_str()) {
                issues.push(format!(
                    "Repository '{}' pins rev '{}', which is a moving ref, not an immutable snapshot",
                    source.repo, source.rev
                ));
            }

            issues.extend(self.check_duplicate_ids(&source.hooks));

            for hook in &source.hooks {
                issues.extend(self.validate_hook(hook)?);
            }
        }

        Ok(issues)
    }

    /// Validates a single activation's filters.
    ///
    /// Two levels, mirroring the load-time split:
    /// 1. **Syntax:** the patterns must compile. Manifests that came through
    ///    the loader already guarantee this; hand-built ones may not.
    /// 2. **Semantics:** patterns that compile but select nothing or reject
    ///    everything are flagged as likely mistakes.
    fn validate_hook(&self, hook: &HookActivation) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        if let Err(e) = FileFilter::for_hook(hook) {
            issues.push(format!("Hook '{}': {e:#}", hook.id));
        }

        if hook.exclude.as_deref() == Some(".*") {
            issues.push(format!(
                "Hook '{}': exclude pattern '.*' rejects every file",
                hook.id
            ));
        }

        if let Some(exclude) = &hook.exclude
            && exclude.trim().is_empty()
        {
            issues.push(format!(
                "Hook '{}': empty exclude pattern matches every path and rejects all files",
                hook.id
            ));
        }

        if let Some(files) = &hook.files
            && files.trim().is_empty()
        {
            issues.push(format!(
                "Hook '{}': empty files pattern is redundant (every path matches)",
                hook.id
            ));
        }

        Ok(issues)
    }
}
