use anyhow::{Context, Result};
use regex::Regex;

use crate::core::manifest::HookActivation;

/// The `PathSelector` trait defines the core behavior for deciding whether a
/// hook applies to a tracked file path.
///
/// This lets the reporter treat every activation uniformly when classifying
/// the repository's files, regardless of which filters the activation
/// actually carries.
pub trait PathSelector {
    /// Checks whether the given repository-relative path is selected.
    fn selects(&self, path: &str) -> bool;
}

/// Compiled form of a hook activation's `files`/`exclude` filters.
///
/// The manifest keeps the patterns as plain strings so the model stays
/// serializable; the regexes are compiled here when a command actually needs
/// to evaluate them. Both filters use search semantics: an unanchored match
/// anywhere in the path counts.
#[derive(Debug)]
pub struct FileFilter {
    files: Option<Regex>,
    exclude: Option<Regex>,
}

impl FileFilter {
    /// Compiles the filters of a hook activation.
    ///
    /// The loader has already validated the pattern syntax, so a failure here
    /// means the activation was constructed by hand; the error names the hook
    /// either way.
    pub fn for_hook(hook: &HookActivation) -> Result<Self> {
        let files = hook
            .files
            .as_deref()
            .map(Regex::new)
            .transpose()
            .with_context(|| format!("Invalid `files` pattern for hook '{}'", hook.id))?;

        let exclude = hook
            .exclude
            .as_deref()
            .map(Regex::new)
            .transpose()
            .with_context(|| format!("Invalid `exclude` pattern for hook '{}'", hook.id))?;

        Ok(Self { files, exclude })
    }

    /// Returns the subset of `paths` this filter selects, preserving order.
    pub fn selected_paths(&self, paths: &[String]) -> Vec<String> {
        paths
            .iter()
            .filter(|p| self.selects(p))
            .cloned()
            .collect()
    }
}

impl PathSelector for FileFilter {
    fn selects(&self, path: &str) -> bool {
        // A missing `files` filter selects everything; `exclude` then vetoes.
        if let Some(files) = &self.files
            && !files.is_match(path)
        {
            return false;
        }

        if let Some(exclude) = &self.exclude
            && exclude.is_match(path)
        {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook(files: Option<&str>, exclude: Option<&str>) -> HookActivation {
        HookActivation {
            id: "check-foo".to_string(),
            name: None,
            files: files.map(str::to_string),
            exclude: exclude.map(str::to_string),
            args: vec![],
        }
    }

    #[test]
    fn test_no_filters_selects_everything() {
        let filter = FileFilter::for_hook(&hook(None, None)).unwrap();
        assert!(filter.selects("src/main.rs"));
        assert!(filter.selects("README.md"));
    }

    #[test]
    fn test_files_filter_selects_matching_paths() {
        let filter = FileFilter::for_hook(&hook(Some(r"\.json$"), None)).unwrap();
        assert!(filter.selects("config/settings.json"));
        assert!(!filter.selects("config/settings.yaml"));
    }

    #[test]
    fn test_exclude_filter_rejects_matching_paths() {
        let filter = FileFilter::for_hook(&hook(None, Some("^vendor/"))).unwrap();
        assert!(!filter.selects("vendor/lib.js"));
        assert!(filter.selects("src/lib.js"));
    }

    #[test]
    fn test_exclude_vetoes_included_path() {
        let filter = FileFilter::for_hook(&hook(Some(r"\.py$"), Some("^tests/"))).unwrap();
        assert!(filter.selects("app/main.py"));
        assert!(!filter.selects("tests/test_main.py"));
        assert!(!filter.selects("app/main.rs"));
    }

    #[test]
    fn test_search_semantics_match_anywhere() {
        let filter = FileFilter::for_hook(&hook(Some("migrations"), None)).unwrap();
        assert!(filter.selects("db/migrations/0001_init.sql"));
        assert!(!filter.selects("db/schema.sql"));
    }

    #[test]
    fn test_selected_paths_preserves_order() {
        let filter = FileFilter::for_hook(&hook(Some(r"\.rs$"), Some("^target/"))).unwrap();
        let paths = vec![
            "src/main.rs".to_string(),
            "target/debug/build.rs".to_string(),
            "Cargo.toml".to_string(),
            "src/lib.rs".to_string(),
        ];
        assert_eq!(
            filter.selected_paths(&paths),
            vec!["src/main.rs".to_string(), "src/lib.rs".to_string()]
        );
    }

    #[test]
    fn test_invalid_pattern_names_hook() {
        let err = FileFilter::for_hook(&hook(Some("([bad"), None)).unwrap_err();
        assert!(err.to_string().contains("check-foo"));
    }
}
