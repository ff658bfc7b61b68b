use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{ManifestError, ManifestResult};

/// File name of the manifest, resolved against the repository root.
pub const MANIFEST_FILE_NAME: &str = ".hook-manifest.yaml";

/// Starter manifest written by `init`. The hook set mirrors the conventional
/// hygiene checks: whitespace, end-of-file, large files, data-format
/// validation, private keys, import sorting, and formatting.
const STARTER_MANIFEST: &str = r#"# Hook manifest consumed by the external hook runner.
# Each entry pins a tool source to an immutable revision and activates
# one or more of the hooks that source defines.
repos:
  - repo: https://github.com/pre-commit/pre-commit-hooks
    rev: v5.0.0
    hooks:
      - id: trailing-whitespace
      - id: end-of-file-fixer
      - id: check-added-large-files
      - id: check-json
      - id: check-xml
      - id: check-toml
      - id: check-yaml
      - id: detect-private-key
  - repo: https://github.com/pycqa/isort
    rev: 6.0.1
    hooks:
      - id: isort
  - repo: https://github.com/psf/black
    rev: 25.1.0
    hooks:
      - id: black
"#;

/// A single hook activation under a repository entry.
///
/// Only `id` is required. `name` overrides the hook's display name, `files`
/// and `exclude` are regular expressions evaluated against tracked file paths
/// (search semantics, not anchored), and `args` is passed through to the
/// underlying tool by the runner.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HookActivation {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl HookActivation {
    /// The name shown in reports: the override if present, the id otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A repository entry: where a set of hook definitions comes from, pinned to
/// a single revision, plus the hooks activated from it.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RepositorySource {
    pub repo: String,
    pub rev: String,
    pub hooks: Vec<HookActivation>,
}

/// The loaded manifest: an ordered list of repository entries. Parsed once
/// per run and never mutated afterwards.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    pub repos: Vec<RepositorySource>,
}

impl Manifest {
    /// Parse a manifest document.
    ///
    /// The parse runs in two stages: serde_yaml first deserializes into raw
    /// structures where every field is optional, so a structurally broken
    /// document surfaces as `MalformedDocument` with a line/column position.
    /// The raw form is then resolved into the validated model, where absent
    /// or empty required fields become `MissingField` and filter patterns
    /// that fail to compile become `InvalidPattern`, each carrying the
    /// document path of the offending entry.
    ///
    /// A whitespace-only document is the empty manifest; zero repository
    /// entries are valid.
    pub fn parse_str(document: &str) -> ManifestResult<Self> {
        if document.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawManifest = serde_yaml::from_str(document)?;
        raw.resolve()
    }

    /// Total number of hook activations across all repository entries.
    pub fn total_hooks(&self) -> usize {
        self.repos.iter().map(|r| r.hooks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Serialize back to the YAML document form. Re-parsing the output
    /// yields an identical manifest.
    pub fn to_yaml(&self) -> ManifestResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// Raw document structures. Everything is optional here so that required-field
// checks run after deserialization and can name the entry they belong to.

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    repos: Option<Vec<RawRepositorySource>>,
}

#[derive(Debug, Deserialize)]
struct RawRepositorySource {
    #[serde(default)]
    repo: Option<String>,
    #[serde(default)]
    rev: Option<String>,
    #[serde(default)]
    hooks: Option<Vec<RawHookActivation>>,
}

#[derive(Debug, Deserialize)]
struct RawHookActivation {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    files: Option<String>,
    #[serde(default)]
    exclude: Option<String>,
    #[serde(default)]
    args: Option<Vec<String>>,
}

impl RawManifest {
    fn resolve(self) -> ManifestResult<Manifest> {
        let mut repos = Vec::new();

        for (repo_index, raw_repo) in self.repos.unwrap_or_default().into_iter().enumerate() {
            repos.push(raw_repo.resolve(repo_index)?);
        }

        Ok(Manifest { repos })
    }
}

impl RawRepositorySource {
    fn resolve(self, repo_index: usize) -> ManifestResult<RepositorySource> {
        let location = format!("repos[{repo_index}]");

        let repo = require_string(self.repo, "repo", &location)?;
        let rev = require_string(self.rev, "rev", &location)?;

        let raw_hooks = self.hooks.unwrap_or_default();
        if raw_hooks.is_empty() {
            return Err(ManifestError::MissingField {
                field: "hooks",
                location,
            });
        }

        let mut hooks = Vec::new();
        for (hook_index, raw_hook) in raw_hooks.into_iter().enumerate() {
            hooks.push(raw_hook.resolve(repo_index, hook_index)?);
        }

        Ok(RepositorySource { repo, rev, hooks })
    }
}

impl RawHookActivation {
    fn resolve(self, repo_index: usize, hook_index: usize) -> ManifestResult<HookActivation> {
        let location = format!("repos[{repo_index}].hooks[{hook_index}]");

        let id = require_string(self.id, "id", &location)?;

        // Name the hook in pattern errors so the offending activation can be
        // found without counting list entries.
        let hook_location = format!("{location} (id: {id})");
        validate_pattern(self.files.as_deref(), "files", &hook_location)?;
        validate_pattern(self.exclude.as_deref(), "exclude", &hook_location)?;

        Ok(HookActivation {
            id,
            name: self.name,
            files: self.files,
            exclude: self.exclude,
            args: self.args.unwrap_or_default(),
        })
    }
}

fn require_string(
    value: Option<String>,
    field: &'static str,
    location: &str,
) -> ManifestResult<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ManifestError::MissingField {
            field,
            location: location.to_string(),
        }),
    }
}

fn validate_pattern(
    pattern: Option<&str>,
    field: &'static str,
    location: &str,
) -> ManifestResult<()> {
    if let Some(pattern) = pattern
        && let Err(source) = regex::Regex::new(pattern)
    {
        return Err(ManifestError::InvalidPattern {
            field,
            pattern: pattern.to_string(),
            location: location.to_string(),
            source,
        });
    }
    Ok(())
}

/// Abstraction over manifest storage. The manager below is the filesystem
/// implementation; tests can substitute their own.
pub trait ManifestProvider {
    fn load_manifest(&self) -> ManifestResult<Manifest>;
    fn save_manifest(&self, manifest: &Manifest) -> ManifestResult<()>;
    fn manifest_path(&self) -> &Path;
}

/// Owns the manifest location for one repository and handles file I/O.
pub struct ManifestManager {
    manifest_path: PathBuf,
    repo_root: PathBuf,
}

impl ManifestManager {
    pub fn new() -> Result<Self> {
        let repo_root = find_git_root()?;
        Ok(Self::new_at(repo_root))
    }

    pub fn new_at(repo_root: PathBuf) -> Self {
        let manifest_path = repo_root.join(MANIFEST_FILE_NAME);
        Self {
            manifest_path,
            repo_root,
        }
    }

    /// Write the starter manifest unless one already exists.
    pub fn initialize(&self) -> Result<()> {
        if self.manifest_path.exists() {
            return Ok(());
        }

        fs::write(&self.manifest_path, STARTER_MANIFEST)
            .context("Failed to write starter manifest")?;
        Ok(())
    }

    /// Re-serialize the loaded manifest into the requested format and write
    /// it to `output_path`.
    pub fn export(&self, output_path: &str, format: &str) -> Result<()> {
        let manifest = self.load_manifest()?;

        let content = match format {
            "json" => serde_json::to_string_pretty(&manifest)
                .context("Failed to serialize to JSON")?,
            "toml" => toml::to_string_pretty(&manifest).context("Failed to serialize to TOML")?,
            _ => serde_yaml::to_string(&manifest).context("Failed to serialize to YAML")?,
        };

        fs::write(output_path, content).context("Failed to write export file")?;

        Ok(())
    }

    pub fn get_repo_root(&self) -> &Path {
        &self.repo_root
    }
}

impl ManifestProvider for ManifestManager {
    fn load_manifest(&self) -> ManifestResult<Manifest> {
        if !self.manifest_path.exists() {
            return Ok(Manifest::default());
        }

        let content = fs::read_to_string(&self.manifest_path)?;
        Manifest::parse_str(&content)
    }

    fn save_manifest(&self, manifest: &Manifest) -> ManifestResult<()> {
        let content = manifest.to_yaml()?;
        fs::write(&self.manifest_path, content)?;
        Ok(())
    }

    fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }
}

fn find_git_root() -> Result<PathBuf> {
    let current_dir = std::env::current_dir()?;
    let mut dir = current_dir.as_path();

    loop {
        if dir.join(".git").exists() {
            return Ok(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => anyhow::bail!("Not in a Git repository"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_repo_single_hook() {
        let doc = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks:
      - id: check-foo
"#;
        let manifest = Manifest::parse_str(doc).unwrap();
        assert_eq!(manifest.repos.len(), 1);
        assert_eq!(manifest.repos[0].repo, "https://example.com/tool");
        assert_eq!(manifest.repos[0].rev, "1.0.0");
        assert_eq!(manifest.repos[0].hooks.len(), 1);
        assert_eq!(manifest.repos[0].hooks[0].id, "check-foo");
        assert!(manifest.repos[0].hooks[0].exclude.is_none());
    }

    #[test]
    fn test_parse_full_hook_activation() {
        let doc = r#"
repos:
  - repo: https://example.com/tool
    rev: v2.1.0
    hooks:
      - id: format
        name: Format sources
        files: \.rs$
        exclude: ^vendor/
        args: ["--check", "--color=never"]
"#;
        let manifest = Manifest::parse_str(doc).unwrap();
        let hook = &manifest.repos[0].hooks[0];
        assert_eq!(hook.display_name(), "Format sources");
        assert_eq!(hook.files.as_deref(), Some(r"\.rs$"));
        assert_eq!(hook.exclude.as_deref(), Some("^vendor/"));
        assert_eq!(hook.args, vec!["--check", "--color=never"]);
    }

    #[test]
    fn test_empty_document_is_empty_manifest() {
        let manifest = Manifest::parse_str("").unwrap();
        assert!(manifest.is_empty());

        let manifest = Manifest::parse_str("   \n\n").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_zero_repos_is_valid() {
        let manifest = Manifest::parse_str("repos: []").unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.total_hooks(), 0);
    }

    #[test]
    fn test_missing_rev_fails() {
        let doc = r#"
repos:
  - repo: https://example.com/tool
    hooks:
      - id: check-foo
"#;
        let err = Manifest::parse_str(doc).unwrap_err();
        match err {
            ManifestError::MissingField { field, location } => {
                assert_eq!(field, "rev");
                assert_eq!(location, "repos[0]");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_rev_fails() {
        let doc = r#"
repos:
  - repo: https://example.com/tool
    rev: ""
    hooks:
      - id: check-foo
"#;
        let err = Manifest::parse_str(doc).unwrap_err();
        assert!(matches!(err, ManifestError::MissingField { field: "rev", .. }));
    }

    #[test]
    fn test_missing_repo_fails() {
        let doc = r#"
repos:
  - rev: "1.0.0"
    hooks:
      - id: check-foo
"#;
        let err = Manifest::parse_str(doc).unwrap_err();
        assert!(matches!(err, ManifestError::MissingField { field: "repo", .. }));
    }

    #[test]
    fn test_missing_hook_id_fails() {
        let doc = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks:
      - name: no id here
"#;
        let err = Manifest::parse_str(doc).unwrap_err();
        match err {
            ManifestError::MissingField { field, location } => {
                assert_eq!(field, "id");
                assert_eq!(location, "repos[0].hooks[0]");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_hooks_fails() {
        let doc = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks: []
"#;
        let err = Manifest::parse_str(doc).unwrap_err();
        assert!(matches!(err, ManifestError::MissingField { field: "hooks", .. }));
    }

    #[test]
    fn test_invalid_exclude_pattern_names_hook() {
        let doc = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks:
      - id: check-foo
        exclude: "([unclosed"
"#;
        let err = Manifest::parse_str(doc).unwrap_err();
        match err {
            ManifestError::InvalidPattern {
                field,
                pattern,
                location,
                ..
            } => {
                assert_eq!(field, "exclude");
                assert_eq!(pattern, "([unclosed");
                assert!(location.contains("check-foo"), "location was {location}");
            }
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_files_pattern_fails() {
        let doc = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks:
      - id: check-foo
        files: "*.json"
"#;
        // A bare leading `*` is not a valid regex.
        let err = Manifest::parse_str(doc).unwrap_err();
        assert!(matches!(
            err,
            ManifestError::InvalidPattern { field: "files", .. }
        ));
    }

    #[test]
    fn test_malformed_document_fails() {
        let err = Manifest::parse_str("repos: [[[not yaml").unwrap_err();
        assert!(matches!(err, ManifestError::MalformedDocument(_)));
    }

    #[test]
    fn test_key_order_is_insensitive_within_hook() {
        let a = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks:
      - id: check-foo
        exclude: ^docs/
        args: ["-q"]
"#;
        let b = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks:
      - args: ["-q"]
        exclude: ^docs/
        id: check-foo
"#;
        assert_eq!(Manifest::parse_str(a).unwrap(), Manifest::parse_str(b).unwrap());
    }

    #[test]
    fn test_sequence_order_is_sensitive() {
        let a = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks:
      - id: first
      - id: second
"#;
        let b = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks:
      - id: second
      - id: first
"#;
        assert_ne!(Manifest::parse_str(a).unwrap(), Manifest::parse_str(b).unwrap());
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let doc = r#"
repos:
  - repo: https://example.com/hygiene
    rev: v5.0.0
    hooks:
      - id: trailing-whitespace
      - id: check-json
        name: Validate JSON
        files: \.json$
        exclude: ^fixtures/
        args: ["--strict"]
  - repo: https://example.com/sorter
    rev: "6.0.1"
    hooks:
      - id: sort-imports
"#;
        let manifest = Manifest::parse_str(doc).unwrap();
        let serialized = manifest.to_yaml().unwrap();
        let reparsed = Manifest::parse_str(&serialized).unwrap();
        assert_eq!(manifest, reparsed);
    }

    #[test]
    fn test_starter_manifest_parses() {
        let manifest = Manifest::parse_str(STARTER_MANIFEST).unwrap();
        assert_eq!(manifest.repos.len(), 3);
        assert_eq!(manifest.repos[0].hooks.len(), 8);
        assert_eq!(manifest.repos[0].hooks[0].id, "trailing-whitespace");
    }

    #[test]
    fn test_unknown_keys_are_tolerated() {
        let doc = r#"
repos:
  - repo: https://example.com/tool
    rev: "1.0.0"
    hooks:
      - id: check-foo
        language_version: "3.12"
"#;
        let manifest = Manifest::parse_str(doc).unwrap();
        assert_eq!(manifest.repos[0].hooks[0].id, "check-foo");
    }
}
