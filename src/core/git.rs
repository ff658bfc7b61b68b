use anyhow::Result;
use git2::Repository;
use std::path::{Path, PathBuf};
use std::str;

/// Trait defining the Git operations the manifest workflow needs.
/// This abstraction keeps the reporter testable without a real repository
/// behind it.
pub trait GitClient {
    /// All tracked file paths, relative to the repository root. Filter
    /// patterns from the manifest are evaluated against these.
    fn get_tracked_files(&self) -> Result<Vec<String>>;

    /// Paths currently staged in the index.
    fn get_staged_files(&self) -> Result<Vec<String>>;

    /// Returns the root path of the repository.
    fn get_repo_root(&self) -> PathBuf;
}

/// Concrete implementation of GitClient using the git2 crate.
pub struct Git2Client {
    repo: Repository,
}

impl Git2Client {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path)?;
        Ok(Self { repo })
    }
}

impl GitClient for Git2Client {
    fn get_tracked_files(&self) -> Result<Vec<String>> {
        let index = self.repo.index()?;
        let mut files = Vec::new();
        for i in 0..index.len() {
            if let Some(entry) = index.get(i)
                && let Ok(path_str) = str::from_utf8(&entry.path)
            {
                files.push(path_str.to_string());
            }
        }
        Ok(files)
    }

    fn get_staged_files(&self) -> Result<Vec<String>> {
        let index = self.repo.index()?;
        let mut staged = Vec::new();

        // Diff HEAD against the index when a commit exists; before the first
        // commit there is no HEAD to diff against, so every index entry
        // counts as staged.
        if let Ok(head) = self.repo.head() {
            let head_tree = head.peel_to_tree()?;
            let diff = self
                .repo
                .diff_tree_to_index(Some(&head_tree), Some(&index), None)?;

            for delta in diff.deltas() {
                if let Some(path) = delta.new_file().path() {
                    staged.push(path.to_string_lossy().into_owned());
                }
            }
        } else {
            for i in 0..index.len() {
                if let Some(entry) = index.get(i)
                    && let Ok(path_str) = str::from_utf8(&entry.path)
                {
                    staged.push(path_str.to_string());
                }
            }
        }

        Ok(staged)
    }

    fn get_repo_root(&self) -> PathBuf {
        // repo.path() is the .git directory; its parent is the worktree root.
        self.repo
            .path()
            .parent()
            .unwrap_or(self.repo.path())
            .to_path_buf()
    }
}
