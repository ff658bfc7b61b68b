// This file is the module declaration file for the `core` module.
// It declares the submodules in `src/core/` and exposes them to the
// rest of the crate.

// `manifest` module:
// The heart of the crate. Defines the manifest data model (`Manifest`,
// `RepositorySource`, `HookActivation`), the two-stage YAML parse that
// produces typed errors, and the `ManifestProvider` trait with its
// file-backed `ManifestManager` implementation (locate at the repository
// root, load, save, export to other formats).
pub mod manifest;

// `errors` module:
// The typed loader error (`ManifestError`) distinguishing a malformed
// document from a missing required field and from a filter pattern that
// fails to compile, each with its document location.
pub mod errors;

// `git` module:
// The `GitClient` trait and its `git2`-backed implementation. Supplies the
// tracked and staged file listings that filter patterns are evaluated
// against, plus repository root discovery.
pub mod git;
