use thiserror::Error;

/// Typed failure kinds for manifest loading.
///
/// The command handlers mostly pass these straight through `anyhow`, but the
/// loader keeps them as a real enum so callers (and the tests) can tell a
/// structurally broken document apart from a missing field or a bad pattern.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The input is not a valid YAML document for the manifest schema.
    /// The underlying serde_yaml error carries the line/column position.
    #[error("malformed manifest document: {0}")]
    MalformedDocument(#[from] serde_yaml::Error),

    /// A required field (`repo`, `rev`, `hooks`, or hook `id`) is absent or
    /// empty. `location` is the document path of the owning entry, e.g.
    /// `repos[1]` or `repos[1].hooks[0]`.
    #[error("missing required field `{field}` at {location}")]
    MissingField {
        field: &'static str,
        location: String,
    },

    /// A `files`/`exclude` value does not compile as a regular expression.
    /// `location` names the owning hook so the offending entry can be found
    /// without counting list items by hand.
    #[error("invalid `{field}` pattern `{pattern}` at {location}: {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        location: String,
        source: regex::Error,
    },

    /// The manifest file could not be read or written.
    #[error("manifest IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ManifestError {
    /// Human-readable document location of the failure, when one is known.
    pub fn location(&self) -> Option<String> {
        match self {
            ManifestError::MalformedDocument(e) => e
                .location()
                .map(|l| format!("line {}, column {}", l.line(), l.column())),
            ManifestError::MissingField { location, .. }
            | ManifestError::InvalidPattern { location, .. } => Some(location.clone()),
            ManifestError::Io(_) => None,
        }
    }
}

/// Result alias for loader-level operations.
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;
