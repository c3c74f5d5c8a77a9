//! Error types for flowsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a workflow definition.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The workflow file could not be read.
    #[error("cannot read workflow {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not valid YAML.
    #[error("cannot parse workflow: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// The top-level YAML value is not a mapping.
    #[error("workflow definition must be a mapping at the top level")]
    NotAMapping,

    /// The `id` key is absent, not a string, or blank.
    #[error("workflow definition has no `id`")]
    MissingIdentifier,

    /// The `id` cannot name a single resource: it contains `/` or is a dot segment.
    #[error("workflow `id` '{0}' must not contain '/' or be '.' or '..'")]
    InvalidIdentifier(String),

    /// Serializing the document back to YAML failed.
    #[error("cannot serialize workflow `{id}`: {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Missing or invalid run configuration. Always fatal before any target is
/// processed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required input `{0}` is missing")]
    Missing(&'static str),

    #[error("unsupported protocol '{0}'; expected: http, https")]
    UnsupportedScheme(String),

    #[error("invalid server '{0}'; expected host[:port] without scheme or path")]
    InvalidHost(String),

    #[error("invalid namespace '{0}'; must not contain '/' or be '.' or '..'")]
    InvalidNamespace(String),

    #[error("invalid boolean '{value}' for input `{name}`")]
    InvalidBool { name: &'static str, value: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DocumentError {
    DocumentError::Io {
        path: path.into(),
        source,
    }
}
