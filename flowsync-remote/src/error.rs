//! Error types for flowsync-remote.

use thiserror::Error;

use flowsync_core::DocumentError;

/// All errors that can arise from talking to the workflow API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request could not be built (malformed host or URL).
    #[error("invalid request to {url}: {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The configured base URL does not parse.
    #[error("invalid service URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A namespace or identifier that cannot be a single URL path segment.
    #[error("'{segment}' cannot be used as a URL path segment")]
    InvalidSegment { segment: String },

    /// DNS, connect, TLS or timeout failure.
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The existence probe got neither 200 nor 404, so existence is unknown.
    #[error("lookup of {url} returned status {status}; cannot tell whether the workflow exists")]
    LookupFailed { url: String, status: u16 },

    /// Create or update answered with a non-2xx status.
    #[error("{method} {url} rejected with status {status}: {body}")]
    MutationRejected {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    /// The document could not be serialized for sending.
    #[error(transparent)]
    Document(#[from] DocumentError),
}
