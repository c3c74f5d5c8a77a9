//! Error types for flowsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use flowsync_core::DocumentError;
use flowsync_remote::RemoteError;
use flowsync_vcs::VcsError;

/// All errors that can arise while syncing. Per-target variants carry the
/// path of the workflow file being reconciled.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The workflow file is unreadable or has no identifier.
    #[error("cannot load workflow {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    /// Lookup, create or update against the service failed.
    #[error("remote call for {path} failed: {source}")]
    Remote {
        path: PathBuf,
        #[source]
        source: RemoteError,
    },

    /// Change detection for the file failed.
    #[error("cannot diff {path}: {source}")]
    Vcs {
        path: PathBuf,
        #[source]
        source: VcsError,
    },

    /// The run's version tag could not be resolved.
    #[error("cannot resolve version tag: {0}")]
    Revision(#[source] VcsError),

    /// The sync root could not be inspected or listed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
