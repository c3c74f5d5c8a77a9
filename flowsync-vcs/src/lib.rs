//! # flowsync-vcs
//!
//! Revision lookups backed by the `git` command line.
//!
//! The [`RevisionDiff`] trait is the seam the reconciler depends on; [`GitCli`]
//! is the production implementation and tests substitute an in-memory fake.

pub mod error;
pub mod git;

pub use error::VcsError;
pub use git::GitCli;

use std::path::Path;

use flowsync_core::ChangeSet;

/// Change detection and revision naming.
pub trait RevisionDiff {
    /// Paths under `path` that differ between `from` and `to`.
    fn changed_paths(&self, from: &str, to: &str, path: &Path) -> Result<ChangeSet, VcsError>;

    /// Abbreviated commit hash for `rev`. May be empty if the tool printed nothing.
    fn short_revision(&self, rev: &str) -> Result<String, VcsError>;

    /// Whether anything under `path` changed between `from` and `to`.
    fn changed_since(&self, from: &str, to: &str, path: &Path) -> Result<bool, VcsError> {
        Ok(!self.changed_paths(from, to, path)?.is_empty())
    }
}

impl<T: RevisionDiff + ?Sized> RevisionDiff for &T {
    fn changed_paths(&self, from: &str, to: &str, path: &Path) -> Result<ChangeSet, VcsError> {
        (**self).changed_paths(from, to, path)
    }

    fn short_revision(&self, rev: &str) -> Result<String, VcsError> {
        (**self).short_revision(rev)
    }
}

/// Resolve the version tag for a run: the short hash of `rev`, or `fallback`
/// (the CI-provided commit id) when the lookup fails or prints nothing.
pub fn resolve_version_tag(
    vcs: &dyn RevisionDiff,
    rev: &str,
    fallback: Option<&str>,
) -> Result<String, VcsError> {
    let short = match vcs.short_revision(rev) {
        Ok(short) => short,
        Err(err) => {
            tracing::warn!("cannot resolve short revision for {rev}: {err}");
            String::new()
        }
    };
    if !short.is_empty() {
        return Ok(short);
    }

    fallback
        .map(str::trim)
        .filter(|sha| !sha.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| VcsError::RevisionUnavailable {
            rev: rev.to_string(),
        })
}
