//! Error types for flowsync-vcs.

use thiserror::Error;

/// Failures of the version-control collaborator.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The tool could not be started at all (not installed, not executable).
    #[error("cannot run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited non-zero.
    #[error("`{command}` failed (status {}): {stderr}", describe_status(.status))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// Neither the tool nor the environment yielded a revision id.
    #[error("cannot determine revision for {rev}: no short hash and no commit id in the environment")]
    RevisionUnavailable { rev: String },
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "killed by signal".to_string(),
    }
}
