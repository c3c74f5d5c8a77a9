//! Shared sync pipeline entrypoint used by the CLI.

use flowsync_core::SyncTarget;
use flowsync_remote::WorkflowApi;
use flowsync_vcs::{resolve_version_tag, RevisionDiff};

use crate::{FailurePolicy, ReconcileSettings, Reconciler, SyncDriver, SyncError, SyncReport};

/// Run-wide options beyond the target itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub from_rev: String,
    pub to_rev: String,
    pub force: bool,
    pub dry_run: bool,
    pub policy: FailurePolicy,
    /// Commit id from the CI environment, used when the short hash is unavailable.
    pub fallback_commit: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            from_rev: "HEAD^".to_string(),
            to_rev: "HEAD".to_string(),
            force: false,
            dry_run: false,
            policy: FailurePolicy::Abort,
            fallback_commit: None,
        }
    }
}

/// Resolve the version tag once, then reconcile every target under
/// `target.sync_path`.
pub fn run(
    target: &SyncTarget,
    options: &RunOptions,
    api: &dyn WorkflowApi,
    vcs: &dyn RevisionDiff,
) -> Result<SyncReport, SyncError> {
    let version_tag = resolve_version_tag(vcs, &options.to_rev, options.fallback_commit.as_deref())
        .map_err(SyncError::Revision)?;
    tracing::info!("working ref {version_tag}");

    let settings = ReconcileSettings {
        namespace: target.namespace.clone(),
        version_tag,
        from_rev: options.from_rev.clone(),
        to_rev: options.to_rev.clone(),
        force: options.force,
        dry_run: options.dry_run,
    };
    let driver = SyncDriver::new(Reconciler::new(api, vcs, settings), options.policy);
    driver.run(&target.sync_path)
}
