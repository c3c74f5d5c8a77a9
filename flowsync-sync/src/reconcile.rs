//! Per-file reconciliation.
//!
//! ## Decision table
//!
//! | Remote      | `force` | Changed in range | Action |
//! |-------------|---------|------------------|--------|
//! | not found   | any     | not consulted    | create |
//! | found       | true    | not consulted    | update |
//! | found       | false   | yes              | update |
//! | found       | false   | no               | none   |
//!
//! Sequencing per file is fixed: load the document, probe the service, diff
//! (only when found and not forced), then act. At most one mutation is sent.

use std::path::Path;

use flowsync_core::{Namespace, RemoteExistence, WorkflowDocument, WorkflowId};
use flowsync_remote::WorkflowApi;
use flowsync_vcs::RevisionDiff;

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What reconciliation did for a single workflow file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Workflow did not exist and was created.
    Created { id: WorkflowId },
    /// Workflow existed and was replaced.
    Updated { id: WorkflowId },
    /// Workflow existed and the file is unchanged; nothing was sent.
    Unchanged { id: WorkflowId },
    /// Dry run: the workflow *would* have been created.
    WouldCreate { id: WorkflowId },
    /// Dry run: the workflow *would* have been updated.
    WouldUpdate { id: WorkflowId },
}

impl TargetOutcome {
    pub fn id(&self) -> &WorkflowId {
        match self {
            TargetOutcome::Created { id }
            | TargetOutcome::Updated { id }
            | TargetOutcome::Unchanged { id }
            | TargetOutcome::WouldCreate { id }
            | TargetOutcome::WouldUpdate { id } => id,
        }
    }

    /// Short machine-readable name, e.g. `"created"`.
    pub fn action(&self) -> &'static str {
        match self {
            TargetOutcome::Created { .. } => "created",
            TargetOutcome::Updated { .. } => "updated",
            TargetOutcome::Unchanged { .. } => "unchanged",
            TargetOutcome::WouldCreate { .. } => "would_create",
            TargetOutcome::WouldUpdate { .. } => "would_update",
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Run-wide inputs to every reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSettings {
    pub namespace: Namespace,
    /// Version tag stamped on every outgoing document.
    pub version_tag: String,
    /// Prior revision of the diff range.
    pub from_rev: String,
    /// Current revision of the diff range.
    pub to_rev: String,
    /// Update existing workflows without consulting the diff.
    pub force: bool,
    /// Decide but never mutate.
    pub dry_run: bool,
}

/// Decides and performs the remote operation for one workflow file.
pub struct Reconciler<'a> {
    api: &'a dyn WorkflowApi,
    vcs: &'a dyn RevisionDiff,
    settings: ReconcileSettings,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        api: &'a dyn WorkflowApi,
        vcs: &'a dyn RevisionDiff,
        settings: ReconcileSettings,
    ) -> Self {
        Self { api, vcs, settings }
    }

    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    /// Reconcile the workflow defined in `path`.
    pub fn reconcile(&self, path: &Path) -> Result<TargetOutcome, SyncError> {
        tracing::info!("handling workflow {}", path.display());

        let mut document = WorkflowDocument::load(path).map_err(|source| SyncError::Document {
            path: path.to_path_buf(),
            source,
        })?;
        document.set_version_tag(&self.settings.version_tag);
        let id = document.identifier().clone();
        let ns = &self.settings.namespace;

        let existence = self
            .api
            .lookup(ns, &id)
            .map_err(|source| remote_err(path, source))?;

        match existence {
            RemoteExistence::NotFound => {
                if self.settings.dry_run {
                    tracing::info!("[dry-run] would create workflow {id} in namespace {ns}");
                    return Ok(TargetOutcome::WouldCreate { id });
                }
                tracing::info!("creating workflow {id} in namespace {ns}");
                self.api
                    .create(ns, &document)
                    .map_err(|source| remote_err(path, source))?;
                Ok(TargetOutcome::Created { id })
            }
            RemoteExistence::Found => {
                if !self.settings.force && !self.has_changes(path)? {
                    tracing::info!("workflow {id} unchanged since {}", self.settings.from_rev);
                    return Ok(TargetOutcome::Unchanged { id });
                }
                if self.settings.dry_run {
                    tracing::info!("[dry-run] would update workflow {id} in namespace {ns}");
                    return Ok(TargetOutcome::WouldUpdate { id });
                }
                tracing::info!("updating workflow {id} in namespace {ns}");
                self.api
                    .update(ns, &id, &document)
                    .map_err(|source| remote_err(path, source))?;
                Ok(TargetOutcome::Updated { id })
            }
        }
    }

    fn has_changes(&self, path: &Path) -> Result<bool, SyncError> {
        self.vcs
            .changed_since(&self.settings.from_rev, &self.settings.to_rev, path)
            .map_err(|source| SyncError::Vcs {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn remote_err(path: &Path, source: flowsync_remote::RemoteError) -> SyncError {
    SyncError::Remote {
        path: path.to_path_buf(),
        source,
    }
}
